mod common;

use actix_web::http::StatusCode;
use actix_web::http::header;
use actix_web::{App, test, web};
use careportal::handlers;
use serde_json::{Value, json};
use uuid::Uuid;

macro_rules! patient_app {
    ($auth:expr) => {
        test::init_service(
            App::new()
                .app_data(common::pools())
                .app_data($auth)
                .app_data(common::notifier())
                .service(
                    web::scope("/api/v1")
                        .configure(handlers::health::configure)
                        .configure(handlers::auth::configure_patient)
                        .configure(handlers::onboarding::configure)
                        .configure(handlers::question::configure)
                        .configure(handlers::diary::configure)
                        .configure(handlers::chemo::configure)
                        .configure(handlers::chat::configure)
                        .configure(handlers::education::configure),
                ),
        )
        .await
    };
}

#[actix_web::test]
async fn liveness_needs_no_token() {
    let app = patient_app!(common::idp_authenticator());
    let req = test::TestRequest::get()
        .uri("/api/v1/health/live")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn protected_endpoints_reject_missing_tokens() {
    let app = patient_app!(common::idp_authenticator());
    for uri in [
        "/api/v1/questions",
        "/api/v1/diary",
        "/api/v1/chemo",
        "/api/v1/chat/conversations",
        "/api/v1/education/symptoms",
        "/api/v1/onboarding/status",
        "/api/v1/auth/me",
    ] {
        // The chat scope's rate limiter keys on the peer address, so give
        // every request one.
        let req = test::TestRequest::get()
            .uri(uri)
            .peer_addr("127.0.0.1:9999".parse().unwrap())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[actix_web::test]
async fn non_bearer_authorization_is_rejected() {
    let app = patient_app!(common::idp_authenticator());
    let req = test::TestRequest::get()
        .uri("/api/v1/questions")
        .insert_header((header::AUTHORIZATION, "Basic dXNlcjpwYXNz"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn garbage_bearer_token_is_rejected() {
    let app = patient_app!(common::idp_authenticator());
    let req = test::TestRequest::get()
        .uri("/api/v1/questions")
        .insert_header((header::AUTHORIZATION, "Bearer not-a-jwt"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn empty_question_text_is_unprocessable() {
    let app = patient_app!(common::bypass_authenticator());
    let req = test::TestRequest::post()
        .uri("/api/v1/questions")
        .set_json(json!({ "question_text": "" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "validation_error");
    assert!(
        body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("question_text")
    );
}

#[actix_web::test]
async fn whitespace_question_text_is_unprocessable() {
    let app = patient_app!(common::bypass_authenticator());
    let req = test::TestRequest::post()
        .uri("/api/v1/questions")
        .set_json(json!({ "question_text": "   \n\t" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn blank_patch_text_is_unprocessable() {
    let app = patient_app!(common::bypass_authenticator());
    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/questions/{}", Uuid::new_v4()))
        .set_json(json!({ "question_text": "  " }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn error_body_shape_is_uniform() {
    let app = patient_app!(common::idp_authenticator());
    let req = test::TestRequest::get()
        .uri("/api/v1/questions")
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "unauthenticated");
    assert!(body["error"]["message"].is_string());
}
