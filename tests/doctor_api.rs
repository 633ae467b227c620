mod common;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use careportal::handlers;
use serde_json::json;

macro_rules! doctor_app {
    ($auth:expr, $config:expr) => {
        test::init_service(
            App::new()
                .app_data(common::pools())
                .app_data($auth)
                .app_data(common::notifier())
                .app_data($config)
                .service(
                    web::scope("/api/v1")
                        .configure(handlers::health::configure)
                        .configure(handlers::auth::configure_doctor)
                        .configure(handlers::clinic::configure)
                        .configure(handlers::staff::configure)
                        .configure(handlers::patient::configure)
                        .configure(handlers::dashboard::configure)
                        .configure(handlers::registration::configure)
                        .configure(handlers::docs::configure)
                        .configure(handlers::fax::configure),
                ),
        )
        .await
    };
}

fn inbound_fax_event() -> serde_json::Value {
    json!({
        "from_number": "+15550100",
        "to_number": "+15550199",
        "page_count": 3,
        "document_url": "https://faxes.example.com/abc.pdf",
        "received_at": "2026-08-06T12:00:00Z"
    })
}

#[actix_web::test]
async fn liveness_needs_no_token() {
    let app = doctor_app!(common::idp_authenticator(), common::config(None));
    let req = test::TestRequest::get()
        .uri("/api/v1/health/live")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn protected_endpoints_reject_missing_tokens() {
    let app = doctor_app!(common::idp_authenticator(), common::config(None));
    for uri in [
        "/api/v1/clinics",
        "/api/v1/staff",
        "/api/v1/patients",
        "/api/v1/dashboard",
        "/api/v1/docs/documents",
        "/api/v1/fax/inbound",
        "/api/v1/auth/me",
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[actix_web::test]
async fn fax_webhook_rejects_a_wrong_token() {
    let app = doctor_app!(
        common::bypass_authenticator(),
        common::config(Some(common::WEBHOOK_TOKEN))
    );
    let req = test::TestRequest::post()
        .uri("/api/v1/fax/inbound")
        .insert_header(("X-Webhook-Token", "wrong"))
        .set_json(inbound_fax_event())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn fax_webhook_rejects_a_missing_token_header() {
    let app = doctor_app!(
        common::bypass_authenticator(),
        common::config(Some(common::WEBHOOK_TOKEN))
    );
    let req = test::TestRequest::post()
        .uri("/api/v1/fax/inbound")
        .set_json(inbound_fax_event())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn fax_webhook_is_closed_when_unconfigured() {
    let app = doctor_app!(common::bypass_authenticator(), common::config(None));
    let req = test::TestRequest::post()
        .uri("/api/v1/fax/inbound")
        .insert_header(("X-Webhook-Token", common::WEBHOOK_TOKEN))
        .set_json(inbound_fax_event())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
