use actix_web::{HttpResponse, web};

use crate::auth::AuthUser;
use crate::db::{self, Pools};
use crate::error::ApiResult;
use crate::models::account::StartOnboardingRequest;
use crate::notify::Notifier;
use crate::services::onboarding;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/onboarding")
            .route("/status", web::get().to(status))
            .route("/start", web::post().to(start))
            .route("/accept-terms", web::post().to(accept_terms))
            .route("/complete-profile", web::post().to(complete_profile)),
    );
}

async fn status(pools: web::Data<Pools>, user: AuthUser) -> ApiResult<HttpResponse> {
    let status = db::execute(&pools.patient, move |conn| {
        onboarding::status(conn, &user.subject)
    })
    .await?;
    Ok(HttpResponse::Ok().json(status))
}

async fn start(
    pools: web::Data<Pools>,
    user: AuthUser,
    body: web::Json<StartOnboardingRequest>,
) -> ApiResult<HttpResponse> {
    let req = body.into_inner();
    let account = db::execute(&pools.patient, move |conn| {
        onboarding::start(conn, &user.subject, &req)
    })
    .await?;
    Ok(HttpResponse::Created().json(account))
}

async fn accept_terms(
    pools: web::Data<Pools>,
    notifier: web::Data<Notifier>,
    user: AuthUser,
) -> ApiResult<HttpResponse> {
    let outcome = db::execute(&pools.patient, move |conn| {
        onboarding::accept_terms(conn, &user.subject)
    })
    .await?;
    if outcome.newly_completed {
        notifier.count("onboarding_completed", 1);
    }
    Ok(HttpResponse::Ok().json(outcome.account))
}

async fn complete_profile(
    pools: web::Data<Pools>,
    notifier: web::Data<Notifier>,
    user: AuthUser,
) -> ApiResult<HttpResponse> {
    let outcome = db::execute(&pools.patient, move |conn| {
        onboarding::complete_profile(conn, &user.subject)
    })
    .await?;
    if outcome.newly_completed {
        notifier.count("onboarding_completed", 1);
    }
    Ok(HttpResponse::Ok().json(outcome.account))
}
