use actix_web::{HttpResponse, web};
use serde_json::json;

use crate::auth::AuthUser;
use crate::db::{self, Pools};
use crate::error::ApiResult;
use crate::services::principal;

pub fn configure_doctor(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/auth").route("/me", web::get().to(doctor_me)));
}

pub fn configure_patient(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/auth").route("/me", web::get().to(patient_me)));
}

async fn doctor_me(pools: web::Data<Pools>, user: AuthUser) -> ApiResult<HttpResponse> {
    let subject = user.subject.clone();
    let staff = db::execute(&pools.doctor, move |conn| {
        principal::require_staff(conn, &user.subject)
    })
    .await?;
    Ok(HttpResponse::Ok().json(json!({ "subject": subject, "staff": staff })))
}

async fn patient_me(pools: web::Data<Pools>, user: AuthUser) -> ApiResult<HttpResponse> {
    let subject = user.subject.clone();
    let account = db::execute(&pools.patient, move |conn| {
        principal::find_account(conn, &user.subject)
    })
    .await?;
    Ok(HttpResponse::Ok().json(json!({ "subject": subject, "account": account })))
}
