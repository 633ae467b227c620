use actix_web::{HttpResponse, web};

use crate::auth::AuthUser;
use crate::db::{self, Pools};
use crate::error::ApiResult;
use crate::models::patient::RegisterPatientRequest;
use crate::notify::Notifier;
use crate::services::{principal, registration};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/registration").route("", web::post().to(register_patient)));
}

async fn register_patient(
    pools: web::Data<Pools>,
    notifier: web::Data<Notifier>,
    user: AuthUser,
    body: web::Json<RegisterPatientRequest>,
) -> ApiResult<HttpResponse> {
    let req = body.into_inner();
    let outcome = db::execute(&pools.doctor, move |conn| {
        let staff = principal::require_staff(conn, &user.subject)?;
        registration::register(conn, &staff, &req)
    })
    .await?;
    notifier.alert(&format!(
        "New patient registered at clinic {}",
        outcome.patient.clinic_id
    ));
    notifier.count("patients_registered", 1);
    Ok(HttpResponse::Created().json(outcome))
}
