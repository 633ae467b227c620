use actix_web::{HttpResponse, web};

use crate::auth::AuthUser;
use crate::db::{self, Pools};
use crate::error::ApiResult;
use crate::services::{dashboard, patient, principal};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/dashboard").route("", web::get().to(summary)));
}

/// Per-physician aggregate across both databases. The doctor database
/// yields the associated patient set; the patient database yields the
/// activity numbers. The two reads are not transactional.
async fn summary(pools: web::Data<Pools>, user: AuthUser) -> ApiResult<HttpResponse> {
    let patient_uuids = db::execute(&pools.doctor, move |conn| {
        let staff = principal::require_staff(conn, &user.subject)?;
        patient::associated_patient_uuids(conn, staff.id)
    })
    .await?;
    let summary = db::execute(&pools.patient, move |conn| {
        dashboard::patient_metrics(conn, &patient_uuids)
    })
    .await?;
    Ok(HttpResponse::Ok().json(summary))
}
