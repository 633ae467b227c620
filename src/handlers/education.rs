//! Patient-portal education delivery.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::db::{self, Pools};
use crate::error::ApiResult;
use crate::services::{education, principal};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/education")
            .route("/symptoms", web::get().to(list_symptoms))
            .route(
                "/sessions/{session_id}/packet",
                web::post().to(assemble_packet),
            ),
    );
}

async fn list_symptoms(pools: web::Data<Pools>, user: AuthUser) -> ApiResult<HttpResponse> {
    let symptoms = db::execute(&pools.patient, move |conn| {
        principal::require_patient(conn, &user.subject)?;
        education::list_symptoms(conn, false)
    })
    .await?;
    Ok(HttpResponse::Ok().json(symptoms))
}

/// Assemble the education packet for a completed symptom session. A POST
/// because every delivery writes audit rows.
async fn assemble_packet(
    pools: web::Data<Pools>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let session_id = path.into_inner();
    let packet = db::execute(&pools.patient, move |conn| {
        let account = principal::require_patient(conn, &user.subject)?;
        education::assemble_for_session(conn, account.id, session_id)
    })
    .await?;
    Ok(HttpResponse::Ok().json(packet))
}
