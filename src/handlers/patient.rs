//! Doctor-portal patient views. Demographics come from the doctor database;
//! the question/diary/chemo subresources read the patient database after the
//! association check passes. The two reads are independent; no transaction
//! spans them.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::db::{self, Pools};
use crate::error::ApiResult;
use crate::models::patient::UpdatePatientRequest;
use crate::services::{chemo, diary, patient, principal, question};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/patients")
            .route("", web::get().to(list_patients))
            .route("/{patient_uuid}", web::get().to(get_patient))
            .route("/{patient_uuid}", web::patch().to(update_patient))
            .route("/{patient_uuid}/questions", web::get().to(shared_questions))
            .route("/{patient_uuid}/diary", web::get().to(patient_diary))
            .route("/{patient_uuid}/chemo", web::get().to(patient_chemo)),
    );
}

async fn list_patients(pools: web::Data<Pools>, user: AuthUser) -> ApiResult<HttpResponse> {
    let patients = db::execute(&pools.doctor, move |conn| {
        let staff = principal::require_staff(conn, &user.subject)?;
        patient::list_for_physician(conn, staff.id)
    })
    .await?;
    Ok(HttpResponse::Ok().json(patients))
}

async fn get_patient(
    pools: web::Data<Pools>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let patient_uuid = path.into_inner();
    let found = db::execute(&pools.doctor, move |conn| {
        let staff = principal::require_staff(conn, &user.subject)?;
        patient::get_for_physician(conn, staff.id, patient_uuid)
    })
    .await?;
    Ok(HttpResponse::Ok().json(found))
}

async fn update_patient(
    pools: web::Data<Pools>,
    user: AuthUser,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePatientRequest>,
) -> ApiResult<HttpResponse> {
    let patient_uuid = path.into_inner();
    let req = body.into_inner();
    let updated = db::execute(&pools.doctor, move |conn| {
        let staff = principal::require_staff(conn, &user.subject)?;
        patient::update_for_physician(conn, staff.id, patient_uuid, &req)
    })
    .await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// Shared, non-deleted questions of an associated patient.
async fn shared_questions(
    pools: web::Data<Pools>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let patient_uuid = path.into_inner();
    authorize_physician_access(&pools, user, patient_uuid).await?;
    let questions = db::execute(&pools.patient, move |conn| {
        question::shared_for_patient(conn, patient_uuid)
    })
    .await?;
    Ok(HttpResponse::Ok().json(questions))
}

async fn patient_diary(
    pools: web::Data<Pools>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let patient_uuid = path.into_inner();
    authorize_physician_access(&pools, user, patient_uuid).await?;
    let entries = db::execute(&pools.patient, move |conn| {
        diary::list_for_patient(conn, patient_uuid)
    })
    .await?;
    Ok(HttpResponse::Ok().json(entries))
}

async fn patient_chemo(
    pools: web::Data<Pools>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let patient_uuid = path.into_inner();
    authorize_physician_access(&pools, user, patient_uuid).await?;
    let dates = db::execute(&pools.patient, move |conn| {
        chemo::list_for_patient(conn, patient_uuid)
    })
    .await?;
    Ok(HttpResponse::Ok().json(dates))
}

/// Resolve the caller to a staff row and require an active association with
/// the patient, all on the doctor database.
async fn authorize_physician_access(
    pools: &Pools,
    user: AuthUser,
    patient_uuid: Uuid,
) -> ApiResult<()> {
    db::execute(&pools.doctor, move |conn| {
        let staff = principal::require_staff(conn, &user.subject)?;
        principal::require_association(conn, staff.id, patient_uuid)
    })
    .await
}
