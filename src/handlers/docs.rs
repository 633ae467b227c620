//! Education content administration ("docs" routes, doctor portal).
//! Staff identity resolves against the doctor database; the content itself
//! lives in the patient database where delivery reads it.

use actix_web::{HttpResponse, web};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::db::{self, Pools};
use crate::error::ApiResult;
use crate::models::education::{
    CreateDocumentRequest, CreateSymptomRequest, MapDocumentRequest, UpdateDocumentRequest,
};
use crate::services::{education, principal};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/docs")
            .route("/symptoms", web::post().to(create_symptom))
            .route("/symptoms", web::get().to(list_symptoms))
            .route("/symptoms/{symptom_id}/active", web::put().to(set_symptom_active))
            .route(
                "/symptoms/{symptom_id}/documents",
                web::post().to(map_document),
            )
            .route(
                "/symptoms/{symptom_id}/documents/{document_id}",
                web::delete().to(unmap_document),
            )
            .route("/documents", web::post().to(create_document))
            .route("/documents", web::get().to(list_documents))
            .route("/documents/{document_id}", web::get().to(get_document))
            .route("/documents/{document_id}", web::patch().to(update_document))
            .route(
                "/documents/{document_id}/approve",
                web::post().to(approve_document),
            ),
    );
}

/// Staff check on the doctor database before any content operation.
async fn require_staff(pools: &Pools, user: AuthUser) -> ApiResult<()> {
    db::execute(&pools.doctor, move |conn| {
        principal::require_staff(conn, &user.subject)?;
        Ok(())
    })
    .await
}

async fn create_symptom(
    pools: web::Data<Pools>,
    user: AuthUser,
    body: web::Json<CreateSymptomRequest>,
) -> ApiResult<HttpResponse> {
    require_staff(&pools, user).await?;
    let req = body.into_inner();
    let symptom = db::execute(&pools.patient, move |conn| {
        education::create_symptom(conn, &req)
    })
    .await?;
    Ok(HttpResponse::Created().json(symptom))
}

#[derive(Debug, Deserialize)]
struct ListSymptomsQuery {
    #[serde(default)]
    include_inactive: bool,
}

async fn list_symptoms(
    pools: web::Data<Pools>,
    user: AuthUser,
    query: web::Query<ListSymptomsQuery>,
) -> ApiResult<HttpResponse> {
    require_staff(&pools, user).await?;
    let include_inactive = query.include_inactive;
    let symptoms = db::execute(&pools.patient, move |conn| {
        education::list_symptoms(conn, include_inactive)
    })
    .await?;
    Ok(HttpResponse::Ok().json(symptoms))
}

#[derive(Debug, Deserialize)]
struct SetActiveRequest {
    active: bool,
}

async fn set_symptom_active(
    pools: web::Data<Pools>,
    user: AuthUser,
    path: web::Path<Uuid>,
    body: web::Json<SetActiveRequest>,
) -> ApiResult<HttpResponse> {
    require_staff(&pools, user).await?;
    let symptom_id = path.into_inner();
    let active = body.active;
    let symptom = db::execute(&pools.patient, move |conn| {
        education::set_symptom_active(conn, symptom_id, active)
    })
    .await?;
    Ok(HttpResponse::Ok().json(symptom))
}

async fn map_document(
    pools: web::Data<Pools>,
    user: AuthUser,
    path: web::Path<Uuid>,
    body: web::Json<MapDocumentRequest>,
) -> ApiResult<HttpResponse> {
    require_staff(&pools, user).await?;
    let symptom_id = path.into_inner();
    let req = body.into_inner();
    db::execute(&pools.patient, move |conn| {
        education::map_document(conn, symptom_id, &req)
    })
    .await?;
    Ok(HttpResponse::Created().finish())
}

async fn unmap_document(
    pools: web::Data<Pools>,
    user: AuthUser,
    path: web::Path<(Uuid, Uuid)>,
) -> ApiResult<HttpResponse> {
    require_staff(&pools, user).await?;
    let (symptom_id, document_id) = path.into_inner();
    db::execute(&pools.patient, move |conn| {
        education::unmap_document(conn, symptom_id, document_id)
    })
    .await?;
    Ok(HttpResponse::NoContent().finish())
}

async fn create_document(
    pools: web::Data<Pools>,
    user: AuthUser,
    body: web::Json<CreateDocumentRequest>,
) -> ApiResult<HttpResponse> {
    require_staff(&pools, user).await?;
    let req = body.into_inner();
    let document = db::execute(&pools.patient, move |conn| {
        education::create_document(conn, &req)
    })
    .await?;
    Ok(HttpResponse::Created().json(document))
}

async fn list_documents(pools: web::Data<Pools>, user: AuthUser) -> ApiResult<HttpResponse> {
    require_staff(&pools, user).await?;
    let documents = db::execute(&pools.patient, education::list_documents).await?;
    Ok(HttpResponse::Ok().json(documents))
}

async fn get_document(
    pools: web::Data<Pools>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    require_staff(&pools, user).await?;
    let document_id = path.into_inner();
    let document = db::execute(&pools.patient, move |conn| {
        education::get_document(conn, document_id)
    })
    .await?;
    Ok(HttpResponse::Ok().json(document))
}

async fn update_document(
    pools: web::Data<Pools>,
    user: AuthUser,
    path: web::Path<Uuid>,
    body: web::Json<UpdateDocumentRequest>,
) -> ApiResult<HttpResponse> {
    require_staff(&pools, user).await?;
    let document_id = path.into_inner();
    let req = body.into_inner();
    let document = db::execute(&pools.patient, move |conn| {
        education::update_document(conn, document_id, &req)
    })
    .await?;
    Ok(HttpResponse::Ok().json(document))
}

async fn approve_document(
    pools: web::Data<Pools>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    require_staff(&pools, user).await?;
    let document_id = path.into_inner();
    let document = db::execute(&pools.patient, move |conn| {
        education::approve_document(conn, document_id)
    })
    .await?;
    Ok(HttpResponse::Ok().json(document))
}
