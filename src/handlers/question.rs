use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::db::{self, Pools};
use crate::error::ApiResult;
use crate::models::question::{CreateQuestionRequest, ListQuestionsQuery, UpdateQuestionRequest};
use crate::services::{principal, question};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/questions")
            .route("", web::post().to(create_question))
            .route("", web::get().to(list_questions))
            .route("/{question_id}", web::get().to(get_question))
            .route("/{question_id}", web::patch().to(update_question))
            .route("/{question_id}", web::delete().to(delete_question)),
    );
}

async fn create_question(
    pools: web::Data<Pools>,
    user: AuthUser,
    body: web::Json<CreateQuestionRequest>,
) -> ApiResult<HttpResponse> {
    let req = body.into_inner();
    // Reject malformed input before taking a pooled connection.
    question::validate_create(&req)?;
    let created = db::execute(&pools.patient, move |conn| {
        let account = principal::require_patient(conn, &user.subject)?;
        question::create(conn, account.id, &req)
    })
    .await?;
    Ok(HttpResponse::Created().json(created))
}

async fn list_questions(
    pools: web::Data<Pools>,
    user: AuthUser,
    query: web::Query<ListQuestionsQuery>,
) -> ApiResult<HttpResponse> {
    let shared_only = query.shared_only;
    let questions = db::execute(&pools.patient, move |conn| {
        let account = principal::require_patient(conn, &user.subject)?;
        question::list(conn, account.id, shared_only)
    })
    .await?;
    Ok(HttpResponse::Ok().json(questions))
}

async fn get_question(
    pools: web::Data<Pools>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let question_id = path.into_inner();
    let found = db::execute(&pools.patient, move |conn| {
        let account = principal::require_patient(conn, &user.subject)?;
        question::get(conn, account.id, question_id)
    })
    .await?;
    Ok(HttpResponse::Ok().json(found))
}

async fn update_question(
    pools: web::Data<Pools>,
    user: AuthUser,
    path: web::Path<Uuid>,
    body: web::Json<UpdateQuestionRequest>,
) -> ApiResult<HttpResponse> {
    let question_id = path.into_inner();
    let req = body.into_inner();
    question::validate_update(&req)?;
    let updated = db::execute(&pools.patient, move |conn| {
        let account = principal::require_patient(conn, &user.subject)?;
        question::update(conn, account.id, question_id, &req)
    })
    .await?;
    Ok(HttpResponse::Ok().json(updated))
}

async fn delete_question(
    pools: web::Data<Pools>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let question_id = path.into_inner();
    db::execute(&pools.patient, move |conn| {
        let account = principal::require_patient(conn, &user.subject)?;
        question::delete(conn, account.id, question_id)
    })
    .await?;
    Ok(HttpResponse::NoContent().finish())
}
