use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::db::{self, Pools};
use crate::error::ApiResult;
use crate::models::diary::{CreateDiaryEntryRequest, UpdateDiaryEntryRequest};
use crate::services::{diary, principal};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/diary")
            .route("", web::post().to(create_entry))
            .route("", web::get().to(list_entries))
            .route("/{entry_id}", web::get().to(get_entry))
            .route("/{entry_id}", web::patch().to(update_entry))
            .route("/{entry_id}", web::delete().to(delete_entry)),
    );
}

async fn create_entry(
    pools: web::Data<Pools>,
    user: AuthUser,
    body: web::Json<CreateDiaryEntryRequest>,
) -> ApiResult<HttpResponse> {
    let req = body.into_inner();
    let created = db::execute(&pools.patient, move |conn| {
        let account = principal::require_patient(conn, &user.subject)?;
        diary::create(conn, account.id, &req)
    })
    .await?;
    Ok(HttpResponse::Created().json(created))
}

async fn list_entries(pools: web::Data<Pools>, user: AuthUser) -> ApiResult<HttpResponse> {
    let entries = db::execute(&pools.patient, move |conn| {
        let account = principal::require_patient(conn, &user.subject)?;
        diary::list(conn, account.id)
    })
    .await?;
    Ok(HttpResponse::Ok().json(entries))
}

async fn get_entry(
    pools: web::Data<Pools>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let entry_id = path.into_inner();
    let entry = db::execute(&pools.patient, move |conn| {
        let account = principal::require_patient(conn, &user.subject)?;
        diary::get(conn, account.id, entry_id)
    })
    .await?;
    Ok(HttpResponse::Ok().json(entry))
}

async fn update_entry(
    pools: web::Data<Pools>,
    user: AuthUser,
    path: web::Path<Uuid>,
    body: web::Json<UpdateDiaryEntryRequest>,
) -> ApiResult<HttpResponse> {
    let entry_id = path.into_inner();
    let req = body.into_inner();
    let updated = db::execute(&pools.patient, move |conn| {
        let account = principal::require_patient(conn, &user.subject)?;
        diary::update(conn, account.id, entry_id, &req)
    })
    .await?;
    Ok(HttpResponse::Ok().json(updated))
}

async fn delete_entry(
    pools: web::Data<Pools>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let entry_id = path.into_inner();
    db::execute(&pools.patient, move |conn| {
        let account = principal::require_patient(conn, &user.subject)?;
        diary::delete(conn, account.id, entry_id)
    })
    .await?;
    Ok(HttpResponse::NoContent().finish())
}
