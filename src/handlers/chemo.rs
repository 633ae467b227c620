use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::db::{self, Pools};
use crate::error::ApiResult;
use crate::models::chemo::{CreateChemoDateRequest, UpdateChemoDateRequest};
use crate::services::{chemo, principal};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/chemo")
            .route("", web::post().to(create_date))
            .route("", web::get().to(list_dates))
            .route("/{chemo_id}", web::get().to(get_date))
            .route("/{chemo_id}", web::patch().to(update_date))
            .route("/{chemo_id}", web::delete().to(delete_date)),
    );
}

async fn create_date(
    pools: web::Data<Pools>,
    user: AuthUser,
    body: web::Json<CreateChemoDateRequest>,
) -> ApiResult<HttpResponse> {
    let req = body.into_inner();
    let created = db::execute(&pools.patient, move |conn| {
        let account = principal::require_patient(conn, &user.subject)?;
        chemo::create(conn, account.id, &req)
    })
    .await?;
    Ok(HttpResponse::Created().json(created))
}

async fn list_dates(pools: web::Data<Pools>, user: AuthUser) -> ApiResult<HttpResponse> {
    let dates = db::execute(&pools.patient, move |conn| {
        let account = principal::require_patient(conn, &user.subject)?;
        chemo::list(conn, account.id)
    })
    .await?;
    Ok(HttpResponse::Ok().json(dates))
}

async fn get_date(
    pools: web::Data<Pools>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let chemo_id = path.into_inner();
    let date = db::execute(&pools.patient, move |conn| {
        let account = principal::require_patient(conn, &user.subject)?;
        chemo::get(conn, account.id, chemo_id)
    })
    .await?;
    Ok(HttpResponse::Ok().json(date))
}

async fn update_date(
    pools: web::Data<Pools>,
    user: AuthUser,
    path: web::Path<Uuid>,
    body: web::Json<UpdateChemoDateRequest>,
) -> ApiResult<HttpResponse> {
    let chemo_id = path.into_inner();
    let req = body.into_inner();
    let updated = db::execute(&pools.patient, move |conn| {
        let account = principal::require_patient(conn, &user.subject)?;
        chemo::update(conn, account.id, chemo_id, &req)
    })
    .await?;
    Ok(HttpResponse::Ok().json(updated))
}

async fn delete_date(
    pools: web::Data<Pools>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let chemo_id = path.into_inner();
    db::execute(&pools.patient, move |conn| {
        let account = principal::require_patient(conn, &user.subject)?;
        chemo::delete(conn, account.id, chemo_id)
    })
    .await?;
    Ok(HttpResponse::NoContent().finish())
}
