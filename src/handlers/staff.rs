use actix_web::{HttpResponse, web};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::db::{self, Pools};
use crate::error::ApiResult;
use crate::models::staff::{CreateStaffRequest, UpdateStaffRequest};
use crate::services::{principal, staff};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/staff")
            .route("", web::post().to(create_staff))
            .route("", web::get().to(list_staff))
            .route("/{staff_id}", web::get().to(get_staff))
            .route("/{staff_id}", web::patch().to(update_staff))
            .route("/{staff_id}", web::delete().to(delete_staff)),
    );
}

#[derive(Debug, Deserialize)]
struct ListStaffQuery {
    clinic_id: Option<Uuid>,
}

async fn create_staff(
    pools: web::Data<Pools>,
    user: AuthUser,
    body: web::Json<CreateStaffRequest>,
) -> ApiResult<HttpResponse> {
    let req = body.into_inner();
    let created = db::execute(&pools.doctor, move |conn| {
        principal::require_staff(conn, &user.subject)?;
        staff::create(conn, &req)
    })
    .await?;
    Ok(HttpResponse::Created().json(created))
}

async fn list_staff(
    pools: web::Data<Pools>,
    user: AuthUser,
    query: web::Query<ListStaffQuery>,
) -> ApiResult<HttpResponse> {
    let clinic_id = query.clinic_id;
    let members = db::execute(&pools.doctor, move |conn| {
        principal::require_staff(conn, &user.subject)?;
        staff::list(conn, clinic_id)
    })
    .await?;
    Ok(HttpResponse::Ok().json(members))
}

async fn get_staff(
    pools: web::Data<Pools>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let staff_id = path.into_inner();
    let member = db::execute(&pools.doctor, move |conn| {
        principal::require_staff(conn, &user.subject)?;
        staff::get(conn, staff_id)
    })
    .await?;
    Ok(HttpResponse::Ok().json(member))
}

async fn update_staff(
    pools: web::Data<Pools>,
    user: AuthUser,
    path: web::Path<Uuid>,
    body: web::Json<UpdateStaffRequest>,
) -> ApiResult<HttpResponse> {
    let staff_id = path.into_inner();
    let req = body.into_inner();
    let updated = db::execute(&pools.doctor, move |conn| {
        principal::require_staff(conn, &user.subject)?;
        staff::update(conn, staff_id, &req)
    })
    .await?;
    Ok(HttpResponse::Ok().json(updated))
}

async fn delete_staff(
    pools: web::Data<Pools>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let staff_id = path.into_inner();
    db::execute(&pools.doctor, move |conn| {
        principal::require_staff(conn, &user.subject)?;
        staff::delete(conn, staff_id)
    })
    .await?;
    Ok(HttpResponse::NoContent().finish())
}
