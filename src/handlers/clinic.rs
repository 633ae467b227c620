use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::db::{self, Pools};
use crate::error::ApiResult;
use crate::models::clinic::{CreateClinicRequest, UpdateClinicRequest};
use crate::services::{clinic, principal};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/clinics")
            .route("", web::post().to(create_clinic))
            .route("", web::get().to(list_clinics))
            .route("/{clinic_id}", web::get().to(get_clinic))
            .route("/{clinic_id}", web::patch().to(update_clinic))
            .route("/{clinic_id}", web::delete().to(delete_clinic)),
    );
}

async fn create_clinic(
    pools: web::Data<Pools>,
    user: AuthUser,
    body: web::Json<CreateClinicRequest>,
) -> ApiResult<HttpResponse> {
    let req = body.into_inner();
    let created = db::execute(&pools.doctor, move |conn| {
        principal::require_staff(conn, &user.subject)?;
        clinic::create(conn, &req)
    })
    .await?;
    Ok(HttpResponse::Created().json(created))
}

async fn list_clinics(pools: web::Data<Pools>, user: AuthUser) -> ApiResult<HttpResponse> {
    let clinics = db::execute(&pools.doctor, move |conn| {
        principal::require_staff(conn, &user.subject)?;
        clinic::list(conn)
    })
    .await?;
    Ok(HttpResponse::Ok().json(clinics))
}

async fn get_clinic(
    pools: web::Data<Pools>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let clinic_id = path.into_inner();
    let found = db::execute(&pools.doctor, move |conn| {
        principal::require_staff(conn, &user.subject)?;
        clinic::get(conn, clinic_id)
    })
    .await?;
    Ok(HttpResponse::Ok().json(found))
}

async fn update_clinic(
    pools: web::Data<Pools>,
    user: AuthUser,
    path: web::Path<Uuid>,
    body: web::Json<UpdateClinicRequest>,
) -> ApiResult<HttpResponse> {
    let clinic_id = path.into_inner();
    let req = body.into_inner();
    let updated = db::execute(&pools.doctor, move |conn| {
        principal::require_staff(conn, &user.subject)?;
        clinic::update(conn, clinic_id, &req)
    })
    .await?;
    Ok(HttpResponse::Ok().json(updated))
}

async fn delete_clinic(
    pools: web::Data<Pools>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let clinic_id = path.into_inner();
    db::execute(&pools.doctor, move |conn| {
        principal::require_staff(conn, &user.subject)?;
        clinic::delete(conn, clinic_id)
    })
    .await?;
    Ok(HttpResponse::NoContent().finish())
}
