use actix_web::{HttpResponse, web};
use diesel::prelude::*;
use serde_json::json;

use crate::db::{self, Pools};
use crate::error::ApiResult;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/health")
            .route("/live", web::get().to(live))
            .route("/ready", web::get().to(ready)),
    );
}

async fn live() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

/// Readiness pings both databases; either one down makes the process
/// not-ready.
async fn ready(pools: web::Data<Pools>) -> ApiResult<HttpResponse> {
    db::execute(&pools.doctor, ping).await?;
    db::execute(&pools.patient, ping).await?;
    Ok(HttpResponse::Ok().json(json!({ "status": "ready" })))
}

fn ping(conn: &mut PgConnection) -> ApiResult<()> {
    diesel::sql_query("SELECT 1").execute(conn)?;
    Ok(())
}
