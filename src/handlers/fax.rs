use actix_web::{HttpRequest, HttpResponse, web};

use crate::auth::AuthUser;
use crate::config::AppConfig;
use crate::db::{self, Pools};
use crate::error::{ApiError, ApiResult};
use crate::fax::FaxClient;
use crate::models::fax::{InboundFaxEvent, SendFaxRequest};
use crate::notify::Notifier;
use crate::services::{fax, principal};

const WEBHOOK_TOKEN_HEADER: &str = "X-Webhook-Token";

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/fax")
            .route("/inbound", web::post().to(inbound_webhook))
            .route("/inbound", web::get().to(list_inbound))
            .route("/send", web::post().to(send_fax)),
    );
}

/// Provider-facing webhook. Authenticated by the shared secret header, not
/// by a bearer token; the provider is not an identity-provider client.
async fn inbound_webhook(
    pools: web::Data<Pools>,
    notifier: web::Data<Notifier>,
    config: web::Data<AppConfig>,
    request: HttpRequest,
    body: web::Json<InboundFaxEvent>,
) -> ApiResult<HttpResponse> {
    let expected = config
        .fax_webhook_token
        .as_deref()
        .ok_or_else(|| ApiError::Forbidden("fax webhook is not configured".into()))?;
    let provided = request
        .headers()
        .get(WEBHOOK_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok());
    if provided != Some(expected) {
        return Err(ApiError::Forbidden("invalid webhook token".into()));
    }

    let event = body.into_inner();
    let recorded = db::execute(&pools.doctor, move |conn| {
        fax::record_inbound(conn, &event)
    })
    .await?;
    notifier.alert(&format!(
        "Inbound fax from {} ({} pages)",
        recorded.from_number, recorded.page_count
    ));
    notifier.count("faxes_received", 1);
    Ok(HttpResponse::Created().json(recorded))
}

async fn list_inbound(pools: web::Data<Pools>, user: AuthUser) -> ApiResult<HttpResponse> {
    let faxes = db::execute(&pools.doctor, move |conn| {
        principal::require_staff(conn, &user.subject)?;
        fax::list_inbound(conn)
    })
    .await?;
    Ok(HttpResponse::Ok().json(faxes))
}

async fn send_fax(
    pools: web::Data<Pools>,
    fax_client: web::Data<FaxClient>,
    user: AuthUser,
    body: web::Json<SendFaxRequest>,
) -> ApiResult<HttpResponse> {
    db::execute(&pools.doctor, move |conn| {
        principal::require_staff(conn, &user.subject)?;
        Ok(())
    })
    .await?;
    let req = body.into_inner();
    fax_client.send(&req.to_number, &req.document_url).await?;
    Ok(HttpResponse::Accepted().finish())
}
