use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::db::{self, Pools};
use crate::error::ApiResult;
use crate::models::chat::{PostMessageRequest, StartConversationRequest};
use crate::services::{chat, principal};

pub fn configure(cfg: &mut web::ServiceConfig) {
    // Chat is the chattiest surface; cap it with the off-the-shelf limiter.
    let governor = GovernorConfigBuilder::default()
        .per_second(2)
        .burst_size(30)
        .finish()
        .expect("static rate-limit configuration");
    cfg.service(
        web::scope("/chat")
            .wrap(Governor::new(&governor))
            .route("/conversations", web::post().to(start_conversation))
            .route("/conversations", web::get().to(list_conversations))
            .route("/conversations/{conversation_id}", web::get().to(get_conversation))
            .route(
                "/conversations/{conversation_id}",
                web::delete().to(delete_conversation),
            )
            .route(
                "/conversations/{conversation_id}/messages",
                web::post().to(post_message),
            )
            .route(
                "/conversations/{conversation_id}/complete",
                web::post().to(complete_conversation),
            ),
    );
}

async fn start_conversation(
    pools: web::Data<Pools>,
    user: AuthUser,
    body: web::Json<StartConversationRequest>,
) -> ApiResult<HttpResponse> {
    let req = body.into_inner();
    let view = db::execute(&pools.patient, move |conn| {
        let account = principal::require_patient(conn, &user.subject)?;
        chat::start(conn, account.id, &req)
    })
    .await?;
    Ok(HttpResponse::Created().json(view))
}

async fn list_conversations(pools: web::Data<Pools>, user: AuthUser) -> ApiResult<HttpResponse> {
    let conversations = db::execute(&pools.patient, move |conn| {
        let account = principal::require_patient(conn, &user.subject)?;
        chat::list(conn, account.id)
    })
    .await?;
    Ok(HttpResponse::Ok().json(conversations))
}

async fn get_conversation(
    pools: web::Data<Pools>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let conversation_id = path.into_inner();
    let view = db::execute(&pools.patient, move |conn| {
        let account = principal::require_patient(conn, &user.subject)?;
        chat::get(conn, account.id, conversation_id)
    })
    .await?;
    Ok(HttpResponse::Ok().json(view))
}

async fn post_message(
    pools: web::Data<Pools>,
    user: AuthUser,
    path: web::Path<Uuid>,
    body: web::Json<PostMessageRequest>,
) -> ApiResult<HttpResponse> {
    let conversation_id = path.into_inner();
    let req = body.into_inner();
    let view = db::execute(&pools.patient, move |conn| {
        let account = principal::require_patient(conn, &user.subject)?;
        chat::post_message(conn, account.id, conversation_id, &req.body)
    })
    .await?;
    Ok(HttpResponse::Created().json(view))
}

async fn complete_conversation(
    pools: web::Data<Pools>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let conversation_id = path.into_inner();
    let session = db::execute(&pools.patient, move |conn| {
        let account = principal::require_patient(conn, &user.subject)?;
        chat::complete(conn, account.id, conversation_id)
    })
    .await?;
    Ok(HttpResponse::Created().json(session))
}

async fn delete_conversation(
    pools: web::Data<Pools>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let conversation_id = path.into_inner();
    db::execute(&pools.patient, move |conn| {
        let account = principal::require_patient(conn, &user.subject)?;
        chat::delete(conn, account.id, conversation_id)
    })
    .await?;
    Ok(HttpResponse::NoContent().finish())
}
