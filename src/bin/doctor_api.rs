use std::time::Duration;

use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

use careportal::auth::Authenticator;
use careportal::config::AppConfig;
use careportal::db::Pools;
use careportal::fax::FaxClient;
use careportal::handlers;
use careportal::notify::Notifier;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = AppConfig::from_env()?;
    let pools = Pools::from_urls(&config.doctor_database_url, &config.patient_database_url)?;
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;

    let pools = web::Data::new(pools);
    let authenticator = web::Data::new(Authenticator::new(&config.auth, http.clone()));
    let notifier = web::Data::new(Notifier::new(
        http.clone(),
        config.chat_ops_webhook_url.clone(),
        config.metrics_webhook_url.clone(),
    ));
    let fax_client = web::Data::new(FaxClient::new(http, config.fax.clone()));
    let bind_addr = config.doctor_bind_addr.clone();
    let config = web::Data::new(config);

    tracing::info!(%bind_addr, "starting doctor portal api");
    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(pools.clone())
            .app_data(authenticator.clone())
            .app_data(notifier.clone())
            .app_data(fax_client.clone())
            .app_data(config.clone())
            .service(
                web::scope("/api/v1")
                    .configure(handlers::health::configure)
                    .configure(handlers::auth::configure_doctor)
                    .configure(handlers::clinic::configure)
                    .configure(handlers::staff::configure)
                    .configure(handlers::patient::configure)
                    .configure(handlers::dashboard::configure)
                    .configure(handlers::registration::configure)
                    .configure(handlers::docs::configure)
                    .configure(handlers::fax::configure),
            )
    })
    .bind(&bind_addr)?
    .run()
    .await?;
    Ok(())
}
