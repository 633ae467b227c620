use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_JWKS_TTL_SECS: u64 = 3600;
const DEFAULT_DOCTOR_BIND: &str = "127.0.0.1:8080";
const DEFAULT_PATIENT_BIND: &str = "127.0.0.1:8081";

/// Process configuration, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub doctor_database_url: String,
    pub patient_database_url: String,
    pub auth: AuthConfig,
    pub chat_ops_webhook_url: Option<String>,
    pub metrics_webhook_url: Option<String>,
    pub fax: Option<FaxConfig>,
    pub fax_webhook_token: Option<String>,
    pub doctor_bind_addr: String,
    pub patient_bind_addr: String,
}

/// Either real token verification against the identity provider, or the
/// local-dev bypass where every request acts as a fixed subject.
#[derive(Debug, Clone)]
pub enum AuthConfig {
    Bypass { subject: String },
    Idp(IdpConfig),
}

#[derive(Debug, Clone)]
pub struct IdpConfig {
    pub jwks_url: String,
    pub issuer: String,
    pub audience: String,
    pub cache_ttl: Duration,
}

#[derive(Debug, Clone)]
pub struct FaxConfig {
    pub api_url: String,
    pub api_key: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let auth = match optional("DEV_AUTH_SUBJECT") {
            Some(subject) => AuthConfig::Bypass { subject },
            None => AuthConfig::Idp(IdpConfig {
                jwks_url: required("IDP_JWKS_URL")?,
                issuer: required("IDP_ISSUER")?,
                audience: required("IDP_AUDIENCE")?,
                cache_ttl: Duration::from_secs(
                    parse_or("JWKS_CACHE_TTL_SECS", DEFAULT_JWKS_TTL_SECS)?,
                ),
            }),
        };

        let fax = match (optional("FAX_API_URL"), optional("FAX_API_KEY")) {
            (Some(api_url), Some(api_key)) => Some(FaxConfig { api_url, api_key }),
            _ => None,
        };

        Ok(AppConfig {
            doctor_database_url: required("DOCTOR_DATABASE_URL")?,
            patient_database_url: required("PATIENT_DATABASE_URL")?,
            auth,
            chat_ops_webhook_url: optional("CHAT_OPS_WEBHOOK_URL"),
            metrics_webhook_url: optional("METRICS_WEBHOOK_URL"),
            fax,
            fax_webhook_token: optional("FAX_WEBHOOK_TOKEN"),
            doctor_bind_addr: optional("DOCTOR_BIND_ADDR")
                .unwrap_or_else(|| DEFAULT_DOCTOR_BIND.to_string()),
            patient_bind_addr: optional("PATIENT_BIND_ADDR")
                .unwrap_or_else(|| DEFAULT_PATIENT_BIND.to_string()),
        })
    }
}

fn required(name: &str) -> Result<String> {
    env::var(name).with_context(|| format!("{name} must be set"))
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

fn parse_or(name: &str, default: u64) -> Result<u64> {
    match optional(name) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("{name} must be an integer, got {raw:?}")),
        None => Ok(default),
    }
}
