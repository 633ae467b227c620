//! Thin client for the outbound fax provider.

use serde_json::json;

use crate::config::FaxConfig;
use crate::error::{ApiError, ApiResult};

#[derive(Clone)]
pub struct FaxClient {
    http: reqwest::Client,
    config: Option<FaxConfig>,
}

impl FaxClient {
    pub fn new(http: reqwest::Client, config: Option<FaxConfig>) -> Self {
        FaxClient { http, config }
    }

    /// Ask the provider to fax the document at `document_url` to `to`.
    /// Provider failures surface as 502s; an unconfigured provider too, so
    /// callers do not need to care which of the two happened.
    pub async fn send(&self, to: &str, document_url: &str) -> ApiResult<()> {
        let config = self
            .config
            .as_ref()
            .ok_or_else(|| ApiError::Upstream("fax provider is not configured".into()))?;
        let resp = self
            .http
            .post(&config.api_url)
            .bearer_auth(&config.api_key)
            .json(&json!({ "to": to, "document_url": document_url }))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(ApiError::Upstream(format!(
                "fax provider returned {}",
                resp.status()
            )));
        }
        tracing::info!(to, "fax dispatched");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unconfigured_provider_is_an_upstream_error() {
        let client = FaxClient::new(reqwest::Client::new(), None);
        assert!(matches!(
            client.send("+15550100", "https://docs.example.com/a.pdf").await,
            Err(ApiError::Upstream(_))
        ));
    }
}
