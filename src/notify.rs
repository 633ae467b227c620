//! Outbound chat-ops and metrics glue.
//!
//! Both sinks are plain JSON webhooks. Delivery is fire-and-forget on a
//! spawned task: a dead webhook must never fail or slow down the request
//! that triggered it, so failures are only logged.

use serde_json::{Value, json};

#[derive(Clone)]
pub struct Notifier {
    http: reqwest::Client,
    chat_ops_url: Option<String>,
    metrics_url: Option<String>,
}

impl Notifier {
    pub fn new(
        http: reqwest::Client,
        chat_ops_url: Option<String>,
        metrics_url: Option<String>,
    ) -> Self {
        Notifier {
            http,
            chat_ops_url,
            metrics_url,
        }
    }

    /// Post a human-readable alert to the chat-ops webhook.
    pub fn alert(&self, text: &str) {
        self.post(self.chat_ops_url.clone(), alert_payload(text));
    }

    /// Bump a counter on the metrics endpoint.
    pub fn count(&self, metric: &'static str, value: i64) {
        self.post(self.metrics_url.clone(), metric_payload(metric, value));
    }

    fn post(&self, url: Option<String>, payload: Value) {
        let Some(url) = url else { return };
        let http = self.http.clone();
        tokio::spawn(async move {
            match http.post(&url).json(&payload).send().await {
                Ok(resp) if !resp.status().is_success() => {
                    tracing::warn!(url, status = %resp.status(), "notification webhook rejected payload");
                }
                Err(err) => {
                    tracing::warn!(url, error = %err, "notification webhook unreachable");
                }
                Ok(_) => {}
            }
        });
    }
}

fn alert_payload(text: &str) -> Value {
    json!({ "text": text })
}

fn metric_payload(metric: &'static str, value: i64) -> Value {
    json!({ "metric": metric, "value": value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_payload_wraps_the_text() {
        assert_eq!(
            alert_payload("new patient registered"),
            json!({ "text": "new patient registered" })
        );
    }

    #[test]
    fn metric_payload_carries_name_and_value() {
        assert_eq!(
            metric_payload("registrations", 1),
            json!({ "metric": "registrations", "value": 1 })
        );
    }
}
