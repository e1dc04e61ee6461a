use super::{BAD_PREDICTION_EVENT, BAD_PREDICTION_MESSAGE, FeedbackEvent, FeedbackSink};
use crate::{Error, Result, config::LokiConfig};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::debug;

/// Pushes feedback events to a Loki `/loki/api/v1/push` endpoint.
pub struct LokiSink {
    config: LokiConfig,
    client: reqwest::Client,
}

impl LokiSink {
    pub fn new(config: LokiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| Error::sink(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn push_body(&self, event: &FeedbackEvent, timestamp_nanos: i64) -> Value {
        json!({
            "streams": [{
                "stream": {
                    "application": self.config.application,
                    "logger": self.config.logger,
                    "severity": "error",
                    "event": BAD_PREDICTION_EVENT,
                    "tweet_text": event.tweet_text,
                    "model_prediction": event.model_prediction,
                },
                "values": [[timestamp_nanos.to_string(), BAD_PREDICTION_MESSAGE]]
            }]
        })
    }
}

#[async_trait]
impl FeedbackSink for LokiSink {
    async fn send(&self, event: FeedbackEvent) -> Result<()> {
        let timestamp = Utc::now()
            .timestamp_nanos_opt()
            .ok_or_else(|| Error::sink("timestamp out of range"))?;
        let body = self.push_body(&event, timestamp);

        debug!("Pushing feedback event to {}", self.config.url);

        let response = self
            .client
            .post(&self.config.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::sink(format!("Failed to reach Loki: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Error::sink(format!("Loki rejected push ({}): {}", status, text)));
        }

        Ok(())
    }
}
