mod loki;

pub use loki::LokiSink;

use crate::{Result, config::LokiConfig};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Category tag attached to every user-reported misprediction.
pub const BAD_PREDICTION_EVENT: &str = "bad_prediction";

pub const BAD_PREDICTION_MESSAGE: &str = "Mauvaise prédiction signalée par l'utilisateur";

/// A user report that a prediction was wrong.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackEvent {
    pub tweet_text: String,
    pub model_prediction: String,
}

#[async_trait]
pub trait FeedbackSink: Send + Sync {
    async fn send(&self, event: FeedbackEvent) -> Result<()>;
}

/// Sink used when log shipping is disabled.
#[derive(Debug, Default)]
pub struct NoopSink;

#[async_trait]
impl FeedbackSink for NoopSink {
    async fn send(&self, event: FeedbackEvent) -> Result<()> {
        debug!("Log shipping disabled, dropping feedback: {:?}", event);
        Ok(())
    }
}

pub fn sink_from_config(config: &LokiConfig) -> Result<Arc<dyn FeedbackSink>> {
    if config.enabled {
        Ok(Arc::new(LokiSink::new(config.clone())?))
    } else {
        Ok(Arc::new(NoopSink))
    }
}

/// Ships `event` on a background task. Delivery failures are logged and
/// never reach the caller.
pub fn dispatch(sink: Arc<dyn FeedbackSink>, event: FeedbackEvent) {
    tokio::spawn(async move {
        if let Err(e) = sink.send(event).await {
            warn!("Failed to deliver feedback event: {}", e);
        }
    });
}
