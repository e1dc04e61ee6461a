#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};
use std::time::Duration;
use tokio::sync::Notify;
use tweet_sentiment::{
    Error, Result,
    client::SentimentApi,
    feedback::{FeedbackEvent, FeedbackSink},
    model::{Sentiment, SentimentClassifier},
    server::{FEEDBACK_ACK, FeedbackRequest, FeedbackResponse, PredictionResponse},
};

const POSITIVE_WORDS: &[&str] = &["love", "amazing", "great", "perfect", "thanks"];

/// Fake model: positive when the text contains a positive keyword.
/// Logits follow the `[negative, positive]` class order of the real model.
#[derive(Debug, Default)]
pub struct KeywordClassifier {
    pub calls: AtomicUsize,
}

impl KeywordClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SentimentClassifier for KeywordClassifier {
    fn logits(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let lowered = text.to_lowercase();
        let hits = POSITIVE_WORDS
            .iter()
            .filter(|word| lowered.contains(*word))
            .count() as f32;
        Ok(vec![0.5, hits])
    }
}

/// Fake model whose forward pass always fails.
#[derive(Debug, Default)]
pub struct BrokenClassifier;

impl SentimentClassifier for BrokenClassifier {
    fn logits(&self, _text: &str) -> Result<Vec<f32>> {
        Err(Error::model("tensor shape mismatch"))
    }
}

/// Sink that records every event it receives.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Mutex<Vec<FeedbackEvent>>,
    pub delivered: Notify,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<FeedbackEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Waits until at least one event arrived, bounded so a broken dispatch
    /// fails the test instead of hanging it.
    pub async fn wait_for_event(&self) {
        let delivered = self.delivered.notified();
        if !self.events.lock().unwrap().is_empty() {
            return;
        }
        tokio::time::timeout(Duration::from_secs(5), delivered)
            .await
            .expect("feedback event was never delivered");
    }
}

#[async_trait]
impl FeedbackSink for RecordingSink {
    async fn send(&self, event: FeedbackEvent) -> Result<()> {
        self.events.lock().unwrap().push(event);
        self.delivered.notify_waiters();
        Ok(())
    }
}

/// Sink that behaves like an unreachable log backend.
#[derive(Debug, Default)]
pub struct UnreachableSink {
    pub attempts: AtomicUsize,
}

#[async_trait]
impl FeedbackSink for UnreachableSink {
    async fn send(&self, _event: FeedbackEvent) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(Error::sink("connection refused"))
    }
}

/// Sink that never completes, to prove the handler does not wait on it.
#[derive(Debug, Default)]
pub struct StalledSink;

#[async_trait]
impl FeedbackSink for StalledSink {
    async fn send(&self, _event: FeedbackEvent) -> Result<()> {
        std::future::pending::<()>().await;
        Ok(())
    }
}

/// Mock API for driving a client session without a server.
#[derive(Debug, Default)]
pub struct MockApi {
    pub sentiment: Option<Sentiment>,
    pub predict_error: Option<String>,
    pub feedback_error: Option<String>,
    pub predictions: Arc<Mutex<Vec<String>>>,
    pub feedback: Arc<Mutex<Vec<FeedbackRequest>>>,
}

impl MockApi {
    pub fn returning(sentiment: Sentiment) -> Self {
        Self {
            sentiment: Some(sentiment),
            ..Self::default()
        }
    }

    pub fn unreachable() -> Self {
        Self {
            predict_error: Some("connection refused".to_string()),
            ..Self::default()
        }
    }

    pub fn with_feedback_error(mut self, error: &str) -> Self {
        self.feedback_error = Some(error.to_string());
        self
    }

    pub fn predictions(&self) -> Vec<String> {
        self.predictions.lock().unwrap().clone()
    }

    pub fn feedback_calls(&self) -> Vec<FeedbackRequest> {
        self.feedback.lock().unwrap().clone()
    }
}

#[async_trait]
impl SentimentApi for MockApi {
    async fn predict(&self, text: &str) -> Result<PredictionResponse> {
        self.predictions.lock().unwrap().push(text.to_string());

        if let Some(ref error) = self.predict_error {
            return Err(Error::api(error.clone()));
        }

        let sentiment = self
            .sentiment
            .ok_or_else(|| Error::api("No mock sentiment configured"))?;
        Ok(PredictionResponse {
            text: text.to_string(),
            sentiment,
        })
    }

    async fn send_feedback(&self, feedback: FeedbackRequest) -> Result<FeedbackResponse> {
        self.feedback.lock().unwrap().push(feedback);

        if let Some(ref error) = self.feedback_error {
            return Err(Error::api(error.clone()));
        }

        Ok(FeedbackResponse {
            message: FEEDBACK_ACK.to_string(),
        })
    }
}
