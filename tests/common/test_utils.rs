#![allow(dead_code)]

use axum::Router;
use std::{net::SocketAddr, sync::Arc};
use tempfile::TempDir;
use tokio::fs;
use tweet_sentiment::{
    Result,
    feedback::FeedbackSink,
    model::SentimentClassifier,
    server::{self, AppState},
};

use super::mocks::{KeywordClassifier, RecordingSink};

pub const POSITIVE_TWEET: &str = "I love this airline, the service is amazing!";
pub const NEGATIVE_TWEET: &str = "My flight was delayed and I lost my luggage.";

/// Build the production router around the given collaborators
pub fn create_test_app(
    classifier: Arc<dyn SentimentClassifier>,
    sink: Arc<dyn FeedbackSink>,
) -> Router {
    server::router(AppState { classifier, sink })
}

/// Router with the keyword model and a recording sink, returning both
/// collaborators for inspection
pub fn create_default_app() -> (Router, Arc<KeywordClassifier>, Arc<RecordingSink>) {
    let classifier = Arc::new(KeywordClassifier::new());
    let sink = Arc::new(RecordingSink::new());
    let app = create_test_app(classifier.clone(), sink.clone());
    (app, classifier, sink)
}

/// Serve `app` on an ephemeral local port
pub async fn spawn_server(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Create a test config YAML file
pub async fn create_test_config_file(dir: &TempDir, content: &str) -> Result<String> {
    let config_path = dir.path().join("config.yaml");
    fs::write(&config_path, content).await?;
    Ok(config_path.to_string_lossy().to_string())
}

/// Sample configuration YAML for testing
pub const SAMPLE_CONFIG_YAML: &str = r#"
server:
  host: "127.0.0.1"
  port: 8080
  logs:
    level: "debug"

model:
  dir: "/srv/models/distilbert-tweets"
  max_length: 128

loki:
  enabled: true
  url: "http://loki:3100/loki/api/v1/push"
  application: "sentiment-api-test"
  timeout_ms: 750

client:
  base_url: "http://api:8000"
"#;

/// Invalid configuration YAML for testing error cases
pub const INVALID_CONFIG_YAML: &str = r#"
server:
  host: "127.0.0.1"
  port: "not-a-number"
"#;
