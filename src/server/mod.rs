pub mod handlers;
pub mod types;

pub use handlers::AppState;
pub use types::*;

use crate::{Result, config::Config, feedback, model::DistilBertClassifier};
use axum::{Router, routing::post};
use candle_core::Device;
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::info;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/predict/", post(handlers::predict))
        .route("/predict", post(handlers::predict))
        .route("/feedback/", post(handlers::feedback))
        .route("/feedback", post(handlers::feedback))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(config: Config) -> Result<()> {
    // The model is loaded before binding so no request ever sees a
    // half-initialized service.
    let model_config = config.model.clone();
    let classifier = tokio::task::spawn_blocking(move || {
        DistilBertClassifier::load(&model_config.dir, model_config.max_length, Device::Cpu)
    })
    .await??;

    let app_state = AppState {
        classifier: Arc::new(classifier),
        sink: feedback::sink_from_config(&config.loki)?,
    };

    let app = router(app_state);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
