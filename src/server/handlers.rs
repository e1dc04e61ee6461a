use super::types::{
    ErrorResponse, FeedbackRequest, FeedbackResponse, PredictionRequest, PredictionResponse,
};
use crate::{
    feedback::{self, BAD_PREDICTION_EVENT, BAD_PREDICTION_MESSAGE, FeedbackEvent, FeedbackSink},
    model::{Sentiment, SentimentClassifier},
};
use axum::{
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;
use tracing::{debug, error, warn};

#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<dyn SentimentClassifier>,
    pub sink: Arc<dyn FeedbackSink>,
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

/// Any body that cannot become the expected JSON shape is a validation
/// failure, whatever the extractor's own status would be.
fn reject(rejection: JsonRejection) -> HandlerError {
    let error = rejection.body_text();
    warn!("Rejected request body ({}): {}", rejection.status(), error);
    (StatusCode::UNPROCESSABLE_ENTITY, Json(ErrorResponse { error }))
}

async fn classify(
    classifier: Arc<dyn SentimentClassifier>,
    text: String,
) -> crate::Result<(String, Sentiment)> {
    tokio::task::spawn_blocking(move || -> crate::Result<(String, Sentiment)> {
        let sentiment = classifier.predict(&text)?;
        Ok((text, sentiment))
    })
    .await?
}

pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictionRequest>, JsonRejection>,
) -> Result<Json<PredictionResponse>, HandlerError> {
    let Json(request) = payload.map_err(reject)?;
    debug!("Received prediction request ({} chars)", request.text.len());

    match classify(state.classifier.clone(), request.text).await {
        Ok((text, sentiment)) => {
            debug!("Predicted sentiment: {}", sentiment);
            Ok(Json(PredictionResponse { text, sentiment }))
        }
        Err(e) => {
            error!("Inference failed: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Inference error: {}", e),
                }),
            ))
        }
    }
}

pub async fn feedback(
    State(state): State<AppState>,
    payload: Result<Json<FeedbackRequest>, JsonRejection>,
) -> Result<Json<FeedbackResponse>, HandlerError> {
    let Json(request) = payload.map_err(reject)?;

    error!(
        target: "feedback",
        event = BAD_PREDICTION_EVENT,
        tweet_text = %request.text,
        model_prediction = %request.prediction,
        "{}",
        BAD_PREDICTION_MESSAGE
    );

    feedback::dispatch(
        state.sink.clone(),
        FeedbackEvent {
            tweet_text: request.text,
            model_prediction: request.prediction,
        },
    );

    Ok(Json(FeedbackResponse::received()))
}
