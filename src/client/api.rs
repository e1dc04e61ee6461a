use crate::{
    Error, Result,
    server::{FeedbackRequest, FeedbackResponse, PredictionRequest, PredictionResponse},
};
use async_trait::async_trait;
use tracing::debug;

/// The two calls the interactive client makes against the service.
#[async_trait]
pub trait SentimentApi: Send + Sync {
    async fn predict(&self, text: &str) -> Result<PredictionResponse>;

    async fn send_feedback(&self, feedback: FeedbackRequest) -> Result<FeedbackResponse>;
}

pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}/", self.base_url, path)
    }
}

#[async_trait]
impl SentimentApi for ApiClient {
    async fn predict(&self, text: &str) -> Result<PredictionResponse> {
        let url = self.endpoint("predict");
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(&PredictionRequest {
                text: text.to_string(),
            })
            .send()
            .await?
            .error_for_status()?;

        let prediction: PredictionResponse = response
            .json()
            .await
            .map_err(|e| Error::api(format!("Unexpected prediction payload: {}", e)))?;
        Ok(prediction)
    }

    async fn send_feedback(&self, feedback: FeedbackRequest) -> Result<FeedbackResponse> {
        let url = self.endpoint("feedback");
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(&feedback)
            .send()
            .await?
            .error_for_status()?;

        let ack: FeedbackResponse = response
            .json()
            .await
            .map_err(|e| Error::api(format!("Unexpected feedback payload: {}", e)))?;
        Ok(ack)
    }
}
