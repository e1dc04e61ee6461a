use super::api::SentimentApi;
use crate::{Error, Result, model::Sentiment, server::FeedbackRequest};
use tracing::{debug, info, warn};

pub const EMPTY_INPUT_WARNING: &str = "Veuillez entrer un texte à analyser.";
pub const SERVER_HINT: &str = "Assurez-vous que le serveur de l'API est bien lancé.";
pub const NOTHING_TO_RATE_WARNING: &str = "Aucune prédiction à évaluer.";
pub const THANKS_TOAST: &str = "Merci pour votre retour !";
pub const FEEDBACK_SENT_TOAST: &str = "Merci ! Le modèle sera amélioré grâce à votre retour.";

// Client states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    Idle,
    Pending,
    ResultShown,
}

// Client events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientEvent {
    Analyze,
    PredictionSucceeded,
    PredictionFailed,
    ConfirmedCorrect,
    MarkedIncorrect,
}

/// What the session remembers between interactions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub last_sentiment: Option<Sentiment>,
    pub last_analyzed_text: String,
}

impl SessionState {
    pub fn remember(&mut self, text: &str, sentiment: Sentiment) {
        self.last_sentiment = Some(sentiment);
        self.last_analyzed_text = text.to_string();
    }

    pub fn clear(&mut self) {
        self.last_sentiment = None;
        self.last_analyzed_text.clear();
    }
}

/// Something the front-end should show the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Result(Sentiment),
    Toast(String),
    Warning(String),
    Error(String),
}

/// One user's interactive session against the prediction service.
pub struct ClientSession<A: SentimentApi> {
    api: A,
    state: ClientState,
    memory: SessionState,
}

impl<A: SentimentApi> ClientSession<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: ClientState::Idle,
            memory: SessionState::default(),
        }
    }

    pub fn current_state(&self) -> ClientState {
        self.state
    }

    pub fn memory(&self) -> &SessionState {
        &self.memory
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    fn transition(&mut self, event: ClientEvent) -> Result<()> {
        let new_state = match (self.state, event) {
            (ClientState::Idle | ClientState::ResultShown, ClientEvent::Analyze) => {
                ClientState::Pending
            }
            (ClientState::Pending, ClientEvent::PredictionSucceeded) => ClientState::ResultShown,
            (ClientState::Pending, ClientEvent::PredictionFailed) => ClientState::Idle,
            (ClientState::ResultShown, ClientEvent::ConfirmedCorrect) => ClientState::Idle,
            (ClientState::ResultShown, ClientEvent::MarkedIncorrect) => ClientState::Idle,
            (state, event) => {
                warn!("Invalid session transition from {:?} with {:?}", state, event);
                return Err(Error::session(format!(
                    "Invalid transition from {:?} with event {:?}",
                    state, event
                )));
            }
        };

        debug!("Session transition: {:?} -> {:?} ({:?})", self.state, new_state, event);
        self.state = new_state;
        Ok(())
    }

    /// Sends `input` for prediction and caches the result. Only the empty
    /// string is refused; whitespace is a valid tweet for the service.
    pub async fn analyze(&mut self, input: &str) -> Result<Vec<Notice>> {
        if input.is_empty() {
            return Ok(vec![Notice::Warning(EMPTY_INPUT_WARNING.to_string())]);
        }

        self.transition(ClientEvent::Analyze)?;

        match self.api.predict(input).await {
            Ok(prediction) => {
                self.transition(ClientEvent::PredictionSucceeded)?;
                self.memory.remember(input, prediction.sentiment);
                info!("Prediction received: {}", prediction.sentiment);
                Ok(vec![Notice::Result(prediction.sentiment)])
            }
            Err(e) => {
                self.transition(ClientEvent::PredictionFailed)?;
                self.memory.clear();
                Ok(vec![
                    Notice::Error(format!("Erreur de connexion à l'API : {}", e)),
                    Notice::Warning(SERVER_HINT.to_string()),
                ])
            }
        }
    }

    /// The user agrees with the cached prediction; nothing is reported.
    pub fn confirm_correct(&mut self) -> Result<Vec<Notice>> {
        if self.memory.last_sentiment.is_none() {
            return Ok(vec![Notice::Warning(NOTHING_TO_RATE_WARNING.to_string())]);
        }

        self.transition(ClientEvent::ConfirmedCorrect)?;
        self.memory.clear();
        Ok(vec![Notice::Toast(THANKS_TOAST.to_string())])
    }

    /// The user disputes the cached prediction. Feedback is best-effort and
    /// the cache is cleared whatever the outcome.
    pub async fn mark_incorrect(&mut self) -> Result<Vec<Notice>> {
        let Some(sentiment) = self.memory.last_sentiment else {
            return Ok(vec![Notice::Warning(NOTHING_TO_RATE_WARNING.to_string())]);
        };

        let feedback = FeedbackRequest {
            text: self.memory.last_analyzed_text.clone(),
            prediction: sentiment.label().to_string(),
        };

        let notice = match self.api.send_feedback(feedback).await {
            Ok(_) => Notice::Toast(FEEDBACK_SENT_TOAST.to_string()),
            Err(e) => {
                warn!("Feedback could not be sent: {}", e);
                Notice::Error(format!("Impossible d'envoyer le feedback : {}", e))
            }
        };

        self.transition(ClientEvent::MarkedIncorrect)?;
        self.memory.clear();
        Ok(vec![notice])
    }
}
