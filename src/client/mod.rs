mod api;
pub mod session;

pub use api::{ApiClient, SentimentApi};
pub use session::{ClientEvent, ClientSession, ClientState, Notice, SessionState};
