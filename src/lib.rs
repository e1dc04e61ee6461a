pub mod client;
pub mod config;
pub mod error;
pub mod feedback;
pub mod model;
pub mod server;

pub use error::{Error, Result};
