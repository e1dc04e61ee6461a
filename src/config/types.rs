use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub loki: LokiConfig,
    #[serde(default)]
    pub client: ClientConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub logs: LogsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Directory holding `config.json`, `tokenizer.json` and the weights.
    #[serde(default = "default_model_dir")]
    pub dir: PathBuf,
    /// Token limit applied when truncating; defaults to the model's
    /// `max_position_embeddings`.
    #[serde(default)]
    pub max_length: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LokiConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_loki_url")]
    pub url: String,
    #[serde(default = "default_application")]
    pub application: String,
    #[serde(default = "default_logger")]
    pub logger: String,
    /// Upper bound on a single push, connect included.
    #[serde(default = "default_loki_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            logs: LogsConfig::default(),
        }
    }
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            dir: default_model_dir(),
            max_length: None,
        }
    }
}

impl Default for LokiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: default_loki_url(),
            application: default_application(),
            logger: default_logger(),
            timeout_ms: default_loki_timeout_ms(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

// Resolved from the crate root so the service finds its weights no matter
// where it is launched from.
fn default_model_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("models")
}

fn default_true() -> bool {
    true
}

fn default_loki_url() -> String {
    "http://localhost:3100/loki/api/v1/push".to_string()
}

fn default_application() -> String {
    "sentiment-api".to_string()
}

fn default_logger() -> String {
    "api_logger".to_string()
}

fn default_loki_timeout_ms() -> u64 {
    5000
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}
