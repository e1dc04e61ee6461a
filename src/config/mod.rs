mod types;

pub use types::*;

use crate::{Error, Result};
use std::{env, path::Path};
use tracing::debug;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Loads configuration from `CONFIG_PATH`, or `config.yaml` when present,
/// falling back to built-in defaults. `MODEL_DIR` and `SENTIMENT_API_URL`
/// override the matching fields.
pub async fn load() -> Result<Config> {
    let mut config = match env::var("CONFIG_PATH") {
        Ok(path) => load_from(&path).await?,
        Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            load_from(DEFAULT_CONFIG_PATH).await?
        }
        Err(_) => {
            debug!("No configuration file found, using defaults");
            Config::default()
        }
    };

    if let Ok(dir) = env::var("MODEL_DIR") {
        config.model.dir = dir.into();
    }
    if let Ok(url) = env::var("SENTIMENT_API_URL") {
        config.client.base_url = url;
    }

    Ok(config)
}

pub async fn load_from(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    debug!("Loading configuration from: {}", path.display());

    let config_str = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Error::config(format!("cannot read {}: {}", path.display(), e)))?;
    let config: Config = serde_yaml::from_str(&config_str)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.logs.level, "info");
        assert!(config.model.dir.ends_with("models"));
        assert_eq!(config.model.max_length, None);
        assert!(config.loki.enabled);
        assert_eq!(config.loki.url, "http://localhost:3100/loki/api/v1/push");
        assert_eq!(config.loki.application, "sentiment-api");
        assert_eq!(config.loki.timeout_ms, 5000);
        assert_eq!(config.client.base_url, "http://127.0.0.1:8000");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
server:
  port: 9000
loki:
  enabled: false
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(!config.loki.enabled);
        assert_eq!(config.loki.logger, "api_logger");
    }

    #[tokio::test]
    async fn test_load_from_missing_file_is_config_error() {
        let err = load_from("/definitely/not/here.yaml").await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
