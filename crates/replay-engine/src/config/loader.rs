use super::schema::ReplayConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load from default locations:
    /// 1. ./replay.yaml
    /// 2. ~/.replay/config.yaml
    /// 3. Default configuration
    pub async fn load_default() -> Result<ReplayConfig, ConfigError> {
        let local_config = PathBuf::from("./replay.yaml");
        if local_config.exists() {
            return Self::load_from(&local_config).await;
        }

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".replay").join("config.yaml");
            if home_config.exists() {
                return Self::load_from(&home_config).await;
            }
        }

        Ok(ReplayConfig::default())
    }

    pub async fn load_from(path: &Path) -> Result<ReplayConfig, ConfigError> {
        let content = tokio::fs::read_to_string(path).await?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<ReplayConfig, ConfigError> {
        if content.trim().is_empty() {
            return Ok(ReplayConfig::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// An explicit path wins; otherwise fall back to the default search.
    pub async fn load(path: Option<&Path>) -> Result<ReplayConfig, ConfigError> {
        match path {
            Some(p) => Self::load_from(p).await,
            None => Self::load_default().await,
        }
    }
}
