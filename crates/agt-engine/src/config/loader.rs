use super::schema::InspectorConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

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
    /// 1. ./agt.yaml
    /// 2. ~/.agt/config.yaml
    /// 3. Default configuration
    pub fn load_default() -> Result<InspectorConfig, ConfigError> {
        let local_config = PathBuf::from("./agt.yaml");
        if local_config.exists() {
            return Self::load_from(&local_config);
        }

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".agt").join("config.yaml");
            if home_config.exists() {
                return Self::load_from(&home_config);
            }
        }

        Ok(InspectorConfig::default())
    }

    pub fn load_from(path: &Path) -> Result<InspectorConfig, ConfigError> {
        debug!(path = %path.display(), "loading config");
        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(InspectorConfig::default());
        }
        let config: InspectorConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}
