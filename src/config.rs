use crate::error::{ImportError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub seiso: SeisoConfig,
}

/// Connection settings for the Seiso API.
#[derive(Debug, Clone, Deserialize)]
pub struct SeisoConfig {
    /// Base URI of the Seiso instance (e.g., https://seiso.example.com)
    pub base_uri: String,
    pub username: Option<String>,
    pub password: Option<String>,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_timeout_seconds() -> u64 {
    30
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(path).map_err(|e| {
            ImportError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&config_content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let config: Config = toml::from_str(
            r#"
            [seiso]
            base_uri = "https://seiso.example.com"
            username = "importer"
            password = "hunter2"
            "#,
        )
        .unwrap();

        assert_eq!(config.seiso.base_uri, "https://seiso.example.com");
        assert_eq!(config.seiso.username.as_deref(), Some("importer"));
        assert_eq!(config.seiso.timeout_seconds, 30);
    }

    #[test]
    fn test_missing_config_file() {
        let result = Config::load(Path::new("does-not-exist.toml"));
        assert!(matches!(result, Err(ImportError::Config(_))));
    }
}
