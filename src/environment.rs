// src/environment.rs
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:8501";
pub const DEFAULT_AUTHORIZE_URL: &str = "https://www.upwork.com/ab/account-security/oauth2/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://www.upwork.com/api/v3/oauth2/token";
pub const DEFAULT_GRAPHQL_URL: &str = "https://api.upwork.com/graphql";

/// Non-secret server settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub port: u16,
    pub frontend_url: String,
    pub authorize_url: String,
    pub token_url: String,
    pub graphql_url: String,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
            authorize_url: DEFAULT_AUTHORIZE_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            graphql_url: DEFAULT_GRAPHQL_URL.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    local: Option<EnvironmentConfig>,
    production: Option<EnvironmentConfig>,
}

impl EnvironmentConfig {
    /// Load configuration based on environment. `config.yaml` is optional,
    /// environment variables override whatever it provides.
    pub fn load() -> Result<Self> {
        let environment = Self::get_environment();
        info!("Loading configuration for environment: {}", environment);

        let config_path = PathBuf::from("config.yaml");
        let base = if config_path.exists() {
            Self::load_from_file(&config_path, &environment)?
        } else {
            Self::default()
        };

        base.with_env_overrides(|key| std::env::var(key).ok())
    }

    fn get_environment() -> String {
        std::env::var("UPMATCH_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }

    fn load_from_file(path: &Path, environment: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml(&content, environment)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    fn from_yaml(content: &str, environment: &str) -> Result<Self> {
        let config_file: ConfigFile = serde_yaml::from_str(content)?;
        let section = match environment {
            "production" => config_file.production,
            _ => config_file.local,
        };
        Ok(section.unwrap_or_default())
    }

    fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(port) = lookup("ROCKET_PORT") {
            self.port = port
                .parse::<u16>()
                .map_err(|_| anyhow::anyhow!("ROCKET_PORT must be a valid port number"))?;
        }
        if let Some(url) = lookup("FRONTEND_URL") {
            self.frontend_url = url;
        }
        if let Some(url) = lookup("UPWORK_AUTHORIZE_URL") {
            self.authorize_url = url;
        }
        if let Some(url) = lookup("UPWORK_TOKEN_URL") {
            self.token_url = url;
        }
        if let Some(url) = lookup("UPWORK_GRAPHQL_URL") {
            self.graphql_url = url;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_yaml_section_selected_by_environment() {
        let yaml = r#"
local:
  port: 9000
production:
  port: 80
  frontend_url: "https://jobs.example.com"
"#;
        let local = EnvironmentConfig::from_yaml(yaml, "local").unwrap();
        assert_eq!(local.port, 9000);
        assert_eq!(local.frontend_url, DEFAULT_FRONTEND_URL);

        let production = EnvironmentConfig::from_yaml(yaml, "production").unwrap();
        assert_eq!(production.port, 80);
        assert_eq!(production.frontend_url, "https://jobs.example.com");
        assert_eq!(production.token_url, DEFAULT_TOKEN_URL);
    }

    #[test]
    fn test_env_overrides_win() {
        let vars: HashMap<&str, &str> = [
            ("ROCKET_PORT", "8123"),
            ("UPWORK_GRAPHQL_URL", "http://127.0.0.1:9999/graphql"),
        ]
        .into_iter()
        .collect();

        let config = EnvironmentConfig::default()
            .with_env_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.port, 8123);
        assert_eq!(config.graphql_url, "http://127.0.0.1:9999/graphql");
        assert_eq!(config.authorize_url, DEFAULT_AUTHORIZE_URL);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let result = EnvironmentConfig::default()
            .with_env_overrides(|key| (key == "ROCKET_PORT").then(|| "not-a-port".to_string()));
        assert!(result.is_err());
    }
}
