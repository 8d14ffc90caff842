// src/core/config_manager.rs
//! Unified configuration loading: environment settings, durable store and
//! OAuth client settings

use crate::core::config_store::{
    ConfigStore, DotenvStore, CLIENT_ID_KEY, CLIENT_SECRET_KEY, DEFAULT_TENANT_ID_KEY,
    REDIRECT_URI_KEY,
};
use crate::environment::EnvironmentConfig;
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use url::Url;

/// Upstream platform endpoints
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub authorize_url: Url,
    pub token_url: Url,
    pub graphql_url: Url,
}

impl UpstreamConfig {
    pub fn from_environment(environment: &EnvironmentConfig) -> Result<Self> {
        Ok(Self {
            authorize_url: parse_url("authorize_url", &environment.authorize_url)?,
            token_url: parse_url("token_url", &environment.token_url)?,
            graphql_url: parse_url("graphql_url", &environment.graphql_url)?,
        })
    }

    /// Point every endpoint at one base URL, keeping the production paths.
    pub fn with_base_url(base: &str) -> Result<Self> {
        let base = parse_url("base_url", base)?;
        Ok(Self {
            authorize_url: base.join("/ab/account-security/oauth2/authorize")?,
            token_url: base.join("/api/v3/oauth2/token")?,
            graphql_url: base.join("/graphql")?,
        })
    }
}

/// Registered OAuth application settings, immutable for the process lifetime
#[derive(Debug, Clone, Default)]
pub struct OAuthSettings {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

impl OAuthSettings {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
        }
    }

    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.client_id.is_empty() {
            missing.push(CLIENT_ID_KEY);
        }
        if self.client_secret.is_empty() {
            missing.push(CLIENT_SECRET_KEY);
        }
        if self.redirect_uri.is_empty() {
            missing.push(REDIRECT_URI_KEY);
        }
        missing
    }
}

pub struct ConfigManager {
    pub environment: EnvironmentConfig,
    pub upstream: UpstreamConfig,
    pub frontend_url: Url,
    pub oauth: OAuthSettings,
    pub default_tenant_id: Option<String>,
    pub store: Arc<DotenvStore>,
}

impl ConfigManager {
    /// Load all configurations
    pub async fn load(env_file: &Path) -> Result<Self> {
        let environment = EnvironmentConfig::load()?;
        let upstream = UpstreamConfig::from_environment(&environment)?;
        let frontend_url = parse_url("frontend_url", &environment.frontend_url)?;

        let store = Arc::new(
            DotenvStore::open(env_file)
                .await
                .with_context(|| format!("Failed to load {}", env_file.display()))?,
        );

        let oauth = OAuthSettings {
            client_id: lookup(store.as_ref(), CLIENT_ID_KEY).await.unwrap_or_default(),
            client_secret: lookup(store.as_ref(), CLIENT_SECRET_KEY)
                .await
                .unwrap_or_default(),
            redirect_uri: lookup(store.as_ref(), REDIRECT_URI_KEY)
                .await
                .unwrap_or_default(),
        };
        let default_tenant_id = lookup(store.as_ref(), DEFAULT_TENANT_ID_KEY).await;

        let missing = oauth.missing_fields();
        if missing.is_empty() {
            info!("OAuth client settings loaded");
        } else {
            warn!(
                "Missing OAuth client settings: {}. Login and API calls will fail until they are set",
                missing.join(", ")
            );
        }

        Ok(Self {
            environment,
            upstream,
            frontend_url,
            oauth,
            default_tenant_id,
            store,
        })
    }
}

/// Process environment first, then the durable store. Empty values count as absent.
async fn lookup(store: &dyn ConfigStore, key: &str) -> Option<String> {
    match std::env::var(key) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => store.get(key).await.filter(|value| !value.is_empty()),
    }
}

fn parse_url(name: &str, value: &str) -> Result<Url> {
    Url::parse(value).with_context(|| format!("Invalid {}: {}", name, value))
}
