// src/session.rs
//! Process-wide credential state shared by every request handler

use crate::core::config_store::{
    ConfigStore, StoreError, ACCESS_TOKEN_KEY, CLIENT_ID_KEY, CLIENT_SECRET_KEY,
    REDIRECT_URI_KEY, REFRESH_TOKEN_KEY,
};
use crate::core::{ConfigManager, OAuthSettings, UpstreamConfig};
use crate::upwork::oauth::{authorization_url, OAuthError, TokenExchange, TokenPair};
use crate::upwork::{TenantResolver, UpworkClient, UpworkError};
use anyhow::{Context, Result};
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};
use url::Url;

/// Snapshot of everything the authenticated client needs. Empty strings mean absent.
#[derive(Clone, Default)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub access_token: String,
    pub refresh_token: String,
}

impl Credentials {
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            (CLIENT_ID_KEY, &self.client_id),
            (CLIENT_SECRET_KEY, &self.client_secret),
            (REDIRECT_URI_KEY, &self.redirect_uri),
            (ACCESS_TOKEN_KEY, &self.access_token),
            (REFRESH_TOKEN_KEY, &self.refresh_token),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(key, _)| key)
        .collect()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn redact(value: &str) -> &'static str {
            if value.is_empty() {
                "<empty>"
            } else {
                "<redacted>"
            }
        }
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &redact(&self.client_secret))
            .field("redirect_uri", &self.redirect_uri)
            .field("access_token", &redact(&self.access_token))
            .field("refresh_token", &redact(&self.refresh_token))
            .finish()
    }
}

/// Current token pair plus a counter bumped on every successful write
#[derive(Default)]
struct TokenState {
    pair: TokenPair,
    generation: u64,
}

pub struct SessionContext {
    settings: OAuthSettings,
    upstream: UpstreamConfig,
    store: Arc<dyn ConfigStore>,
    tokens: RwLock<TokenState>,
    tenant: TenantResolver,
    token_exchange: TokenExchange,
}

impl SessionContext {
    pub async fn new(
        settings: OAuthSettings,
        upstream: UpstreamConfig,
        store: Arc<dyn ConfigStore>,
        default_tenant_id: Option<String>,
    ) -> Result<Self> {
        let token_exchange = TokenExchange::new(upstream.token_url.clone())
            .context("Failed to create token exchange client")?;
        let tokens = initial_tokens(store.as_ref(), |key| std::env::var(key).ok()).await;

        if tokens.access_token.is_empty() {
            info!("No stored access token, login required");
        } else {
            info!("Loaded stored Upwork tokens");
        }

        Ok(Self {
            settings,
            upstream,
            store,
            tokens: RwLock::new(TokenState {
                pair: tokens,
                generation: 0,
            }),
            tenant: TenantResolver::new(default_tenant_id),
            token_exchange,
        })
    }

    pub async fn from_config(config: &ConfigManager) -> Result<Self> {
        let store: Arc<dyn ConfigStore> = config.store.clone();
        Self::new(
            config.oauth.clone(),
            config.upstream.clone(),
            store,
            config.default_tenant_id.clone(),
        )
        .await
    }

    pub fn settings(&self) -> &OAuthSettings {
        &self.settings
    }

    pub fn authorization_url(&self) -> Url {
        authorization_url(&self.upstream.authorize_url, &self.settings)
    }

    pub async fn credentials(&self) -> Credentials {
        self.snapshot().await.0
    }

    async fn snapshot(&self) -> (Credentials, u64) {
        let tokens = self.tokens.read().await;
        let credentials = Credentials {
            client_id: self.settings.client_id.clone(),
            client_secret: self.settings.client_secret.clone(),
            redirect_uri: self.settings.redirect_uri.clone(),
            access_token: tokens.pair.access_token.clone(),
            refresh_token: tokens.pair.refresh_token.clone(),
        };
        (credentials, tokens.generation)
    }

    /// Re-read the durable store, then report whether an access token is held.
    /// Keys present in the store replace the in-memory values, even when empty;
    /// absent keys and an unreadable store keep them.
    pub async fn is_authenticated(&self) -> bool {
        let mut tokens = self.tokens.write().await;
        match self.store.reload().await {
            Ok(()) => {
                let reloaded = stored_tokens(self.store.as_ref(), &tokens.pair).await;
                if reloaded != tokens.pair {
                    info!("Credential store changed on disk, picking up new tokens");
                    tokens.pair = reloaded;
                    tokens.generation += 1;
                    self.tenant.invalidate(tokens.generation).await;
                }
            }
            Err(e) => warn!("Could not re-read credential store: {}", e),
        }
        !tokens.pair.access_token.is_empty()
    }

    /// Persist a fresh token pair. Readers see either the old or the new pair;
    /// the in-memory copy only changes once the durable write succeeded.
    pub async fn store_tokens(&self, new_tokens: TokenPair) -> Result<(), StoreError> {
        let generation = {
            let mut tokens = self.tokens.write().await;
            self.store
                .set_many(&[
                    (ACCESS_TOKEN_KEY, new_tokens.access_token.as_str()),
                    (REFRESH_TOKEN_KEY, new_tokens.refresh_token.as_str()),
                ])
                .await?;
            tokens.pair = new_tokens;
            tokens.generation += 1;
            tokens.generation
        };
        info!("Access and refresh tokens saved");

        // New tokens may belong to another account.
        self.tenant.invalidate(generation).await;
        Ok(())
    }

    pub async fn exchange_code(&self, code: &str) -> Result<(), OAuthError> {
        let tokens = self
            .token_exchange
            .exchange_code(&self.settings, code)
            .await?;
        self.store_tokens(tokens).await?;
        Ok(())
    }

    /// Client bound to the current tokens, tagged with their generation so a
    /// tenant id resolved through it is never cached for newer tokens.
    pub async fn authenticated_client(&self) -> Result<UpworkClient, UpworkError> {
        let (credentials, generation) = self.snapshot().await;
        Ok(
            UpworkClient::from_credentials(&credentials, &self.upstream.graphql_url)?
                .with_generation(generation),
        )
    }

    pub async fn tenant_id(&self, client: &UpworkClient) -> Result<String, UpworkError> {
        self.tenant.resolve(client).await
    }

    pub async fn cached_tenant_id(&self) -> Option<String> {
        self.tenant.cached().await
    }
}

/// Startup tokens. A key present in the store wins, even with an empty value;
/// the environment only fills keys the store has never held.
async fn initial_tokens(
    store: &dyn ConfigStore,
    env_lookup: impl Fn(&str) -> Option<String>,
) -> TokenPair {
    let mut from_env = TokenPair::default();
    for (key, slot) in [
        (ACCESS_TOKEN_KEY, &mut from_env.access_token),
        (REFRESH_TOKEN_KEY, &mut from_env.refresh_token),
    ] {
        *slot = env_lookup(key).unwrap_or_default();
    }
    stored_tokens(store, &from_env).await
}

/// Store values for keys the store holds, `fallback` for the rest.
async fn stored_tokens(store: &dyn ConfigStore, fallback: &TokenPair) -> TokenPair {
    TokenPair {
        access_token: store
            .get(ACCESS_TOKEN_KEY)
            .await
            .unwrap_or_else(|| fallback.access_token.clone()),
        refresh_token: store
            .get(REFRESH_TOKEN_KEY)
            .await
            .unwrap_or_else(|| fallback.refresh_token.clone()),
    }
}
