// src/upwork/oauth.rs
//! Authorization-code grant against the upstream token endpoint

use super::client::USER_AGENT;
use crate::core::{OAuthSettings, StoreError};
use reqwest::header::{HeaderMap, SERVER};
use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info, warn};
use url::Url;

#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("token endpoint returned HTTP {status}{}", blocked_suffix(.blocked))]
    Http {
        status: u16,
        blocked: bool,
        body: String,
    },

    #[error("access token not found in token response")]
    MissingAccessToken,

    #[error("token request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed token response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("failed to persist tokens: {0}")]
    Persist(#[from] StoreError),
}

fn blocked_suffix(blocked: &bool) -> &'static str {
    if *blocked {
        " (blocked by edge network)"
    } else {
        ""
    }
}

impl OAuthError {
    /// Reason appended to the front-end redirect
    pub fn redirect_message(&self) -> String {
        match self {
            OAuthError::Http {
                status,
                blocked: true,
                ..
            } => format!("HTTP_Error_{}_Blocked", status),
            OAuthError::Http { status, .. } => format!("HTTP_Error_{}", status),
            OAuthError::Persist(_) => "Failed_to_save_tokens".to_string(),
            _ => "Failed_to_get_tokens".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
    expires_in: Option<u64>,
}

/// Upstream authorize URL the end user is sent to
pub fn authorization_url(authorize_url: &Url, settings: &OAuthSettings) -> Url {
    let mut url = authorize_url.clone();
    url.query_pairs_mut()
        .append_pair("client_id", &settings.client_id)
        .append_pair("redirect_uri", &settings.redirect_uri)
        .append_pair("response_type", "code");
    url
}

pub struct TokenExchange {
    client: reqwest::Client,
    token_url: Url,
}

impl TokenExchange {
    pub fn new(token_url: Url) -> Result<Self, OAuthError> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client, token_url })
    }

    /// Exchange an authorization code for tokens. A missing refresh token is
    /// tolerated and comes back as an empty string.
    pub async fn exchange_code(
        &self,
        settings: &OAuthSettings,
        code: &str,
    ) -> Result<TokenPair, OAuthError> {
        let form = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", settings.redirect_uri.as_str()),
            ("client_id", settings.client_id.as_str()),
            ("client_secret", settings.client_secret.as_str()),
        ];

        let response = self
            .client
            .post(self.token_url.clone())
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let headers = response.headers().clone();
            let body = response.text().await.unwrap_or_default();
            let blocked = is_edge_block(&headers, &body);
            error!(
                "HTTP error obtaining tokens from Upwork: {} - {}",
                status, body
            );
            return Err(OAuthError::Http {
                status: status.as_u16(),
                blocked,
                body,
            });
        }

        let response_text = response.text().await?;
        let tokens: TokenResponse = serde_json::from_str(&response_text)?;

        let access_token = match tokens.access_token.filter(|t| !t.is_empty()) {
            Some(token) => token,
            None => {
                error!("Failed to get access token from Upwork token response");
                return Err(OAuthError::MissingAccessToken);
            }
        };

        let refresh_token = tokens.refresh_token.unwrap_or_default();
        if refresh_token.is_empty() {
            warn!("Upwork token response carried no refresh token");
        }

        info!(
            "Successfully obtained access and refresh tokens (expires in {:?}s)",
            tokens.expires_in
        );

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }
}

/// Cloudflare fronts the token endpoint. Any failed response it served or
/// mentions is treated as a bot block, whatever the status.
pub fn is_edge_block(headers: &HeaderMap, body: &str) -> bool {
    if headers.contains_key("cf-mitigated") {
        return true;
    }
    let served_by_edge = headers
        .get(SERVER)
        .and_then(|v| v.to_str().ok())
        .map_or(false, |s| s.to_lowercase().contains("cloudflare"));
    served_by_edge || body.to_lowercase().contains("cloudflare")
}
