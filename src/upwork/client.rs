// src/upwork/client.rs
//! Request-signing GraphQL client bound to the current credentials

use super::error::UpworkError;
use crate::session::Credentials;
use crate::types::response::GraphQlResponse;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};
use url::Url;

/// The upstream platform rejects default HTTP client user agents.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub const TENANT_HEADER: &str = "X-Upwork-API-TenantId";

pub struct UpworkClient {
    client: reqwest::Client,
    graphql_url: Url,
    generation: u64,
}

impl UpworkClient {
    /// Build a client from the current credentials. No network I/O happens here.
    pub fn from_credentials(
        credentials: &Credentials,
        graphql_url: &Url,
    ) -> Result<Self, UpworkError> {
        let missing = credentials.missing_fields();
        if !missing.is_empty() {
            error!("Missing necessary credentials: {}", missing.join(", "));
            return Err(UpworkError::MissingCredentials { missing });
        }

        let mut auth_value =
            HeaderValue::from_str(&format!("Bearer {}", credentials.access_token)).map_err(
                |e| UpworkError::ClientConstruction(format!("invalid access token: {}", e)),
            )?;
        auth_value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth_value);

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| UpworkError::ClientConstruction(e.to_string()))?;

        Ok(Self {
            client,
            graphql_url: graphql_url.clone(),
            generation: 0,
        })
    }

    /// Tag the client with the token generation it was built from.
    pub fn with_generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// POST one GraphQL operation. Non-2xx responses become `UpworkError::Http`;
    /// an `errors` array is left in the returned envelope for the caller to judge.
    pub async fn graphql<T>(
        &self,
        operation: &str,
        query: &str,
        variables: Option<Value>,
        tenant_id: Option<&str>,
    ) -> Result<GraphQlResponse<T>, UpworkError>
    where
        T: DeserializeOwned,
    {
        let mut payload = serde_json::json!({ "query": query });
        if let Some(variables) = variables {
            payload["variables"] = variables;
        }

        let mut request = self.client.post(self.graphql_url.clone()).json(&payload);
        if let Some(tenant_id) = tenant_id {
            request = request.header(TENANT_HEADER, tenant_id);
        }

        debug!("Sending GraphQL operation {}", operation);
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("GraphQL {} returned {}: {}", operation, status, error_text);
            return Err(UpworkError::Http {
                status: status.as_u16(),
            });
        }

        let response_text = response.text().await?;
        debug!("Raw GraphQL {} response: {}", operation, response_text);

        serde_json::from_str(&response_text)
            .map_err(|e| UpworkError::Decode(format!("{}: {}", operation, e)))
    }
}
