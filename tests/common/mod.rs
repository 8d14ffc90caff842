#![allow(dead_code)]

use opportunity_matcher::core::{ConfigStore, MemoryStore, OAuthSettings, UpstreamConfig};
use opportunity_matcher::{build_rocket, ServerConfig, SessionContext};
use rocket::local::asynchronous::Client;
use serde_json::{json, Value};
use std::sync::Arc;
use url::Url;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockBuilder, MockServer, ResponseTemplate};

pub const FRONTEND_URL: &str = "http://localhost:8501";
pub const ACCESS_TOKEN: &str = "test-access";
pub const REFRESH_TOKEN: &str = "test-refresh";

pub fn settings() -> OAuthSettings {
    OAuthSettings::new(
        "client-id",
        "client-secret",
        "http://localhost:8000/oauth/callback",
    )
}

pub fn authenticated_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::with_values([
        ("UPWORK_ACCESS_TOKEN", ACCESS_TOKEN),
        ("UPWORK_REFRESH_TOKEN", REFRESH_TOKEN),
    ]))
}

pub async fn session_with(
    server: &MockServer,
    settings: OAuthSettings,
    store: Arc<MemoryStore>,
    default_tenant_id: Option<&str>,
) -> Arc<SessionContext> {
    let upstream = UpstreamConfig::with_base_url(&server.uri()).unwrap();
    let store: Arc<dyn ConfigStore> = store;
    Arc::new(
        SessionContext::new(
            settings,
            upstream,
            store,
            default_tenant_id.map(str::to_string),
        )
        .await
        .unwrap(),
    )
}

pub async fn session(server: &MockServer, store: Arc<MemoryStore>) -> Arc<SessionContext> {
    session_with(server, settings(), store, None).await
}

pub async fn client(session: Arc<SessionContext>) -> Client {
    let server_config = ServerConfig::new(Url::parse(FRONTEND_URL).unwrap());
    Client::untracked(build_rocket(session, server_config))
        .await
        .unwrap()
}

pub fn company_selector_body(organization_ids: &[&str]) -> Value {
    let items: Vec<Value> = organization_ids
        .iter()
        .map(|id| json!({ "title": format!("Org {}", id), "organizationId": id }))
        .collect();
    json!({ "data": { "companySelector": { "items": items } } })
}

pub fn company_selector_mock(organization_ids: &[&str]) -> Mock {
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("companySelector"))
        .respond_with(ResponseTemplate::new(200).set_body_json(company_selector_body(organization_ids)))
}

pub fn token_endpoint() -> MockBuilder {
    Mock::given(method("POST")).and(path("/api/v3/oauth2/token"))
}
