// src/web/mod.rs

pub mod handlers;
pub mod types;

pub use handlers::*;
pub use types::*;

use crate::core::ConfigManager;
use crate::session::SessionContext;
use crate::types::{Category, JobSearchResult};
use anyhow::{anyhow, Result};
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::response::Redirect;
use rocket::serde::json::Json;
use rocket::{catchers, get, options, post, routes, Build, Request, Response, Rocket, State};
use std::sync::Arc;
use tracing::{error, info};

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "GET, POST, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
        response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
    }
}

#[get("/login")]
pub async fn login(session: &State<Arc<SessionContext>>) -> Result<Redirect, ApiError> {
    handlers::login_handler(session).await
}

#[get("/oauth/callback?<code>")]
pub async fn oauth_callback(
    code: Option<String>,
    session: &State<Arc<SessionContext>>,
    config: &State<ServerConfig>,
) -> Redirect {
    handlers::oauth_callback_handler(code, session, config).await
}

#[get("/auth/status")]
pub async fn auth_status(session: &State<Arc<SessionContext>>) -> Json<AuthStatusResponse> {
    handlers::auth_status_handler(session).await
}

#[get("/filters/categories")]
pub async fn categories(
    session: &State<Arc<SessionContext>>,
) -> Result<Json<Vec<Category>>, ApiError> {
    handlers::categories_handler(session).await
}

#[post("/jobs/fetch", format = "json", data = "<request>")]
pub async fn fetch_jobs(
    request: Json<JobSearchRequest>,
    session: &State<Arc<SessionContext>>,
) -> Result<Json<JobSearchResult>, ApiError> {
    handlers::fetch_jobs_handler(request, session).await
}

#[get("/healthz")]
pub async fn health() -> Json<HealthResponse> {
    handlers::health_handler().await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Invalid request format".to_string(),
        "BAD_REQUEST".to_string(),
        vec![
            "Check your request JSON format".to_string(),
            "Verify all required fields are present".to_string(),
        ],
    ))
}

#[rocket::catch(404)]
pub fn not_found() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Resource not found".to_string(),
        "NOT_FOUND".to_string(),
        vec!["Check the request path".to_string()],
    ))
}

#[rocket::catch(422)]
pub fn unprocessable_entity() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Request body could not be parsed".to_string(),
        "BAD_REQUEST".to_string(),
        vec![
            "Check your request JSON format".to_string(),
            "`first` must be a positive integer and list fields arrays of strings".to_string(),
        ],
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Internal server error".to_string(),
        "INTERNAL_ERROR".to_string(),
        vec![
            "Try again in a few moments".to_string(),
            "Contact support if the problem persists".to_string(),
        ],
    ))
}

/// Assemble the application without binding a socket.
pub fn build_rocket(session: Arc<SessionContext>, server_config: ServerConfig) -> Rocket<Build> {
    rocket::build()
        .attach(Cors)
        .manage(session)
        .manage(server_config)
        .register(
            "/",
            catchers![bad_request, not_found, unprocessable_entity, internal_error],
        )
        .mount(
            "/",
            routes![
                login,
                oauth_callback,
                auth_status,
                categories,
                fetch_jobs,
                health,
                options,
            ],
        )
}

// Main server start function
pub async fn start_web_server(config: ConfigManager, port: u16) -> Result<()> {
    let session = Arc::new(SessionContext::from_config(&config).await?);
    let server_config = ServerConfig::new(config.frontend_url.clone());

    info!("Starting Upwork job search API server on port {}", port);
    info!("Front end: {}", config.frontend_url);
    info!("Credential store: {}", config.store.path().display());

    let figment = rocket::Config::figment()
        .merge(("port", port))
        .merge(("address", "0.0.0.0"));

    if let Err(e) = build_rocket(session, server_config)
        .configure(figment)
        .launch()
        .await
    {
        error!("Rocket server failed: {}", e);
        return Err(anyhow!("Rocket server failed: {}", e));
    }

    Ok(())
}
