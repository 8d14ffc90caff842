// src/web/types.rs
use crate::upwork::{JobSearchParams, UpworkError};
use rocket::http::Status;
use rocket::response::{self, Responder};
use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};
use rocket::{Request, Response};
use tracing::error;
use url::Url;

pub struct ServerConfig {
    pub frontend_url: Url,
}

impl ServerConfig {
    pub fn new(frontend_url: Url) -> Self {
        Self { frontend_url }
    }

    pub fn auth_success_redirect(&self) -> String {
        let mut url = self.frontend_url.clone();
        url.query_pairs_mut()
            .append_pair("auth_status", "success")
            .append_pair("refresh", "true");
        url.to_string()
    }

    pub fn auth_error_redirect(&self, message: &str) -> String {
        let mut url = self.frontend_url.clone();
        url.query_pairs_mut()
            .append_pair("auth_status", "error")
            .append_pair("message", message);
        url.to_string()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct JobSearchRequest {
    pub query: Option<String>,
    pub category_ids: Option<Vec<String>>,
    pub locations: Option<Vec<String>>,
    pub first: Option<u32>,
    pub after: Option<String>,
}

impl JobSearchRequest {
    pub fn into_params(self) -> Result<JobSearchParams, ApiError> {
        let mut params = JobSearchParams {
            query: self.query,
            category_ids: self.category_ids,
            locations: self.locations,
            after: self.after.filter(|a| !a.is_empty()),
            ..JobSearchParams::default()
        };

        if let Some(first) = self.first {
            if first == 0 {
                return Err(ApiError::BadRequest(
                    "`first` must be at least 1".to_string(),
                ));
            }
            params.first = first;
        }

        Ok(params)
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct AuthStatusResponse {
    pub authenticated: bool,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct StandardErrorResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub suggestions: Vec<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum ResponseType {
    Error,
}

impl StandardErrorResponse {
    pub fn new(error: String, error_code: String, suggestions: Vec<String>) -> Self {
        Self {
            response_type: ResponseType::Error,
            success: false,
            error,
            error_code,
            suggestions,
        }
    }
}

/// REST boundary error. Every variant renders as a `StandardErrorResponse`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    MissingCredentials(String),
    UpstreamUnavailable(String),
    Unexpected(String),
}

impl ApiError {
    pub fn status(&self) -> Status {
        match self {
            ApiError::BadRequest(_) => Status::BadRequest,
            ApiError::MissingCredentials(_) => Status::Unauthorized,
            ApiError::UpstreamUnavailable(_) => Status::ServiceUnavailable,
            ApiError::Unexpected(_) => Status::InternalServerError,
        }
    }

    pub fn to_response(&self) -> StandardErrorResponse {
        match self {
            ApiError::BadRequest(message) => StandardErrorResponse::new(
                message.clone(),
                "BAD_REQUEST".to_string(),
                vec!["Check your request JSON format".to_string()],
            ),
            ApiError::MissingCredentials(message) => StandardErrorResponse::new(
                message.clone(),
                "MISSING_CREDENTIALS".to_string(),
                vec![
                    "Log in through /login to authorize the application".to_string(),
                    "Verify the OAuth client settings are configured".to_string(),
                ],
            ),
            ApiError::UpstreamUnavailable(message) => StandardErrorResponse::new(
                message.clone(),
                "UPSTREAM_UNAVAILABLE".to_string(),
                vec!["Try again in a few moments".to_string()],
            ),
            // Details stay in the logs.
            ApiError::Unexpected(_) => StandardErrorResponse::new(
                "Internal server error".to_string(),
                "INTERNAL_ERROR".to_string(),
                vec![
                    "Try again in a few moments".to_string(),
                    "Contact support if the problem persists".to_string(),
                ],
            ),
        }
    }
}

impl From<UpworkError> for ApiError {
    fn from(e: UpworkError) -> Self {
        if e.is_missing_credentials() {
            return ApiError::MissingCredentials(e.to_string());
        }
        match e {
            UpworkError::Decode(_) => ApiError::Unexpected(e.to_string()),
            _ => ApiError::UpstreamUnavailable(e.to_string()),
        }
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        let status = self.status();
        match &self {
            ApiError::Unexpected(details) => error!("Unexpected error: {}", details),
            other => error!("Request failed with {}: {:?}", status, other),
        }
        Response::build_from(Json(self.to_response()).respond_to(req)?)
            .status(status)
            .ok()
    }
}
