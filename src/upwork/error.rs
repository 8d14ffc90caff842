// src/upwork/error.rs
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpworkError {
    #[error("Missing Upwork credentials: {}", .missing.join(", "))]
    MissingCredentials { missing: Vec<&'static str> },

    #[error("Could not create authenticated Upwork client: {0}")]
    ClientConstruction(String),

    #[error("Upwork request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Upwork returned HTTP {status}")]
    Http { status: u16 },

    #[error("Failed to decode Upwork response: {0}")]
    Decode(String),

    #[error("Upwork GraphQL error: {0}")]
    GraphQl(String),

    #[error("No organizations found and no default tenant ID configured")]
    NoOrganization,

    #[error("Could not determine organization Tenant ID: {0}")]
    TenantResolution(#[source] Box<UpworkError>),

    #[error("Failed to search jobs: {0}")]
    SearchFailed(#[source] Box<UpworkError>),

    #[error("Failed to fetch categories: {0}")]
    CategoriesFailed(#[source] Box<UpworkError>),
}

impl UpworkError {
    pub fn is_missing_credentials(&self) -> bool {
        matches!(self, UpworkError::MissingCredentials { .. })
    }
}
