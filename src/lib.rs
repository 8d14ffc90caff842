//! Backend for browsing Upwork job postings: OAuth2 login, credential
//! persistence, tenant resolution and GraphQL job search behind a small
//! REST API.

pub mod cli;
pub mod core;
pub mod environment;
pub mod session;
pub mod types;
pub mod upwork;
pub mod web;

pub use crate::core::{ConfigManager, ConfigStore, DotenvStore, MemoryStore};
pub use session::{Credentials, SessionContext};
pub use upwork::{JobSearchParams, UpworkError};
pub use web::{build_rocket, start_web_server, ServerConfig};
