// src/web/handlers/auth_handlers.rs
use crate::session::SessionContext;
use crate::web::types::{ApiError, AuthStatusResponse, ServerConfig};

use rocket::response::Redirect;
use rocket::serde::json::Json;
use rocket::State;
use std::sync::Arc;
use tracing::{error, info, warn};

pub async fn login_handler(session: &State<Arc<SessionContext>>) -> Result<Redirect, ApiError> {
    let missing = session.settings().missing_fields();
    if !missing.is_empty() {
        return Err(ApiError::MissingCredentials(format!(
            "OAuth client is not configured: {}",
            missing.join(", ")
        )));
    }

    info!("Redirecting user to Upwork for authorization");
    Ok(Redirect::temporary(session.authorization_url().to_string()))
}

/// Always answers with a redirect to the front end, success or not.
pub async fn oauth_callback_handler(
    code: Option<String>,
    session: &State<Arc<SessionContext>>,
    config: &State<ServerConfig>,
) -> Redirect {
    let Some(code) = code.filter(|c| !c.is_empty()) else {
        warn!("OAuth callback received without an authorization code");
        return Redirect::temporary(config.auth_error_redirect("Missing_authorization_code"));
    };

    info!("Received OAuth callback from Upwork");

    match session.exchange_code(&code).await {
        Ok(()) => {
            info!("Upwork authorization completed");
            Redirect::temporary(config.auth_success_redirect())
        }
        Err(e) => {
            error!("Error obtaining tokens from Upwork: {}", e);
            Redirect::temporary(config.auth_error_redirect(&e.redirect_message()))
        }
    }
}

pub async fn auth_status_handler(session: &State<Arc<SessionContext>>) -> Json<AuthStatusResponse> {
    let authenticated = session.is_authenticated().await;
    info!("Auth status check: {}", authenticated);
    Json(AuthStatusResponse { authenticated })
}
