// src/web/handlers/job_handlers.rs
use crate::session::SessionContext;
use crate::types::{Category, JobSearchResult};
use crate::upwork;
use crate::web::types::{ApiError, JobSearchRequest};

use rocket::serde::json::Json;
use rocket::State;
use std::sync::Arc;
use tracing::info;

pub async fn fetch_jobs_handler(
    request: Json<JobSearchRequest>,
    session: &State<Arc<SessionContext>>,
) -> Result<Json<JobSearchResult>, ApiError> {
    let params = request.into_inner().into_params()?;
    info!(
        "Job search requested (filter: {:?}, first: {})",
        params.filter(),
        params.first
    );

    let result = upwork::search_jobs(session, &params).await?;
    Ok(Json(result))
}

pub async fn categories_handler(
    session: &State<Arc<SessionContext>>,
) -> Result<Json<Vec<Category>>, ApiError> {
    let categories = upwork::list_categories(session).await?;
    Ok(Json(categories))
}
