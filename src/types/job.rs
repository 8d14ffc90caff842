// src/types/job.rs
use serde::{Deserialize, Serialize};

/// Flat projection of one upstream job posting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub title: Option<String>,
    pub id: Option<String>,
    pub ciphertext: Option<String>,
    pub url: Option<String>,
    pub snippet: Option<String>,
    pub skills: Vec<String>,
    pub date_created: Option<String>,
    pub category2: Option<String>,
    pub subcategory2: Option<String>,
    pub job_type: Option<String>,
    pub workload: Option<String>,
    pub duration: Option<String>,
    pub rate: Option<String>,
    pub client: ClientSummary,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientSummary {
    pub country: Option<String>,
    pub feedback: Option<f64>,
    pub jobs_posted: Option<u64>,
    pub past_hires: Option<u64>,
    pub payment_verification_status: Option<String>,
    pub reviews_count: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PagingInfo {
    pub total: Option<u64>,
    pub next_cursor: Option<String>,
    pub has_next_page: Option<bool>,
}

impl PagingInfo {
    /// Paging for a result that carries no jobs
    pub fn empty() -> Self {
        Self {
            total: Some(0),
            next_cursor: None,
            has_next_page: Some(false),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSearchResult {
    pub jobs: Vec<JobRecord>,
    pub paging: PagingInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JobSearchResult {
    /// Well-formed empty result carrying an upstream error message
    pub fn degraded(message: impl Into<String>) -> Self {
        Self {
            jobs: Vec::new(),
            paging: PagingInfo::empty(),
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub label: String,
}
