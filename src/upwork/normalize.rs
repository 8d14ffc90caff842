// src/upwork/normalize.rs
//! Flattens marketplaceJobPostingsSearch edges into `JobRecord`s

use crate::types::response::{GraphQlResponse, JobEdge, JobNode, JobSearchData, Money};
use crate::types::{ClientSummary, JobRecord, JobSearchResult, PagingInfo};
use serde_json::Value;
use tracing::warn;

pub const JOB_URL_BASE: &str = "https://www.upwork.com/jobs/";

pub fn normalize_search_response(response: GraphQlResponse<JobSearchData>) -> JobSearchResult {
    if let Some(message) = response.first_error() {
        warn!("GraphQL job search failed with errors: {}", message);
        return JobSearchResult::degraded(message);
    }

    let Some(search) = response
        .data
        .and_then(|data| data.marketplace_job_postings_search)
    else {
        warn!("GraphQL job search executed but marketplaceJobPostingsSearch is null or missing");
        return JobSearchResult::degraded("Upstream returned no job search results");
    };

    let jobs = search
        .edges
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .filter_map(|(index, edge)| normalize_edge(index, edge))
        .collect();

    let page_info = search.page_info.unwrap_or_default();

    JobSearchResult {
        jobs,
        paging: PagingInfo {
            total: search.total_count,
            next_cursor: page_info.end_cursor,
            has_next_page: page_info.has_next_page,
        },
        error: None,
    }
}

/// Decode a single raw edge. An edge that does not decode is skipped so its
/// siblings survive; a missing node yields an all-null record.
pub fn normalize_edge(index: usize, edge: Value) -> Option<JobRecord> {
    match serde_json::from_value::<JobEdge>(edge) {
        Ok(edge) => Some(normalize_node(edge.node.unwrap_or_default())),
        Err(e) => {
            warn!("Skipping malformed job edge at position {}: {}", index, e);
            None
        }
    }
}

pub fn normalize_node(node: JobNode) -> JobRecord {
    let contract_terms = node.job.and_then(|job| job.contract_terms).unwrap_or_default();
    let client = node.client.unwrap_or_default();
    let location = client.location.unwrap_or_default();

    let skills = node
        .skills
        .unwrap_or_default()
        .into_iter()
        .flatten()
        .filter_map(|skill| skill.name)
        .filter(|name| !name.is_empty())
        .collect();

    let url = node
        .ciphertext
        .as_ref()
        .map(|ciphertext| format!("{}{}", JOB_URL_BASE, ciphertext));

    let rate = format_rate(node.hourly_budget.as_ref(), node.amount.as_ref());

    JobRecord {
        title: node.title,
        id: node.ciphertext.clone(),
        ciphertext: node.ciphertext,
        url,
        snippet: node.description,
        skills,
        date_created: node.created_date_time,
        category2: node.category,
        subcategory2: node.subcategory,
        job_type: contract_terms.contract_type,
        workload: None,
        duration: node.duration,
        rate,
        client: ClientSummary {
            country: location.country,
            feedback: client.total_feedback,
            jobs_posted: client.total_posted_jobs,
            past_hires: client.total_hires,
            payment_verification_status: client.verification_status,
            reviews_count: client.total_reviews,
        },
    }
}

/// Hourly budget wins over a fixed amount.
fn format_rate(hourly_budget: Option<&Money>, amount: Option<&Money>) -> Option<String> {
    if let Some(hourly) = hourly_budget.and_then(format_money) {
        return Some(format!("{}/hr", hourly));
    }
    amount.and_then(format_money)
}

fn format_money(money: &Money) -> Option<String> {
    let amount = money.amount?;
    let rendered = format_amount(amount);
    match money.currency_code.as_deref().filter(|c| !c.is_empty()) {
        Some(currency) => Some(format!("{} {}", rendered, currency)),
        None => Some(rendered),
    }
}

fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{:.1}", amount)
    } else {
        amount.to_string()
    }
}
