// src/types/response.rs
//! Upstream GraphQL response shapes. Every nested object is optional so a
//! partial node deserializes instead of failing.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    pub errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlError {
    pub message: Option<String>,
}

impl<T> GraphQlResponse<T> {
    /// Message of the first upstream error, if the response carries an `errors` array.
    pub fn first_error(&self) -> Option<String> {
        self.errors.as_ref().map(|errors| {
            errors
                .iter()
                .find_map(|e| e.message.clone())
                .unwrap_or_else(|| "Upstream GraphQL request failed".to_string())
        })
    }
}

// ===== companySelector =====

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanySelectorData {
    pub company_selector: Option<CompanySelector>,
}

#[derive(Debug, Deserialize)]
pub struct CompanySelector {
    pub items: Option<Vec<CompanyItem>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyItem {
    pub title: Option<String>,
    pub organization_id: Option<String>,
}

// ===== ontologyCategories =====

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OntologyCategoriesData {
    pub ontology_categories: Option<Vec<OntologyCategory>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OntologyCategory {
    pub id: Option<String>,
    pub preferred_label: Option<String>,
}

// ===== marketplaceJobPostingsSearch =====

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSearchData {
    pub marketplace_job_postings_search: Option<JobSearchConnection>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSearchConnection {
    pub total_count: Option<u64>,
    /// Kept raw so each edge is decoded on its own.
    pub edges: Option<Vec<serde_json::Value>>,
    pub page_info: Option<PageInfo>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub end_cursor: Option<String>,
    pub has_next_page: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct JobEdge {
    pub node: Option<JobNode>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobNode {
    pub title: Option<String>,
    pub ciphertext: Option<String>,
    pub description: Option<String>,
    pub skills: Option<Vec<Option<SkillNode>>>,
    pub created_date_time: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub job: Option<JobDetails>,
    pub client: Option<ClientNode>,
    pub duration: Option<String>,
    pub amount: Option<Money>,
    pub hourly_budget: Option<Money>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SkillNode {
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDetails {
    pub contract_terms: Option<ContractTerms>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractTerms {
    pub contract_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientNode {
    pub location: Option<ClientLocation>,
    pub total_feedback: Option<f64>,
    pub total_posted_jobs: Option<u64>,
    pub total_hires: Option<u64>,
    pub verification_status: Option<String>,
    pub total_reviews: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ClientLocation {
    pub country: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    pub amount: Option<f64>,
    pub currency_code: Option<String>,
}
