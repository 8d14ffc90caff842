// src/upwork/search.rs
//! marketplaceJobPostingsSearch: filter construction and execution

use super::client::UpworkClient;
use super::error::UpworkError;
use super::normalize::normalize_search_response;
use crate::types::response::{GraphQlResponse, JobSearchData};
use crate::types::JobSearchResult;
use serde_json::{json, Map, Value};
use tracing::info;

pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Cursor the platform expects for the first page
pub const FIRST_PAGE_CURSOR: &str = "0";

pub const SEARCH_TYPE: &str = "USER_JOBS_SEARCH";

const SEARCH_QUERY: &str = r#"
query marketplaceJobPostingsSearch(
    $marketPlaceJobFilter: MarketplaceJobPostingsSearchFilter,
    $searchType: MarketplaceJobPostingSearchType,
    $sortAttributes: [MarketplaceJobPostingSearchSortAttribute]
) {
    marketplaceJobPostingsSearch(
        marketPlaceJobFilter: $marketPlaceJobFilter,
        searchType: $searchType,
        sortAttributes: $sortAttributes
    ) {
        totalCount
        edges {
            node {
                title
                ciphertext
                description
                skills { name }
                createdDateTime
                category
                subcategory
                job { contractTerms { contractType } }
                client {
                    location { country }
                    totalFeedback
                    totalPostedJobs
                    totalHires
                    verificationStatus
                    totalReviews
                }
                duration
                amount { amount currencyCode }
                hourlyBudget { amount currencyCode }
            }
        }
        pageInfo { endCursor hasNextPage }
    }
}
"#;

#[derive(Debug, Clone, PartialEq)]
pub struct JobSearchParams {
    pub query: Option<String>,
    pub category_ids: Option<Vec<String>>,
    pub locations: Option<Vec<String>>,
    pub first: u32,
    pub after: Option<String>,
}

impl Default for JobSearchParams {
    fn default() -> Self {
        Self {
            query: None,
            category_ids: None,
            locations: None,
            first: DEFAULT_PAGE_SIZE,
            after: None,
        }
    }
}

/// The single filter clause sent upstream. Combining clauses makes the
/// platform fail with 500s, so only the highest-precedence one is used:
/// locations, then keyword, then categories.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchFilter {
    Locations(Vec<String>),
    Keyword(String),
    Categories(Vec<String>),
    Unfiltered,
}

impl JobSearchParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_category_ids(mut self, ids: Vec<String>) -> Self {
        self.category_ids = Some(ids);
        self
    }

    pub fn with_locations(mut self, locations: Vec<String>) -> Self {
        self.locations = Some(locations);
        self
    }

    pub fn with_first(mut self, first: u32) -> Self {
        self.first = first;
        self
    }

    pub fn with_after(mut self, after: impl Into<String>) -> Self {
        self.after = Some(after.into());
        self
    }

    pub fn filter(&self) -> SearchFilter {
        if let Some(locations) = non_blank(&self.locations) {
            return SearchFilter::Locations(locations);
        }
        // Blank keywords count as absent, others go upstream verbatim.
        if let Some(query) = self.query.as_deref().filter(|q| !q.trim().is_empty()) {
            return SearchFilter::Keyword(query.to_string());
        }
        if let Some(category_ids) = non_blank(&self.category_ids) {
            return SearchFilter::Categories(category_ids);
        }
        SearchFilter::Unfiltered
    }
}

fn non_blank(values: &Option<Vec<String>>) -> Option<Vec<String>> {
    let values: Vec<String> = values
        .iter()
        .flatten()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect();
    (!values.is_empty()).then_some(values)
}

/// `marketPlaceJobFilter` value. The unfiltered call is an empty object with
/// no pagination, the only shape the platform accepts without a clause.
pub fn build_marketplace_filter(params: &JobSearchParams) -> Value {
    let mut filter = Map::new();

    match params.filter() {
        SearchFilter::Unfiltered => return Value::Object(filter),
        SearchFilter::Locations(locations) => {
            filter.insert("locations_any".to_string(), json!(locations));
        }
        SearchFilter::Keyword(query) => {
            filter.insert("searchExpression_eq".to_string(), json!(query));
        }
        SearchFilter::Categories(category_ids) => {
            filter.insert("categoryIds_any".to_string(), json!(category_ids));
        }
    }

    filter.insert(
        "pagination_eq".to_string(),
        json!({
            "first": params.first,
            "after": params.after.as_deref().unwrap_or(FIRST_PAGE_CURSOR),
        }),
    );

    Value::Object(filter)
}

pub fn build_search_variables(params: &JobSearchParams) -> Value {
    json!({
        "searchType": SEARCH_TYPE,
        "sortAttributes": [{ "field": "RECENCY" }],
        "marketPlaceJobFilter": build_marketplace_filter(params),
    })
}

/// Run the search. Transport, HTTP and decoding failures become
/// `UpworkError::SearchFailed`; GraphQL-level errors yield a degraded result.
pub async fn execute_search(
    client: &UpworkClient,
    tenant_id: &str,
    params: &JobSearchParams,
) -> Result<JobSearchResult, UpworkError> {
    let variables = build_search_variables(params);

    match params.filter() {
        SearchFilter::Unfiltered => info!("Executing unfiltered GraphQL job search"),
        filter => info!("Executing filtered GraphQL job search: {:?}", filter),
    }

    let response: GraphQlResponse<JobSearchData> = client
        .graphql(
            "marketplaceJobPostingsSearch",
            SEARCH_QUERY,
            Some(variables),
            Some(tenant_id),
        )
        .await
        .map_err(|e| UpworkError::SearchFailed(Box::new(e)))?;

    let result = normalize_search_response(response);
    info!(
        "Found {} jobs via GraphQL (total matching: {:?})",
        result.jobs.len(),
        result.paging.total
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locations_take_precedence_over_query_and_categories() {
        let params = JobSearchParams::new()
            .with_query("python")
            .with_category_ids(vec!["531770282580668418".to_string()])
            .with_locations(vec!["USA".to_string()]);

        let filter = build_marketplace_filter(&params);
        assert_eq!(
            filter,
            json!({
                "locations_any": ["USA"],
                "pagination_eq": { "first": 50, "after": "0" },
            })
        );
    }

    #[test]
    fn test_query_takes_precedence_over_categories() {
        let params = JobSearchParams::new()
            .with_query("logo design")
            .with_category_ids(vec!["cat-1".to_string()]);

        let filter = build_marketplace_filter(&params);
        assert_eq!(filter["searchExpression_eq"], json!("logo design"));
        assert!(filter.get("categoryIds_any").is_none());
    }

    #[test]
    fn test_query_is_sent_untrimmed() {
        let params = JobSearchParams::new().with_query("  logo design ");
        assert_eq!(
            params.filter(),
            SearchFilter::Keyword("  logo design ".to_string())
        );
        assert_eq!(
            build_marketplace_filter(&params)["searchExpression_eq"],
            json!("  logo design ")
        );
    }

    #[test]
    fn test_categories_alone() {
        let params = JobSearchParams::new()
            .with_category_ids(vec!["cat-1".to_string(), "cat-2".to_string()])
            .with_first(20)
            .with_after("cursor-abc");

        assert_eq!(
            build_marketplace_filter(&params),
            json!({
                "categoryIds_any": ["cat-1", "cat-2"],
                "pagination_eq": { "first": 20, "after": "cursor-abc" },
            })
        );
    }

    #[test]
    fn test_no_criteria_sends_empty_filter_without_pagination() {
        let params = JobSearchParams::new().with_first(10).with_after("ignored");
        assert_eq!(build_marketplace_filter(&params), json!({}));
    }

    #[test]
    fn test_blank_criteria_count_as_absent() {
        let params = JobSearchParams {
            query: Some("   ".to_string()),
            category_ids: Some(vec![]),
            locations: Some(vec!["".to_string()]),
            ..JobSearchParams::default()
        };
        assert_eq!(params.filter(), SearchFilter::Unfiltered);
        assert_eq!(build_marketplace_filter(&params), json!({}));
    }

    #[test]
    fn test_variables_always_sort_by_recency() {
        let variables = build_search_variables(&JobSearchParams::new().with_query("rust"));
        assert_eq!(variables["searchType"], json!("USER_JOBS_SEARCH"));
        assert_eq!(variables["sortAttributes"], json!([{ "field": "RECENCY" }]));
        assert_eq!(
            variables["marketPlaceJobFilter"]["pagination_eq"],
            json!({ "first": 50, "after": "0" })
        );
    }
}
