mod common;

use common::*;
use opportunity_matcher::core::MemoryStore;
use rocket::http::{ContentType, Status};
use rocket::local::asynchronous::Client;
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn search_mock() -> wiremock::MockBuilder {
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("marketplaceJobPostingsSearch"))
}

async fn post_jobs(client: &Client, body: Value) -> (Status, Value) {
    let response = client
        .post("/jobs/fetch")
        .header(ContentType::JSON)
        .body(body.to_string())
        .dispatch()
        .await;
    let status = response.status();
    let body = response.into_json::<Value>().await.unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn keyword_search_end_to_end() {
    let server = MockServer::start().await;
    company_selector_mock(&["org-1"]).expect(1).mount(&server).await;
    search_mock()
        .and(header("authorization", "Bearer test-access"))
        .and(header("X-Upwork-API-TenantId", "org-1"))
        .and(body_partial_json(json!({
            "variables": {
                "searchType": "USER_JOBS_SEARCH",
                "sortAttributes": [{ "field": "RECENCY" }],
                "marketPlaceJobFilter": {
                    "searchExpression_eq": "logo design",
                    "pagination_eq": { "first": 50, "after": "0" }
                }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "marketplaceJobPostingsSearch": {
                    "totalCount": 1,
                    "edges": [{
                        "node": {
                            "title": "Logo Designer Needed",
                            "ciphertext": "abc123",
                            "description": "Need a modern logo",
                            "skills": [{ "name": "Logo Design" }, { "name": null }],
                            "createdDateTime": "2024-05-01T10:00:00Z",
                            "category": "Design & Creative",
                            "subcategory": "Graphic Design",
                            "job": { "contractTerms": { "contractType": "FIXED" } },
                            "client": {
                                "totalFeedback": 4.8,
                                "totalPostedJobs": 12,
                                "totalHires": 7,
                                "verificationStatus": "VERIFIED",
                                "totalReviews": 5
                            },
                            "duration": "Less than 1 month",
                            "amount": { "amount": 250, "currencyCode": "USD" }
                        }
                    }],
                    "pageInfo": { "endCursor": "cursor-1", "hasNextPage": false }
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(session(&server, authenticated_store()).await).await;
    let (status, body) = post_jobs(&client, json!({ "query": "logo design" })).await;

    assert_eq!(status, Status::Ok);
    let job = &body["jobs"][0];
    assert_eq!(job["title"], json!("Logo Designer Needed"));
    assert_eq!(job["id"], json!("abc123"));
    assert_eq!(job["ciphertext"], json!("abc123"));
    assert_eq!(job["url"], json!("https://www.upwork.com/jobs/abc123"));
    assert_eq!(job["skills"], json!(["Logo Design"]));
    assert_eq!(job["job_type"], json!("FIXED"));
    assert_eq!(job["rate"], json!("250.0 USD"));
    assert_eq!(job["workload"], Value::Null);
    assert_eq!(job["client"]["country"], Value::Null);
    assert_eq!(job["client"]["jobs_posted"], json!(12));
    assert_eq!(
        body["paging"],
        json!({ "total": 1, "next_cursor": "cursor-1", "has_next_page": false })
    );
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn request_without_criteria_sends_empty_filter() {
    let server = MockServer::start().await;
    company_selector_mock(&["org-1"]).mount(&server).await;
    search_mock()
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "marketplaceJobPostingsSearch": { "totalCount": 0, "edges": [] } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(session(&server, authenticated_store()).await).await;
    let (status, _) = post_jobs(&client, json!({ "first": 10, "after": "abc" })).await;
    assert_eq!(status, Status::Ok);

    let requests = server.received_requests().await.unwrap();
    let search_request = requests
        .iter()
        .find(|r| String::from_utf8_lossy(&r.body).contains("marketplaceJobPostingsSearch"))
        .unwrap();
    let sent: Value = serde_json::from_slice(&search_request.body).unwrap();
    assert_eq!(sent["variables"]["marketPlaceJobFilter"], json!({}));
}

#[tokio::test]
async fn graphql_errors_yield_degraded_result() {
    let server = MockServer::start().await;
    company_selector_mock(&["org-1"]).mount(&server).await;
    search_mock()
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [{ "message": "Filter combination not supported" }]
        })))
        .mount(&server)
        .await;

    let client = client(session(&server, authenticated_store()).await).await;
    let (status, body) = post_jobs(&client, json!({ "locations": ["USA"] })).await;

    assert_eq!(status, Status::Ok);
    assert_eq!(body["jobs"], json!([]));
    assert_eq!(
        body["paging"],
        json!({ "total": 0, "next_cursor": null, "has_next_page": false })
    );
    assert_eq!(body["error"], json!("Filter combination not supported"));
}

#[tokio::test]
async fn null_search_result_yields_degraded_result() {
    let server = MockServer::start().await;
    company_selector_mock(&["org-1"]).mount(&server).await;
    search_mock()
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "marketplaceJobPostingsSearch": null }
        })))
        .mount(&server)
        .await;

    let client = client(session(&server, authenticated_store()).await).await;
    let (status, body) = post_jobs(&client, json!({ "query": "rust" })).await;

    assert_eq!(status, Status::Ok);
    assert_eq!(body["jobs"], json!([]));
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn upstream_http_failure_is_service_unavailable() {
    let server = MockServer::start().await;
    company_selector_mock(&["org-1"]).mount(&server).await;
    search_mock()
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client(session(&server, authenticated_store()).await).await;
    let (status, body) = post_jobs(&client, json!({ "query": "rust" })).await;

    assert_eq!(status, Status::ServiceUnavailable);
    assert_eq!(body["error_code"], json!("UPSTREAM_UNAVAILABLE"));
    assert_eq!(body["type"], json!("error"));
}

#[tokio::test]
async fn tenant_resolution_failure_is_service_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("companySelector"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    search_mock()
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client(session(&server, authenticated_store()).await).await;
    let (status, _) = post_jobs(&client, json!({ "query": "rust" })).await;

    assert_eq!(status, Status::ServiceUnavailable);
}

#[tokio::test]
async fn missing_credentials_are_unauthorized_without_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client(session(&server, Arc::new(MemoryStore::new())).await).await;

    let (status, body) = post_jobs(&client, json!({ "query": "rust" })).await;
    assert_eq!(status, Status::Unauthorized);
    assert_eq!(body["error_code"], json!("MISSING_CREDENTIALS"));

    let response = client.get("/filters/categories").dispatch().await;
    assert_eq!(response.status(), Status::Unauthorized);
}

#[tokio::test]
async fn zero_page_size_is_rejected() {
    let server = MockServer::start().await;
    let client = client(session(&server, authenticated_store()).await).await;

    let (status, body) = post_jobs(&client, json!({ "query": "rust", "first": 0 })).await;
    assert_eq!(status, Status::BadRequest);
    assert_eq!(body["error_code"], json!("BAD_REQUEST"));
}

#[tokio::test]
async fn categories_are_listed_with_tenant_header() {
    let server = MockServer::start().await;
    company_selector_mock(&["org-7"]).mount(&server).await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("ontologyCategories"))
        .and(header("X-Upwork-API-TenantId", "org-7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "ontologyCategories": [
                    { "id": "531770282580668418", "preferredLabel": "Web, Mobile & Software Dev" },
                    { "id": "531770282580668420", "preferredLabel": "Design & Creative" },
                    { "id": null, "preferredLabel": "Broken" }
                ]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(session(&server, authenticated_store()).await).await;
    let response = client.get("/filters/categories").dispatch().await;

    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(
        body,
        json!([
            { "id": "531770282580668418", "label": "Web, Mobile & Software Dev" },
            { "id": "531770282580668420", "label": "Design & Creative" }
        ])
    );
}

#[tokio::test]
async fn category_graphql_errors_are_service_unavailable() {
    let server = MockServer::start().await;
    company_selector_mock(&["org-7"]).mount(&server).await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("ontologyCategories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{ "message": "Permission denied" }]
        })))
        .mount(&server)
        .await;

    let client = client(session(&server, authenticated_store()).await).await;
    let response = client.get("/filters/categories").dispatch().await;

    assert_eq!(response.status(), Status::ServiceUnavailable);
}

#[tokio::test]
async fn health_and_cors() {
    let server = MockServer::start().await;
    let client = client(session(&server, Arc::new(MemoryStore::new())).await).await;

    let response = client.get("/healthz").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    assert_eq!(
        response.headers().get_one("Access-Control-Allow-Origin"),
        Some("*")
    );
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body, json!({ "status": "ok" }));

    let preflight = client.options("/jobs/fetch").dispatch().await;
    assert_eq!(preflight.status(), Status::Ok);

    let missing = client.get("/nope").dispatch().await;
    assert_eq!(missing.status(), Status::NotFound);
    let body: Value = missing.into_json().await.unwrap();
    assert_eq!(body["error_code"], json!("NOT_FOUND"));
}
