// src/upwork/categories.rs
use super::client::UpworkClient;
use super::error::UpworkError;
use crate::types::response::{GraphQlResponse, OntologyCategoriesData, OntologyCategory};
use crate::types::Category;
use tracing::{info, warn};

const ONTOLOGY_CATEGORIES_QUERY: &str =
    "query ontologyCategories { ontologyCategories { id preferredLabel } }";

/// Top-level job categories usable as `category_ids` filters.
pub async fn fetch_categories(
    client: &UpworkClient,
    tenant_id: &str,
) -> Result<Vec<Category>, UpworkError> {
    let response: GraphQlResponse<OntologyCategoriesData> = client
        .graphql(
            "ontologyCategories",
            ONTOLOGY_CATEGORIES_QUERY,
            None,
            Some(tenant_id),
        )
        .await?;

    if let Some(message) = response.first_error() {
        warn!("ontologyCategories returned errors: {}", message);
        return Err(UpworkError::GraphQl(message));
    }

    let raw = response
        .data
        .and_then(|data| data.ontology_categories)
        .ok_or_else(|| UpworkError::Decode("ontologyCategories missing from response".to_string()))?;

    let categories = to_categories(raw);
    info!("Fetched {} job categories", categories.len());
    Ok(categories)
}

fn to_categories(raw: Vec<OntologyCategory>) -> Vec<Category> {
    raw.into_iter()
        .filter_map(|category| match (category.id, category.preferred_label) {
            (Some(id), Some(label)) if !id.is_empty() && !label.is_empty() => {
                Some(Category { id, label })
            }
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incomplete_categories_are_dropped() {
        let raw = vec![
            OntologyCategory {
                id: Some("531770282580668418".to_string()),
                preferred_label: Some("Web, Mobile & Software Dev".to_string()),
            },
            OntologyCategory {
                id: None,
                preferred_label: Some("Orphan".to_string()),
            },
            OntologyCategory {
                id: Some("531770282580668420".to_string()),
                preferred_label: None,
            },
        ];

        assert_eq!(
            to_categories(raw),
            vec![Category {
                id: "531770282580668418".to_string(),
                label: "Web, Mobile & Software Dev".to_string(),
            }]
        );
    }
}
