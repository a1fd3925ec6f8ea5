use serde::{Deserialize, Serialize};

use crate::domain::{CategoryFilter, QueryCriteria};

/// Response envelope the repository wraps every successful payload in:
/// `{ success, count?, message?, data? }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: serde::de::DeserializeOwned"))]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Error body shape used by every non-2xx repository response:
/// `{ success: false, message, stack? }`. The stack trace is only present on
/// non-production deployments and is never required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

/// Query-string parameters accepted by `GET /products`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListProductsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
}

impl ListProductsQuery {
    /// Wire form of a criteria tuple: empty search and the All sentinel are
    /// omitted entirely, sort key is fixed to price.
    pub fn from_criteria(criteria: &QueryCriteria) -> Self {
        let search = criteria.search.trim();
        Self {
            search: (!search.is_empty()).then(|| search.to_string()),
            category: match criteria.category {
                CategoryFilter::All => None,
                CategoryFilter::Only(category) => Some(category.label().to_string()),
            },
            sort: Some("price".to_string()),
            order: Some(criteria.sort.as_str().to_string()),
        }
    }
}

/// Payload of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: String,
    pub environment: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, Product, SortOrder};

    #[test]
    fn envelope_with_product_list_round_trips() {
        let raw = r#"{
            "success": true,
            "count": 1,
            "data": [{"_id": "p1", "name": "Pen", "price": 2.5, "category": "Other"}]
        }"#;
        let envelope: ApiEnvelope<Vec<Product>> = serde_json::from_str(raw).expect("deserialize");
        assert!(envelope.success);
        assert_eq!(envelope.count, Some(1));
        assert_eq!(envelope.data.expect("data").len(), 1);
    }

    #[test]
    fn envelope_tolerates_missing_data_for_any_payload_type() {
        let raw = r#"{"success": false, "message": "Server Error"}"#;
        let envelope: ApiEnvelope<Product> = serde_json::from_str(raw).expect("deserialize");
        assert!(!envelope.success);
        assert!(envelope.data.is_none());
    }

    #[test]
    fn error_body_tolerates_missing_stack() {
        let raw = r#"{"success": false, "message": "Product not found"}"#;
        let body: ErrorBody = serde_json::from_str(raw).expect("deserialize");
        assert!(!body.success);
        assert_eq!(body.message, "Product not found");
        assert_eq!(body.stack, None);
    }

    #[test]
    fn default_criteria_serialize_to_sort_params_only() {
        let query = ListProductsQuery::from_criteria(&QueryCriteria::default());
        assert_eq!(query.search, None);
        assert_eq!(query.category, None);
        assert_eq!(query.sort.as_deref(), Some("price"));
        assert_eq!(query.order.as_deref(), Some("asc"));
    }

    #[test]
    fn full_criteria_serialize_every_param() {
        let criteria = QueryCriteria {
            search: "  desk ".to_string(),
            category: CategoryFilter::Only(Category::Furniture),
            sort: SortOrder::Desc,
        };
        let query = ListProductsQuery::from_criteria(&criteria);
        assert_eq!(query.search.as_deref(), Some("desk"));
        assert_eq!(query.category.as_deref(), Some("Furniture"));
        assert_eq!(query.order.as_deref(), Some("desc"));
    }
}
