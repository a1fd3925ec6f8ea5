use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Repository-assigned product identifier. Opaque and immutable for the
/// product's whole lifetime; serialized as the `_id` field on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Closed category vocabulary shared by the product form (producer) and the
/// filter control (consumer). One enum, one source of truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Electronics,
    Clothing,
    Books,
    #[serde(rename = "Home & Garden")]
    HomeAndGarden,
    Sports,
    Beauty,
    Toys,
    Automotive,
    Food,
    Furniture,
    Grocery,
    Footwear,
    Other,
}

impl Category {
    pub const ALL: [Category; 13] = [
        Category::Electronics,
        Category::Clothing,
        Category::Books,
        Category::HomeAndGarden,
        Category::Sports,
        Category::Beauty,
        Category::Toys,
        Category::Automotive,
        Category::Food,
        Category::Furniture,
        Category::Grocery,
        Category::Footwear,
        Category::Other,
    ];

    /// Human-readable label, identical to the wire representation.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Electronics => "Electronics",
            Category::Clothing => "Clothing",
            Category::Books => "Books",
            Category::HomeAndGarden => "Home & Garden",
            Category::Sports => "Sports",
            Category::Beauty => "Beauty",
            Category::Toys => "Toys",
            Category::Automotive => "Automotive",
            Category::Food => "Food",
            Category::Furniture => "Furniture",
            Category::Grocery => "Grocery",
            Category::Footwear => "Footwear",
            Category::Other => "Other",
        }
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown category '{0}'")]
pub struct UnknownCategory(pub String);

impl core::str::FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .iter()
            .copied()
            .find(|category| category.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownCategory(wanted.to_string()))
    }
}

/// Category criterion: either every category or exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => *wanted == category,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl core::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("sort order must be 'asc' or 'desc', got '{0}'")]
pub struct UnknownSortOrder(pub String);

impl core::str::FromStr for SortOrder {
    type Err = UnknownSortOrder;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(UnknownSortOrder(other.to_string())),
        }
    }
}

/// The tuple of search term, category filter and sort order that determines
/// the visible product subset. Sort key is fixed to price.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryCriteria {
    pub search: String,
    pub category: CategoryFilter,
    pub sort: SortOrder,
}

/// Catalog entity. The repository is the sole source of truth; any local
/// copy is a cache that is stale after a mutation until re-synchronized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        rename = "createdAt",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        rename = "updatedAt",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Candidate product without an id, used for create and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub price: f64,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
