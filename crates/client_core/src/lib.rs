//! Product catalog synchronization core.
//!
//! Keeps a displayed product list consistent with a remote repository across
//! search, category-filter, sort-order and CRUD operations. The catalog is
//! loaded once (and on explicit refresh) and every criteria change is
//! resolved in memory; mutations go through exactly one repository write and
//! are followed by reconciliation so the visible list reflects the current
//! criteria.

use std::{sync::Arc, time::Duration};

use shared::{
    domain::{CategoryFilter, Product, ProductDraft, ProductId, QueryCriteria, SortOrder},
    error::CatalogError,
    protocol::{HealthResponse, ListProductsQuery},
};
use tokio::sync::{broadcast, Mutex};
use tracing::{info, warn};

pub mod config;
pub mod query;
pub mod repository;

pub use config::{load_settings, Settings};
pub use query::resolve_visible;
pub use repository::{HttpProductRepository, ProductRepository};

/// Notifications for the view layer: a fresh visible snapshot after any
/// successful resolution, or a dismissible failure notice.
#[derive(Debug, Clone)]
pub enum CatalogEvent {
    VisibleChanged(Vec<Product>),
    Error(String),
}

struct CatalogState {
    catalog: Vec<Product>,
    criteria: QueryCriteria,
    refresh_generation: u64,
}

/// Client driving the catalog: owns the cached product list, the active
/// query criteria, and the mutation flow against the repository.
///
/// A single logical caller drives it one operation at a time; all state
/// lives behind one mutex. A failed operation leaves the previously
/// resolved list untouched, so the view never collapses to an erroneous
/// empty state on a transient failure.
pub struct CatalogClient {
    repository: Arc<dyn ProductRepository>,
    inner: Mutex<CatalogState>,
    events: broadcast::Sender<CatalogEvent>,
}

impl CatalogClient {
    pub fn new(repository: Arc<dyn ProductRepository>) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            repository,
            inner: Mutex::new(CatalogState {
                catalog: Vec::new(),
                criteria: QueryCriteria::default(),
                refresh_generation: 0,
            }),
            events,
        })
    }

    /// Convenience constructor over the HTTP adapter.
    pub fn connect(settings: &Settings) -> Result<Arc<Self>, CatalogError> {
        let repository = HttpProductRepository::new(
            &settings.api_base_url,
            Duration::from_secs(settings.request_timeout_seconds),
        )?;
        Ok(Self::new(Arc::new(repository)))
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<CatalogEvent> {
        self.events.subscribe()
    }

    /// Load the complete catalog from the repository and resolve the visible
    /// list under the current criteria.
    ///
    /// Responses are ordered by a generation stamp: if a newer refresh
    /// started while this one was in flight, the slower response is
    /// discarded so an older list can never overwrite a newer one.
    pub async fn refresh(&self) -> Result<Vec<Product>, CatalogError> {
        let generation = {
            let mut inner = self.inner.lock().await;
            inner.refresh_generation += 1;
            inner.refresh_generation
        };

        let fetched = match self.repository.list(&ListProductsQuery::default()).await {
            Ok(products) => products,
            Err(err) => {
                let _ = self.events.send(CatalogEvent::Error(err.to_string()));
                return Err(err);
            }
        };

        let mut inner = self.inner.lock().await;
        if inner.refresh_generation != generation {
            warn!(generation, "discarding stale catalog refresh response");
            return Ok(resolve_visible(&inner.catalog, &inner.criteria));
        }
        info!(count = fetched.len(), "catalog refreshed");
        inner.catalog = fetched;
        let visible = resolve_visible(&inner.catalog, &inner.criteria);
        let _ = self
            .events
            .send(CatalogEvent::VisibleChanged(visible.clone()));
        Ok(visible)
    }

    /// Replace the search term and recompute the visible list in memory.
    /// No network call is issued on a criteria change.
    pub async fn set_search(&self, search: impl Into<String>) -> Vec<Product> {
        let mut inner = self.inner.lock().await;
        inner.criteria.search = search.into();
        self.project(&inner)
    }

    pub async fn set_category(&self, category: CategoryFilter) -> Vec<Product> {
        let mut inner = self.inner.lock().await;
        inner.criteria.category = category;
        self.project(&inner)
    }

    pub async fn set_sort(&self, sort: SortOrder) -> Vec<Product> {
        let mut inner = self.inner.lock().await;
        inner.criteria.sort = sort;
        self.project(&inner)
    }

    pub async fn criteria(&self) -> QueryCriteria {
        self.inner.lock().await.criteria.clone()
    }

    /// Current visible list under the active criteria, from cache only.
    pub async fn visible(&self) -> Vec<Product> {
        let inner = self.inner.lock().await;
        resolve_visible(&inner.catalog, &inner.criteria)
    }

    /// Validate and create a product, then reconcile by re-fetching the
    /// catalog. The new product becomes visible only if it matches the
    /// current criteria.
    pub async fn create(&self, draft: ProductDraft) -> Result<Product, CatalogError> {
        validate_draft(&draft)?;
        let created = self.write(self.repository.create(&draft)).await?;
        info!(id = %created.id, name = %created.name, "product created");
        self.refresh().await?;
        Ok(created)
    }

    /// Validate and update an existing product, then reconcile by re-fetch.
    /// A vanished id surfaces as [`CatalogError::NotFound`].
    pub async fn update(
        &self,
        id: &ProductId,
        draft: ProductDraft,
    ) -> Result<Product, CatalogError> {
        validate_draft(&draft)?;
        let updated = self.write(self.repository.update(id, &draft)).await?;
        info!(id = %updated.id, "product updated");
        self.refresh().await?;
        Ok(updated)
    }

    /// Delete a product and reconcile by patching the cached list. Deleting
    /// an id that is already gone reports `NotFound`, never silence.
    pub async fn delete(&self, id: &ProductId) -> Result<Vec<Product>, CatalogError> {
        self.write(self.repository.delete(id)).await?;
        info!(%id, "product deleted");
        let mut inner = self.inner.lock().await;
        inner.catalog.retain(|product| &product.id != id);
        Ok(self.project(&inner))
    }

    /// Direct read of a single product; does not touch the cache.
    pub async fn get(&self, id: &ProductId) -> Result<Product, CatalogError> {
        self.repository.get(id).await
    }

    pub async fn health(&self) -> Result<HealthResponse, CatalogError> {
        self.repository.health().await
    }

    fn project(&self, inner: &CatalogState) -> Vec<Product> {
        let visible = resolve_visible(&inner.catalog, &inner.criteria);
        let _ = self
            .events
            .send(CatalogEvent::VisibleChanged(visible.clone()));
        visible
    }

    async fn write<T>(
        &self,
        call: impl core::future::Future<Output = Result<T, CatalogError>>,
    ) -> Result<T, CatalogError> {
        match call.await {
            Ok(value) => Ok(value),
            Err(err) => {
                let _ = self.events.send(CatalogEvent::Error(err.to_string()));
                Err(err)
            }
        }
    }
}

/// Input-boundary validation, applied before any network call. Category
/// membership is already enforced by the closed enum, so only name and
/// price need checking here.
fn validate_draft(draft: &ProductDraft) -> Result<(), CatalogError> {
    if draft.name.trim().is_empty() {
        return Err(CatalogError::Validation(
            "product name is required".to_string(),
        ));
    }
    if !draft.price.is_finite() || draft.price <= 0.0 {
        return Err(CatalogError::Validation(
            "price must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
