//! Product storage layer
//!
//! Handlers depend on the [`ProductStore`] call contract, not on a concrete
//! pool; the handle is constructed at startup and injected through router
//! state.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::DatabaseConfig;
use crate::types::{NewProduct, Product, ProductPatch};
use crate::Result;

pub mod sql;

pub use sql::SqlStore;

/// Data access contract for the `product` table.
///
/// Update and delete of a missing row fail with
/// [`Error::ProductNotFound`](crate::Error::ProductNotFound), the signal
/// handlers translate into a 404 response.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Insert a row; the store assigns the identifier.
    async fn create(&self, product: NewProduct) -> Result<Product>;

    /// Fetch a row by identifier.
    async fn get(&self, id: i64) -> Result<Option<Product>>;

    /// List rows in ascending identifier order.
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Product>>;

    /// Overlay the present patch fields onto an existing row.
    async fn update(&self, id: i64, patch: ProductPatch) -> Result<Product>;

    /// Remove a row.
    async fn delete(&self, id: i64) -> Result<()>;

    /// Total number of rows.
    async fn count(&self) -> Result<i64>;

    /// Release the underlying connections.
    async fn close(&self);
}

/// Connect the SQL store and prepare its schema.
pub async fn connect(config: &DatabaseConfig) -> Result<Arc<dyn ProductStore>> {
    let store = SqlStore::connect(config).await?;
    store.init_schema().await?;
    Ok(Arc::new(store))
}
