//! Product listing and text search sources feeding the facet engine.

mod memory;
mod postgres;

pub use memory::InMemoryProductSource;
pub use postgres::PgProductSource;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::Product;
use crate::facets::{SchemaRegistry, TypeFilter};
use crate::Result;

/// `{ "data": [...] }` wrapper used by seed files and listing responses.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProductEnvelope {
    pub data: Vec<Product>,
}

#[async_trait]
pub trait ProductSource: Send + Sync {
    /// Products admitted by `filter`, newest first.
    async fn list(&self, filter: &TypeFilter) -> Result<Vec<Product>>;

    /// Products whose name contains `query` (case-insensitive), newest first.
    async fn search(&self, query: &str) -> Result<Vec<Product>>;
}

/// Log spec bags that disagree with their category schema.
pub(crate) fn report_spec_issues(registry: &SchemaRegistry, products: &[Product]) {
    for product in products {
        let issues = registry.validate(product);
        if !issues.is_empty() {
            tracing::warn!(product_id = %product.id(), category = product.product_type(), ?issues, "product specs do not match schema");
        }
    }
}
