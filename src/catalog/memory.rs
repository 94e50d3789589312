use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tracing::instrument;

use super::{report_spec_issues, ProductEnvelope, ProductSource};
use crate::domain::Product;
use crate::facets::{SchemaRegistry, TypeFilter};
use crate::{CatalogError, Result};

/// Fixed product list held in memory, newest first.
#[derive(Clone, Debug, Default)]
pub struct InMemoryProductSource {
    products: Arc<Vec<Product>>,
}

impl InMemoryProductSource {
    /// Products are reordered newest first by `created_at`; ties keep their order.
    pub fn new(mut products: Vec<Product>) -> Self {
        products.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Self { products: Arc::new(products) }
    }

    /// Load a `{ "data": [...] }` seed file.
    pub fn from_seed_file(path: &Path, registry: &SchemaRegistry) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| CatalogError::Seed(format!("{}: {e}", path.display())))?;
        let envelope: ProductEnvelope = serde_json::from_str(&raw)
            .map_err(|e| CatalogError::Seed(format!("{}: {e}", path.display())))?;
        report_spec_issues(registry, &envelope.data);
        tracing::info!(path = %path.display(), products = envelope.data.len(), "loaded catalog seed");
        Ok(Self::new(envelope.data))
    }

    pub fn len(&self) -> usize { self.products.len() }
    pub fn is_empty(&self) -> bool { self.products.is_empty() }
}

#[async_trait]
impl ProductSource for InMemoryProductSource {
    #[instrument(skip(self))]
    async fn list(&self, filter: &TypeFilter) -> Result<Vec<Product>> {
        Ok(self.products.iter().filter(|p| filter.admits(p)).cloned().collect())
    }

    #[instrument(skip(self))]
    async fn search(&self, query: &str) -> Result<Vec<Product>> {
        let needle = query.trim().to_lowercase();
        Ok(self.products.iter().filter(|p| p.name().to_lowercase().contains(&needle)).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Money;

    fn source() -> InMemoryProductSource {
        InMemoryProductSource::new(vec![
            Product::create("ram", "Kingston Fury Beast 16GB", Money::default()).unwrap(),
            Product::create("cpu", "AMD Ryzen 7 7700X", Money::default()).unwrap(),
            Product::create("ram", "Corsair Vengeance RGB 32GB", Money::default()).unwrap(),
        ])
    }

    #[tokio::test]
    async fn test_list_by_type() {
        let ram = source().list(&TypeFilter::parse(Some("ram"))).await.unwrap();
        assert_eq!(ram.len(), 2);
        assert_eq!(source().list(&TypeFilter::All).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let all = source().list(&TypeFilter::All).await.unwrap();
        assert!(all.windows(2).all(|w| w[0].created_at() >= w[1].created_at()));
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_substring() {
        let hits = source().search("  fury ").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name(), "Kingston Fury Beast 16GB");
        assert!(source().search("intel").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_bundled_seed_loads_newest_first() {
        let path = Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/seed/catalog.json"));
        let source = InMemoryProductSource::from_seed_file(path, SchemaRegistry::builtin()).unwrap();
        assert_eq!(source.len(), 7);
        let ram = source.list(&TypeFilter::parse(Some("ram"))).await.unwrap();
        let names: Vec<&str> = ram.iter().map(Product::name).collect();
        assert_eq!(names, ["G.Skill Trident Z5 32GB DDR5", "Kingston Fury Beast 16GB DDR4", "Corsair Vengeance 8GB DDR4"]);
        assert!(ram.iter().all(|p| SchemaRegistry::builtin().validate(p).is_empty()));
    }

    #[test]
    fn test_seed_file_errors_are_reported() {
        let missing = Path::new("/nonexistent/catalog-seed.json");
        let err = InMemoryProductSource::from_seed_file(missing, SchemaRegistry::builtin()).unwrap_err();
        assert!(matches!(err, CatalogError::Seed(_)));
    }
}
