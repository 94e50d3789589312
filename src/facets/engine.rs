//! Facet/filter/sort pipeline shared by the category and search pages.

use icu_locale_core::Locale;
use serde::Serialize;
use std::sync::Arc;

use super::filter::{matches, FilterSelection, TypeFilter};
use super::schema::{normalize_tag, AttributeDescriptor, SchemaRegistry};
use super::sort::{sorted_by, NameCollator, SortKey};
use super::values::Facet;
use crate::domain::Product;

/// Everything one evaluation depends on.
#[derive(Clone, Debug)]
pub struct FacetRequest<'a> {
    pub schema: Vec<AttributeDescriptor>,
    /// Products facet values are derived from.
    pub facet_pool: &'a [Product],
    /// Products the predicate is applied to.
    pub result_pool: &'a [Product],
    pub type_filter: TypeFilter,
    pub selection: &'a FilterSelection,
    pub sort: SortKey,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogView {
    pub schema: Vec<AttributeDescriptor>,
    pub facets: Vec<Facet>,
    pub products: Vec<Product>,
    pub total: usize,
    pub sort: SortKey,
}

/// Stateless evaluator; every call is a pure function of its inputs.
#[derive(Clone, Debug)]
pub struct FacetEngine {
    registry: Arc<SchemaRegistry>,
    names: Arc<NameCollator>,
}

impl FacetEngine {
    /// Collation data for `locale` is loaded here, once per engine.
    pub fn new(registry: Arc<SchemaRegistry>, locale: Locale) -> Self {
        Self { registry, names: Arc::new(NameCollator::new(&locale)) }
    }

    /// Built-in schemas with Vietnamese name collation.
    pub fn storefront_default() -> Self {
        Self::new(Arc::new(SchemaRegistry::builtin().clone()), icu_locale_core::locale!("vi"))
    }

    pub fn registry(&self) -> &SchemaRegistry { &self.registry }

    pub fn schema_for(&self, category: &str) -> &[AttributeDescriptor] { self.registry.schema_for(category) }

    pub fn evaluate(&self, request: FacetRequest<'_>) -> CatalogView {
        let FacetRequest { schema, facet_pool, result_pool, type_filter, selection, sort } = request;
        let facets = schema.iter().map(|attr| Facet::derive(attr, facet_pool)).collect();
        let filtered: Vec<Product> = result_pool.iter()
            .filter(|p| type_filter.admits(p) && matches(p, &schema, selection))
            .cloned()
            .collect();
        let products = sorted_by(&filtered, sort, &self.names);
        tracing::debug!(
            attributes = schema.len(), pool = result_pool.len(), matched = products.len(), ?sort,
            "evaluated catalog view"
        );
        CatalogView { total: products.len(), schema, facets, products, sort }
    }

    /// Category page: facets and results both come from the category's products in `pool`.
    pub fn category_view(&self, category: &str, pool: &[Product], selection: &FilterSelection, sort: SortKey) -> CatalogView {
        let tag = normalize_tag(category);
        let in_category: Vec<Product> = pool.iter().filter(|p| p.product_type() == tag).cloned().collect();
        self.evaluate(FacetRequest {
            schema: self.registry.schema_for(&tag).to_vec(),
            facet_pool: &in_category,
            result_pool: &in_category,
            type_filter: TypeFilter::Only(tag),
            selection,
            sort,
        })
    }

    /// Search page: results are filtered, but facet values come from the whole
    /// `catalog` regardless of the query.
    pub fn search_view(
        &self,
        results: &[Product],
        catalog: &[Product],
        type_filter: TypeFilter,
        selection: &FilterSelection,
        sort: SortKey,
    ) -> CatalogView {
        let schema = match type_filter.category() {
            Some(tag) => self.registry.schema_for(tag).to_vec(),
            None => self.registry.union_for(results.iter().map(Product::product_type)),
        };
        self.evaluate(FacetRequest { schema, facet_pool: catalog, result_pool: results, type_filter, selection, sort })
    }
}
