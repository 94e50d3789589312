//! Catalog facet engine
//!
//! Derives the filterable attributes of a category, the values each facet
//! offers, applies the shopper's selection and orders the result. Everything
//! here is synchronous and holds no state between calls.

pub mod engine;
pub mod filter;
pub mod schema;
pub mod sort;
pub mod values;

pub use engine::{CatalogView, FacetEngine, FacetRequest};
pub use filter::{matches, FilterSelection, TypeFilter};
pub use schema::{normalize_tag, AttributeDescriptor, AttributeType, SchemaError, SchemaRegistry, SpecIssue};
pub use sort::{sorted_by, NameCollator, SortKey};
pub use values::{values_for, Facet};
