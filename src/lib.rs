//! Storefront Catalog
//!
//! Product catalog service for a PC-components storefront.
//!
//! ## Features
//! - Per-category attribute schemas
//! - Facet values derived from product specs or static option lists
//! - Multi-select filtering (OR within an attribute, AND across attributes)
//! - Price and Vietnamese-collated name sorting
//! - Category and text search views over Postgres or an in-memory seed

pub mod catalog;
pub mod config;
pub mod domain;
pub mod facets;
pub mod http;

use thiserror::Error;

use crate::facets::SchemaError;

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Invalid product {0}")]
    InvalidProduct(String),

    #[error("Failed to load catalog seed {0}")]
    Seed(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
