use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::PgPool;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use super::{report_spec_issues, ProductSource};
use crate::domain::{Product, ProductRecord, SpecValue};
use crate::facets::{SchemaRegistry, TypeFilter};
use crate::{CatalogError, Result};

const SELECT_PRODUCTS: &str = "SELECT id, name, slug, product_type, images, original_price, discount, currency, specs, created_at FROM products WHERE status = 'active'";

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    slug: String,
    product_type: String,
    images: Vec<String>,
    original_price: Decimal,
    discount: i16,
    currency: String,
    specs: Json<BTreeMap<String, Option<SpecValue>>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = CatalogError;

    fn try_from(row: ProductRow) -> Result<Self> {
        let discount = u8::try_from(row.discount)
            .map_err(|_| CatalogError::InvalidProduct(format!("{}: discount {} out of range", row.id, row.discount)))?;
        let record = ProductRecord {
            id: row.id, name: row.name, slug: Some(row.slug), product_type: row.product_type, images: row.images,
            original_price: row.original_price, discount, final_price: None, currency: row.currency,
            specs: row.specs.0, created_at: row.created_at,
        };
        let id = record.id;
        Product::try_from(record).map_err(|e| CatalogError::InvalidProduct(format!("{id}: {e}")))
    }
}

/// Products stored in the Postgres `products` table.
#[derive(Clone)]
pub struct PgProductSource {
    db: PgPool,
    registry: Arc<SchemaRegistry>,
}

impl PgProductSource {
    pub fn new(db: PgPool, registry: Arc<SchemaRegistry>) -> Self { Self { db, registry } }

    fn convert_rows(&self, rows: Vec<ProductRow>) -> Result<Vec<Product>> {
        let products = rows.into_iter().map(Product::try_from).collect::<Result<Vec<_>>>()?;
        report_spec_issues(&self.registry, &products);
        Ok(products)
    }
}

/// Escape `LIKE` wildcards so the query matches literally.
fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for c in query.trim().chars() {
        if matches!(c, '%' | '_' | '\\') { escaped.push('\\'); }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Listing query; the category is compared case- and whitespace-insensitively,
/// the same way `Product` normalizes its type.
fn list_query(filter: &TypeFilter) -> String {
    match filter.category() {
        Some(_) => format!("{SELECT_PRODUCTS} AND lower(trim(product_type)) = $1 ORDER BY created_at DESC"),
        None => format!("{SELECT_PRODUCTS} ORDER BY created_at DESC"),
    }
}

#[async_trait]
impl ProductSource for PgProductSource {
    #[instrument(skip(self))]
    async fn list(&self, filter: &TypeFilter) -> Result<Vec<Product>> {
        let sql = list_query(filter);
        let query = sqlx::query_as::<_, ProductRow>(&sql);
        let rows = match filter.category() {
            Some(tag) => query.bind(tag).fetch_all(&self.db).await?,
            None => query.fetch_all(&self.db).await?,
        };
        self.convert_rows(rows)
    }

    #[instrument(skip(self))]
    async fn search(&self, query: &str) -> Result<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!("{SELECT_PRODUCTS} AND name ILIKE $1 ESCAPE '\\' ORDER BY created_at DESC"))
            .bind(like_pattern(query)).fetch_all(&self.db).await?;
        self.convert_rows(rows)
    }
}
