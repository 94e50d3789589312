//! HTTP surface: product listing, text search and the facet views.

use axum::{extract::{Path, Query, State}, http::StatusCode, response::{IntoResponse, Response}, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::instrument;
use validator::Validate;

use crate::catalog::ProductSource;
use crate::domain::Product;
use crate::facets::{AttributeDescriptor, CatalogView, FacetEngine, FilterSelection, SortKey, TypeFilter};
use crate::{CatalogError, Result};

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn ProductSource>,
    pub engine: Arc<FacetEngine>,
}

/// `{ statusCode, message, data }` wrapper for every response.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub status_code: u16,
    pub message: String,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self { status_code: StatusCode::OK.as_u16(), message: "OK".to_string(), data })
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = match &self {
            CatalogError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            CatalogError::InvalidProduct(_) | CatalogError::Seed(_) | CatalogError::Schema(_) | CatalogError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = Envelope { status_code: status.as_u16(), message: self.to_string(), data: None::<()> };
        (status, Json(body)).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "storefront-catalog"})) }))
        .route("/api/v1/products", get(list_products))
        .route("/api/v1/products/search", get(search_products))
        .route("/api/v1/schemas/:category", get(get_schema))
        .route("/api/v1/categories/:category/products", get(category_view))
        .route("/api/v1/search", get(search_view))
        .layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()).with_state(state)
}

#[derive(Debug, Deserialize)] pub struct ListParams { #[serde(rename = "type")] pub product_type: Option<String> }

#[derive(Debug, Deserialize, Validate)]
pub struct SearchParams {
    #[validate(length(min = 1, max = 200))]
    pub q: String,
}

impl SearchParams {
    fn from_pairs(pairs: &[(String, String)]) -> Result<Self> {
        let q = param(pairs, "q").unwrap_or_default().trim().to_string();
        let params = Self { q };
        params.validate().map_err(|e| CatalogError::InvalidQuery(e.to_string()))?;
        Ok(params)
    }
}

fn param<'a>(pairs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    pairs.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
}

#[instrument(skip(s))]
async fn list_products(State(s): State<AppState>, Query(p): Query<ListParams>) -> Result<Json<Envelope<Vec<Product>>>> {
    let products = s.source.list(&TypeFilter::parse(p.product_type.as_deref())).await?;
    Ok(Envelope::ok(products))
}

#[instrument(skip(s))]
async fn search_products(State(s): State<AppState>, Query(pairs): Query<Vec<(String, String)>>) -> Result<Json<Envelope<Vec<Product>>>> {
    let params = SearchParams::from_pairs(&pairs)?;
    Ok(Envelope::ok(s.source.search(&params.q).await?))
}

async fn get_schema(State(s): State<AppState>, Path(category): Path<String>) -> Json<Envelope<Vec<AttributeDescriptor>>> {
    Envelope::ok(s.engine.schema_for(&category).to_vec())
}

#[instrument(skip(s))]
async fn category_view(
    State(s): State<AppState>,
    Path(category): Path<String>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Envelope<CatalogView>>> {
    let type_filter = TypeFilter::parse(Some(category.as_str()));
    let Some(tag) = type_filter.category() else {
        return Err(CatalogError::InvalidQuery(format!("{category:?} is not a category")));
    };
    let pool = s.source.list(&type_filter).await?;
    let selection = FilterSelection::from_query_pairs(pairs.iter().map(|(k, v)| (k, v)));
    let sort = SortKey::parse(param(&pairs, "sort"));
    Ok(Envelope::ok(s.engine.category_view(tag, &pool, &selection, sort)))
}

#[instrument(skip(s))]
async fn search_view(State(s): State<AppState>, Query(pairs): Query<Vec<(String, String)>>) -> Result<Json<Envelope<CatalogView>>> {
    let params = SearchParams::from_pairs(&pairs)?;
    let results = s.source.search(&params.q).await?;
    let catalog = s.source.list(&TypeFilter::All).await?;
    let selection = FilterSelection::from_query_pairs(pairs.iter().map(|(k, v)| (k, v)));
    let view = s.engine.search_view(
        &results,
        &catalog,
        TypeFilter::parse(param(&pairs, "type")),
        &selection,
        SortKey::parse(param(&pairs, "sort")),
    );
    Ok(Envelope::ok(view))
}
