//! Facet value derivation.

use serde::Serialize;
use std::collections::HashSet;

use super::schema::AttributeDescriptor;
use crate::domain::Product;

/// Selectable values for one facet, plus the attribute it belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Facet {
    pub name: String,
    pub label: String,
    pub values: Vec<String>,
    /// No values to offer; the UI shows a "no data" placeholder.
    pub no_data: bool,
}

impl Facet {
    pub fn derive(descriptor: &AttributeDescriptor, candidates: &[Product]) -> Self {
        let values = values_for(descriptor, candidates);
        Self { name: descriptor.name.clone(), label: descriptor.label.clone(), no_data: values.is_empty(), values }
    }
}

/// Distinct values offered for `descriptor`.
///
/// An empty pool (data not loaded yet) offers nothing. Otherwise static options
/// are returned verbatim without consulting `candidates`, so an option may have
/// no matching product; without options the non-empty text forms of
/// `specs[descriptor.name]` are collected in first-seen order.
pub fn values_for(descriptor: &AttributeDescriptor, candidates: &[Product]) -> Vec<String> {
    if candidates.is_empty() {
        return vec![];
    }
    if !descriptor.options.is_empty() {
        return descriptor.options.clone();
    }
    let mut seen = HashSet::new();
    candidates.iter()
        .filter_map(|p| p.spec(&descriptor.name))
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
        .filter(|v| seen.insert(v.clone()))
        .collect()
}
