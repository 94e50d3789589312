//! Filter selections and the product predicate.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::schema::{normalize_tag, AttributeDescriptor};
use crate::domain::Product;

/// Query-string prefix for attribute filters (`spec.size=16`), keeping
/// attribute names apart from `q`, `type` and `sort`.
pub const SPEC_PARAM_PREFIX: &str = "spec.";

/// Selected values per attribute. An attribute with no values is unconstrained.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSelection {
    selected: BTreeMap<String, BTreeSet<String>>,
}

impl FilterSelection {
    pub fn new() -> Self { Self::default() }

    /// Build a selection from `spec.<attribute>=<value>` query pairs; repeated
    /// keys accumulate and pairs without the prefix are ignored.
    pub fn from_query_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut selection = Self::new();
        for (key, value) in pairs {
            let Some(attribute) = key.as_ref().trim().strip_prefix(SPEC_PARAM_PREFIX) else { continue };
            let (attribute, value) = (attribute.trim(), value.as_ref().trim());
            if attribute.is_empty() || value.is_empty() { continue; }
            selection.select(attribute, value);
        }
        selection
    }

    pub fn with(mut self, attribute: &str, values: &[&str]) -> Self {
        for value in values { self.select(attribute, value); }
        self
    }

    pub fn select(&mut self, attribute: &str, value: &str) {
        self.selected.entry(attribute.to_string()).or_default().insert(value.to_string());
    }

    /// Add `value` if absent, remove it if present. Returns whether it is now selected.
    pub fn toggle(&mut self, attribute: &str, value: &str) -> bool {
        let values = self.selected.entry(attribute.to_string()).or_default();
        let now_selected = if values.remove(value) { false } else { values.insert(value.to_string()) };
        if values.is_empty() { self.selected.remove(attribute); }
        now_selected
    }

    pub fn clear(&mut self) { self.selected.clear(); }

    pub fn values(&self, attribute: &str) -> Option<&BTreeSet<String>> {
        self.selected.get(attribute).filter(|v| !v.is_empty())
    }

    pub fn is_empty(&self) -> bool { self.selected.values().all(BTreeSet::is_empty) }
}

/// Category constraint used on the search page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum TypeFilter {
    #[default]
    All,
    Only(String),
}

impl TypeFilter {
    /// `None`, empty and `all` (any case) mean no constraint.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(normalize_tag) {
            None => Self::All,
            Some(tag) if tag.is_empty() || tag == "all" => Self::All,
            Some(tag) => Self::Only(tag),
        }
    }

    pub fn category(&self) -> Option<&str> {
        match self { Self::All => None, Self::Only(tag) => Some(tag) }
    }

    pub fn admits(&self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Only(tag) => product.product_type() == tag,
        }
    }
}

/// AND across the schema's attributes, OR within each attribute's selected values.
/// A selected attribute the product lacks fails the predicate.
pub fn matches(product: &Product, schema: &[AttributeDescriptor], selection: &FilterSelection) -> bool {
    schema.iter().all(|attr| match selection.values(&attr.name) {
        None => true,
        Some(wanted) => product.spec_text(&attr.name).is_some_and(|v| wanted.contains(&v)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Money;
    use crate::facets::schema::SchemaRegistry;

    fn ram(size: &str, kind: &str) -> Product {
        Product::create("ram", format!("RAM {size}GB {kind}"), Money::default()).unwrap()
            .with_spec("size", size)
            .with_spec("type", kind)
    }

    #[test]
    fn test_empty_attribute_selection_is_unconstrained() {
        let schema = SchemaRegistry::builtin().schema_for("ram");
        let selection = FilterSelection::new().with("size", &["16"]).with("type", &[]);
        assert!(matches(&ram("16", "DDR4"), schema, &selection));
        assert!(!matches(&ram("8", "DDR4"), schema, &selection));
    }

    #[test]
    fn test_or_within_and_across() {
        let schema = SchemaRegistry::builtin().schema_for("ram");
        let either_size = FilterSelection::new().with("size", &["8", "16"]);
        assert!(matches(&ram("8", "DDR5"), schema, &either_size));
        assert!(matches(&ram("16", "DDR4"), schema, &either_size));

        let narrowed = either_size.with("type", &["DDR5"]);
        assert!(matches(&ram("8", "DDR5"), schema, &narrowed));
        assert!(!matches(&ram("16", "DDR4"), schema, &narrowed));
    }

    #[test]
    fn test_missing_attribute_fails_selected_filter() {
        let schema = SchemaRegistry::builtin().schema_for("ram");
        let bare = Product::create("ram", "No specs", Money::default()).unwrap();
        assert!(matches(&bare, schema, &FilterSelection::new()));
        assert!(!matches(&bare, schema, &FilterSelection::new().with("size", &["16"])));
    }

    #[test]
    fn test_attributes_outside_schema_are_ignored() {
        let schema = SchemaRegistry::builtin().schema_for("ram");
        let selection = FilterSelection::new().with("socket", &["AM5"]);
        assert!(matches(&ram("16", "DDR4"), schema, &selection));
    }

    #[test]
    fn test_toggle_and_clear() {
        let mut selection = FilterSelection::new();
        assert!(selection.toggle("size", "16"));
        assert!(selection.toggle("size", "8"));
        assert!(!selection.toggle("size", "16"));
        assert_eq!(selection.values("size").unwrap().len(), 1);
        assert!(!selection.toggle("size", "8"));
        assert!(selection.values("size").is_none());
        assert!(selection.is_empty());
        selection.select("type", "DDR5");
        selection.clear();
        assert!(selection.is_empty());
    }

    #[test]
    fn test_from_query_pairs_reads_prefixed_attributes() {
        let pairs = [
            ("q", "ram"), ("spec.size", "8"), ("spec.size", "16"), ("sort", "price-asc"),
            ("type", "ram"), ("spec.type", "DDR5"), ("spec.bus", ""), ("size", "32"), ("spec.", "x"),
        ];
        let selection = FilterSelection::from_query_pairs(pairs);
        assert_eq!(selection, FilterSelection::new().with("size", &["8", "16"]).with("type", &["DDR5"]));
    }

    #[test]
    fn test_type_filter() {
        assert_eq!(TypeFilter::parse(None), TypeFilter::All);
        assert_eq!(TypeFilter::parse(Some("ALL")), TypeFilter::All);
        assert_eq!(TypeFilter::parse(Some("")), TypeFilter::All);
        let only_ram = TypeFilter::parse(Some("Ram"));
        assert_eq!(only_ram.category(), Some("ram"));
        assert!(only_ram.admits(&ram("8", "DDR4")));
        let cpu = Product::create("cpu", "Ryzen", Money::default()).unwrap();
        assert!(!only_ram.admits(&cpu));
        assert!(TypeFilter::All.admits(&cpu));
    }
}
