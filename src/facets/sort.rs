//! Result ordering.

use icu_collator::options::CollatorOptions;
use icu_collator::{Collator, CollatorBorrowed, CollatorPreferences};
use icu_locale_core::Locale;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::domain::Product;

/// Closed set of orderings offered by the storefront.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortKey {
    /// Upstream order, assumed newest first.
    #[default]
    #[serde(rename = "newest")]
    Newest,
    #[serde(rename = "price-asc")]
    PriceAsc,
    #[serde(rename = "price-desc")]
    PriceDesc,
    #[serde(rename = "name-az")]
    NameAsc,
    #[serde(rename = "name-za")]
    NameDesc,
}

impl SortKey {
    /// Unknown or missing keys fall back to `Newest`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("price-asc") => Self::PriceAsc,
            Some("price-desc") => Self::PriceDesc,
            Some("name-az") => Self::NameAsc,
            Some("name-za") => Self::NameDesc,
            _ => Self::Newest,
        }
    }
}

/// Locale-aware comparison of product names.
pub struct NameCollator {
    collator: Option<CollatorBorrowed<'static>>,
}

impl NameCollator {
    /// Collator for `locale`. Without collation data for it, names compare by code point.
    pub fn new(locale: &Locale) -> Self {
        match Collator::try_new(CollatorPreferences::from(locale), CollatorOptions::default()) {
            Ok(collator) => Self { collator: Some(collator) },
            Err(e) => {
                tracing::warn!(%locale, error = %e, "collation data unavailable, using code point order");
                Self { collator: None }
            }
        }
    }

    /// Vietnamese collation, the storefront default.
    pub fn vietnamese() -> Self { Self::new(&icu_locale_core::locale!("vi")) }

    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match &self.collator {
            Some(c) => c.compare(a, b),
            None => a.cmp(b),
        }
    }
}

impl std::fmt::Debug for NameCollator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NameCollator").field("locale_data", &self.collator.is_some()).finish()
    }
}

/// Reordered copy of `products`. The sort is stable; `Newest` keeps input order.
pub fn sorted_by(products: &[Product], key: SortKey, names: &NameCollator) -> Vec<Product> {
    let mut sorted = products.to_vec();
    match key {
        SortKey::Newest => {}
        SortKey::PriceAsc => sorted.sort_by(|a, b| a.final_price().amount().cmp(&b.final_price().amount())),
        SortKey::PriceDesc => sorted.sort_by(|a, b| b.final_price().amount().cmp(&a.final_price().amount())),
        SortKey::NameAsc => sorted.sort_by(|a, b| names.compare(a.name(), b.name())),
        SortKey::NameDesc => sorted.sort_by(|a, b| names.compare(b.name(), a.name())),
    }
    sorted
}
