//! Product Aggregate

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;
use crate::domain::value_objects::{Discount, DiscountError, Money, SpecValue, DEFAULT_CURRENCY};

/// Category-specific attribute bag, keyed by attribute name.
pub type Specs = BTreeMap<String, SpecValue>;

/// A catalog product as seen by the storefront.
///
/// `final_price` is always derived from `original_price` and `discount`, so
/// it never exceeds the original price.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProductRecord", into = "ProductRecord")]
pub struct Product {
    id: Uuid,
    name: String,
    slug: String,
    product_type: String,
    images: Vec<String>,
    original_price: Money,
    discount: Discount,
    final_price: Money,
    specs: Specs,
    created_at: DateTime<Utc>,
}

impl Product {
    pub fn create(product_type: impl Into<String>, name: impl Into<String>, original_price: Money) -> Result<Self, ProductError> {
        let name = name.into();
        if name.trim().is_empty() { return Err(ProductError::MissingName); }
        if original_price.is_negative() { return Err(ProductError::NegativePrice); }
        let slug = slugify(&name);
        Ok(Self {
            id: Uuid::now_v7(), name, slug, product_type: product_type.into().trim().to_lowercase(),
            images: vec![], final_price: original_price.clone(), original_price,
            discount: Discount::default(), specs: Specs::new(), created_at: Utc::now(),
        })
    }

    pub fn with_discount(mut self, discount: Discount) -> Self {
        self.discount = discount;
        self.reprice();
        self
    }

    pub fn with_spec(mut self, name: impl Into<String>, value: impl Into<SpecValue>) -> Self {
        self.specs.insert(name.into(), value.into());
        self
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.images.push(url.into());
        self
    }

    pub fn id(&self) -> Uuid { self.id }
    pub fn name(&self) -> &str { &self.name }
    pub fn slug(&self) -> &str { &self.slug }
    pub fn product_type(&self) -> &str { &self.product_type }
    pub fn images(&self) -> &[String] { &self.images }
    pub fn original_price(&self) -> &Money { &self.original_price }
    pub fn discount(&self) -> Discount { self.discount }
    pub fn final_price(&self) -> &Money { &self.final_price }
    pub fn specs(&self) -> &Specs { &self.specs }
    pub fn spec(&self, name: &str) -> Option<&SpecValue> { self.specs.get(name) }
    pub fn created_at(&self) -> DateTime<Utc> { self.created_at }

    /// Text form of an attribute, `None` when the product lacks it.
    pub fn spec_text(&self, name: &str) -> Option<String> { self.spec(name).map(ToString::to_string) }

    fn reprice(&mut self) { self.final_price = self.original_price.apply_discount(self.discount); }
}

fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.trim().to_lowercase().chars() {
        if c.is_alphanumeric() { slug.push(c); }
        else if !slug.ends_with('-') { slug.push('-'); }
    }
    slug.trim_matches('-').to_string()
}

/// Wire shape of a product (`{ "type": .., "specs": .., "originalPrice": .. }`).
///
/// `finalPrice` is accepted on input for compatibility but always recomputed.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    #[serde(default = "Uuid::now_v7")]
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(rename = "type")]
    pub product_type: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub original_price: Decimal,
    #[serde(default)]
    pub discount: u8,
    #[serde(default, with = "rust_decimal::serde::float_option", skip_serializing_if = "Option::is_none")]
    pub final_price: Option<Decimal>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub specs: BTreeMap<String, Option<SpecValue>>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

fn default_currency() -> String { DEFAULT_CURRENCY.to_string() }

impl TryFrom<ProductRecord> for Product {
    type Error = ProductError;

    fn try_from(r: ProductRecord) -> Result<Self, Self::Error> {
        let mut product = Product::create(r.product_type, r.name, Money::new(r.original_price, &r.currency))?
            .with_discount(Discount::new(r.discount)?);
        product.id = r.id;
        if let Some(slug) = r.slug.filter(|s| !s.trim().is_empty()) { product.slug = slug; }
        product.images = r.images;
        // null entries are absent attributes
        product.specs = r.specs.into_iter().filter_map(|(k, v)| v.map(|v| (k, v))).collect();
        product.created_at = r.created_at;
        Ok(product)
    }
}

impl From<Product> for ProductRecord {
    fn from(p: Product) -> Self {
        Self {
            id: p.id, name: p.name, slug: Some(p.slug), product_type: p.product_type, images: p.images,
            original_price: p.original_price.amount(), discount: p.discount.percent(),
            final_price: Some(p.final_price.amount()), currency: p.original_price.currency().to_string(),
            specs: p.specs.into_iter().map(|(k, v)| (k, Some(v))).collect(), created_at: p.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)] pub enum ProductError { MissingName, NegativePrice, InvalidDiscount(DiscountError) }
impl std::error::Error for ProductError {}
impl std::fmt::Display for ProductError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingName => write!(f, "Missing name"),
            Self::NegativePrice => write!(f, "Negative price"),
            Self::InvalidDiscount(e) => write!(f, "Invalid discount: {e}"),
        }
    }
}
impl From<DiscountError> for ProductError { fn from(e: DiscountError) -> Self { Self::InvalidDiscount(e) } }
