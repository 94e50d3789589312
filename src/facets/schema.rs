//! Attribute schemas: which facets each product category exposes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

use crate::domain::{Product, SpecKind, SpecValue};

/// Declared value type of an attribute. Informational; values are not coerced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    Number,
    #[default]
    Text,
}

/// One filterable attribute of a category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDescriptor {
    /// Key into `Product::specs`.
    pub name: String,
    pub label: String,
    #[serde(rename = "type", default)]
    pub kind: AttributeType,
    /// Static allow-list; when non-empty it replaces data-derived facet values.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl AttributeDescriptor {
    pub fn new(name: &str, label: &str, kind: AttributeType) -> Self {
        Self { name: name.to_string(), label: label.to_string(), kind, options: vec![] }
    }

    pub fn with_options(mut self, options: &[&str]) -> Self {
        self.options = options.iter().map(|o| o.to_string()).collect();
        self
    }

    fn accepts(&self, value: &SpecValue) -> bool {
        match (self.kind, value) {
            (AttributeType::Text, SpecValue::Flag(_)) => false,
            (AttributeType::Text, _) => true,
            (AttributeType::Number, SpecValue::Number(_)) => true,
            (AttributeType::Number, SpecValue::Text(t)) => Decimal::from_str(t.trim()).is_ok(),
            (AttributeType::Number, SpecValue::Flag(_)) => false,
        }
    }
}

/// A disagreement between a product's spec bag and its category schema.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpecIssue {
    UnknownCategory { category: String },
    UnknownAttribute { attribute: String },
    TypeMismatch { attribute: String, expected: AttributeType, found: SpecKind },
}

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Failed to read schema file {path}: {source}")]
    Io { path: String, #[source] source: std::io::Error },

    #[error("Invalid schema file {path}: {source}")]
    Parse { path: String, #[source] source: serde_json::Error },

    #[error("Duplicate attribute {attribute} in category {category}")]
    DuplicateAttribute { category: String, attribute: String },
}

/// Immutable mapping from category tag to its ordered attribute list.
#[derive(Clone, Debug, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, Vec<AttributeDescriptor>>,
}

static BUILTIN: LazyLock<SchemaRegistry> = LazyLock::new(builtin_table);

impl SchemaRegistry {
    /// The storefront's built-in table, constructed on first use.
    pub fn builtin() -> &'static SchemaRegistry { &BUILTIN }

    pub fn from_schemas(schemas: HashMap<String, Vec<AttributeDescriptor>>) -> Result<Self, SchemaError> {
        let mut normalized = HashMap::with_capacity(schemas.len());
        for (tag, attributes) in schemas {
            let category = normalize_tag(&tag);
            let mut seen = HashSet::new();
            for attr in &attributes {
                if !seen.insert(attr.name.as_str()) {
                    return Err(SchemaError::DuplicateAttribute { category, attribute: attr.name.clone() });
                }
            }
            normalized.insert(category, attributes);
        }
        Ok(Self { schemas: normalized })
    }

    /// Load a `{ "<tag>": [descriptor, ..] }` JSON document.
    pub fn from_json_file(path: &Path) -> Result<Self, SchemaError> {
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| SchemaError::Io { path: display.clone(), source })?;
        let schemas = serde_json::from_str(&raw).map_err(|source| SchemaError::Parse { path: display, source })?;
        Self::from_schemas(schemas)
    }

    /// Ordered attributes for a category. Unknown categories have no facets.
    pub fn schema_for(&self, category: &str) -> &[AttributeDescriptor] {
        self.schemas.get(&normalize_tag(category)).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Merge the schemas of several categories; the first descriptor seen for a name wins.
    pub fn union_for<'a>(&self, categories: impl IntoIterator<Item = &'a str>) -> Vec<AttributeDescriptor> {
        let mut seen_categories = HashSet::new();
        let mut seen_names = HashSet::new();
        let mut merged = Vec::new();
        for category in categories {
            let tag = normalize_tag(category);
            if !seen_categories.insert(tag.clone()) { continue; }
            for attr in self.schema_for(&tag) {
                if seen_names.insert(attr.name.clone()) { merged.push(attr.clone()); }
            }
        }
        merged
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> { self.schemas.keys().map(String::as_str) }

    /// Report spec entries that the product's category does not declare or
    /// whose value disagrees with the declared type.
    pub fn validate(&self, product: &Product) -> Vec<SpecIssue> {
        let Some(schema) = self.schemas.get(&normalize_tag(product.product_type())) else {
            return vec![SpecIssue::UnknownCategory { category: product.product_type().to_string() }];
        };
        product.specs().iter().filter_map(|(name, value)| {
            match schema.iter().find(|a| &a.name == name) {
                None => Some(SpecIssue::UnknownAttribute { attribute: name.clone() }),
                Some(attr) if !attr.accepts(value) => Some(SpecIssue::TypeMismatch {
                    attribute: name.clone(), expected: attr.kind, found: value.kind(),
                }),
                Some(_) => None,
            }
        }).collect()
    }
}

/// Case-fold a category tag and strip URL leftovers such as `cpu?sort=..` or `ram/`.
pub fn normalize_tag(raw: &str) -> String {
    let cut = raw.find(['?', '&', '#']).map_or(raw, |i| &raw[..i]);
    cut.trim().trim_end_matches('/').trim().to_lowercase()
}

fn builtin_table() -> SchemaRegistry {
    use AttributeType::{Number, Text};
    let attr = AttributeDescriptor::new;
    let brand = || attr("brand", "Hãng sản xuất", Text);
    let sockets = ["AM4", "AM5", "LGA1200", "LGA1700"];
    let ram_types = ["DDR4", "DDR5"];
    let form_factors = ["ATX", "Micro-ATX", "Mini-ITX"];

    let table = [
        ("cpu", vec![
            brand(),
            attr("socket", "Socket", Text).with_options(&sockets),
            attr("cores", "Số nhân", Number),
            attr("threads", "Số luồng", Number),
            attr("baseClock", "Xung nhịp cơ bản (GHz)", Number),
        ]),
        ("mainboard", vec![
            brand(),
            attr("socket", "Socket", Text).with_options(&sockets),
            attr("chipset", "Chipset", Text),
            attr("formFactor", "Kích thước", Text).with_options(&form_factors),
            attr("ramType", "Loại RAM hỗ trợ", Text).with_options(&ram_types),
        ]),
        ("ram", vec![
            brand(),
            attr("size", "Dung lượng (GB)", Number),
            attr("type", "Loại RAM", Text).with_options(&ram_types),
            attr("bus", "Bus (MHz)", Number),
        ]),
        ("vga", vec![
            brand(),
            attr("chipset", "Nhân đồ họa", Text),
            attr("vram", "Bộ nhớ (GB)", Number),
        ]),
        ("ssd", vec![
            brand(),
            attr("capacity", "Dung lượng (GB)", Number),
            attr("interface", "Chuẩn kết nối", Text).with_options(&["SATA", "NVMe"]),
        ]),
        ("hdd", vec![
            brand(),
            attr("capacity", "Dung lượng (GB)", Number),
            attr("rpm", "Tốc độ quay (RPM)", Number),
        ]),
        ("psu", vec![
            brand(),
            attr("wattage", "Công suất (W)", Number),
            attr("efficiency", "Chuẩn hiệu suất", Text)
                .with_options(&["80 Plus", "80 Plus Bronze", "80 Plus Gold", "80 Plus Platinum", "80 Plus Titanium"]),
        ]),
        ("case", vec![
            brand(),
            attr("formFactor", "Kích thước", Text).with_options(&form_factors),
            attr("color", "Màu sắc", Text),
        ]),
        ("cooler", vec![
            brand(),
            attr("kind", "Loại tản nhiệt", Text).with_options(&["Air", "AIO"]),
            attr("fanSize", "Kích thước quạt (mm)", Number),
        ]),
        ("monitor", vec![
            brand(),
            attr("size", "Kích thước (inch)", Number),
            attr("resolution", "Độ phân giải", Text),
            attr("refreshRate", "Tần số quét (Hz)", Number),
            attr("panel", "Tấm nền", Text).with_options(&["IPS", "VA", "TN", "OLED"]),
        ]),
    ];

    SchemaRegistry {
        schemas: table.into_iter().map(|(tag, attrs)| (tag.to_string(), attrs)).collect(),
    }
}
