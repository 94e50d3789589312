//! Catalog domain: products, prices and attribute values
pub mod aggregates;
pub mod value_objects;

pub use aggregates::{Product, ProductError, ProductRecord, Specs};
pub use value_objects::{Discount, DiscountError, Money, SpecKind, SpecValue};
