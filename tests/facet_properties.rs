//! Facet engine property-based tests.
//!
//! Randomized RAM catalogs are pushed through value derivation, filtering and
//! sorting to check repeatability, filter monotonicity and sort ordering.

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use storefront_catalog::domain::{Money, Product};
use storefront_catalog::facets::{
    matches, sorted_by, values_for, FacetEngine, FilterSelection, NameCollator, SchemaRegistry, SortKey,
};

const SIZES: [&str; 4] = ["4", "8", "16", "32"];
const KINDS: [&str; 2] = ["DDR4", "DDR5"];

fn ram_product() -> impl Strategy<Value = (String, i64, Option<usize>, Option<usize>)> {
    (
        "[a-zăâđêôơư]{1,6}",
        0i64..10_000_000,
        proptest::option::of(0..SIZES.len()),
        proptest::option::of(0..KINDS.len()),
    )
}

fn catalog() -> impl Strategy<Value = Vec<Product>> {
    proptest::collection::vec(ram_product(), 0..24).prop_map(|rows| {
        rows.into_iter().enumerate().map(|(i, (prefix, price, size, kind))| {
            let mut p = Product::create("ram", format!("{prefix}-{i}"), Money::vnd(Decimal::new(price, 0))).unwrap();
            if let Some(s) = size { p = p.with_spec("size", SIZES[s]); }
            if let Some(k) = kind { p = p.with_spec("type", KINDS[k]); }
            p
        }).collect()
    })
}

fn selection() -> impl Strategy<Value = FilterSelection> {
    (proptest::sample::subsequence(SIZES.to_vec(), 0..=SIZES.len()), proptest::sample::subsequence(KINDS.to_vec(), 0..=KINDS.len()))
        .prop_map(|(sizes, kinds)| FilterSelection::new().with("size", &sizes).with("type", &kinds))
}

fn count(products: &[Product], selection: &FilterSelection) -> usize {
    let schema = SchemaRegistry::builtin().schema_for("ram");
    products.iter().filter(|p| matches(p, schema, selection)).count()
}

proptest! {
    #[test]
    fn category_view_is_repeatable(products in catalog(), sel in selection()) {
        let engine = FacetEngine::storefront_default();
        let first = engine.category_view("ram", &products, &sel, SortKey::PriceAsc);
        let second = engine.category_view("ram", &products, &sel, SortKey::PriceAsc);
        prop_assert_eq!(first.products, second.products);
        prop_assert_eq!(first.facets, second.facets);
        prop_assert_eq!(first.total, second.total);
    }

    #[test]
    fn adding_a_value_never_shrinks_results(products in catalog(), sel in selection(), extra in 0..SIZES.len()) {
        let before = count(&products, &sel);
        let mut widened = sel.clone();
        widened.select("size", SIZES[extra]);
        prop_assert!(count(&products, &widened) >= before);
    }

    #[test]
    fn constraining_an_attribute_never_grows_results(products in catalog(), kind in 0..KINDS.len()) {
        let sizes_only = FilterSelection::new().with("size", &["8", "16"]);
        let before = count(&products, &sizes_only);
        let narrowed = sizes_only.with("type", &[KINDS[kind]]);
        prop_assert!(count(&products, &narrowed) <= before);
    }

    #[test]
    fn name_sorts_mirror_each_other(products in catalog()) {
        let collator = NameCollator::vietnamese();
        let mut ascending = sorted_by(&products, SortKey::NameAsc, &collator);
        ascending.reverse();
        prop_assert_eq!(ascending, sorted_by(&products, SortKey::NameDesc, &collator));
    }

    #[test]
    fn price_sorts_are_monotonic(products in catalog()) {
        let collator = NameCollator::vietnamese();
        let asc = sorted_by(&products, SortKey::PriceAsc, &collator);
        prop_assert!(asc.windows(2).all(|w| w[0].final_price().amount() <= w[1].final_price().amount()));
        let desc = sorted_by(&products, SortKey::PriceDesc, &collator);
        prop_assert!(desc.windows(2).all(|w| w[0].final_price().amount() >= w[1].final_price().amount()));
        prop_assert_eq!(sorted_by(&products, SortKey::Newest, &collator), products);
    }

    #[test]
    fn facet_values_are_stable_and_observed(products in catalog()) {
        let size = SchemaRegistry::builtin().schema_for("ram").iter().find(|a| a.name == "size").unwrap();
        let first = values_for(size, &products);
        prop_assert_eq!(&first, &values_for(size, &products));
        let observed: BTreeSet<String> = products.iter().filter_map(|p| p.spec_text("size")).collect();
        prop_assert_eq!(first.iter().cloned().collect::<BTreeSet<_>>(), observed);
        prop_assert_eq!(first.len(), first.iter().collect::<BTreeSet<_>>().len());
    }
}
