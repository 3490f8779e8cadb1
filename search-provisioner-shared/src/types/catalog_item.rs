//! Catalog item types for the search index.
//!
//! This module defines the document structure seeded into a newly created
//! index, along with the generator for a sample catalog.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of catalog items uploaded when an index is first created.
pub const DEFAULT_CATALOG_SIZE: usize = 100;

const ADJECTIVES: &[&str] = &[
    "Small",
    "Ergonomic",
    "Rustic",
    "Intelligent",
    "Gorgeous",
    "Incredible",
    "Fantastic",
    "Practical",
    "Sleek",
    "Awesome",
    "Enormous",
    "Mediocre",
    "Synergistic",
    "Heavy Duty",
    "Lightweight",
    "Aerodynamic",
    "Durable",
];

/// Materials are optional: a `None` entry produces a name without one.
const MATERIALS: &[Option<&str>] = &[
    Some("Steel"),
    Some("Wooden"),
    Some("Concrete"),
    Some("Plastic"),
    Some("Cotton"),
    Some("Granite"),
    Some("Rubber"),
    Some("Leather"),
    Some("Silk"),
    Some("Wool"),
    Some("Linen"),
    Some("Marble"),
    Some("Iron"),
    Some("Bronze"),
    Some("Copper"),
    Some("Aluminum"),
    Some("Paper"),
    None,
    None,
    None,
];

const PRODUCTS: &[&str] = &[
    "Chair", "Car", "Computer", "Gloves", "Pants", "Shirt", "Table", "Shoes", "Hat", "Plate",
    "Knife", "Bottle", "Coat", "Lamp", "Keyboard", "Bag", "Bench", "Clock", "Watch", "Wallet",
];

/// Document representation of a catalog item in the search index.
///
/// # Fields
///
/// - `id`: Key of the document, unique within one generated catalog
/// - `name`: Display name (searchable and filterable)
/// - `price`: Unit price (sortable)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    pub price: f64,
}

impl CatalogItem {
    /// Create a new catalog item.
    ///
    /// # Example
    ///
    /// ```
    /// use search_provisioner_shared::CatalogItem;
    ///
    /// let item = CatalogItem::new("1", "Rustic Wooden Chair", 199.99);
    /// assert_eq!(item.id, "1");
    /// ```
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
        }
    }
}

/// Generate a catalog of `count` items using the thread-local RNG.
pub fn generate_catalog(count: usize) -> Vec<CatalogItem> {
    generate_catalog_with_rng(count, &mut rand::thread_rng())
}

/// Generate a catalog of `count` items from the given RNG.
///
/// Identifiers run from `"1"` to `count`. Prices are `tier * 100 - 0.01` for a
/// tier drawn from `1..=10`, so every price falls in `[99.99, 999.99]`.
pub fn generate_catalog_with_rng<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<CatalogItem> {
    (1..=count)
        .map(|id| {
            let name = random_name(rng);
            let price = random_price(rng);
            CatalogItem::new(id.to_string(), name, price)
        })
        .collect()
}

fn random_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let adjective = ADJECTIVES[rng.gen_range(0..ADJECTIVES.len())];
    let material = MATERIALS[rng.gen_range(0..MATERIALS.len())];
    let product = PRODUCTS[rng.gen_range(0..PRODUCTS.len())];

    [Some(adjective), material, Some(product)]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ")
}

fn random_price<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let tier: u32 = rng.gen_range(1..=10);
    f64::from(tier) * 100.0 - 0.01
}
