//! # Search Provisioner Shared
//!
//! This crate defines the data structures shared across the search provisioner.
//! It includes the catalog item document uploaded into a freshly created index
//! and the generator that produces a sample catalog.

pub mod types;

pub use types::catalog_item::{
    generate_catalog, generate_catalog_with_rng, CatalogItem, DEFAULT_CATALOG_SIZE,
};
