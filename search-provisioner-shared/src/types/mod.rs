//! This module defines the core data structures used across the search provisioner.
//! It re-exports specific types like `CatalogItem`.

pub mod catalog_item;

pub use catalog_item::CatalogItem;
