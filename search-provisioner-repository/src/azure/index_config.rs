//! Catalog index schema.
//!
//! The schema mirrors the annotations of `CatalogItem`: a key field, a
//! searchable and filterable name, and a sortable price.

use crate::types::{IndexDefinition, IndexField};

pub const FIELD_ID: &str = "Id";
pub const FIELD_NAME: &str = "Name";
pub const FIELD_PRICE: &str = "Price";

/// Get the index definition for the catalog index.
///
/// # Arguments
///
/// * `name` - The index name
pub fn catalog_index_definition(name: impl Into<String>) -> IndexDefinition {
    IndexDefinition {
        name: name.into(),
        fields: vec![
            IndexField::simple(FIELD_ID, "Edm.String").key().filterable(),
            IndexField::searchable(FIELD_NAME).filterable(),
            IndexField::simple(FIELD_PRICE, "Edm.Double").sortable(),
        ],
    }
}
