//! Resource definitions and result types for search service operations.
//!
//! The definitions serialize directly to the Azure AI Search REST format.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::errors::SearchServiceError;

/// A single field of an index schema.
///
/// The service returns `null` for flags that do not apply to a field type
/// (e.g. `key` on an `Edm.ComplexType`); those read back as their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IndexField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default, deserialize_with = "null_as_false")]
    pub key: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub searchable: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub filterable: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub sortable: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub facetable: bool,
    #[serde(default = "default_true", deserialize_with = "null_as_true")]
    pub retrievable: bool,
}

fn default_true() -> bool {
    true
}

fn null_as_false<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

fn null_as_true<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(true))
}

impl IndexField {
    /// A non-searchable field with only the flags set through the builder methods.
    pub fn simple(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            key: false,
            searchable: false,
            filterable: false,
            sortable: false,
            facetable: false,
            retrievable: true,
        }
    }

    /// A full-text searchable string field.
    pub fn searchable(name: impl Into<String>) -> Self {
        Self {
            searchable: true,
            ..Self::simple(name, "Edm.String")
        }
    }

    pub fn key(mut self) -> Self {
        self.key = true;
        self
    }

    pub fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }
}

/// An index schema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexDefinition {
    pub name: String,
    pub fields: Vec<IndexField>,
}

impl IndexDefinition {
    /// Name of the key field, if the schema declares one.
    pub fn key_field(&self) -> Option<&IndexField> {
        self.fields.iter().find(|f| f.key)
    }
}

/// Connection credentials of a data source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DataSourceCredentials {
    /// Omitted by the service when reading a data source back.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_string: Option<String>,
}

/// The container a data source reads from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataContainer {
    pub name: String,
}

/// A data-source connection registered on the search service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataSourceDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub source_type: String,
    pub credentials: DataSourceCredentials,
    pub container: DataContainer,
}

impl DataSourceDefinition {
    /// A data source reading from an Azure blob container.
    pub fn azure_blob(
        name: impl Into<String>,
        connection_string: impl Into<String>,
        container: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            source_type: "azureblob".to_string(),
            credentials: DataSourceCredentials {
                connection_string: Some(connection_string.into()),
            },
            container: DataContainer {
                name: container.into(),
            },
        }
    }
}

/// Declares which document path feeds a skill input.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InputFieldMapping {
    pub name: String,
    pub source: String,
}

impl InputFieldMapping {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }
}

/// Declares which document field a skill output populates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OutputFieldMapping {
    pub name: String,
    pub target_name: String,
}

impl OutputFieldMapping {
    pub fn new(name: impl Into<String>, target_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target_name: target_name.into(),
        }
    }
}

/// A single enrichment skill.
///
/// Skill-specific parameters (languages, split mode, categories) live in
/// `extra` and are flattened into the skill object on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Skill {
    #[serde(rename = "@odata.type")]
    pub odata_type: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub context: String,
    pub inputs: Vec<InputFieldMapping>,
    pub outputs: Vec<OutputFieldMapping>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A named, ordered set of skills.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkillsetDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub skills: Vec<Skill>,
}

/// Failure tolerances of an indexer run. `-1` means unlimited.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IndexingParameters {
    pub max_failed_items: i32,
    pub max_failed_items_per_batch: i32,
}

impl IndexingParameters {
    /// Never abort a run because of failed items.
    pub fn tolerate_all_failures() -> Self {
        Self {
            max_failed_items: -1,
            max_failed_items_per_batch: -1,
        }
    }
}

impl Default for IndexingParameters {
    fn default() -> Self {
        Self::tolerate_all_failures()
    }
}

/// An indexer wiring a data source and a skillset into a target index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IndexerDefinition {
    pub name: String,
    pub data_source_name: String,
    pub target_index_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skillset_name: Option<String>,
    #[serde(default)]
    pub parameters: IndexingParameters,
}

/// Result of a batch operation for a single document.
#[derive(Debug, Clone)]
pub struct BatchOperationResult {
    /// Key of the document.
    pub key: String,
    /// Whether the operation succeeded.
    pub success: bool,
    /// Error if the operation failed.
    pub error: Option<SearchServiceError>,
}

/// Summary of a batch operation containing aggregate statistics and individual results.
///
/// Lets callers distinguish a partially applied upload from one that failed
/// outright.
#[derive(Debug, Clone, Default)]
pub struct BatchOperationSummary {
    /// Total number of items in the batch.
    pub total: usize,
    /// Number of successful operations.
    pub succeeded: usize,
    /// Number of failed operations.
    pub failed: usize,
    /// Individual results for each item.
    pub results: Vec<BatchOperationResult>,
}

impl BatchOperationSummary {
    /// Fold another summary into this one.
    pub fn merge(&mut self, other: BatchOperationSummary) {
        self.total += other.total;
        self.succeeded += other.succeeded;
        self.failed += other.failed;
        self.results.extend(other.results);
    }

    pub fn is_complete(&self) -> bool {
        self.failed == 0
    }
}
