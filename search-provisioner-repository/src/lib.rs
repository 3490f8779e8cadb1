//! # Search Provisioner Repository
//!
//! This crate provides traits and implementations for managing Azure AI Search
//! resources and the blob container that feeds them. It includes the resource
//! definitions sent over the wire, a unified error type, the provider
//! interfaces, and concrete implementations against the Azure REST APIs.

pub mod azure;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod types;
pub mod utils;

pub use azure::{AzureBlobProvider, AzureSearchProvider};
pub use config::{BlobStorageConfig, SearchServiceConfig};
pub use errors::SearchServiceError;
pub use interfaces::{BlobContainerProvider, ContainerStatus, SearchServiceProvider};
pub use types::{
    BatchOperationResult, BatchOperationSummary, DataSourceDefinition, IndexDefinition,
    IndexField, IndexerDefinition, IndexingParameters, InputFieldMapping, OutputFieldMapping,
    Skill, SkillsetDefinition,
};
pub use utils::storage_connection_string;
