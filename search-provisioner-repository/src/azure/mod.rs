//! Azure implementation of the provider interfaces.
//!
//! This module provides concrete implementations of `SearchServiceProvider`
//! and `BlobContainerProvider` against the Azure AI Search and Azure Blob
//! Storage REST APIs, plus the fixed index schema and skill library.

mod blob_provider;
mod index_config;
mod search_provider;
mod shared_key;
pub mod skills;

pub use blob_provider::{validate_container_name, AzureBlobProvider};
pub use index_config::{catalog_index_definition, FIELD_ID, FIELD_NAME, FIELD_PRICE};
pub use search_provider::AzureSearchProvider;
pub use shared_key::SharedKeyCredential;
pub use skills::{build_skill, build_skills, skillset_definition, SkillKind};
