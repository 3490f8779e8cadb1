//! Search service provider trait definition.
//!
//! This module defines the abstract interface for resource management on the
//! search service, allowing for the Azure implementation and mock
//! implementations in tests.

use async_trait::async_trait;
use search_provisioner_shared::CatalogItem;

use crate::errors::SearchServiceError;
use crate::types::{
    BatchOperationSummary, DataSourceDefinition, IndexDefinition, IndexerDefinition,
    SkillsetDefinition,
};

/// Abstracts the management API of the search service.
///
/// Implementations are injected into the provisioners to enable dependency
/// injection and easy testing with mock implementations.
///
/// All methods return `Result<T, SearchServiceError>`. A resource that does not
/// exist is reported as `Ok(None)` (reads) or `Ok(false)` (deletes) rather than
/// an error, since absence is an expected branch during provisioning.
#[async_trait]
pub trait SearchServiceProvider: Send + Sync {
    /// Fetch an index definition.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(IndexDefinition))` - If the index exists
    /// * `Ok(None)` - If the service reports the index as not found
    /// * `Err(SearchServiceError)` - If the lookup fails
    async fn get_index(&self, name: &str) -> Result<Option<IndexDefinition>, SearchServiceError>;

    /// Create a new index. Fails if an index of the same name exists.
    async fn create_index(&self, index: &IndexDefinition) -> Result<(), SearchServiceError>;

    /// Upload documents into an index and wait for the service's verdict.
    ///
    /// # Returns
    ///
    /// * `Ok(BatchOperationSummary)` - Per-document results, including partial failures
    /// * `Err(SearchServiceError)` - If the upload is rejected entirely
    async fn upload_documents(
        &self,
        index_name: &str,
        documents: &[CatalogItem],
    ) -> Result<BatchOperationSummary, SearchServiceError>;

    /// Number of documents currently stored in an index.
    async fn document_count(&self, index_name: &str) -> Result<u64, SearchServiceError>;

    /// Create a data source or replace the existing one of the same name.
    async fn create_or_update_data_source(
        &self,
        data_source: &DataSourceDefinition,
    ) -> Result<(), SearchServiceError>;

    /// Fetch a data source definition (`Ok(None)` if absent).
    async fn get_data_source(
        &self,
        name: &str,
    ) -> Result<Option<DataSourceDefinition>, SearchServiceError>;

    /// Create a skillset or replace the existing one of the same name.
    async fn create_or_update_skillset(
        &self,
        skillset: &SkillsetDefinition,
    ) -> Result<(), SearchServiceError>;

    /// Fetch a skillset definition (`Ok(None)` if absent).
    async fn get_skillset(
        &self,
        name: &str,
    ) -> Result<Option<SkillsetDefinition>, SearchServiceError>;

    /// Delete an indexer.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If an indexer was deleted
    /// * `Ok(false)` - If no indexer of that name existed
    /// * `Err(SearchServiceError)` - If the deletion fails
    async fn delete_indexer(&self, name: &str) -> Result<bool, SearchServiceError>;

    /// Create a new indexer. Fails if an indexer of the same name exists.
    async fn create_indexer(&self, indexer: &IndexerDefinition) -> Result<(), SearchServiceError>;

    /// Fetch an indexer definition (`Ok(None)` if absent).
    async fn get_indexer(
        &self,
        name: &str,
    ) -> Result<Option<IndexerDefinition>, SearchServiceError>;
}
