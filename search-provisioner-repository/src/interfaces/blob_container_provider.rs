//! Blob container provider trait definition.

use async_trait::async_trait;

use crate::errors::SearchServiceError;

/// Outcome of ensuring a blob container exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerStatus {
    /// The container was created by this call.
    Created,
    /// The container was already present.
    AlreadyExists,
}

/// Abstracts the blob storage account backing the data source.
#[async_trait]
pub trait BlobContainerProvider: Send + Sync {
    /// Create a container unless it already exists.
    ///
    /// "Already exists" is a success, reported as `ContainerStatus::AlreadyExists`.
    async fn create_container_if_not_exists(
        &self,
        container: &str,
    ) -> Result<ContainerStatus, SearchServiceError>;

    /// Connection string the search service uses to read from this account.
    fn connection_string(&self) -> String;
}
