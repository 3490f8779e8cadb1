//! Error types for the provisioning stages.

use search_provisioner_repository::SearchServiceError;
use thiserror::Error;

/// Reasons a provisioning stage can fail.
///
/// Each variant names the step that failed so that, for instance, a
/// partially uploaded catalog is reported differently from an index that
/// could not be created at all.
#[derive(Error, Debug, Clone)]
pub enum ProvisionError {
    /// A remote call outside the steps below failed (e.g. an existence check).
    #[error("Search service error: {0}")]
    Service(#[from] SearchServiceError),

    /// The index could not be created.
    #[error("Index creation failed: {0}")]
    IndexCreation(SearchServiceError),

    /// The catalog upload was rejected as a whole.
    #[error("Document upload failed: {0}")]
    DocumentUpload(SearchServiceError),

    /// Some catalog documents were rejected.
    #[error(
        "Document upload incomplete: {succeeded} succeeded, {failed} failed (first error: {first_error})"
    )]
    PartialUpload {
        succeeded: usize,
        failed: usize,
        first_error: String,
    },

    /// The data source could not be created or updated.
    #[error("Data source registration failed: {0}")]
    DataSourceRegistration(SearchServiceError),

    /// The skillset could not be created or updated.
    #[error("Skillset registration failed: {0}")]
    SkillsetRegistration(SearchServiceError),

    /// An existing indexer could not be deleted.
    #[error("Indexer deletion failed: {0}")]
    IndexerDeletion(SearchServiceError),

    /// The indexer could not be created.
    #[error("Indexer creation failed: {0}")]
    IndexerCreation(SearchServiceError),

    /// The stage was misconfigured.
    #[error("Validation error: {0}")]
    Validation(String),
}

impl ProvisionError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// The underlying service error, if the failure came from a remote call.
    pub fn service_error(&self) -> Option<&SearchServiceError> {
        match self {
            Self::Service(e)
            | Self::IndexCreation(e)
            | Self::DocumentUpload(e)
            | Self::DataSourceRegistration(e)
            | Self::SkillsetRegistration(e)
            | Self::IndexerDeletion(e)
            | Self::IndexerCreation(e) => Some(e),
            Self::PartialUpload { .. } | Self::Validation(_) => None,
        }
    }
}
