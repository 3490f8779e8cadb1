//! Index stage: create the catalog index and seed it on first run.

use std::sync::Arc;

use async_trait::async_trait;
use search_provisioner_repository::azure::catalog_index_definition;
use search_provisioner_repository::SearchServiceProvider;
use search_provisioner_shared::generate_catalog;
use tracing::{error, info, instrument, warn};

use super::{Provisioner, Stage, StageOutcome, StageSuccess};
use crate::errors::ProvisionError;

/// Creates the catalog index when it is absent and uploads a generated
/// catalog into it. An existing index is left untouched.
pub struct IndexProvisioner {
    search: Arc<dyn SearchServiceProvider>,
    index_name: String,
    catalog_size: usize,
}

impl IndexProvisioner {
    pub fn new(
        search: Arc<dyn SearchServiceProvider>,
        index_name: impl Into<String>,
        catalog_size: usize,
    ) -> Self {
        Self {
            search,
            index_name: index_name.into(),
            catalog_size,
        }
    }
}

#[async_trait]
impl Provisioner for IndexProvisioner {
    fn stage(&self) -> Stage {
        Stage::Index
    }

    #[instrument(skip(self), fields(index = %self.index_name))]
    async fn provision(&self) -> Result<StageSuccess, ProvisionError> {
        let stage = self.stage();

        if self.search.get_index(&self.index_name).await?.is_some() {
            info!(
                stage = %stage,
                index = %self.index_name,
                "Index already exists, skipping creation"
            );
            return Ok(StageSuccess::new(StageOutcome::IndexAlreadyExists));
        }

        info!(stage = %stage, index = %self.index_name, "Creating index");
        let definition = catalog_index_definition(&self.index_name);
        self.search
            .create_index(&definition)
            .await
            .map_err(ProvisionError::IndexCreation)?;
        info!(stage = %stage, index = %self.index_name, "Index created");

        let catalog = generate_catalog(self.catalog_size);
        if catalog.is_empty() {
            warn!(stage = %stage, "Catalog size is zero, no documents uploaded");
            return Ok(StageSuccess::new(StageOutcome::IndexCreated { documents: 0 }));
        }

        info!(stage = %stage, document_count = catalog.len(), "Uploading catalog documents");
        let summary = self
            .search
            .upload_documents(&self.index_name, &catalog)
            .await
            .map_err(ProvisionError::DocumentUpload)?;

        if !summary.is_complete() {
            let first_error = summary
                .results
                .iter()
                .find_map(|r| r.error.as_ref().map(|e| format!("{}: {}", r.key, e)))
                .unwrap_or_else(|| "no error details returned".to_string());
            error!(
                stage = %stage,
                succeeded = summary.succeeded,
                failed = summary.failed,
                first_error = %first_error,
                "Catalog upload incomplete"
            );
            return Err(ProvisionError::PartialUpload {
                succeeded: summary.succeeded,
                failed: summary.failed,
                first_error,
            });
        }

        info!(stage = %stage, uploaded = summary.succeeded, "Catalog documents uploaded");
        Ok(StageSuccess::new(StageOutcome::IndexCreated {
            documents: summary.succeeded,
        }))
    }
}
