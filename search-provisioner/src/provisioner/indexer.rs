//! Indexer stage: replace the indexer wiring data source, skillset and index.

use std::sync::Arc;

use async_trait::async_trait;
use search_provisioner_repository::{IndexerDefinition, IndexingParameters, SearchServiceProvider};
use tracing::{info, instrument};

use super::{Provisioner, Stage, StageOutcome, StageSuccess};
use crate::config::ResourceNames;
use crate::errors::ProvisionError;

/// Deletes any existing indexer of the configured name and creates it again,
/// which also triggers a fresh indexing run on the service.
pub struct IndexerProvisioner {
    search: Arc<dyn SearchServiceProvider>,
    definition: IndexerDefinition,
}

impl IndexerProvisioner {
    pub fn new(search: Arc<dyn SearchServiceProvider>, resources: &ResourceNames) -> Self {
        let definition = IndexerDefinition {
            name: resources.indexer.clone(),
            data_source_name: resources.data_source.clone(),
            target_index_name: resources.index.clone(),
            skillset_name: Some(resources.skillset.clone()),
            parameters: IndexingParameters::tolerate_all_failures(),
        };
        Self { search, definition }
    }
}

#[async_trait]
impl Provisioner for IndexerProvisioner {
    fn stage(&self) -> Stage {
        Stage::Indexer
    }

    #[instrument(skip(self), fields(indexer = %self.definition.name))]
    async fn provision(&self) -> Result<StageSuccess, ProvisionError> {
        let stage = self.stage();
        let name = &self.definition.name;

        let deleted = self
            .search
            .delete_indexer(name)
            .await
            .map_err(ProvisionError::IndexerDeletion)?;
        if deleted {
            info!(stage = %stage, indexer = %name, "Deleted existing indexer");
        } else {
            info!(stage = %stage, indexer = %name, "No existing indexer to delete");
        }

        info!(
            stage = %stage,
            indexer = %name,
            data_source = %self.definition.data_source_name,
            skillset = ?self.definition.skillset_name,
            target_index = %self.definition.target_index_name,
            "Creating indexer"
        );
        self.search
            .create_indexer(&self.definition)
            .await
            .map_err(ProvisionError::IndexerCreation)?;
        info!(stage = %stage, indexer = %name, "Indexer created");

        let outcome = if deleted {
            StageOutcome::IndexerRecreated
        } else {
            StageOutcome::IndexerCreated
        };
        Ok(StageSuccess::new(outcome))
    }
}

