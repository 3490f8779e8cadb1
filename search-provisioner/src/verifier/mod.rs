//! Post-run verification.
//!
//! Reads the provisioned resources back through the search service and logs
//! what the service reports. Verification never affects the exit status.

use std::sync::Arc;

use search_provisioner_repository::{SearchServiceError, SearchServiceProvider};
use tracing::{info, instrument, warn};

use crate::config::ResourceNames;
use crate::provisioner::Stage;

/// What the service reported for one resource.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceCheck {
    Index { documents: u64 },
    DataSource { container: String },
    Skillset { skills: usize },
    Indexer {
        data_source: String,
        target_index: String,
        skillset: Option<String>,
    },
    Missing,
}

/// Read-back result for one stage's resource.
#[derive(Debug, Clone)]
pub struct ResourceVerification {
    pub stage: Stage,
    pub result: Result<ResourceCheck, SearchServiceError>,
}

pub struct ResourceVerifier {
    search: Arc<dyn SearchServiceProvider>,
    resources: ResourceNames,
}

impl ResourceVerifier {
    pub fn new(search: Arc<dyn SearchServiceProvider>, resources: ResourceNames) -> Self {
        Self { search, resources }
    }

    /// Check every resource and log the result.
    #[instrument(skip(self))]
    pub async fn verify(&self) -> Vec<ResourceVerification> {
        let mut checks = Vec::with_capacity(Stage::ALL.len());
        for stage in Stage::ALL {
            let result = self.check(stage).await;
            match &result {
                Ok(ResourceCheck::Missing) => {
                    warn!(stage = %stage, "Resource not found on read-back")
                }
                Ok(check) => info!(stage = %stage, check = ?check, "Resource verified"),
                Err(e) => warn!(stage = %stage, error = %e, "Failed to read resource back"),
            }
            checks.push(ResourceVerification { stage, result });
        }
        checks
    }

    async fn check(&self, stage: Stage) -> Result<ResourceCheck, SearchServiceError> {
        let names = &self.resources;
        let check = match stage {
            Stage::Index => match self.search.get_index(&names.index).await? {
                Some(_) => ResourceCheck::Index {
                    documents: self.search.document_count(&names.index).await?,
                },
                None => ResourceCheck::Missing,
            },
            Stage::DataSource => self
                .search
                .get_data_source(&names.data_source)
                .await?
                .map_or(ResourceCheck::Missing, |ds| ResourceCheck::DataSource {
                    container: ds.container.name,
                }),
            Stage::Skillset => self
                .search
                .get_skillset(&names.skillset)
                .await?
                .map_or(ResourceCheck::Missing, |s| ResourceCheck::Skillset {
                    skills: s.skills.len(),
                }),
            Stage::Indexer => self
                .search
                .get_indexer(&names.indexer)
                .await?
                .map_or(ResourceCheck::Missing, |ix| ResourceCheck::Indexer {
                    data_source: ix.data_source_name,
                    target_index: ix.target_index_name,
                    skillset: ix.skillset_name,
                }),
        };
        Ok(check)
    }
}
