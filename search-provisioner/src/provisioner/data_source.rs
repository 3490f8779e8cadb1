//! Data source stage: ensure the blob container, then register the data source.

use std::sync::Arc;

use async_trait::async_trait;
use search_provisioner_repository::{
    BlobContainerProvider, ContainerStatus, DataSourceDefinition, SearchServiceProvider,
};
use tracing::{info, instrument, warn};

use super::{Provisioner, Stage, StageOutcome, StageSuccess};
use crate::errors::ProvisionError;

/// Registers a blob data source over a storage container.
///
/// The container step is best effort: a failure is recorded as a warning and
/// the registration is attempted regardless, since the container may have
/// been created out of band.
pub struct DataSourceProvisioner {
    search: Arc<dyn SearchServiceProvider>,
    blob: Arc<dyn BlobContainerProvider>,
    data_source_name: String,
    container: String,
}

impl DataSourceProvisioner {
    pub fn new(
        search: Arc<dyn SearchServiceProvider>,
        blob: Arc<dyn BlobContainerProvider>,
        data_source_name: impl Into<String>,
        container: impl Into<String>,
    ) -> Self {
        Self {
            search,
            blob,
            data_source_name: data_source_name.into(),
            container: container.into(),
        }
    }
}

#[async_trait]
impl Provisioner for DataSourceProvisioner {
    fn stage(&self) -> Stage {
        Stage::DataSource
    }

    #[instrument(skip(self), fields(data_source = %self.data_source_name))]
    async fn provision(&self) -> Result<StageSuccess, ProvisionError> {
        let stage = self.stage();
        let mut container_warning = None;

        let container_status = match self
            .blob
            .create_container_if_not_exists(&self.container)
            .await
        {
            Ok(status) => {
                match status {
                    ContainerStatus::Created => {
                        info!(stage = %stage, container = %self.container, "Container created")
                    }
                    ContainerStatus::AlreadyExists => {
                        info!(
                            stage = %stage,
                            container = %self.container,
                            "Container already exists"
                        )
                    }
                }
                Some(status)
            }
            Err(e) => {
                warn!(
                    stage = %stage,
                    container = %self.container,
                    error = %e,
                    "Failed to ensure container, registering data source anyway"
                );
                container_warning = Some(format!(
                    "Container '{}' could not be ensured: {}",
                    self.container, e
                ));
                None
            }
        };

        let definition = DataSourceDefinition::azure_blob(
            &self.data_source_name,
            self.blob.connection_string(),
            &self.container,
        );

        info!(stage = %stage, data_source = %self.data_source_name, "Registering data source");
        self.search
            .create_or_update_data_source(&definition)
            .await
            .map_err(ProvisionError::DataSourceRegistration)?;
        info!(stage = %stage, data_source = %self.data_source_name, "Data source registered");

        let success = StageSuccess::new(StageOutcome::DataSourceRegistered {
            container: container_status,
        });
        Ok(match container_warning {
            Some(warning) => success.with_warning(warning),
            None => success,
        })
    }
}
