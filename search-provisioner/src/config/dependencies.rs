//! Dependency initialization and wiring for the search provisioner.

use std::sync::Arc;

use tracing::info;

use search_provisioner_repository::{
    AzureBlobProvider, AzureSearchProvider, BlobContainerProvider, SearchServiceProvider,
};

use super::Settings;
use crate::orchestrator::{Orchestrator, OrchestratorConfig};
use crate::provisioner::build_provisioners;
use crate::verifier::ResourceVerifier;
use crate::AppError;

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured orchestrator ready to run.
    pub orchestrator: Orchestrator,
}

impl Dependencies {
    /// Build the Azure providers from validated settings and wire the orchestrator.
    ///
    /// No remote call is made here; credentials are only exercised once the
    /// stages run.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(AppError)` - If an endpoint is malformed or an HTTP client cannot be built
    pub fn new(settings: &Settings) -> Result<Self, AppError> {
        let search_config = settings.search_config();
        let blob_config = settings.blob_config();

        info!(
            search_endpoint = %search_config.endpoint,
            api_version = %search_config.api_version,
            storage_account = %blob_config.account_name,
            mode = %settings.pipeline.mode,
            timeout_secs = settings.pipeline.request_timeout_secs,
            "Initializing dependencies"
        );

        let search = AzureSearchProvider::new(search_config).map_err(|e| {
            AppError::config(format!("Failed to create search provider: {}", e))
        })?;
        let blob = AzureBlobProvider::new(blob_config).map_err(|e| {
            AppError::config(format!("Failed to create blob storage provider: {}", e))
        })?;

        Ok(Self::with_providers(settings, Arc::new(search), Arc::new(blob)))
    }

    /// Wire the orchestrator around the given providers.
    pub fn with_providers(
        settings: &Settings,
        search: Arc<dyn SearchServiceProvider>,
        blob: Arc<dyn BlobContainerProvider>,
    ) -> Self {
        let provisioners = build_provisioners(
            search.clone(),
            blob,
            &settings.resources,
            &settings.pipeline,
        );
        let config = OrchestratorConfig {
            mode: settings.pipeline.mode,
        };

        let mut orchestrator = Orchestrator::with_config(provisioners, config);
        if settings.pipeline.verify {
            orchestrator = orchestrator
                .with_verifier(ResourceVerifier::new(search, settings.resources.clone()));
        }

        Self { orchestrator }
    }
}
