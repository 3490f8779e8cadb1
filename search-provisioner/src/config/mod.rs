//! Settings loading and dependency wiring.
//!
//! Settings come from a JSON file (`appsettings.json` by default) and can be
//! overridden through environment variables, which `main` loads from a `.env`
//! file when one is present.

mod dependencies;

pub use dependencies::Dependencies;

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use search_provisioner_repository::azure::{validate_container_name, SkillKind};
use search_provisioner_repository::utils::validate_resource_name;
use search_provisioner_repository::{BlobStorageConfig, SearchServiceConfig};
use search_provisioner_shared::DEFAULT_CATALOG_SIZE;

use crate::orchestrator::PipelineMode;
use crate::AppError;

/// Settings file used when neither a CLI argument nor `SETTINGS_PATH` is given.
pub const DEFAULT_SETTINGS_PATH: &str = "appsettings.json";

/// Default request timeout for both services.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Resolve the settings file path.
///
/// The first command-line argument wins over `SETTINGS_PATH`, which wins over
/// [`DEFAULT_SETTINGS_PATH`].
pub fn settings_path(cli_arg: Option<String>, env_value: Option<String>) -> PathBuf {
    let non_blank = |p: &String| !p.trim().is_empty();
    cli_arg
        .filter(non_blank)
        .or_else(|| env_value.filter(non_blank))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_PATH))
}

/// The search service section (`AISearch`).
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchSettings {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub key: String,
    /// Overrides `https://{name}.search.windows.net`.
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub api_version: Option<String>,
}

impl fmt::Debug for SearchSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchSettings")
            .field("name", &self.name)
            .field("endpoint", &self.endpoint)
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}

/// The storage account section (`StorageAccount`).
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StorageSettings {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub key: String,
    /// Overrides `https://{name}.blob.core.windows.net`.
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl fmt::Debug for StorageSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageSettings")
            .field("name", &self.name)
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

/// Names of the provisioned resources (`Resources`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ResourceNames {
    pub index: String,
    pub data_source: String,
    pub skillset: String,
    pub indexer: String,
    pub container: String,
}

impl Default for ResourceNames {
    fn default() -> Self {
        Self {
            index: "catalog-index".to_string(),
            data_source: "catalog-blob-datasource".to_string(),
            skillset: "catalog-skillset".to_string(),
            indexer: "catalog-indexer".to_string(),
            container: "catalog-documents".to_string(),
        }
    }
}

/// Run behaviour (`Pipeline`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PipelineSettings {
    pub mode: PipelineMode,
    pub enabled_skills: Vec<SkillKind>,
    pub catalog_size: usize,
    /// Read the resources back after the run and log them.
    pub verify: bool,
    pub request_timeout_secs: u64,
    /// Documents per upload request; `None` uses the service limit.
    pub max_batch_size: Option<usize>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            mode: PipelineMode::default(),
            enabled_skills: SkillKind::DEFAULT_ENABLED.to_vec(),
            catalog_size: DEFAULT_CATALOG_SIZE,
            verify: false,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            max_batch_size: None,
        }
    }
}

/// Complete application settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(rename = "AISearch", default)]
    pub search: SearchSettings,
    #[serde(rename = "StorageAccount", default)]
    pub storage: StorageSettings,
    #[serde(rename = "Resources", default)]
    pub resources: ResourceNames,
    #[serde(rename = "Pipeline", default)]
    pub pipeline: PipelineSettings,
}

impl Settings {
    /// Parse settings from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        serde_json::from_str(json)
            .map_err(|e| AppError::config(format!("Invalid settings file: {}", e)))
    }

    /// Read and parse a settings file.
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - The parsed settings, without environment overrides
    /// * `Err(AppError::SettingsNotFound)` - If the file does not exist
    /// * `Err(AppError)` - If the file cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self, AppError> {
        if !path.is_file() {
            return Err(AppError::SettingsNotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Load a settings file, apply environment overrides and validate.
    pub fn resolve(path: &Path) -> Result<Self, AppError> {
        let mut settings = Self::load(path)?;
        settings.apply_overrides(|key| env::var(key).ok());
        settings.validate()?;
        Ok(settings)
    }

    /// Apply overrides from a variable lookup, typically the process environment.
    ///
    /// Empty values are ignored. Unparseable numbers are ignored with a warning.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("AISEARCH_NAME") {
            self.search.name = v;
        }
        if let Some(v) = get("AISEARCH_KEY") {
            self.search.key = v;
        }
        if let Some(v) = get("AISEARCH_ENDPOINT") {
            self.search.endpoint = Some(v);
        }
        if let Some(v) = get("SEARCH_API_VERSION") {
            self.search.api_version = Some(v);
        }
        if let Some(v) = get("STORAGE_ACCOUNT_NAME") {
            self.storage.name = v;
        }
        if let Some(v) = get("STORAGE_ACCOUNT_KEY") {
            self.storage.key = v;
        }
        if let Some(v) = get("STORAGE_ACCOUNT_ENDPOINT") {
            self.storage.endpoint = Some(v);
        }
        if let Some(v) = get("PIPELINE_MODE") {
            self.pipeline.mode = PipelineMode::from_str_lossy(&v);
        }
        if let Some(v) = get("REQUEST_TIMEOUT_SECS") {
            match v.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => self.pipeline.request_timeout_secs = secs,
                _ => warn!(value = %v, "Invalid REQUEST_TIMEOUT_SECS, keeping configured timeout"),
            }
        }
    }

    /// Check required values and resource names.
    pub fn validate(&self) -> Result<(), AppError> {
        let required = [
            ("AISearch:Name", &self.search.name),
            ("AISearch:Key", &self.search.key),
            ("StorageAccount:Name", &self.storage.name),
            ("StorageAccount:Key", &self.storage.key),
        ];
        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(key, _)| *key)
            .collect();
        if !missing.is_empty() {
            return Err(AppError::config(format!(
                "Missing required settings: {}",
                missing.join(", ")
            )));
        }

        let names = [
            ("index", &self.resources.index),
            ("data source", &self.resources.data_source),
            ("skillset", &self.resources.skillset),
            ("indexer", &self.resources.indexer),
        ];
        for (kind, name) in names {
            validate_resource_name(kind, name).map_err(|e| AppError::config(e.to_string()))?;
        }
        validate_container_name(&self.resources.container)
            .map_err(|e| AppError::config(e.to_string()))?;

        if self.pipeline.request_timeout_secs == 0 {
            return Err(AppError::config("Pipeline:RequestTimeoutSecs must be positive"));
        }
        if self.pipeline.max_batch_size == Some(0) {
            return Err(AppError::config("Pipeline:MaxBatchSize must be positive"));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.pipeline.request_timeout_secs)
    }

    /// Connection settings for the search service.
    pub fn search_config(&self) -> SearchServiceConfig {
        let config = match &self.search.endpoint {
            Some(endpoint) => SearchServiceConfig::new(endpoint, &self.search.key),
            None => SearchServiceConfig::for_service(&self.search.name, &self.search.key),
        };
        let config = match &self.search.api_version {
            Some(version) => config.with_api_version(version),
            None => config,
        };
        config
            .with_timeout(self.request_timeout())
            .with_max_batch_size(self.pipeline.max_batch_size)
    }

    /// Connection settings for the storage account.
    pub fn blob_config(&self) -> BlobStorageConfig {
        let config = BlobStorageConfig::new(&self.storage.name, &self.storage.key);
        let config = match &self.storage.endpoint {
            Some(endpoint) => config.with_endpoint(endpoint),
            None => config,
        };
        config.with_timeout(self.request_timeout())
    }
}
