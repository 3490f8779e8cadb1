//! # Search Provisioner
//!
//! Provisions the Azure AI Search resources of the catalog demo in a single
//! run: an index seeded with a generated catalog, a blob data source, an
//! enrichment skillset and an indexer wiring them together.
//!
//! ## Architecture
//!
//! Each resource is handled by its own provisioner, run in sequence:
//!
//! 1. **Index**: creates the catalog index and uploads sample documents when absent
//! 2. **Data source**: ensures the blob container, then registers the data source
//! 3. **Skillset**: registers the enabled subset of the skill library
//! 4. **Indexer**: deletes any previous indexer and creates it again
//!
//! The **orchestrator** runs the stages and aggregates their outcomes into a
//! [`report::RunReport`] that decides the process exit status.
//!
//! ## Modules
//!
//! - [`config`]: Settings file loading and dependency initialization
//! - [`provisioner`]: The four provisioning stages
//! - [`orchestrator`]: Stage sequencing and pipeline modes
//! - [`report`]: Per-stage results and the end-of-run summary
//! - [`verifier`]: Optional read-back of the provisioned resources
//! - [`errors`]: Error types for the stages

pub mod config;
pub mod errors;
pub mod orchestrator;
pub mod provisioner;
pub mod report;
pub mod verifier;

pub use config::{Dependencies, Settings};
pub use errors::ProvisionError;

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur before any stage runs.
#[derive(Error, Debug)]
pub enum AppError {
    /// The settings file does not exist.
    #[error("Settings file not found: {}", .0.display())]
    SettingsNotFound(PathBuf),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Failed to read the settings file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
