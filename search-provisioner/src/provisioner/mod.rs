//! Provisioning stages.
//!
//! Each remote resource is handled by one [`Provisioner`]. A provisioner
//! performs its calls, logs them under its [`Stage`] tag and returns either
//! a [`StageSuccess`] or a [`ProvisionError`]; it never panics on remote
//! failures.

mod data_source;
mod index;
mod indexer;
mod skillset;

pub use data_source::DataSourceProvisioner;
pub use index::IndexProvisioner;
pub use indexer::IndexerProvisioner;
pub use skillset::SkillsetProvisioner;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use search_provisioner_repository::{BlobContainerProvider, ContainerStatus, SearchServiceProvider};

use crate::config::{PipelineSettings, ResourceNames};
use crate::errors::ProvisionError;

/// The provisioning stages, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Index,
    DataSource,
    Skillset,
    Indexer,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::Index, Stage::DataSource, Stage::Skillset, Stage::Indexer];

    /// Bracketed tag carried by every log event of the stage.
    pub fn tag(&self) -> &'static str {
        match self {
            Stage::Index => "[INDEX]",
            Stage::DataSource => "[DATA SOURCE]",
            Stage::Skillset => "[SKILLSET]",
            Stage::Indexer => "[INDEXER]",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// What a successful stage did.
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutcome {
    /// The index was created and seeded with `documents` catalog items.
    IndexCreated { documents: usize },
    /// The index was already present; nothing was changed.
    IndexAlreadyExists,
    /// The data source was registered. `container` is `None` when the
    /// container step failed and was downgraded to a warning.
    DataSourceRegistered { container: Option<ContainerStatus> },
    /// The skillset was registered with `skills` skills.
    SkillsetRegistered { skills: usize },
    /// The indexer was created; no previous indexer existed.
    IndexerCreated,
    /// A previous indexer was deleted and the indexer created again.
    IndexerRecreated,
}

impl fmt::Display for StageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageOutcome::IndexCreated { documents } => {
                write!(f, "created, {} documents uploaded", documents)
            }
            StageOutcome::IndexAlreadyExists => f.write_str("already exists"),
            StageOutcome::DataSourceRegistered { container } => match container {
                Some(ContainerStatus::Created) => f.write_str("registered, container created"),
                Some(ContainerStatus::AlreadyExists) => {
                    f.write_str("registered, container already exists")
                }
                None => f.write_str("registered, container not ensured"),
            },
            StageOutcome::SkillsetRegistered { skills } => {
                write!(f, "registered with {} skill(s)", skills)
            }
            StageOutcome::IndexerCreated => f.write_str("created"),
            StageOutcome::IndexerRecreated => f.write_str("recreated"),
        }
    }
}

/// A successful stage together with the non-fatal problems it ran into.
#[derive(Debug, Clone, PartialEq)]
pub struct StageSuccess {
    pub outcome: StageOutcome,
    pub warnings: Vec<String>,
}

impl StageSuccess {
    pub fn new(outcome: StageOutcome) -> Self {
        Self {
            outcome,
            warnings: Vec::new(),
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }
}

/// One provisioning stage.
#[async_trait]
pub trait Provisioner: Send + Sync {
    /// The stage this provisioner implements.
    fn stage(&self) -> Stage;

    /// Bring the remote resource to its desired state.
    async fn provision(&self) -> Result<StageSuccess, ProvisionError>;
}

/// Build the four provisioners in execution order.
pub fn build_provisioners(
    search: Arc<dyn SearchServiceProvider>,
    blob: Arc<dyn BlobContainerProvider>,
    resources: &ResourceNames,
    pipeline: &PipelineSettings,
) -> Vec<Box<dyn Provisioner>> {
    vec![
        Box::new(IndexProvisioner::new(
            search.clone(),
            &resources.index,
            pipeline.catalog_size,
        )),
        Box::new(DataSourceProvisioner::new(
            search.clone(),
            blob,
            &resources.data_source,
            &resources.container,
        )),
        Box::new(SkillsetProvisioner::new(
            search.clone(),
            &resources.skillset,
            pipeline.enabled_skills.clone(),
        )),
        Box::new(IndexerProvisioner::new(search, resources)),
    ]
}
