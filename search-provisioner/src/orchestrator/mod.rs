//! Orchestrator module for the search provisioner.
//!
//! Runs the provisioning stages in order and aggregates their results.

use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{error, info, instrument, warn};

use crate::provisioner::Provisioner;
use crate::report::{RunReport, StageReport};
use crate::verifier::ResourceVerifier;

/// How the orchestrator reacts to a failed stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineMode {
    /// Run every stage regardless of earlier failures.
    #[default]
    BestEffort,
    /// Skip every stage after the first failure.
    Strict,
}

impl PipelineMode {
    /// Parse a pipeline mode.
    ///
    /// Valid values: "strict" or "best-effort" (case-insensitive, `_` or no
    /// separator also accepted). Anything else logs a warning and falls back
    /// to best-effort.
    pub fn from_str_lossy(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "strict" | "fail-fast" | "failfast" | "fail_fast" => Self::Strict,
            "best-effort" | "besteffort" | "best_effort" => Self::BestEffort,
            other => {
                warn!(value = %other, "Invalid pipeline mode, defaulting to 'best-effort'");
                Self::BestEffort
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BestEffort => "best-effort",
            Self::Strict => "strict",
        }
    }
}

impl fmt::Display for PipelineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PipelineMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from_str_lossy(&value))
    }
}

impl Serialize for PipelineMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Configuration for the orchestrator.
#[derive(Debug, Clone, Default)]
pub struct OrchestratorConfig {
    pub mode: PipelineMode,
}

/// Runs the provisioning stages in sequence.
///
/// Stage failures are never propagated as errors: they are recorded in the
/// returned [`RunReport`], which decides the process exit status.
pub struct Orchestrator {
    provisioners: Vec<Box<dyn Provisioner>>,
    config: OrchestratorConfig,
    verifier: Option<ResourceVerifier>,
}

impl Orchestrator {
    /// Create a new orchestrator with the default (best-effort) configuration.
    pub fn new(provisioners: Vec<Box<dyn Provisioner>>) -> Self {
        Self::with_config(provisioners, OrchestratorConfig::default())
    }

    /// Create a new orchestrator with custom configuration.
    pub fn with_config(
        provisioners: Vec<Box<dyn Provisioner>>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            provisioners,
            config,
            verifier: None,
        }
    }

    /// Read the resources back once every stage has run.
    pub fn with_verifier(mut self, verifier: ResourceVerifier) -> Self {
        self.verifier = Some(verifier);
        self
    }

    /// Run every stage and return the aggregated report.
    #[instrument(skip(self), fields(mode = %self.config.mode))]
    pub async fn run(&self) -> RunReport {
        info!(
            stage_count = self.provisioners.len(),
            mode = %self.config.mode,
            "Starting provisioning run"
        );
        let started = Instant::now();
        let mut stages = Vec::with_capacity(self.provisioners.len());
        let mut failed = false;

        for provisioner in &self.provisioners {
            let stage = provisioner.stage();

            if failed && self.config.mode == PipelineMode::Strict {
                warn!(stage = %stage, "Skipping stage after earlier failure");
                stages.push(StageReport::skipped(stage));
                continue;
            }

            let report = match provisioner.provision().await {
                Ok(success) => StageReport::succeeded(stage, success),
                Err(e) => {
                    error!(
                        stage = %stage,
                        status = ?e.service_error().and_then(|s| s.status()),
                        error = %e,
                        "Stage failed"
                    );
                    failed = true;
                    StageReport::failed(stage, e)
                }
            };
            stages.push(report);
        }

        let report = RunReport::new(stages, started.elapsed());
        match &self.verifier {
            Some(verifier) => report.with_verification(verifier.verify().await),
            None => report,
        }
    }
}
