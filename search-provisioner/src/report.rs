//! Per-stage results and the end-of-run summary.

use std::time::Duration;

use tracing::{error, info, warn};

use crate::errors::ProvisionError;
use crate::provisioner::{Stage, StageOutcome, StageSuccess};
use crate::verifier::{ResourceCheck, ResourceVerification};

/// Final state of one stage.
#[derive(Debug, Clone)]
pub enum StageStatus {
    Succeeded(StageOutcome),
    Failed(ProvisionError),
    /// Not attempted because an earlier stage failed in strict mode.
    Skipped,
}

#[derive(Debug, Clone)]
pub struct StageReport {
    pub stage: Stage,
    pub status: StageStatus,
    pub warnings: Vec<String>,
}

impl StageReport {
    pub fn succeeded(stage: Stage, success: StageSuccess) -> Self {
        Self {
            stage,
            status: StageStatus::Succeeded(success.outcome),
            warnings: success.warnings,
        }
    }

    pub fn failed(stage: Stage, error: ProvisionError) -> Self {
        Self {
            stage,
            status: StageStatus::Failed(error),
            warnings: Vec::new(),
        }
    }

    pub fn skipped(stage: Stage) -> Self {
        Self {
            stage,
            status: StageStatus::Skipped,
            warnings: Vec::new(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, StageStatus::Failed(_))
    }

    pub fn outcome(&self) -> Option<&StageOutcome> {
        match &self.status {
            StageStatus::Succeeded(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ProvisionError> {
        match &self.status {
            StageStatus::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Aggregated result of a provisioning run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub stages: Vec<StageReport>,
    pub elapsed: Duration,
    /// Read-back results; empty when verification is disabled.
    pub verification: Vec<ResourceVerification>,
}

impl RunReport {
    pub fn new(stages: Vec<StageReport>, elapsed: Duration) -> Self {
        Self {
            stages,
            elapsed,
            verification: Vec::new(),
        }
    }

    pub fn with_verification(mut self, verification: Vec<ResourceVerification>) -> Self {
        self.verification = verification;
        self
    }

    /// Read-back result for a stage's resource, if verification ran.
    pub fn verified(&self, stage: Stage) -> Option<&ResourceVerification> {
        self.verification.iter().find(|v| v.stage == stage)
    }

    /// Resources that could not be read back or were missing.
    pub fn unverified(&self) -> usize {
        self.verification
            .iter()
            .filter(|v| !matches!(v.result, Ok(ref check) if *check != ResourceCheck::Missing))
            .count()
    }

    /// True when no stage failed.
    pub fn is_success(&self) -> bool {
        !self.stages.iter().any(StageReport::is_failed)
    }

    pub fn succeeded(&self) -> usize {
        self.count(|s| matches!(s, StageStatus::Succeeded(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, StageStatus::Failed(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, StageStatus::Skipped))
    }

    pub fn warning_count(&self) -> usize {
        self.stages.iter().map(|s| s.warnings.len()).sum()
    }

    fn count(&self, predicate: impl Fn(&StageStatus) -> bool) -> usize {
        self.stages.iter().filter(|s| predicate(&s.status)).count()
    }

    /// Report for a given stage, if it was part of the run.
    pub fn stage(&self, stage: Stage) -> Option<&StageReport> {
        self.stages.iter().find(|s| s.stage == stage)
    }

    /// Process exit status: 0 on success, 1 if any stage failed.
    pub fn exit_status(&self) -> u8 {
        if self.is_success() {
            0
        } else {
            1
        }
    }

    /// Log one line per stage followed by the final summary.
    pub fn log_summary(&self) {
        for report in &self.stages {
            let stage = report.stage;
            match &report.status {
                StageStatus::Succeeded(outcome) => {
                    info!(stage = %stage, outcome = %outcome, "Stage succeeded")
                }
                StageStatus::Failed(e) => error!(stage = %stage, error = %e, "Stage failed"),
                StageStatus::Skipped => warn!(stage = %stage, "Stage skipped"),
            }
            for warning in &report.warnings {
                warn!(stage = %stage, warning = %warning, "Stage warning");
            }
        }

        info!(
            succeeded = self.succeeded(),
            failed = self.failed(),
            skipped = self.skipped(),
            warnings = self.warning_count(),
            verified = self.verification.len() - self.unverified(),
            unverified = self.unverified(),
            elapsed_ms = self.elapsed.as_millis() as u64,
            "Completed"
        );
    }
}
