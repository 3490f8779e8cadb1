//! Skillset stage: register the enabled subset of the skill library.

use std::sync::Arc;

use async_trait::async_trait;
use search_provisioner_repository::azure::{skillset_definition, SkillKind};
use search_provisioner_repository::SearchServiceProvider;
use tracing::{info, instrument};

use super::{Provisioner, Stage, StageOutcome, StageSuccess};
use crate::errors::ProvisionError;

pub struct SkillsetProvisioner {
    search: Arc<dyn SearchServiceProvider>,
    skillset_name: String,
    enabled: Vec<SkillKind>,
}

impl SkillsetProvisioner {
    pub fn new(
        search: Arc<dyn SearchServiceProvider>,
        skillset_name: impl Into<String>,
        enabled: Vec<SkillKind>,
    ) -> Self {
        Self {
            search,
            skillset_name: skillset_name.into(),
            enabled,
        }
    }
}

#[async_trait]
impl Provisioner for SkillsetProvisioner {
    fn stage(&self) -> Stage {
        Stage::Skillset
    }

    #[instrument(skip(self), fields(skillset = %self.skillset_name))]
    async fn provision(&self) -> Result<StageSuccess, ProvisionError> {
        let stage = self.stage();

        let definition = skillset_definition(&self.skillset_name, &self.enabled)
            .map_err(|e| ProvisionError::validation(e.to_string()))?;
        let skills: Vec<&str> = definition.skills.iter().map(|s| s.name.as_str()).collect();

        info!(
            stage = %stage,
            skillset = %self.skillset_name,
            skills = ?skills,
            "Registering skillset"
        );
        self.search
            .create_or_update_skillset(&definition)
            .await
            .map_err(ProvisionError::SkillsetRegistration)?;
        info!(stage = %stage, skillset = %self.skillset_name, "Skillset registered");

        Ok(StageSuccess::new(StageOutcome::SkillsetRegistered {
            skills: definition.skills.len(),
        }))
    }
}
