use serde::{Deserialize, Serialize};

use crate::error::CouncilError;
use crate::stage::Stage;

/// The three editable agent templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTemplates {
    pub cloud_architect: String,
    pub oss_architect: String,
    pub lead_architect: String,
}

impl PromptTemplates {
    pub fn get(&self, stage: Stage) -> &str {
        match stage {
            Stage::Cloud => &self.cloud_architect,
            Stage::Oss => &self.oss_architect,
            Stage::Lead => &self.lead_architect,
        }
    }

    pub fn set(&mut self, stage: Stage, template: String) {
        match stage {
            Stage::Cloud => self.cloud_architect = template,
            Stage::Oss => self.oss_architect = template,
            Stage::Lead => self.lead_architect = template,
        }
    }
}

/// On-disk prompts snapshot, written on export and read back by `load-prompts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptsFile {
    #[serde(default)]
    pub problem_statement: Option<String>,
    pub templates: PromptTemplates,
}

impl PromptsFile {
    pub fn to_json_pretty(&self) -> Result<String, CouncilError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CouncilError::InvalidInput(format!("serialize prompts: {e}")))
    }

    pub fn from_json(raw: &str) -> Result<Self, CouncilError> {
        serde_json::from_str(raw)
            .map_err(|e| CouncilError::InvalidInput(format!("parse prompts file: {e}")))
    }
}
