use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CouncilError;

/// One step of the fixed three-step pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Cloud,
    Oss,
    Lead,
}

impl Stage {
    /// Pipeline order.
    pub const ALL: [Stage; 3] = [Stage::Cloud, Stage::Oss, Stage::Lead];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Cloud => "cloud",
            Stage::Oss => "oss",
            Stage::Lead => "lead",
        }
    }

    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "cloud" => Some(Stage::Cloud),
            "oss" => Some(Stage::Oss),
            "lead" => Some(Stage::Lead),
            _ => None,
        }
    }

    /// Agent role name, sent to the model as the system message.
    pub fn role_name(&self) -> &'static str {
        match self {
            Stage::Cloud => "cloud_architect",
            Stage::Oss => "oss_architect",
            Stage::Lead => "lead_architect",
        }
    }

    /// Section heading used in exported documents.
    pub fn title(&self) -> &'static str {
        match self {
            Stage::Cloud => "Cloud Architecture Proposal",
            Stage::Oss => "Open-Source Architecture Proposal",
            Stage::Lead => "Lead Architect Recommendation",
        }
    }

    /// Stages whose output this stage consumes.
    pub fn upstream(&self) -> &'static [Stage] {
        match self {
            Stage::Cloud | Stage::Oss => &[],
            Stage::Lead => &[Stage::Cloud, Stage::Oss],
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Stage::Cloud => 0,
            Stage::Oss => 1,
            Stage::Lead => 2,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a stage in the most recent run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StageStatus {
    #[default]
    NotRun,
    Succeeded,
    Failed(CouncilError),
}

impl StageStatus {
    pub fn is_skipped(&self) -> bool {
        matches!(
            self,
            StageStatus::Failed(CouncilError::SkippedDueToUpstreamFailure { .. })
        )
    }

    pub fn error(&self) -> Option<&CouncilError> {
        match self {
            StageStatus::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            StageStatus::NotRun => "not run".to_string(),
            StageStatus::Succeeded => "succeeded".to_string(),
            StageStatus::Failed(e) if self.is_skipped() => format!("skipped ({e})"),
            StageStatus::Failed(e) => format!("failed [{}]: {e}", e.kind()),
        }
    }
}
