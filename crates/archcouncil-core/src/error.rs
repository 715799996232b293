use thiserror::Error;

use crate::stage::Stage;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CouncilError {
    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("bad response: {0}")]
    Response(String),

    #[error("{stage} stage skipped: no output from {}", join_stages(.missing))]
    SkippedDueToUpstreamFailure { stage: Stage, missing: Vec<Stage> },

    #[error("export write failed for {path}: {message}")]
    ExportWrite { path: String, message: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl CouncilError {
    /// Stable kind name, used in log entries and status lines.
    pub fn kind(&self) -> &'static str {
        match self {
            CouncilError::Authentication(_) => "AuthenticationError",
            CouncilError::Request(_) => "RequestError",
            CouncilError::Response(_) => "ResponseError",
            CouncilError::SkippedDueToUpstreamFailure { .. } => "SkippedDueToUpstreamFailure",
            CouncilError::ExportWrite { .. } => "ExportWriteError",
            CouncilError::InvalidInput(_) => "InvalidInput",
        }
    }
}

fn join_stages(stages: &[Stage]) -> String {
    stages
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
