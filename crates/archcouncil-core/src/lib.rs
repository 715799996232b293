pub mod credential;
pub mod error;
pub mod prompts;
pub mod session;
pub mod stage;

pub use credential::Credential;
pub use error::CouncilError;
pub use prompts::{PromptTemplates, PromptsFile};
pub use session::Session;
pub use stage::{Stage, StageStatus};
