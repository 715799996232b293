use archcouncil_core::{CouncilError, Credential};
use async_trait::async_trait;

/// One text-generation request, already fully substituted.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    /// Agent role, sent as the system message.
    pub role: &'a str,
    pub prompt: &'a str,
    pub model: &'a str,
    pub temperature: f32,
}

/// Trait for text-generation endpoints.
///
/// Implementations only talk to the endpoint. Credential validation,
/// the call timeout and logging are handled by [`crate::AgentCall`].
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    async fn generate(
        &self,
        request: &GenerationRequest<'_>,
        credential: &Credential,
    ) -> Result<String, CouncilError>;
}
