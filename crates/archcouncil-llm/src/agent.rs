use std::sync::Arc;
use std::time::{Duration, Instant};

use archcouncil_core::{CouncilError, Credential, Stage};
use tracing::{error, info};

use crate::generator::{GenerationRequest, TextGenerator};

/// Model parameters shared by every call in a session.
#[derive(Debug, Clone)]
pub struct AgentSettings {
    pub model: String,
    pub temperature: f32,
    pub timeout: Duration,
}

/// Issues one generation request per stage.
///
/// Checks the credential and prompt before touching the network, bounds the
/// call with `settings.timeout`, and logs every attempt with its outcome.
#[derive(Clone)]
pub struct AgentCall {
    generator: Arc<dyn TextGenerator>,
    settings: AgentSettings,
}

impl AgentCall {
    pub fn new(generator: Arc<dyn TextGenerator>, settings: AgentSettings) -> Self {
        Self {
            generator,
            settings,
        }
    }

    pub fn settings(&self) -> &AgentSettings {
        &self.settings
    }

    pub fn backend_name(&self) -> &str {
        self.generator.name()
    }

    pub async fn call(
        &self,
        stage: Stage,
        prompt: &str,
        api_key: Option<&str>,
    ) -> Result<String, CouncilError> {
        let prompt_len = prompt.chars().count();
        info!(
            stage = %stage,
            backend = self.generator.name(),
            model = %self.settings.model,
            prompt_len,
            "agent call started"
        );
        let started = Instant::now();
        let result = self.call_inner(stage, prompt, api_key).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(text) => info!(
                stage = %stage,
                prompt_len,
                elapsed_ms,
                response_len = text.chars().count(),
                "agent call succeeded"
            ),
            Err(e) => error!(
                stage = %stage,
                prompt_len,
                elapsed_ms,
                kind = e.kind(),
                "agent call failed: {e}"
            ),
        }
        result
    }

    async fn call_inner(
        &self,
        stage: Stage,
        prompt: &str,
        api_key: Option<&str>,
    ) -> Result<String, CouncilError> {
        let credential = Credential::parse(api_key)?;
        if prompt.trim().is_empty() {
            return Err(CouncilError::InvalidInput(format!("{stage} prompt is empty")));
        }

        let request = GenerationRequest {
            role: stage.role_name(),
            prompt,
            model: &self.settings.model,
            temperature: self.settings.temperature,
        };
        match tokio::time::timeout(
            self.settings.timeout,
            self.generator.generate(&request, &credential),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(CouncilError::Request(format!(
                "timed out after {}s",
                self.settings.timeout.as_secs_f32()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockGenerator;

    fn settings(timeout: Duration) -> AgentSettings {
        AgentSettings {
            model: "test-model".into(),
            temperature: 0.0,
            timeout,
        }
    }

    #[tokio::test]
    async fn passes_role_model_and_prompt() {
        let mock = Arc::new(MockGenerator::new().reply(Stage::Oss, "oss answer"));
        let agent = AgentCall::new(mock.clone(), settings(Duration::from_secs(5)));
        let out = agent.call(Stage::Oss, "the prompt", Some("key")).await.unwrap();
        assert_eq!(out, "oss answer");
        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].role, "oss_architect");
        assert_eq!(calls[0].model, "test-model");
        assert_eq!(calls[0].prompt, "the prompt");
    }

    #[tokio::test]
    async fn missing_credential_never_reaches_backend() {
        let mock = Arc::new(MockGenerator::new());
        let agent = AgentCall::new(mock.clone(), settings(Duration::from_secs(5)));
        for key in [None, Some(""), Some("   "), Some("bad key")] {
            for stage in Stage::ALL {
                let err = agent.call(stage, "prompt", key).await.unwrap_err();
                assert_eq!(err.kind(), "AuthenticationError");
            }
        }
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn empty_prompt_rejected_before_call() {
        let mock = Arc::new(MockGenerator::new());
        let agent = AgentCall::new(mock.clone(), settings(Duration::from_secs(5)));
        let err = agent.call(Stage::Cloud, " \n ", Some("key")).await.unwrap_err();
        assert_eq!(err.kind(), "InvalidInput");
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_backend_times_out_with_request_error() {
        let mock = Arc::new(MockGenerator::new().with_delay(Duration::from_secs(600)));
        let agent = AgentCall::new(mock, settings(Duration::from_secs(2)));
        let started = tokio::time::Instant::now();
        let err = agent.call(Stage::Cloud, "prompt", Some("key")).await.unwrap_err();
        assert_eq!(err.kind(), "RequestError");
        assert!(err.to_string().contains("timed out"));
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[tokio::test]
    async fn backend_errors_propagate_unchanged() {
        let mock = Arc::new(
            MockGenerator::new().fail(Stage::Lead, CouncilError::Response("garbled".into())),
        );
        let agent = AgentCall::new(mock, settings(Duration::from_secs(5)));
        let err = agent.call(Stage::Lead, "prompt", Some("key")).await.unwrap_err();
        assert_eq!(err, CouncilError::Response("garbled".into()));
    }
}
