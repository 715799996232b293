use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use archcouncil_core::{CouncilError, Credential, Stage};
use async_trait::async_trait;

use crate::generator::{GenerationRequest, TextGenerator};

/// A call seen by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub role: String,
    pub prompt: String,
    pub model: String,
}

/// An offline generator with scripted replies per stage.
///
/// Stages without a script get an echo reply naming the role and the prompt
/// length, which is what `--mock` runs show.
pub struct MockGenerator {
    scripts: HashMap<&'static str, Result<String, CouncilError>>,
    delay: Option<Duration>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self {
            scripts: HashMap::new(),
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Reply to `stage` with `text`.
    pub fn reply(mut self, stage: Stage, text: &str) -> Self {
        self.scripts.insert(stage.role_name(), Ok(text.to_string()));
        self
    }

    /// Fail every call for `stage` with `err`.
    pub fn fail(mut self, stage: Stage, err: CouncilError) -> Self {
        self.scripts.insert(stage.role_name(), Err(err));
        self
    }

    /// Sleep before answering, to exercise timeouts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls().len()
    }

    pub fn calls_for(&self, stage: Stage) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.role == stage.role_name())
            .collect()
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(
        &self,
        request: &GenerationRequest<'_>,
        _credential: &Credential,
    ) -> Result<String, CouncilError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                role: request.role.to_string(),
                prompt: request.prompt.to_string(),
                model: request.model.to_string(),
            });
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.scripts.get(request.role) {
            Some(scripted) => scripted.clone(),
            None => Ok(format!(
                "[{}] response to a {}-character prompt",
                request.role,
                request.prompt.chars().count()
            )),
        }
    }
}
