use archcouncil_core::{CouncilError, PromptTemplates, Stage};
use archcouncil_llm::AgentCall;
use archcouncil_prompts::PromptContext;
use tracing::{info, warn};

/// Snapshot of everything a run needs. Owned, so later edits to the session
/// cannot reach a run that is already in progress.
#[derive(Debug, Clone)]
pub struct PipelineInput {
    pub problem: String,
    pub templates: PromptTemplates,
    pub api_key: Option<String>,
}

/// Result of one stage in a run.
#[derive(Debug, Clone)]
pub struct StageReport {
    pub stage: Stage,
    pub result: Result<String, CouncilError>,
}

/// Per-stage results of a full run, in pipeline order.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub stages: Vec<StageReport>,
}

impl PipelineReport {
    pub fn result(&self, stage: Stage) -> Option<&Result<String, CouncilError>> {
        self.stages
            .iter()
            .find(|r| r.stage == stage)
            .map(|r| &r.result)
    }

    pub fn output(&self, stage: Stage) -> Option<&str> {
        self.result(stage)
            .and_then(|r| r.as_ref().ok())
            .map(String::as_str)
    }

    pub fn is_complete(&self) -> bool {
        self.stages.iter().all(|r| r.result.is_ok())
    }
}

/// Runs the cloud, OSS and lead agents in dependency order.
pub struct Pipeline {
    agent: AgentCall,
}

impl Pipeline {
    pub fn new(agent: AgentCall) -> Self {
        Self { agent }
    }

    pub fn agent(&self) -> &AgentCall {
        &self.agent
    }

    /// Run all three stages.
    ///
    /// The cloud and OSS stages are independent, so a failure in one does not
    /// stop the other. The lead stage is skipped, with no call made, unless
    /// both succeed. Nothing is retried.
    pub async fn run(&self, input: &PipelineInput) -> Result<PipelineReport, CouncilError> {
        check_input(input)?;
        info!(
            problem_len = input.problem.chars().count(),
            backend = self.agent.backend_name(),
            "pipeline started"
        );

        let cloud = self.run_stage(Stage::Cloud, input, None, None).await;
        let oss = self.run_stage(Stage::Oss, input, None, None).await;
        let lead = self
            .run_stage(
                Stage::Lead,
                input,
                cloud.as_ref().ok().map(String::as_str),
                oss.as_ref().ok().map(String::as_str),
            )
            .await;

        let report = PipelineReport {
            stages: vec![
                StageReport {
                    stage: Stage::Cloud,
                    result: cloud,
                },
                StageReport {
                    stage: Stage::Oss,
                    result: oss,
                },
                StageReport {
                    stage: Stage::Lead,
                    result: lead,
                },
            ],
        };
        info!(complete = report.is_complete(), "pipeline finished");
        Ok(report)
    }

    /// Run one stage. The lead stage takes the earlier proposals as arguments
    /// and is skipped if either is absent.
    pub async fn run_stage(
        &self,
        stage: Stage,
        input: &PipelineInput,
        cloud_proposal: Option<&str>,
        oss_proposal: Option<&str>,
    ) -> Result<String, CouncilError> {
        let mut ctx = PromptContext::new(input.problem.as_str());
        if stage == Stage::Lead {
            let missing: Vec<Stage> = [(Stage::Cloud, cloud_proposal), (Stage::Oss, oss_proposal)]
                .into_iter()
                .filter(|(_, output)| output.is_none())
                .map(|(s, _)| s)
                .collect();
            if !missing.is_empty() {
                let err = CouncilError::SkippedDueToUpstreamFailure { stage, missing };
                warn!(stage = %stage, "{err}");
                return Err(err);
            }
            ctx.cloud_proposal = cloud_proposal.map(String::from);
            ctx.oss_proposal = oss_proposal.map(String::from);
        }

        info!("running {stage} agent");
        let prompt = archcouncil_prompts::assemble_prompt(&input.templates, stage, &ctx)?;
        self.agent
            .call(stage, &prompt, input.api_key.as_deref())
            .await
    }
}

/// Reject runs that cannot produce anything useful before any call is made.
pub fn check_input(input: &PipelineInput) -> Result<(), CouncilError> {
    if input.problem.trim().is_empty() {
        return Err(CouncilError::InvalidInput(
            "enter a problem statement before running".into(),
        ));
    }
    archcouncil_prompts::validate_templates(&input.templates)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use archcouncil_llm::{AgentSettings, MockGenerator};
    use archcouncil_prompts::default_templates;

    use super::*;

    fn pipeline(mock: Arc<MockGenerator>) -> Pipeline {
        Pipeline::new(AgentCall::new(
            mock,
            AgentSettings {
                model: "test-model".into(),
                temperature: 0.0,
                timeout: Duration::from_secs(5),
            },
        ))
    }

    fn input() -> PipelineInput {
        PipelineInput {
            problem: "Design an IoT telemetry platform".into(),
            templates: default_templates(),
            api_key: Some("gsk_test".into()),
        }
    }

    #[tokio::test]
    async fn produces_three_outputs_in_order() {
        let mock = Arc::new(
            MockGenerator::new()
                .reply(Stage::Cloud, "CLOUD PROPOSAL BODY")
                .reply(Stage::Oss, "OSS PROPOSAL BODY")
                .reply(Stage::Lead, "FINAL RECOMMENDATION"),
        );
        let report = pipeline(mock.clone()).run(&input()).await.unwrap();

        assert!(report.is_complete());
        let stages: Vec<Stage> = report.stages.iter().map(|r| r.stage).collect();
        assert_eq!(stages, Stage::ALL.to_vec());
        assert_eq!(report.output(Stage::Cloud), Some("CLOUD PROPOSAL BODY"));
        assert_eq!(report.output(Stage::Oss), Some("OSS PROPOSAL BODY"));
        assert_eq!(report.output(Stage::Lead), Some("FINAL RECOMMENDATION"));

        let calls = mock.calls();
        let roles: Vec<&str> = calls.iter().map(|c| c.role.as_str()).collect();
        assert_eq!(roles, ["cloud_architect", "oss_architect", "lead_architect"]);
        let lead_prompt = &calls[2].prompt;
        assert!(lead_prompt.contains("CLOUD PROPOSAL BODY"));
        assert!(lead_prompt.contains("OSS PROPOSAL BODY"));
        assert!(lead_prompt.contains("Design an IoT telemetry platform"));
    }

    #[tokio::test]
    async fn cloud_failure_still_runs_oss_and_skips_lead() {
        let mock = Arc::new(
            MockGenerator::new()
                .fail(Stage::Cloud, CouncilError::Request("503 Service Unavailable".into()))
                .reply(Stage::Oss, "oss"),
        );
        let report = pipeline(mock.clone()).run(&input()).await.unwrap();

        assert_eq!(report.output(Stage::Oss), Some("oss"));
        assert_eq!(
            report.result(Stage::Cloud).unwrap().as_ref().unwrap_err().kind(),
            "RequestError"
        );
        assert_eq!(
            report.result(Stage::Lead).unwrap().as_ref().unwrap_err(),
            &CouncilError::SkippedDueToUpstreamFailure {
                stage: Stage::Lead,
                missing: vec![Stage::Cloud],
            }
        );
        assert!(mock.calls_for(Stage::Lead).is_empty());
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn both_failures_listed_as_missing() {
        let mock = Arc::new(
            MockGenerator::new()
                .fail(Stage::Cloud, CouncilError::Response("empty".into()))
                .fail(Stage::Oss, CouncilError::Response("empty".into())),
        );
        let report = pipeline(mock).run(&input()).await.unwrap();
        match report.result(Stage::Lead).unwrap() {
            Err(CouncilError::SkippedDueToUpstreamFailure { missing, .. }) => {
                assert_eq!(missing, &vec![Stage::Cloud, Stage::Oss]);
            }
            other => panic!("expected skip, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_credential_fails_every_call_without_network() {
        let mock = Arc::new(MockGenerator::new());
        let mut input = input();
        input.api_key = None;
        let report = pipeline(mock.clone()).run(&input).await.unwrap();

        for stage in [Stage::Cloud, Stage::Oss] {
            assert_eq!(
                report.result(stage).unwrap().as_ref().unwrap_err().kind(),
                "AuthenticationError"
            );
        }
        assert!(report.result(Stage::Lead).unwrap().is_err());
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn empty_problem_rejected_before_any_call() {
        let mock = Arc::new(MockGenerator::new());
        let mut input = input();
        input.problem = "   ".into();
        let err = pipeline(mock.clone()).run(&input).await.unwrap_err();
        assert_eq!(err.kind(), "InvalidInput");
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn invalid_template_rejected_before_any_call() {
        let mock = Arc::new(MockGenerator::new());
        let mut input = input();
        input.templates.lead_architect = "no placeholders".into();
        assert!(pipeline(mock.clone()).run(&input).await.is_err());
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn lead_stage_alone_uses_given_proposals() {
        let mock = Arc::new(MockGenerator::new().reply(Stage::Lead, "merged"));
        let p = pipeline(mock.clone());
        let out = p
            .run_stage(Stage::Lead, &input(), Some("prior cloud"), Some("prior oss"))
            .await
            .unwrap();
        assert_eq!(out, "merged");
        let prompt = &mock.calls_for(Stage::Lead)[0].prompt;
        assert!(prompt.contains("prior cloud"));
        assert!(prompt.contains("prior oss"));

        let err = p
            .run_stage(Stage::Lead, &input(), None, Some("prior oss"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "SkippedDueToUpstreamFailure");
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_does_not_hang_the_pipeline() {
        let mock = Arc::new(MockGenerator::new().with_delay(Duration::from_secs(3600)));
        let p = Pipeline::new(AgentCall::new(
            mock,
            AgentSettings {
                model: "m".into(),
                temperature: 0.0,
                timeout: Duration::from_secs(10),
            },
        ));
        let started = tokio::time::Instant::now();
        let report = p.run(&input()).await.unwrap();
        assert!(started.elapsed() <= Duration::from_secs(21));
        for stage in [Stage::Cloud, Stage::Oss] {
            assert_eq!(
                report.result(stage).unwrap().as_ref().unwrap_err().kind(),
                "RequestError"
            );
        }
        assert!(report.result(Stage::Lead).unwrap().is_err());
    }
}
