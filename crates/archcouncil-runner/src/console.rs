use std::path::{Path, PathBuf};

use archcouncil_core::{CouncilError, Credential, PromptTemplates, PromptsFile, Session, Stage};
use archcouncil_export::Exporter;
use tracing::{error, info};

use crate::commands::{Command, HELP};
use crate::logging;
use crate::pipeline::{Pipeline, PipelineInput, PipelineReport};

const LOG_TAIL_LINES: usize = 200;

/// What the front-end should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Message(String),
    Quit,
}

/// Owns the session and applies commands to it.
///
/// Front-ends (the interactive shell, the one-shot `run` subcommand, tests)
/// only ever talk to the session through [`Console::execute`].
pub struct Console {
    session: Session,
    pipeline: Pipeline,
    exporter: Exporter,
    env_api_key: Option<String>,
    log_dir: PathBuf,
}

impl Console {
    pub fn new(
        pipeline: Pipeline,
        exporter: Exporter,
        env_api_key: Option<String>,
        log_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            session: Session::new(archcouncil_prompts::default_templates()),
            pipeline,
            exporter,
            env_api_key,
            log_dir: log_dir.into(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Run a command, turning errors into a printable message.
    pub async fn handle(&mut self, command: Command) -> Outcome {
        match self.execute(command).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(kind = e.kind(), "command failed: {e}");
                Outcome::Message(format!("error: {e}"))
            }
        }
    }

    pub async fn execute(&mut self, command: Command) -> Result<Outcome, CouncilError> {
        let message = match command {
            Command::SetProblem(problem) => {
                self.session.set_problem_statement(problem.trim());
                format!(
                    "problem statement set ({} characters)",
                    self.session.problem_statement().chars().count()
                )
            }
            Command::LoadProblem(path) => {
                let problem = read_text(&path)?;
                self.session.set_problem_statement(problem.trim());
                format!("problem statement loaded from {}", path.display())
            }
            Command::SetTemplate { stage, template } => {
                self.set_template(stage, template)?;
                format!("{} template updated", stage.role_name())
            }
            Command::LoadTemplate { stage, path } => {
                let template = read_text(&path)?;
                self.set_template(stage, template)?;
                format!("{} template loaded from {}", stage.role_name(), path.display())
            }
            Command::ShowTemplate(stage) => self.session.templates().get(stage).to_string(),
            Command::ResetPrompts => {
                self.session
                    .replace_templates(archcouncil_prompts::default_templates());
                "templates reset to defaults".to_string()
            }
            Command::SetApiKey(key) => {
                Credential::parse(Some(&key))?;
                self.session.set_api_key(Some(key));
                "API key configured for this session".to_string()
            }
            Command::ClearApiKey => {
                self.session.set_api_key(None);
                match &self.env_api_key {
                    Some(_) => "session API key cleared; using GROQ_API_KEY".to_string(),
                    None => "session API key cleared; no API key configured".to_string(),
                }
            }
            Command::RunPipeline => {
                let report = self.run_pipeline().await?;
                render_report(&report)
            }
            Command::RunStage(stage) => {
                self.run_single_stage(stage).await;
                render_stage(&self.session, stage)
            }
            Command::Show(None) => render_status(&self.session, self.api_key_source()),
            Command::Show(Some(stage)) => render_stage(&self.session, stage),
            Command::Export => {
                let paths = self.exporter.export(&self.session).await?;
                format!(
                    "exported:\n  {}\n  {}\n  {}",
                    paths.markdown.display(),
                    paths.pdf.display(),
                    paths.prompts.display()
                )
            }
            Command::SavePrompts => {
                let file = PromptsFile {
                    problem_statement: Some(self.session.problem_statement().to_string())
                        .filter(|p| !p.is_empty()),
                    templates: self.session.templates().clone(),
                };
                let path = self.exporter.save_prompts(&file).await?;
                format!("prompts saved to {}", path.display())
            }
            Command::LoadPrompts(path) => {
                let file = archcouncil_export::load_prompts(&path).await?;
                archcouncil_prompts::validate_templates(&file.templates)?;
                self.session.replace_templates(file.templates);
                if let Some(problem) = file.problem_statement {
                    self.session.set_problem_statement(problem.trim());
                }
                format!("prompts loaded from {}", path.display())
            }
            Command::ShowLogs => match logging::tail(&self.log_dir, LOG_TAIL_LINES) {
                Ok(Some(text)) => text,
                Ok(None) => "No logs available yet.".to_string(),
                Err(e) => {
                    return Err(CouncilError::InvalidInput(format!(
                        "read logs in {}: {e}",
                        self.log_dir.display()
                    )))
                }
            },
            Command::Help => HELP.to_string(),
            Command::Quit => return Ok(Outcome::Quit),
        };
        Ok(Outcome::Message(message))
    }

    /// Run all three stages on a snapshot of the session and record the results.
    pub async fn run_pipeline(&mut self) -> Result<PipelineReport, CouncilError> {
        let input = self.snapshot();
        let report = self.pipeline.run(&input).await?;
        for stage_report in &report.stages {
            let stage = stage_report.stage;
            self.session.record(
                stage,
                input.templates.get(stage),
                stage_report.result.clone(),
            );
        }
        Ok(report)
    }

    /// Re-run one stage against the current session outputs.
    pub async fn run_single_stage(&mut self, stage: Stage) {
        let input = self.snapshot();
        let result = match crate::pipeline::check_input(&input) {
            Ok(()) => {
                self.pipeline
                    .run_stage(
                        stage,
                        &input,
                        self.session.output(Stage::Cloud),
                        self.session.output(Stage::Oss),
                    )
                    .await
            }
            Err(e) => Err(e),
        };
        info!(stage = %stage, ok = result.is_ok(), "single stage run recorded");
        self.session
            .record(stage, input.templates.get(stage), result);
    }

    fn snapshot(&self) -> PipelineInput {
        PipelineInput {
            problem: self.session.problem_statement().to_string(),
            templates: self.session.templates().clone(),
            api_key: Credential::resolve(self.session.api_key(), self.env_api_key.as_deref())
                .map(String::from),
        }
    }

    fn set_template(&mut self, stage: Stage, template: String) -> Result<(), CouncilError> {
        let mut candidate: PromptTemplates = self.session.templates().clone();
        candidate.set(stage, template.clone());
        archcouncil_prompts::validate_templates(&candidate)?;
        self.session.set_template(stage, template);
        Ok(())
    }

    fn api_key_source(&self) -> &'static str {
        if self.session.api_key().is_some() {
            "entered in session"
        } else if self
            .env_api_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty())
        {
            "GROQ_API_KEY"
        } else {
            "not configured"
        }
    }
}

fn read_text(path: &Path) -> Result<String, CouncilError> {
    std::fs::read_to_string(path)
        .map_err(|e| CouncilError::InvalidInput(format!("read {}: {e}", path.display())))
}

pub fn render_report(report: &PipelineReport) -> String {
    let mut out = String::new();
    for stage_report in &report.stages {
        let stage = stage_report.stage;
        out.push_str(&format!("== {} ==\n", stage.title()));
        match &stage_report.result {
            Ok(text) => out.push_str(text.trim_end()),
            Err(e) => out.push_str(&format!("[{}] {e}", e.kind())),
        }
        out.push_str("\n\n");
    }
    out.truncate(out.trim_end().len());
    out
}

fn render_stage(session: &Session, stage: Stage) -> String {
    match session.output(stage) {
        Some(text) => format!("== {} ==\n{}", stage.title(), text.trim_end()),
        None => format!("{}: {}", stage.as_str(), session.status(stage).describe()),
    }
}

fn render_status(session: &Session, key_source: &str) -> String {
    let problem = session.problem_statement();
    let mut out = format!(
        "problem: {}\napi key: {key_source}\n",
        if problem.is_empty() {
            "(not set)".to_string()
        } else {
            format!("{} characters", problem.chars().count())
        }
    );
    for stage in Stage::ALL {
        out.push_str(&format!(
            "{:<6} {}\n",
            stage.as_str(),
            session.status(stage).describe()
        ));
    }
    out.truncate(out.trim_end().len());
    out
}
