use crate::error::CouncilError;
use crate::prompts::{PromptTemplates, PromptsFile};
use crate::stage::{Stage, StageStatus};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct StageSlot {
    output: Option<String>,
    status: StageStatus,
    template: Option<String>,
}

/// State of one interactive session.
///
/// Outputs are only ever set through [`Session::record`], which also clears
/// anything downstream of the stage being recorded, so a lead recommendation
/// never outlives the proposals it was built from. Each slot keeps the
/// template its last run used.
#[derive(Debug, Clone)]
pub struct Session {
    problem_statement: String,
    templates: PromptTemplates,
    api_key: Option<String>,
    slots: [StageSlot; 3],
}

impl Session {
    pub fn new(templates: PromptTemplates) -> Self {
        Self {
            problem_statement: String::new(),
            templates,
            api_key: None,
            slots: Default::default(),
        }
    }

    pub fn problem_statement(&self) -> &str {
        &self.problem_statement
    }

    /// Replace the problem statement. Outputs derived from the previous one are discarded.
    pub fn set_problem_statement(&mut self, problem: impl Into<String>) {
        let problem = problem.into();
        if problem != self.problem_statement {
            self.problem_statement = problem;
            self.slots = Default::default();
        }
    }

    pub fn templates(&self) -> &PromptTemplates {
        &self.templates
    }

    pub fn set_template(&mut self, stage: Stage, template: String) {
        self.templates.set(stage, template);
    }

    pub fn replace_templates(&mut self, templates: PromptTemplates) {
        self.templates = templates;
    }

    /// Per stage, the template its recorded result came from. Stages with
    /// nothing recorded fall back to the editable template.
    pub fn run_templates(&self) -> PromptTemplates {
        let mut used = self.templates.clone();
        for stage in Stage::ALL {
            if let Some(template) = &self.slots[stage.index()].template {
                used.set(stage, template.clone());
            }
        }
        used
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn set_api_key(&mut self, key: Option<String>) {
        self.api_key = key.filter(|k| !k.trim().is_empty());
    }

    pub fn output(&self, stage: Stage) -> Option<&str> {
        self.slots[stage.index()].output.as_deref()
    }

    pub fn status(&self, stage: Stage) -> &StageStatus {
        &self.slots[stage.index()].status
    }

    /// Store the result of running `stage` with `template`.
    pub fn record(&mut self, stage: Stage, template: &str, result: Result<String, CouncilError>) {
        let slot = &mut self.slots[stage.index()];
        slot.template = Some(template.to_string());
        match result {
            Ok(text) => {
                slot.output = Some(text);
                slot.status = StageStatus::Succeeded;
            }
            Err(e) => {
                slot.output = None;
                slot.status = StageStatus::Failed(e);
            }
        }
        for downstream in Stage::ALL.iter().filter(|s| s.upstream().contains(&stage)) {
            self.slots[downstream.index()] = StageSlot::default();
        }
    }

    /// Upstream stages of `stage` that have no output yet.
    pub fn missing_inputs(&self, stage: Stage) -> Vec<Stage> {
        stage
            .upstream()
            .iter()
            .copied()
            .filter(|s| self.output(*s).is_none())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        Stage::ALL.iter().all(|s| self.output(*s).is_some())
    }

    pub fn prompts_file(&self) -> PromptsFile {
        PromptsFile {
            problem_statement: Some(self.problem_statement.clone())
                .filter(|p| !p.is_empty()),
            templates: self.run_templates(),
        }
    }
}
