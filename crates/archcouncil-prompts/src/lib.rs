pub mod cloud;
pub mod context;
pub mod lead;
pub mod oss;
pub mod validate;

use archcouncil_core::{CouncilError, PromptTemplates, Stage};

pub use context::{render, PromptContext, CLOUD_PROPOSAL, OSS_PROPOSAL, PROBLEM};
pub use validate::{required_placeholders, validate_templates};

/// The built-in template set a fresh session starts with.
pub fn default_templates() -> PromptTemplates {
    PromptTemplates {
        cloud_architect: cloud::DEFAULT_TEMPLATE.to_string(),
        oss_architect: oss::DEFAULT_TEMPLATE.to_string(),
        lead_architect: lead::DEFAULT_TEMPLATE.to_string(),
    }
}

/// Assemble the full prompt for a given stage and context.
pub fn assemble_prompt(
    templates: &PromptTemplates,
    stage: Stage,
    ctx: &PromptContext,
) -> Result<String, CouncilError> {
    if stage == Stage::Lead && (ctx.cloud_proposal.is_none() || ctx.oss_proposal.is_none()) {
        return Err(CouncilError::InvalidInput(
            "lead prompt needs both the cloud and the open-source proposal".into(),
        ));
    }
    let prompt = render(templates.get(stage), ctx);
    if prompt.trim().is_empty() {
        return Err(CouncilError::InvalidInput(format!(
            "{stage} prompt is empty after substitution"
        )));
    }
    Ok(prompt)
}
