use archcouncil_core::{CouncilError, PromptTemplates, Stage};

use crate::context::{CLOUD_PROPOSAL, OSS_PROPOSAL, PROBLEM};

/// Placeholders a template for `stage` must contain.
pub fn required_placeholders(stage: Stage) -> &'static [&'static str] {
    match stage {
        Stage::Cloud | Stage::Oss => &[PROBLEM],
        Stage::Lead => &[PROBLEM, CLOUD_PROPOSAL, OSS_PROPOSAL],
    }
}

/// Check all three templates, reporting the first problem found.
pub fn validate_templates(templates: &PromptTemplates) -> Result<(), CouncilError> {
    for stage in Stage::ALL {
        let template = templates.get(stage);
        if template.trim().is_empty() {
            return Err(CouncilError::InvalidInput(format!(
                "empty template: {}",
                stage.role_name()
            )));
        }
        for placeholder in required_placeholders(stage) {
            if !template.contains(placeholder) {
                return Err(CouncilError::InvalidInput(format!(
                    "template {} is missing placeholder {placeholder}",
                    stage.role_name()
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::default_templates;

    #[test]
    fn empty_template_reported() {
        let mut t = default_templates();
        t.oss_architect = "  \n".into();
        let err = validate_templates(&t).unwrap_err();
        assert_eq!(err, CouncilError::InvalidInput("empty template: oss_architect".into()));
    }

    #[test]
    fn missing_lead_placeholder_reported() {
        let mut t = default_templates();
        t.lead_architect = "Decide between {cloud_proposal} for {problem}".into();
        let err = validate_templates(&t).unwrap_err();
        assert!(err.to_string().contains("{oss_proposal}"));
    }

    #[test]
    fn cloud_without_problem_rejected() {
        let mut t = default_templates();
        t.cloud_architect = "Propose something".into();
        assert!(validate_templates(&t).is_err());
    }
}
