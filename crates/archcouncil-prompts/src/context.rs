/// Placeholder for the user's problem statement.
pub const PROBLEM: &str = "{problem}";
/// Placeholder for the stage-1 output, lead template only.
pub const CLOUD_PROPOSAL: &str = "{cloud_proposal}";
/// Placeholder for the stage-2 output, lead template only.
pub const OSS_PROPOSAL: &str = "{oss_proposal}";

/// Everything a template can reference.
#[derive(Debug, Clone)]
pub struct PromptContext {
    pub problem: String,
    pub cloud_proposal: Option<String>,
    pub oss_proposal: Option<String>,
}

impl PromptContext {
    pub fn new(problem: impl Into<String>) -> Self {
        Self {
            problem: problem.into(),
            cloud_proposal: None,
            oss_proposal: None,
        }
    }

    pub fn with_proposals(mut self, cloud: impl Into<String>, oss: impl Into<String>) -> Self {
        self.cloud_proposal = Some(cloud.into());
        self.oss_proposal = Some(oss.into());
        self
    }

    fn lookup(&self, placeholder: &str) -> Option<&str> {
        match placeholder {
            PROBLEM => Some(&self.problem),
            CLOUD_PROPOSAL => self.cloud_proposal.as_deref(),
            OSS_PROPOSAL => self.oss_proposal.as_deref(),
            _ => None,
        }
    }
}

/// Substitute placeholders in a single left-to-right pass.
///
/// Substituted text is never rescanned, so a proposal that happens to contain
/// `{problem}` is copied through untouched. Unknown `{...}` tokens and
/// placeholders without a value are left as written.
pub fn render(template: &str, ctx: &PromptContext) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let token = tail.find('}').map(|end| &tail[..=end]);
        match token.and_then(|t| ctx.lookup(t).map(|v| (t, v))) {
            Some((t, value)) => {
                out.push_str(value);
                rest = &tail[t.len()..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
