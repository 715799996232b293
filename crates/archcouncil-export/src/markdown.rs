use archcouncil_core::{Session, Stage};

/// Render the session as a Markdown report.
///
/// The output depends only on the session, never on the clock, so the same
/// session always renders to the same bytes.
pub fn render(session: &Session) -> String {
    let mut doc = String::from("# Architecture Consultation\n\n");

    doc.push_str("## Problem Statement\n\n");
    let problem = session.problem_statement().trim();
    if problem.is_empty() {
        doc.push_str("_No problem statement was entered._\n\n");
    } else {
        doc.push_str(problem);
        doc.push_str("\n\n");
    }

    for stage in Stage::ALL {
        doc.push_str(&format!("## {}\n\n", stage.title()));
        match session.output(stage) {
            Some(text) => {
                doc.push_str(text.trim_end());
                doc.push_str("\n\n");
            }
            None => {
                doc.push_str(&format!(
                    "_Not produced: {}._\n\n",
                    session.status(stage).describe()
                ));
            }
        }
    }

    doc.push_str("## Prompts Used\n\n");
    let templates = session.run_templates();
    for stage in Stage::ALL {
        doc.push_str(&format!("### {}\n\n", stage.role_name()));
        doc.push_str("~~~~text\n");
        doc.push_str(templates.get(stage).trim_end());
        doc.push_str("\n~~~~\n\n");
    }

    doc.truncate(doc.trim_end().len());
    doc.push('\n');
    doc
}
