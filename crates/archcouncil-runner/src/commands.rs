use std::path::PathBuf;

use archcouncil_core::Stage;

/// A front-end request, consumed by [`crate::console::Console`].
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetProblem(String),
    LoadProblem(PathBuf),
    SetTemplate { stage: Stage, template: String },
    LoadTemplate { stage: Stage, path: PathBuf },
    ShowTemplate(Stage),
    ResetPrompts,
    SetApiKey(String),
    ClearApiKey,
    RunPipeline,
    RunStage(Stage),
    /// Show the session status, or one stage's output.
    Show(Option<Stage>),
    Export,
    SavePrompts,
    LoadPrompts(PathBuf),
    ShowLogs,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  problem <text>             set the problem statement
  problem-file <path>        read the problem statement from a file
  template <stage> <path>    load a stage template from a file (stage: cloud, oss, lead)
  show-template <stage>      print a stage template
  reset-prompts              restore the default templates
  key <api-key>              use this API key instead of GROQ_API_KEY
  clear-key                  forget the entered API key
  run                        run all three stages
  stage <stage>              re-run one stage
  show [stage]               show session status, or one stage's output
  export                     write Markdown, PDF and prompts JSON
  save-prompts               write the current prompts JSON
  load-prompts <path>        load a prompts JSON file
  logs                       show the latest log entries
  help                       show this help
  quit                       leave the shell";

/// Parse one line of shell input. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((w, r)) => (w, r.trim()),
        None => (line, ""),
    };

    let cmd = match word {
        "problem" => Command::SetProblem(required(rest, "problem <text>")?.to_string()),
        "problem-file" => Command::LoadProblem(PathBuf::from(required(rest, "problem-file <path>")?)),
        "template" => {
            let (stage, path) = rest
                .split_once(char::is_whitespace)
                .ok_or("usage: template <stage> <path>")?;
            Command::LoadTemplate {
                stage: parse_stage(stage)?,
                path: PathBuf::from(path.trim()),
            }
        }
        "show-template" => Command::ShowTemplate(parse_stage(required(rest, "show-template <stage>")?)?),
        "reset-prompts" => no_args(rest, Command::ResetPrompts)?,
        "key" => Command::SetApiKey(required(rest, "key <api-key>")?.to_string()),
        "clear-key" => no_args(rest, Command::ClearApiKey)?,
        "run" => no_args(rest, Command::RunPipeline)?,
        "stage" => Command::RunStage(parse_stage(required(rest, "stage <stage>")?)?),
        "show" if rest.is_empty() => Command::Show(None),
        "show" => Command::Show(Some(parse_stage(rest)?)),
        "export" => no_args(rest, Command::Export)?,
        "save-prompts" => no_args(rest, Command::SavePrompts)?,
        "load-prompts" => Command::LoadPrompts(PathBuf::from(required(rest, "load-prompts <path>")?)),
        "logs" => no_args(rest, Command::ShowLogs)?,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command `{other}`; type `help`")),
    };
    Ok(Some(cmd))
}

fn required<'a>(rest: &'a str, usage: &str) -> Result<&'a str, String> {
    if rest.is_empty() {
        Err(format!("usage: {usage}"))
    } else {
        Ok(rest)
    }
}

fn no_args(rest: &str, cmd: Command) -> Result<Command, String> {
    if rest.is_empty() {
        Ok(cmd)
    } else {
        Err(format!("unexpected argument `{rest}`"))
    }
}

fn parse_stage(s: &str) -> Result<Stage, String> {
    Stage::parse_str(s.trim())
        .ok_or_else(|| format!("unknown stage `{}`; expected cloud, oss or lead", s.trim()))
}
