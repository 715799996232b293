use std::io::Write;
use std::sync::Arc;

use anyhow::{bail, Result};
use archcouncil_core::PromptsFile;
use archcouncil_export::Exporter;
use archcouncil_llm::{AgentCall, GroqClient, MockGenerator, TextGenerator};
use archcouncil_runner::commands::{self, Command};
use archcouncil_runner::config::{CliCommand, CouncilConfig};
use archcouncil_runner::console::{render_report, Console, Outcome};
use archcouncil_runner::logging;
use archcouncil_runner::pipeline::Pipeline;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // .env must be loaded before clap reads GROQ_API_KEY from the environment.
    let _ = dotenvy::dotenv();
    let config = CouncilConfig::parse();
    let _log_guard = logging::init(&config.log_dir)?;
    info!("archcouncil starting (model={}, mock={})", config.model, config.mock);

    match config.command.clone().unwrap_or(CliCommand::Shell { prompts: None }) {
        CliCommand::Run {
            problem,
            problem_file,
            prompts,
            no_export,
        } => {
            let mut console = build_console(&config)?;
            if let Some(path) = prompts {
                expect_ok(console.execute(Command::LoadPrompts(path)).await)?;
            }
            let set_problem = match (problem, problem_file) {
                (Some(text), _) => Command::SetProblem(text),
                (None, Some(path)) => Command::LoadProblem(path),
                (None, None) => bail!("--problem or --problem-file is required"),
            };
            expect_ok(console.execute(set_problem).await)?;

            let report = console.run_pipeline().await?;
            println!("{}", render_report(&report));

            // Export failures must reach the exit status here, so no `handle`.
            if !no_export {
                if let Outcome::Message(msg) = console.execute(Command::Export).await? {
                    println!("\n{msg}");
                }
            }
            if !report.is_complete() {
                bail!("pipeline did not complete; see the stage errors above");
            }
        }
        CliCommand::Shell { prompts } => {
            let mut console = build_console(&config)?;
            if let Some(path) = prompts {
                expect_ok(console.execute(Command::LoadPrompts(path)).await)?;
            }
            run_shell(&mut console).await?;
        }
        CliCommand::InitPrompts { path } => {
            let file = PromptsFile {
                problem_statement: None,
                templates: archcouncil_prompts::default_templates(),
            };
            std::fs::write(&path, file.to_json_pretty()?)?;
            println!("default prompts written to {}", path.display());
        }
        CliCommand::Logs { lines } => match logging::tail(&config.log_dir, lines)? {
            Some(text) => println!("{text}"),
            None => println!("No logs available yet."),
        },
    }

    Ok(())
}

fn build_console(config: &CouncilConfig) -> Result<Console> {
    let generator: Arc<dyn TextGenerator> = if config.mock {
        Arc::new(MockGenerator::new())
    } else {
        Arc::new(GroqClient::new(&config.base_url, config.call_timeout())?)
    };
    let pipeline = Pipeline::new(AgentCall::new(generator, config.agent_settings()));
    Ok(Console::new(
        pipeline,
        Exporter::new(&config.output_dir),
        config.fallback_api_key(),
        &config.log_dir,
    ))
}

fn expect_ok(result: Result<Outcome, archcouncil_core::CouncilError>) -> Result<()> {
    match result? {
        Outcome::Message(msg) => {
            info!("{msg}");
            Ok(())
        }
        Outcome::Quit => Ok(()),
    }
}

async fn run_shell(console: &mut Console) -> Result<()> {
    println!("archcouncil interactive shell; type `help` for commands");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("archcouncil> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let command = match commands::parse_line(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(msg) => {
                println!("{msg}");
                continue;
            }
        };
        match console.handle(command).await {
            Outcome::Message(msg) => println!("{msg}"),
            Outcome::Quit => break,
        }
    }
    Ok(())
}
