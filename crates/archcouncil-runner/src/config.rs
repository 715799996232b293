use std::path::PathBuf;
use std::time::Duration;

use archcouncil_llm::AgentSettings;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "archcouncil",
    about = "Cloud, open-source and lead architect agents on one design problem"
)]
pub struct CouncilConfig {
    /// API key for the text-generation endpoint. A key entered in the shell takes precedence.
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible endpoint
    #[arg(
        long,
        env = "ARCHCOUNCIL_BASE_URL",
        default_value = archcouncil_llm::groq::DEFAULT_BASE_URL
    )]
    pub base_url: String,

    /// Model identifier
    #[arg(long, env = "ARCHCOUNCIL_MODEL", default_value = archcouncil_llm::groq::DEFAULT_MODEL)]
    pub model: String,

    /// Sampling temperature
    #[arg(long, env = "ARCHCOUNCIL_TEMPERATURE", default_value = "0")]
    pub temperature: f32,

    /// Per-call timeout (seconds)
    #[arg(long, env = "ARCHCOUNCIL_TIMEOUT", default_value = "120")]
    pub timeout: u64,

    /// Directory for exported reports and prompt snapshots
    #[arg(long, env = "ARCHCOUNCIL_OUTPUT_DIR", default_value = "outputs")]
    pub output_dir: PathBuf,

    /// Directory for log files
    #[arg(long, env = "ARCHCOUNCIL_LOG_DIR", default_value = "logs")]
    pub log_dir: PathBuf,

    /// Answer from an offline mock instead of the remote endpoint. No API key
    /// is needed; a placeholder is used when none is configured.
    #[arg(long)]
    pub mock: bool,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum CliCommand {
    /// Run the pipeline once and export the result
    Run {
        /// Problem statement text
        #[arg(long, conflicts_with = "problem_file", required_unless_present = "problem_file")]
        problem: Option<String>,

        /// Read the problem statement from a file
        #[arg(long)]
        problem_file: Option<PathBuf>,

        /// Prompts JSON file to use instead of the defaults
        #[arg(long)]
        prompts: Option<PathBuf>,

        /// Skip writing export files
        #[arg(long)]
        no_export: bool,
    },
    /// Interactive shell (the default)
    Shell {
        /// Prompts JSON file to start from
        #[arg(long)]
        prompts: Option<PathBuf>,
    },
    /// Write the default prompts to a JSON file for editing
    InitPrompts {
        /// Destination path
        path: PathBuf,
    },
    /// Print the most recent log entries
    Logs {
        /// Number of trailing lines to show
        #[arg(long, default_value = "200")]
        lines: usize,
    },
}

/// Stand-in credential for `--mock` runs without a configured key.
pub const MOCK_API_KEY: &str = "mock-offline-key";

impl CouncilConfig {
    /// The key the console falls back to when none is entered in the session.
    pub fn fallback_api_key(&self) -> Option<String> {
        let configured = self.api_key.clone().filter(|k| !k.trim().is_empty());
        if self.mock {
            configured.or_else(|| Some(MOCK_API_KEY.to_string()))
        } else {
            configured
        }
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn agent_settings(&self) -> AgentSettings {
        AgentSettings {
            model: self.model.clone(),
            temperature: self.temperature,
            timeout: self.call_timeout(),
        }
    }
}
