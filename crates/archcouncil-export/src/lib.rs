pub mod markdown;
pub mod pdf;

use std::path::{Path, PathBuf};

use archcouncil_core::{CouncilError, PromptsFile, Session};
use chrono::{DateTime, Local};
use tokio::io::AsyncWriteExt;
use tracing::info;

/// Stamp appended to every artifact name.
pub const STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Files written by one export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    pub markdown: PathBuf,
    pub pdf: PathBuf,
    pub prompts: PathBuf,
}

/// Writes timestamped, write-once artifacts under an output directory:
/// reports go to `results/`, prompt snapshots to `prompts/`.
pub struct Exporter {
    base_dir: PathBuf,
}

impl Exporter {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn results_dir(&self) -> PathBuf {
        self.base_dir.join("results")
    }

    pub fn prompts_dir(&self) -> PathBuf {
        self.base_dir.join("prompts")
    }

    /// Export the Markdown report, its PDF rendering and the prompts snapshot.
    pub async fn export(&self, session: &Session) -> Result<ExportPaths, CouncilError> {
        self.export_at(session, Local::now()).await
    }

    pub async fn export_at(
        &self,
        session: &Session,
        now: DateTime<Local>,
    ) -> Result<ExportPaths, CouncilError> {
        let report = markdown::render(session);
        let pdf = pdf::render(&report);
        let prompts = session.prompts_file().to_json_pretty()?;

        let results = self.results_dir();
        let prompts_dir = self.prompts_dir();
        create_dir(&results).await?;
        create_dir(&prompts_dir).await?;

        let stamp = now.format(STAMP_FORMAT).to_string();
        let paths = first_free(&stamp, |s| ExportPaths {
            markdown: results.join(format!("architecture_{s}.md")),
            pdf: results.join(format!("architecture_{s}.pdf")),
            prompts: prompts_dir.join(format!("prompts_{s}.json")),
        });

        write_new(&paths.markdown, report.as_bytes()).await?;
        write_new(&paths.pdf, &pdf).await?;
        write_new(&paths.prompts, prompts.as_bytes()).await?;

        info!(
            markdown = %paths.markdown.display(),
            pdf = %paths.pdf.display(),
            prompts = %paths.prompts.display(),
            "export written"
        );
        Ok(paths)
    }

    /// Write only the prompts snapshot.
    pub async fn save_prompts(&self, file: &PromptsFile) -> Result<PathBuf, CouncilError> {
        self.save_prompts_at(file, Local::now()).await
    }

    pub async fn save_prompts_at(
        &self,
        file: &PromptsFile,
        now: DateTime<Local>,
    ) -> Result<PathBuf, CouncilError> {
        let json = file.to_json_pretty()?;
        let dir = self.prompts_dir();
        create_dir(&dir).await?;
        let stamp = now.format(STAMP_FORMAT).to_string();
        let path = first_free(&stamp, |s| dir.join(format!("prompts_{s}.json")));
        write_new(&path, json.as_bytes()).await?;
        info!(path = %path.display(), "prompts saved");
        Ok(path)
    }
}

/// Read a prompts snapshot back. Validation is left to the caller.
pub async fn load_prompts(path: &Path) -> Result<PromptsFile, CouncilError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| CouncilError::InvalidInput(format!("read {}: {e}", path.display())))?;
    PromptsFile::from_json(&raw)
}

trait Occupied {
    fn occupied(&self) -> bool;
}

impl Occupied for PathBuf {
    fn occupied(&self) -> bool {
        self.exists()
    }
}

impl Occupied for ExportPaths {
    fn occupied(&self) -> bool {
        self.markdown.exists() || self.pdf.exists() || self.prompts.exists()
    }
}

/// Build names from `stamp`, then `stamp_2`, `stamp_3`, ... until none exist.
fn first_free<T: Occupied>(stamp: &str, make: impl Fn(&str) -> T) -> T {
    let mut candidate = make(stamp);
    let mut n = 2;
    while candidate.occupied() {
        candidate = make(&format!("{stamp}_{n}"));
        n += 1;
    }
    candidate
}

async fn create_dir(dir: &Path) -> Result<(), CouncilError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| write_error(dir, e))
}

async fn write_new(path: &Path, data: &[u8]) -> Result<(), CouncilError> {
    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
        .map_err(|e| write_error(path, e))?;
    file.write_all(data).await.map_err(|e| write_error(path, e))?;
    file.flush().await.map_err(|e| write_error(path, e))
}

fn write_error(path: &Path, e: std::io::Error) -> CouncilError {
    CouncilError::ExportWrite {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}
