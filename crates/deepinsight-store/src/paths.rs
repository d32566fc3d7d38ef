//! Path resolution for session logs and pipeline artifacts

use std::path::{Path, PathBuf};

const DEFAULT_OUTPUT_DIR: &str = "./deep-insights-output";

/// Resolves standard input and output locations
#[derive(Debug, Clone)]
pub struct Paths {
    pub home_claude: PathBuf,
    pub output_dir: PathBuf,
}

impl Paths {
    /// Create a resolver rooted at `~/.claude` with the default output dir
    pub fn new() -> std::io::Result<Self> {
        let home = dirs::home_dir().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "home directory not found")
        })?;

        Ok(Self {
            home_claude: home.join(".claude"),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        })
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Root of the raw per-project session logs
    pub fn sessions_dir(&self) -> PathBuf {
        self.home_claude.join("projects")
    }

    /// Facets written by the built-in insights command, used as baseline
    pub fn baseline_facets_dir(&self) -> PathBuf {
        self.home_claude.join("usage-data").join("facets")
    }

    pub fn summaries_dir(&self) -> PathBuf {
        self.output_dir.join("session_summaries")
    }

    pub fn summary_file(&self, session_id: &str) -> PathBuf {
        summary_file_in(&self.summaries_dir(), session_id)
    }

    pub fn manifest_file(&self) -> PathBuf {
        self.output_dir.join("session_manifest.json")
    }

    pub fn facets_file(&self) -> PathBuf {
        self.output_dir.join("all_facets.json")
    }

    pub fn report_file(&self) -> PathBuf {
        self.output_dir.join("report.json")
    }
}

/// `<dir>/<session_id>.json`
pub fn summary_file_in(dir: &Path, session_id: &str) -> PathBuf {
    dir.join(format!("{}.json", session_id))
}
