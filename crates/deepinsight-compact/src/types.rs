use chrono::{DateTime, Utc};
use deepinsight_core::{Manifest, SessionSummary};

/// What happened to one session during a preprocessing run
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    /// A valid summary was already on disk and reused verbatim
    Cached(SessionSummary),
    Computed {
        summary: SessionSummary,
        lines_skipped: usize,
        bytes_written: u64,
    },
    Failed {
        session_id: String,
        error: String,
    },
}

impl SessionOutcome {
    pub fn summary(&self) -> Option<&SessionSummary> {
        match self {
            SessionOutcome::Cached(summary) | SessionOutcome::Computed { summary, .. } => {
                Some(summary)
            }
            SessionOutcome::Failed { .. } => None,
        }
    }
}

/// Totals of a preprocessing run
#[derive(Debug, Clone, Default)]
pub struct PreprocessRun {
    /// Every session that has a usable summary, in discovery order
    pub summaries: Vec<SessionSummary>,
    pub new: usize,
    pub cached: usize,
    pub failed: usize,
    pub lines_skipped: usize,
    pub raw_bytes: u64,
    pub summary_bytes: u64,
}

impl PreprocessRun {
    pub fn record(&mut self, outcome: SessionOutcome) {
        match outcome {
            SessionOutcome::Cached(summary) => {
                self.cached += 1;
                self.summaries.push(summary);
            }
            SessionOutcome::Computed {
                summary,
                lines_skipped,
                ..
            } => {
                self.new += 1;
                self.lines_skipped += lines_skipped;
                self.summaries.push(summary);
            }
            SessionOutcome::Failed { .. } => self.failed += 1,
        }
    }

    /// Size reduction of summaries relative to raw logs, in percent
    pub fn reduction_pct(&self) -> Option<f64> {
        if self.raw_bytes == 0 {
            return None;
        }
        Some((1.0 - self.summary_bytes as f64 / self.raw_bytes as f64) * 100.0)
    }

    /// Fresh manifest over this run's summaries
    pub fn manifest(&self, top_tools: usize, generated_at: DateTime<Utc>) -> Manifest {
        Manifest::build(&self.summaries, top_tools, generated_at)
    }
}
