use crate::compactor::Compactor;
use crate::types::{PreprocessRun, SessionOutcome};
use deepinsight_core::SessionSummary;
use std::path::{Path, PathBuf};

/// One JSON summary per session id in a directory
#[derive(Debug, Clone)]
pub struct SummaryStore {
    dir: PathBuf,
}

impl SummaryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, session_id: &str) -> PathBuf {
        deepinsight_store::summary_file_in(&self.dir, session_id)
    }

    /// Cached summary, or None when missing or corrupt
    pub fn load(&self, session_id: &str) -> Option<SessionSummary> {
        deepinsight_store::read_json_opt(&self.path(session_id))
    }

    pub fn save(&self, summary: &SessionSummary) -> deepinsight_core::Result<u64> {
        deepinsight_store::write_json(&self.path(&summary.session_id), summary)
    }

    pub fn size_of(&self, session_id: &str) -> Option<u64> {
        std::fs::metadata(self.path(session_id)).ok().map(|m| m.len())
    }
}

/// Cache-aware compaction over many session logs
pub struct Preprocessor {
    compactor: Compactor,
    store: SummaryStore,
    force: bool,
}

impl Preprocessor {
    pub fn new(compactor: Compactor, store: SummaryStore) -> Self {
        Self {
            compactor,
            store,
            force: false,
        }
    }

    /// Recompute every session even when a summary exists
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn store(&self) -> &SummaryStore {
        &self.store
    }

    /// Reuse the cached summary or compact and persist a new one
    pub fn process(&self, log_path: &Path) -> SessionOutcome {
        let session_id = deepinsight_store::session_id(log_path);

        if !self.force {
            if let Some(summary) = self.store.load(&session_id) {
                tracing::debug!(session = %session_id, "summary cache hit");
                return SessionOutcome::Cached(summary);
            }
        }

        let compaction = match self.compactor.compact_file(log_path) {
            Ok(c) => c,
            Err(e) => return failed(session_id, e),
        };
        match self.store.save(&compaction.summary) {
            Ok(bytes_written) => SessionOutcome::Computed {
                summary: compaction.summary,
                lines_skipped: compaction.lines_skipped,
                bytes_written,
            },
            Err(e) => failed(session_id, e),
        }
    }

    /// Process every log in order; `progress` sees each outcome before it
    /// is folded into the run totals
    pub fn run<F>(&self, logs: &[PathBuf], mut progress: F) -> PreprocessRun
    where
        F: FnMut(usize, &Path, &SessionOutcome),
    {
        let mut run = PreprocessRun::default();

        for (index, log_path) in logs.iter().enumerate() {
            run.raw_bytes += std::fs::metadata(log_path).map(|m| m.len()).unwrap_or(0);
            let outcome = self.process(log_path);
            progress(index, log_path, &outcome);
            if let Some(summary) = outcome.summary() {
                run.summary_bytes += self.store.size_of(&summary.session_id).unwrap_or(0);
            }
            run.record(outcome);
        }

        run
    }
}

fn failed(session_id: String, error: impl std::fmt::Display) -> SessionOutcome {
    tracing::warn!(session = %session_id, error = %error, "session failed");
    SessionOutcome::Failed {
        session_id,
        error: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write_log(dir: &Path, project: &str, id: &str, lines: &[String]) -> PathBuf {
        let path = dir.join(project).join(format!("{}.jsonl", id));
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, lines.join("\n")).unwrap();
        path
    }

    fn sample_lines() -> Vec<String> {
        vec![
            json!({"type": "user", "timestamp": "2025-03-01T10:00:00Z", "message": {"content": "add tests"}}).to_string(),
            json!({"type": "assistant", "timestamp": "2025-03-01T10:01:00Z", "message": {
                "model": "claude-opus",
                "content": [{"type": "text", "text": "Done"}]
            }})
            .to_string(),
        ]
    }

    #[test]
    fn test_process_computes_then_hits_cache() {
        let temp = tempfile::TempDir::new().unwrap();
        let log = write_log(temp.path(), "proj", "s1", &sample_lines());
        let store = SummaryStore::new(temp.path().join("out"));
        let pre = Preprocessor::new(Compactor::default(), store);

        let first = pre.process(&log);
        assert!(matches!(first, SessionOutcome::Computed { .. }));
        let on_disk = std::fs::read(pre.store().path("s1")).unwrap();

        let second = pre.process(&log);
        assert!(matches!(second, SessionOutcome::Cached(_)));
        assert_eq!(second.summary(), first.summary());
        assert_eq!(std::fs::read(pre.store().path("s1")).unwrap(), on_disk);
    }

    #[test]
    fn test_cache_is_used_verbatim() {
        let temp = tempfile::TempDir::new().unwrap();
        let log = write_log(temp.path(), "proj", "s1", &sample_lines());
        let store = SummaryStore::new(temp.path().join("out"));
        let pre = Preprocessor::new(Compactor::default(), store);

        let SessionOutcome::Computed { mut summary, .. } = pre.process(&log) else {
            panic!("expected computed");
        };
        summary.project = "edited-by-hand".to_string();
        pre.store().save(&summary).unwrap();

        let cached = pre.process(&log);
        assert_eq!(cached.summary().unwrap().project, "edited-by-hand");
    }

    #[test]
    fn test_force_recomputes() {
        let temp = tempfile::TempDir::new().unwrap();
        let log = write_log(temp.path(), "proj", "s1", &sample_lines());
        let store = SummaryStore::new(temp.path().join("out"));
        Preprocessor::new(Compactor::default(), store.clone()).process(&log);

        let pre = Preprocessor::new(Compactor::default(), store).force(true);
        assert!(matches!(pre.process(&log), SessionOutcome::Computed { .. }));
    }

    #[test]
    fn test_corrupt_cache_is_a_miss() {
        let temp = tempfile::TempDir::new().unwrap();
        let log = write_log(temp.path(), "proj", "s1", &sample_lines());
        let store = SummaryStore::new(temp.path().join("out"));
        std::fs::create_dir_all(store.dir()).unwrap();
        std::fs::write(store.path("s1"), "{\"session_id\": \"s1\"").unwrap();

        let pre = Preprocessor::new(Compactor::default(), store);
        let outcome = pre.process(&log);
        assert!(matches!(outcome, SessionOutcome::Computed { .. }));
        assert!(pre.store().load("s1").is_some());
    }

    #[test]
    fn test_unreadable_log_fails_alone() {
        let temp = tempfile::TempDir::new().unwrap();
        let good = write_log(temp.path(), "proj", "good", &sample_lines());
        let missing = temp.path().join("proj").join("gone.jsonl");
        let store = SummaryStore::new(temp.path().join("out"));
        let pre = Preprocessor::new(Compactor::default(), store);

        let mut seen = Vec::new();
        let run = pre.run(&[missing, good], |i, _, outcome| {
            seen.push((i, matches!(outcome, SessionOutcome::Failed { .. })));
        });
        assert_eq!(seen, vec![(0, true), (1, false)]);
        assert_eq!(run.failed, 1);
        assert_eq!(run.new, 1);
        assert_eq!(run.summaries.len(), 1);
        assert_eq!(run.summaries[0].session_id, "good");

        let manifest = run.manifest(5, chrono::Utc::now());
        assert_eq!(manifest.total_sessions, 1);
        assert!(manifest.entry("gone").is_none());
    }

    #[test]
    fn test_run_counts_bad_lines_and_sizes() {
        let temp = tempfile::TempDir::new().unwrap();
        let mut lines = sample_lines();
        lines.insert(1, "{broken".to_string());
        let log = write_log(temp.path(), "proj", "s1", &lines);
        let store = SummaryStore::new(temp.path().join("out"));
        let pre = Preprocessor::new(Compactor::default(), store);

        let run = pre.run(&[log], |_, _, _| {});
        assert_eq!(run.lines_skipped, 1);
        assert!(run.raw_bytes > 0);
        assert!(run.summary_bytes > 0);
        assert!(run.reduction_pct().is_some());
    }
}
