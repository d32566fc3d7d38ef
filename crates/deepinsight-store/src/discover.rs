//! Session log discovery

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const SUBAGENTS_DIR: &str = "subagents";

fn is_jsonl(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("jsonl")
}

/// Find every parent session log under `root`, sorted by path
///
/// Logs inside a `subagents` directory belong to a parent session and are
/// only counted, never compacted on their own.
pub fn discover_sessions(root: &Path) -> Vec<PathBuf> {
    let mut sessions: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| !(e.file_type().is_dir() && e.file_name() == SUBAGENTS_DIR))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_jsonl(e.path()))
        .map(|e| e.into_path())
        .collect();
    sessions.sort();
    sessions
}

/// Session id is the log's file stem
pub fn session_id(log_path: &Path) -> String {
    log_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Project is the name of the directory holding the log
pub fn project_name(log_path: &Path) -> String {
    log_path
        .parent()
        .and_then(|p| p.file_name())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Count `<dir>/<session_id>/subagents/*.jsonl` next to a session log
///
/// A missing or unreadable directory counts as zero.
pub fn count_subagents(log_path: &Path) -> usize {
    let Some(parent) = log_path.parent() else {
        return 0;
    };
    let dir = parent.join(session_id(log_path)).join(SUBAGENTS_DIR);
    let entries = match std::fs::read_dir(&dir) {
        Ok(e) => e,
        Err(_) => return 0,
    };

    entries
        .flatten()
        .filter(|e| {
            let path = e.path();
            path.is_file() && is_jsonl(&path)
        })
        .count()
}
