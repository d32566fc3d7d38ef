//! Filesystem plumbing: locations, discovery and JSON persistence

mod discover;
mod io;
mod paths;

pub use discover::{count_subagents, discover_sessions, project_name, session_id};
pub use io::{atomic_write, for_each_jsonl, read_json, read_json_opt, write_json};
pub use paths::{summary_file_in, Paths};
