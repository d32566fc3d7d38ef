//! Session compaction: raw JSONL logs into bounded, cacheable summaries

mod compactor;
pub mod event;
mod extract;
mod store;
mod types;

pub use compactor::{build_flow, Compaction, Compactor};
pub use extract::{extract_text, extract_tool_calls};
pub use store::{Preprocessor, SummaryStore};
pub use types::{PreprocessRun, SessionOutcome};
