//! Shared data model for session compaction and insight reporting

mod config;
mod error;
mod facet;
pub mod text;
mod types;

pub use config::{CompactorConfig, RecommendationThresholds, ReportConfig};
pub use error::{Error, Result};
pub use facet::{Counts, Facet};
pub use types::{
    FlowEntry, Manifest, ManifestEntry, Role, SessionStats, SessionSummary, ToolDetail,
    ToolInvocation, ToolKind,
};
