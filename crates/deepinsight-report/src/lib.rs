//! Aggregation and insight engine over per-session facets

pub mod aggregate;
pub mod anomaly;
pub mod baseline;
pub mod dataset;
pub mod dates;
pub mod insight;
pub mod labels;
pub mod registry;
pub mod rule;
pub mod sessions;

pub use aggregate::{percent, Aggregates, RankedEntry};
pub use anomaly::{Anomaly, AnomalyKind};
pub use baseline::{load_baseline, Comparison, ComparisonRow, Rates};
pub use dataset::{InsightEngine, ReportDataset, ReportInputs};
pub use insight::{Highlights, Insight, UsagePattern};
pub use registry::RuleRegistry;
pub use rule::{Recommendation, RecommendationRule, RuleContext};
pub use sessions::{BestSession, FrictionSession};
