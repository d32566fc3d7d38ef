//! Configuration for compaction and aggregation

use serde::{Deserialize, Serialize};

/// Compactor caps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompactorConfig {
    /// Max chars per user/assistant message
    pub max_text_per_message: usize,

    /// Max chars for a wrapped context-compression summary
    pub max_summary_chars: usize,

    /// Max chars of a thinking block preview
    pub thinking_preview_chars: usize,

    /// Max chars per tool detail (path, command, query, url, subject)
    pub max_tool_detail_chars: usize,

    /// Max chars of a spawned task description
    pub max_task_description_chars: usize,

    /// Max (user, assistant) pairs in the conversation flow
    pub max_exchanges: usize,

    /// Max tool invocations kept with full detail
    pub max_tool_details: usize,

    /// Max file paths kept in files_touched
    pub max_files_touched: usize,

    /// Tool names listed per manifest entry
    pub manifest_top_tools: usize,
}

impl CompactorConfig {
    pub fn new() -> Self {
        Self {
            max_text_per_message: 500,
            max_summary_chars: 1000,
            thinking_preview_chars: 150,
            max_tool_detail_chars: 200,
            max_task_description_chars: 100,
            max_exchanges: 40,
            max_tool_details: 30,
            max_files_touched: 30,
            manifest_top_tools: 5,
        }
    }
}

impl Default for CompactorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Recommendation gates, evaluated over summed friction/goal counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationThresholds {
    pub context_overflow: u64,
    pub tool_failure: u64,
    pub fabricated_data: u64,
    pub wrong_approach: u64,
    pub missed_context: u64,
    /// Research goal instances must exceed this share of sessions (0.0..=1.0)
    pub research_share: f64,
}

impl RecommendationThresholds {
    pub fn new() -> Self {
        Self {
            context_overflow: 3,
            tool_failure: 5,
            fabricated_data: 1,
            wrong_approach: 5,
            missed_context: 3,
            research_share: 0.3,
        }
    }
}

impl Default for RecommendationThresholds {
    fn default() -> Self {
        Self::new()
    }
}

/// Aggregation engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Max sessions in the highest-friction list
    pub top_friction_sessions: usize,

    /// Max sessions in the best-sessions list
    pub best_sessions: usize,

    /// Goal labels carried per best session
    pub goals_per_best_session: usize,

    /// Manifest subagent count at or above which a session is flagged
    pub subagent_anomaly_threshold: usize,

    /// Session ids listed per anomaly record
    pub anomaly_sample_ids: usize,

    /// Chars kept of a session id in anomaly listings
    pub anomaly_id_chars: usize,

    /// Max recommendations emitted
    pub max_recommendations: usize,

    /// Sessions considered when checking if friction concentrates
    pub concentration_window: usize,

    /// Entries in each highlight list (excels, struggles, usage)
    pub highlight_entries: usize,

    pub thresholds: RecommendationThresholds,
}

impl ReportConfig {
    pub fn new() -> Self {
        Self {
            top_friction_sessions: 10,
            best_sessions: 10,
            goals_per_best_session: 3,
            subagent_anomaly_threshold: 10,
            anomaly_sample_ids: 5,
            anomaly_id_chars: 8,
            max_recommendations: 5,
            concentration_window: 5,
            highlight_entries: 3,
            thresholds: RecommendationThresholds::new(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self::new()
    }
}
