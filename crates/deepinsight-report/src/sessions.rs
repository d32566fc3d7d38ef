//! Top-K session selection

use crate::aggregate::RankedEntry;
use crate::dates::session_date;
use crate::labels;
use deepinsight_core::{Facet, Manifest, ReportConfig};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrictionSession {
    pub session_id: String,
    pub date: String,
    pub summary: String,
    pub friction_total: u64,
    /// Per-kind breakdown, largest first
    pub frictions: Vec<RankedEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestSession {
    pub session_id: String,
    pub date: String,
    pub summary: String,
    pub helpfulness: String,
    pub goals: Vec<String>,
}

/// Sessions with any friction, most friction first
pub fn top_friction_sessions(
    facets: &[Facet],
    manifest: Option<&Manifest>,
    config: &ReportConfig,
) -> Vec<FrictionSession> {
    let mut sessions: Vec<FrictionSession> = facets
        .iter()
        .filter(|f| f.friction_total() > 0)
        .map(|f| FrictionSession {
            session_id: f.session_id().to_string(),
            date: session_date(manifest, f.session_id()),
            summary: f.brief_summary.clone().unwrap_or_default(),
            friction_total: f.friction_total(),
            frictions: crate::aggregate::by_frequency(labels::FRICTION, &f.friction_counts),
        })
        .collect();

    sessions.sort_by(|a, b| b.friction_total.cmp(&a.friction_total));
    sessions.truncate(config.top_friction_sessions);
    sessions
}

/// Sessions rated at the top helpfulness tier, in input order
pub fn best_sessions(
    facets: &[Facet],
    manifest: Option<&Manifest>,
    config: &ReportConfig,
) -> Vec<BestSession> {
    let top_tier = labels::HELPFULNESS[0];

    facets
        .iter()
        .filter(|f| f.claude_helpfulness.as_deref() == Some(top_tier.key))
        .take(config.best_sessions)
        .map(|f| BestSession {
            session_id: f.session_id().to_string(),
            date: session_date(manifest, f.session_id()),
            summary: f.brief_summary.clone().unwrap_or_default(),
            helpfulness: top_tier.label.to_string(),
            goals: f
                .goal_categories
                .keys()
                .take(config.goals_per_best_session)
                .map(|g| labels::label(labels::GOALS, g))
                .collect(),
        })
        .collect()
}
