//! Threshold-flagged session patterns worth a human look

use deepinsight_core::text::truncate_chars;
use deepinsight_core::{Facet, Manifest, ReportConfig};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    SubagentExplosion,
    NotAchieved,
    Abandoned,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    pub kind: AnomalyKind,
    pub title: String,
    pub description: String,
    pub count: usize,
    /// Truncated ids of the first few flagged sessions
    pub session_ids: Vec<String>,
}

impl Anomaly {
    fn new(kind: AnomalyKind, flagged: &[&Facet], config: &ReportConfig) -> Self {
        let count = flagged.len();
        let session_ids: Vec<String> = flagged
            .iter()
            .take(config.anomaly_sample_ids)
            .map(|f| truncate_chars(f.session_id(), config.anomaly_id_chars).to_string())
            .collect();

        let (title, blurb) = match kind {
            AnomalyKind::SubagentExplosion => (
                format!(
                    "{} session(s) with {}+ subagents",
                    count, config.subagent_anomaly_threshold
                ),
                format!(
                    "Sessions that spawned {} or more subagents. This may indicate productive \
                     parallelization or runaway complexity.",
                    config.subagent_anomaly_threshold
                ),
            ),
            AnomalyKind::NotAchieved => (
                format!("{} session(s) with \"not achieved\" outcome", count),
                "Sessions where the primary goal was not accomplished. Common causes: tool \
                 failures, rate limits, or abandoned tasks."
                    .to_string(),
            ),
            AnomalyKind::Abandoned => (
                format!("{} abandoned session(s)", count),
                "Sessions that were started but abandoned before completion.".to_string(),
            ),
        };

        Self {
            kind,
            title,
            description: format!("{} IDs: {}", blurb, session_ids.join(", ")),
            count,
            session_ids,
        }
    }
}

fn has_outcome(facet: &Facet, outcome: &str) -> bool {
    facet.outcome.as_deref() == Some(outcome)
}

/// One record per non-empty anomaly class, in a fixed class order
pub fn detect(facets: &[Facet], manifest: Option<&Manifest>, config: &ReportConfig) -> Vec<Anomaly> {
    let exploded: Vec<&Facet> = facets
        .iter()
        .filter(|f| {
            manifest
                .and_then(|m| m.entry(f.session_id()))
                .is_some_and(|e| e.subagent_count >= config.subagent_anomaly_threshold)
        })
        .collect();
    let not_achieved: Vec<&Facet> = facets.iter().filter(|f| has_outcome(f, "not_achieved")).collect();
    let abandoned: Vec<&Facet> = facets.iter().filter(|f| has_outcome(f, "abandoned")).collect();

    [
        (AnomalyKind::SubagentExplosion, exploded),
        (AnomalyKind::NotAchieved, not_achieved),
        (AnomalyKind::Abandoned, abandoned),
    ]
    .into_iter()
    .filter(|(_, flagged)| !flagged.is_empty())
    .map(|(kind, flagged)| Anomaly::new(kind, &flagged, config))
    .collect()
}
