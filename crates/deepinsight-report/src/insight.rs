//! Deterministic observations derived from the aggregates

use crate::aggregate::{Aggregates, RankedEntry};
use crate::sessions::FrictionSession;
use deepinsight_core::ReportConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Insight {
    NoFriction,
    FrictionConcentrates {
        sessions: usize,
        events: u64,
        total: u64,
        percent: f64,
    },
    TopFrictionType {
        label: String,
        events: u64,
    },
    ContextFriction {
        events: u64,
    },
    Frictionless {
        sessions: usize,
        total: usize,
        percent: f64,
    },
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Insight::NoFriction => {
                write!(f, "No friction detected across any sessions.")
            }
            Insight::FrictionConcentrates {
                sessions,
                events,
                total,
                percent,
            } => write!(
                f,
                "Friction concentrates in a few sessions: the top {} highest-friction sessions \
                 account for {} of {} events ({:.0}%).",
                sessions, events, total, percent
            ),
            Insight::TopFrictionType { label, events } => {
                write!(f, "{} is the top friction type ({} events).", label, events)
            }
            Insight::ContextFriction { events } => write!(
                f,
                "Context-related friction ({} events) is addressable with session management \
                 practices like compaction and session handoffs.",
                events
            ),
            Insight::Frictionless {
                sessions,
                total,
                percent,
            } => write!(
                f,
                "{} of {} sessions ({:.0}%) had zero friction.",
                sessions, total, percent
            ),
        }
    }
}

/// Friction observations, in presentation order
pub fn friction_insights(
    agg: &Aggregates,
    friction_rows: &[RankedEntry],
    top_sessions: &[FrictionSession],
    config: &ReportConfig,
) -> Vec<Insight> {
    let total = agg.total_friction();
    if friction_rows.is_empty() || total == 0 {
        return vec![Insight::NoFriction];
    }

    let mut insights = Vec::new();

    let window = &top_sessions[..top_sessions.len().min(config.concentration_window)];
    let concentrated = window
        .iter()
        .fold(0u64, |acc, s| acc.saturating_add(s.friction_total));
    if !window.is_empty() && concentrated > total.saturating_sub(concentrated) {
        insights.push(Insight::FrictionConcentrates {
            sessions: window.len(),
            events: concentrated,
            total,
            percent: crate::aggregate::percent(concentrated, total),
        });
    }

    if let Some(top) = friction_rows.first() {
        insights.push(Insight::TopFrictionType {
            label: top.label.clone(),
            events: top.count,
        });
    }

    let context_events: u64 = friction_rows
        .iter()
        .filter(|r| r.label.to_lowercase().contains("context"))
        .fold(0, |acc, r| acc.saturating_add(r.count));
    if context_events > 0 {
        insights.push(Insight::ContextFriction {
            events: context_events,
        });
    }

    let frictionless = agg.frictionless_sessions();
    insights.push(Insight::Frictionless {
        sessions: frictionless,
        total: agg.total_sessions,
        percent: crate::aggregate::percent(frictionless as u64, agg.total_sessions as u64),
    });

    insights
}

/// Most common goals and session type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsagePattern {
    pub total_sessions: usize,
    pub top_goals: Vec<RankedEntry>,
    pub top_session_type: Option<RankedEntry>,
}

/// Structured highlight lists for the narrative sections
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Highlights {
    /// Leading primary successes with their share of sessions
    pub excels: Vec<RankedEntry>,
    /// Leading friction kinds with their share of all friction
    pub struggles: Vec<RankedEntry>,
    pub usage: UsagePattern,
}

impl Highlights {
    pub fn build(
        agg: &Aggregates,
        success_rows: &[RankedEntry],
        friction_rows: &[RankedEntry],
        goal_rows: &[RankedEntry],
        session_type_rows: &[RankedEntry],
        config: &ReportConfig,
    ) -> Self {
        let n = config.highlight_entries;
        let sessions = agg.total_sessions as u64;
        let friction = agg.total_friction();

        Self {
            excels: success_rows
                .iter()
                .take(n)
                .map(|r| RankedEntry::new(r.label.clone(), r.count).with_percent(sessions))
                .collect(),
            struggles: friction_rows
                .iter()
                .take(n)
                .map(|r| RankedEntry::new(r.label.clone(), r.count).with_percent(friction))
                .collect(),
            usage: UsagePattern {
                total_sessions: agg.total_sessions,
                top_goals: goal_rows.iter().take(n).cloned().collect(),
                top_session_type: session_type_rows.first().cloned(),
            },
        }
    }
}
