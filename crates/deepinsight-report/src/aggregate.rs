//! Categorical aggregation over a facet collection

use crate::labels::{self, LabelEntry};
use deepinsight_core::{Counts, Facet};
use serde::{Deserialize, Serialize};

/// `part / whole` as a percentage in [0, 100]; 0 when `whole` is 0
pub fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 * 100.0 / whole as f64).clamp(0.0, 100.0)
}

/// One chart row: human label, count, and optionally a share and colour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub label: String,
    pub count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl RankedEntry {
    pub fn new(label: impl Into<String>, count: u64) -> Self {
        Self {
            label: label.into(),
            count,
            percent: None,
            color: None,
        }
    }

    pub fn with_percent(mut self, of: u64) -> Self {
        self.percent = Some(percent(self.count, of));
        self
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }
}

/// Rows by descending count, labelled from `table`
pub fn by_frequency(table: &'static [LabelEntry], counts: &Counts) -> Vec<RankedEntry> {
    counts
        .ranked()
        .into_iter()
        .map(|(key, count)| RankedEntry::new(labels::label(table, key), count))
        .collect()
}

/// Like [`by_frequency`], with each row coloured from `table`
pub fn by_frequency_colored(table: &'static [LabelEntry], counts: &Counts) -> Vec<RankedEntry> {
    counts
        .ranked()
        .into_iter()
        .map(|(key, count)| {
            RankedEntry::new(labels::label(table, key), count).with_color(labels::color(table, key))
        })
        .collect()
}

/// Coloured rows in the table's canonical order, zero counts dropped
pub fn in_table_order(table: &'static [LabelEntry], counts: &Counts) -> Vec<RankedEntry> {
    table
        .iter()
        .filter_map(|e| {
            let count = counts.get(e.key);
            (count > 0).then(|| RankedEntry::new(e.label, count).with_color(e.color))
        })
        .collect()
}

/// Raw tallies of every categorical facet field
#[derive(Debug, Clone, Default)]
pub struct Aggregates {
    pub total_sessions: usize,
    pub outcomes: Counts,
    pub helpfulness: Counts,
    pub session_types: Counts,
    pub primary_successes: Counts,
    pub satisfaction: Counts,
    pub friction: Counts,
    pub goals: Counts,
    pub sessions_with_friction: usize,
}

impl Aggregates {
    pub fn from_facets(facets: &[Facet]) -> Self {
        let mut agg = Self {
            total_sessions: facets.len(),
            ..Self::default()
        };

        for facet in facets {
            agg.outcomes
                .add(facet.outcome.as_deref().unwrap_or("unclear"), 1);
            agg.helpfulness
                .add(facet.claude_helpfulness.as_deref().unwrap_or("unknown"), 1);
            agg.session_types
                .add(facet.session_type.as_deref().unwrap_or("unknown"), 1);
            if let Some(success) = facet.primary_success() {
                agg.primary_successes.add(success, 1);
            }

            agg.satisfaction.merge(&facet.user_satisfaction_counts);
            agg.friction.merge(&facet.friction_counts);
            agg.goals.merge(&facet.goal_categories);

            if facet.friction_counts.has_positive() {
                agg.sessions_with_friction += 1;
            }
        }

        agg
    }

    fn total(&self) -> u64 {
        self.total_sessions as u64
    }

    pub fn total_friction(&self) -> u64 {
        self.friction.total()
    }

    pub fn frictionless_sessions(&self) -> usize {
        self.total_sessions - self.sessions_with_friction
    }

    /// Share of sessions fully or mostly achieved
    pub fn goals_achieved_pct(&self) -> f64 {
        let achieved = self
            .outcomes
            .get("fully_achieved")
            .saturating_add(self.outcomes.get("mostly_achieved"));
        percent(achieved, self.total())
    }

    /// Share of sessions rated essential or very helpful
    pub fn helpful_pct(&self) -> f64 {
        let helpful = self
            .helpfulness
            .get("essential")
            .saturating_add(self.helpfulness.get("very_helpful"));
        percent(helpful, self.total())
    }

    pub fn friction_pct(&self) -> f64 {
        percent(self.sessions_with_friction as u64, self.total())
    }

    pub fn fully_achieved_pct(&self) -> f64 {
        percent(self.outcomes.get("fully_achieved"), self.total())
    }

    /// Dissatisfied plus frustrated signals over all satisfaction signals
    pub fn dissatisfaction_pct(&self) -> f64 {
        let unhappy = self
            .satisfaction
            .get("dissatisfied")
            .saturating_add(self.satisfaction.get("frustrated"));
        percent(unhappy, self.satisfaction.total())
    }

    pub fn outcome_rows(&self) -> Vec<RankedEntry> {
        in_table_order(labels::OUTCOMES, &self.outcomes)
            .into_iter()
            .map(|row| row.with_percent(self.total()))
            .collect()
    }

    pub fn satisfaction_rows(&self) -> Vec<RankedEntry> {
        in_table_order(labels::SATISFACTION, &self.satisfaction)
    }

    pub fn helpfulness_rows(&self) -> Vec<RankedEntry> {
        in_table_order(labels::HELPFULNESS, &self.helpfulness)
    }

    pub fn goal_rows(&self) -> Vec<RankedEntry> {
        by_frequency(labels::GOALS, &self.goals)
    }

    pub fn session_type_rows(&self) -> Vec<RankedEntry> {
        by_frequency(labels::SESSION_TYPES, &self.session_types)
    }

    pub fn success_rows(&self) -> Vec<RankedEntry> {
        by_frequency(labels::SUCCESSES, &self.primary_successes)
    }

    pub fn friction_rows(&self) -> Vec<RankedEntry> {
        by_frequency_colored(labels::FRICTION, &self.friction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn facets(values: serde_json::Value) -> Vec<Facet> {
        serde_json::from_value(values).unwrap()
    }

    #[test]
    fn test_percent_guards_zero() {
        assert_eq!(percent(3, 0), 0.0);
        assert_eq!(percent(1, 4), 25.0);
        assert_eq!(percent(9, 4), 100.0);
    }

    #[test]
    fn test_outcomes_follow_severity_order() {
        let agg = Aggregates::from_facets(&facets(json!([
            {"session_id": "a", "outcome": "abandoned"},
            {"session_id": "b", "outcome": "not_achieved"},
            {"session_id": "c", "outcome": "fully_achieved"},
        ])));

        assert_eq!(agg.goals_achieved_pct().round(), 33.0);
        let rows = agg.outcome_rows();
        let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["Fully Achieved", "Not Achieved", "Abandoned"]);
        assert!(rows.iter().all(|r| r.count == 1));
        assert_eq!(rows[0].color.as_deref(), Some("#3fb950"));
    }

    #[test]
    fn test_missing_fields_use_fallbacks() {
        let agg = Aggregates::from_facets(&facets(json!([{"session_id": "a"}])));
        assert_eq!(agg.outcomes.get("unclear"), 1);
        assert_eq!(agg.helpfulness.get("unknown"), 1);
        assert_eq!(agg.session_types.get("unknown"), 1);
        assert!(agg.primary_successes.is_empty());
        assert_eq!(agg.outcome_rows()[0].label, "Unclear");
        assert!(agg.helpfulness_rows().is_empty());
    }

    #[test]
    fn test_rates() {
        let agg = Aggregates::from_facets(&facets(json!([
            {"claude_helpfulness": "essential", "outcome": "mostly_achieved",
             "friction_counts": {"tool_failure": 2}},
            {"claude_helpfulness": "very_helpful", "friction_counts": {"tool_failure": 0}},
            {"claude_helpfulness": "unhelpful"},
            {"claude_helpfulness": "slightly_helpful",
             "user_satisfaction_counts": {"satisfied": 2, "frustrated": 1, "dissatisfied": 1}},
        ])));

        assert_eq!(agg.helpful_pct(), 50.0);
        assert_eq!(agg.goals_achieved_pct(), 25.0);
        assert_eq!(agg.sessions_with_friction, 1);
        assert_eq!(agg.friction_pct(), 25.0);
        assert_eq!(agg.frictionless_sessions(), 3);
        assert_eq!(agg.dissatisfaction_pct(), 50.0);
    }

    #[test]
    fn test_no_satisfaction_signal_is_zero() {
        let agg = Aggregates::from_facets(&facets(json!([{"outcome": "fully_achieved"}])));
        assert_eq!(agg.dissatisfaction_pct(), 0.0);
        assert!(agg.satisfaction_rows().is_empty());
    }

    #[test]
    fn test_mapping_fields_sum_and_rank() {
        let agg = Aggregates::from_facets(&facets(json!([
            {"goal_categories": {"bug_fix": 1, "research": 2}},
            {"goal_categories": {"research": 1, "refactoring": "lots", "deployment": 0}},
        ])));

        let rows = agg.goal_rows();
        assert_eq!(rows[0], RankedEntry::new("Research", 3));
        assert_eq!(rows[1], RankedEntry::new("Bug Fix", 1));
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_friction_rows_carry_colors() {
        let agg = Aggregates::from_facets(&facets(json!([
            {"friction_counts": {"wrong_approach": 1, "made_up_kind": 4}},
        ])));
        let rows = agg.friction_rows();
        assert_eq!(rows[0].label, "made_up_kind");
        assert_eq!(rows[0].color.as_deref(), Some(labels::NEUTRAL));
        assert_eq!(rows[1].color.as_deref(), Some("#d29922"));
    }
}
