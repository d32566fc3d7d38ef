use crate::aggregate::{Aggregates, RankedEntry};
use crate::anomaly::{self, Anomaly};
use crate::baseline::Comparison;
use crate::dates;
use crate::insight::{friction_insights, Highlights, Insight};
use crate::registry::RuleRegistry;
use crate::rule::{Recommendation, RuleContext};
use crate::sessions::{self, BestSession, FrictionSession};
use chrono::{DateTime, Utc};
use deepinsight_core::{Error, Facet, Manifest, ReportConfig, Result};
use serde::{Deserialize, Serialize};

/// Below this many facets the report still builds but is flagged
pub const LIMITED_DATA_FACETS: usize = 5;

/// Everything the engine reads
#[derive(Debug, Clone)]
pub struct ReportInputs {
    pub facets: Vec<Facet>,
    pub manifest: Option<Manifest>,
    /// Second collection for side-by-side rates; None disables comparison
    pub baseline: Option<Vec<Facet>>,
    pub generated_at: DateTime<Utc>,
}

impl ReportInputs {
    pub fn new(facets: Vec<Facet>, generated_at: DateTime<Utc>) -> Self {
        Self {
            facets,
            manifest: None,
            baseline: None,
            generated_at,
        }
    }

    pub fn with_manifest(mut self, manifest: Option<Manifest>) -> Self {
        self.manifest = manifest;
        self
    }

    pub fn with_baseline(mut self, baseline: Option<Vec<Facet>>) -> Self {
        self.baseline = baseline;
        self
    }
}

/// The full aggregate view handed to rendering
///
/// Every field is always present; empty inputs produce zeros and empty lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDataset {
    pub total_sessions: usize,
    pub date_range: String,
    pub generated_date: String,
    pub limited_data: bool,

    pub goals_achieved_pct: f64,
    pub helpful_pct: f64,
    pub friction_count: usize,
    pub friction_pct: f64,
    pub total_friction_events: u64,

    pub outcomes: Vec<RankedEntry>,
    pub satisfaction: Vec<RankedEntry>,
    pub helpfulness: Vec<RankedEntry>,
    pub goal_categories: Vec<RankedEntry>,
    pub session_types: Vec<RankedEntry>,
    pub primary_successes: Vec<RankedEntry>,
    pub friction_types: Vec<RankedEntry>,

    pub friction_insights: Vec<Insight>,
    pub top_friction_sessions: Vec<FrictionSession>,
    pub best_sessions: Vec<BestSession>,
    pub anomalies: Vec<Anomaly>,
    pub highlights: Highlights,
    pub recommendations: Vec<Recommendation>,
    pub comparison: Option<Comparison>,
}

/// Aggregation and insight engine
pub struct InsightEngine {
    config: ReportConfig,
    rules: RuleRegistry,
}

impl InsightEngine {
    pub fn new(config: ReportConfig) -> Self {
        let rules = RuleRegistry::standard(&config.thresholds);
        Self { config, rules }
    }

    /// Replace the standard recommendation rules
    pub fn with_rules(mut self, rules: RuleRegistry) -> Self {
        self.rules = rules;
        self
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    pub fn build(&self, inputs: &ReportInputs) -> Result<ReportDataset> {
        let facets = &inputs.facets;
        if facets.is_empty() {
            return Err(Error::NoFacets);
        }
        let limited_data = facets.len() < LIMITED_DATA_FACETS;
        if limited_data {
            tracing::info!(
                facets = facets.len(),
                "limited data, patterns may not be representative"
            );
        }

        let manifest = inputs.manifest.as_ref();
        let agg = Aggregates::from_facets(facets);

        let friction_types = agg.friction_rows();
        let goal_categories = agg.goal_rows();
        let session_types = agg.session_type_rows();
        let primary_successes = agg.success_rows();

        let top_friction_sessions = sessions::top_friction_sessions(facets, manifest, &self.config);
        let friction_insights =
            friction_insights(&agg, &friction_types, &top_friction_sessions, &self.config);
        let highlights = Highlights::build(
            &agg,
            &primary_successes,
            &friction_types,
            &goal_categories,
            &session_types,
            &self.config,
        );

        let ctx = RuleContext {
            friction: &agg.friction,
            goals: &agg.goals,
            total_sessions: agg.total_sessions,
        };
        let recommendations = self.rules.evaluate(&ctx, self.config.max_recommendations);

        let comparison = inputs
            .baseline
            .as_deref()
            .and_then(|baseline| Comparison::build(baseline, &agg));

        Ok(ReportDataset {
            total_sessions: agg.total_sessions,
            date_range: dates::date_range(manifest),
            generated_date: dates::generated_date(inputs.generated_at),
            limited_data,
            goals_achieved_pct: agg.goals_achieved_pct(),
            helpful_pct: agg.helpful_pct(),
            friction_count: agg.sessions_with_friction,
            friction_pct: agg.friction_pct(),
            total_friction_events: agg.total_friction(),
            outcomes: agg.outcome_rows(),
            satisfaction: agg.satisfaction_rows(),
            helpfulness: agg.helpfulness_rows(),
            goal_categories,
            session_types,
            primary_successes,
            friction_types,
            friction_insights,
            best_sessions: sessions::best_sessions(facets, manifest, &self.config),
            top_friction_sessions,
            anomalies: anomaly::detect(facets, manifest, &self.config),
            highlights,
            recommendations,
            comparison,
        })
    }
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new(ReportConfig::default())
    }
}
