//! Side-by-side comparison against a second facet collection

use crate::aggregate::Aggregates;
use crate::labels::HELPFUL_RATE;
use deepinsight_core::Facet;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Every `*.json` facet under `dir`, one file per session
///
/// A missing directory yields nothing; unreadable or malformed files are
/// skipped individually.
pub fn load_baseline(dir: &Path) -> Vec<Facet> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();

    files
        .iter()
        .filter_map(|path| match deepinsight_store::read_json::<Facet>(path) {
            Ok(facet) => Some(facet),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping baseline facet");
                None
            }
        })
        .collect()
}

/// Headline rates of one facet collection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rates {
    pub sessions: usize,
    pub dissatisfaction_pct: f64,
    pub fully_achieved_pct: f64,
    pub helpful_pct: f64,
}

impl Rates {
    pub fn from_aggregates(agg: &Aggregates) -> Self {
        Self {
            sessions: agg.total_sessions,
            dissatisfaction_pct: agg.dissatisfaction_pct(),
            fully_achieved_pct: agg.fully_achieved_pct(),
            helpful_pct: agg.helpful_pct(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub metric: String,
    pub baseline: String,
    pub current: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub baseline: Rates,
    pub current: Rates,
    pub rows: Vec<ComparisonRow>,
}

fn pct(value: f64) -> String {
    format!("{:.0}%", value)
}

impl Comparison {
    /// None when the baseline has no facets
    pub fn build(baseline: &[Facet], current: &Aggregates) -> Option<Self> {
        if baseline.is_empty() {
            return None;
        }
        let baseline = Rates::from_aggregates(&Aggregates::from_facets(baseline));
        let current = Rates::from_aggregates(current);

        let row = |metric: &str, b: String, c: String| ComparisonRow {
            metric: metric.to_string(),
            baseline: b,
            current: c,
        };
        let rows = vec![
            row(
                "Sessions analyzed",
                baseline.sessions.to_string(),
                current.sessions.to_string(),
            ),
            row(
                "Dissatisfaction rate",
                pct(baseline.dissatisfaction_pct),
                pct(current.dissatisfaction_pct),
            ),
            row(
                "Goals fully achieved",
                pct(baseline.fully_achieved_pct),
                pct(current.fully_achieved_pct),
            ),
            row(
                HELPFUL_RATE,
                pct(baseline.helpful_pct),
                pct(current.helpful_pct),
            ),
        ];

        Some(Self {
            baseline,
            current,
            rows,
        })
    }
}
