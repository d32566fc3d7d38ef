//! Recommendation rules: each one a pure predicate over the aggregates

use deepinsight_core::Counts;
use serde::{Deserialize, Serialize};

/// What rules look at
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub friction: &'a Counts,
    pub goals: &'a Counts,
    pub total_sessions: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub description: String,
}

/// Base trait for recommendation rules
pub trait RecommendationRule: Send + Sync {
    /// Rule name (unique identifier)
    fn name(&self) -> &str;

    /// A recommendation when the rule's condition holds
    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Recommendation>;
}

/// Fires when one friction kind reaches a count
pub struct FrictionThresholdRule {
    name: &'static str,
    friction_kind: &'static str,
    threshold: u64,
    title: &'static str,
    describe: fn(u64) -> String,
}

impl FrictionThresholdRule {
    pub fn context_overflow(threshold: u64) -> Self {
        Self {
            name: "context-overflow",
            friction_kind: "context_overflow",
            threshold,
            title: "Manage Session Length",
            describe: |n| {
                format!(
                    "You had {n} context overflow events. Compact proactively when sessions \
                     exceed 20 messages, and write session state to a file before context \
                     compression so nothing is lost."
                )
            },
        }
    }

    pub fn tool_failure(threshold: u64) -> Self {
        Self {
            name: "tool-failure",
            friction_kind: "tool_failure",
            threshold,
            title: "Add Subagent Limits",
            describe: |n| {
                format!(
                    "Tool failures ({n} events) often come from rate limits when spawning too \
                     many parallel subagents. Limit to 5 concurrent subagents and wait for each \
                     batch to complete."
                )
            },
        }
    }

    pub fn fabricated_data(threshold: u64) -> Self {
        Self {
            name: "fabricated-data",
            friction_kind: "fabricated_data",
            threshold,
            title: "Add Data Verification Guardrails",
            describe: |n| {
                format!(
                    "Fabricated data was detected in {n} session(s). Add a project rule \
                     requiring source citations for factual claims, and consider a post-tool \
                     hook that validates research output quality."
                )
            },
        }
    }

    pub fn wrong_approach(threshold: u64) -> Self {
        Self {
            name: "wrong-approach",
            friction_kind: "wrong_approach",
            threshold,
            title: "Provide More Upfront Constraints",
            describe: |n| {
                format!(
                    "The assistant took the wrong approach {n} times. When starting complex \
                     tasks, state constraints and preferred approaches upfront rather than \
                     leaving the choice open."
                )
            },
        }
    }

    pub fn missed_context(threshold: u64) -> Self {
        Self {
            name: "missed-context",
            friction_kind: "missed_context",
            threshold,
            title: "Start Sessions with Context Loading",
            describe: |n| {
                format!(
                    "Missed context ({n} events) wastes time re-explaining prior work. Start \
                     each session by loading the project notes and recent work logs before \
                     diving in."
                )
            },
        }
    }
}

impl RecommendationRule for FrictionThresholdRule {
    fn name(&self) -> &str {
        self.name
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Recommendation> {
        let count = ctx.friction.get(self.friction_kind);
        (count >= self.threshold).then(|| Recommendation {
            title: self.title.to_string(),
            description: (self.describe)(count),
        })
    }
}

/// Fires when research goals outnumber a share of all sessions
pub struct ResearchShareRule {
    share: f64,
}

impl ResearchShareRule {
    pub fn new(share: f64) -> Self {
        Self { share }
    }
}

impl RecommendationRule for ResearchShareRule {
    fn name(&self) -> &str {
        "research-share"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Recommendation> {
        let research = ctx.goals.get("research");
        (research as f64 > ctx.total_sessions as f64 * self.share).then(|| Recommendation {
            title: "Build a Research Skill".to_string(),
            description: format!(
                "Research dominates your usage ({research} goal instances). Create a reusable \
                 research workflow that encodes output format, quality checks, and \
                 rate-limit-aware batching."
            ),
        })
    }
}

/// Always fires
pub struct MonthlyReviewRule;

impl RecommendationRule for MonthlyReviewRule {
    fn name(&self) -> &str {
        "monthly-review"
    }

    fn evaluate(&self, _ctx: &RuleContext<'_>) -> Option<Recommendation> {
        Some(Recommendation {
            title: "Run Deep Insights Monthly".to_string(),
            description: "Track how your usage patterns, friction rates, and session quality \
                          change over time. Monthly reports show whether workflow changes are \
                          actually reducing friction."
                .to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx<'a>(friction: &'a Counts, goals: &'a Counts, total_sessions: usize) -> RuleContext<'a> {
        RuleContext {
            friction,
            goals,
            total_sessions,
        }
    }

    #[test]
    fn test_friction_threshold_is_inclusive() {
        let goals = Counts::new();
        let rule = FrictionThresholdRule::context_overflow(3);

        let below: Counts = [("context_overflow", 2)].into_iter().collect();
        assert!(rule.evaluate(&ctx(&below, &goals, 10)).is_none());

        let at: Counts = [("context_overflow", 3)].into_iter().collect();
        let rec = rule.evaluate(&ctx(&at, &goals, 10)).unwrap();
        assert_eq!(rec.title, "Manage Session Length");
        assert!(rec.description.contains("3 context overflow events"));
    }

    #[test]
    fn test_single_fabrication_fires() {
        let goals = Counts::new();
        let friction: Counts = [("fabricated_data", 1)].into_iter().collect();
        let rule = FrictionThresholdRule::fabricated_data(1);
        assert_eq!(rule.name(), "fabricated-data");
        assert!(rule.evaluate(&ctx(&friction, &goals, 1)).is_some());
    }

    #[test]
    fn test_research_share_is_strict() {
        let friction = Counts::new();
        let rule = ResearchShareRule::new(0.3);

        let goals: Counts = [("research", 3)].into_iter().collect();
        assert!(rule.evaluate(&ctx(&friction, &goals, 10)).is_none());
        assert!(rule.evaluate(&ctx(&friction, &goals, 9)).is_some());
    }

    #[test]
    fn test_monthly_always_fires() {
        let empty = Counts::new();
        let rec = MonthlyReviewRule.evaluate(&ctx(&empty, &empty, 0)).unwrap();
        assert_eq!(rec.title, "Run Deep Insights Monthly");
    }
}
