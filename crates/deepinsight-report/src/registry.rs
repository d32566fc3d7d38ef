//! Ordered collection of recommendation rules

use crate::rule::{
    FrictionThresholdRule, MonthlyReviewRule, Recommendation, RecommendationRule,
    ResearchShareRule, RuleContext,
};
use deepinsight_core::RecommendationThresholds;

/// Registry evaluating rules in registration order
pub struct RuleRegistry {
    rules: Vec<Box<dyn RecommendationRule>>,
}

impl RuleRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// The standard rule set, monthly review last
    pub fn standard(thresholds: &RecommendationThresholds) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(FrictionThresholdRule::context_overflow(
            thresholds.context_overflow,
        )));
        registry.register(Box::new(FrictionThresholdRule::tool_failure(
            thresholds.tool_failure,
        )));
        registry.register(Box::new(FrictionThresholdRule::fabricated_data(
            thresholds.fabricated_data,
        )));
        registry.register(Box::new(FrictionThresholdRule::wrong_approach(
            thresholds.wrong_approach,
        )));
        registry.register(Box::new(ResearchShareRule::new(thresholds.research_share)));
        registry.register(Box::new(FrictionThresholdRule::missed_context(
            thresholds.missed_context,
        )));
        registry.register(Box::new(MonthlyReviewRule));
        registry
    }

    pub fn register(&mut self, rule: Box<dyn RecommendationRule>) {
        self.rules.push(rule);
    }

    /// Fired recommendations in rule order, at most `cap`
    pub fn evaluate(&self, ctx: &RuleContext<'_>, cap: usize) -> Vec<Recommendation> {
        self.rules
            .iter()
            .filter_map(|rule| {
                let rec = rule.evaluate(ctx);
                if rec.is_some() {
                    tracing::debug!(rule = rule.name(), "recommendation fired");
                }
                rec
            })
            .take(cap)
            .collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Get number of registered rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::standard(&RecommendationThresholds::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deepinsight_core::Counts;

    struct Fixed(&'static str);

    impl RecommendationRule for Fixed {
        fn name(&self) -> &str {
            self.0
        }

        fn evaluate(&self, _ctx: &RuleContext<'_>) -> Option<Recommendation> {
            Some(Recommendation {
                title: self.0.to_string(),
                description: String::new(),
            })
        }
    }

    fn run(registry: &RuleRegistry, friction: &Counts, goals: &Counts, sessions: usize) -> Vec<String> {
        let ctx = RuleContext {
            friction,
            goals,
            total_sessions: sessions,
        };
        registry.evaluate(&ctx, 5).into_iter().map(|r| r.title).collect()
    }

    #[test]
    fn test_standard_order() {
        let registry = RuleRegistry::default();
        assert_eq!(registry.len(), 7);
        assert_eq!(
            registry.names(),
            vec![
                "context-overflow",
                "tool-failure",
                "fabricated-data",
                "wrong-approach",
                "research-share",
                "missed-context",
                "monthly-review"
            ]
        );
    }

    #[test]
    fn test_quiet_data_yields_only_monthly() {
        let empty = Counts::new();
        let titles = run(&RuleRegistry::default(), &empty, &empty, 4);
        assert_eq!(titles, vec!["Run Deep Insights Monthly"]);
    }

    #[test]
    fn test_cap_keeps_gating_order() {
        let friction: Counts = [
            ("missed_context", 9),
            ("context_overflow", 3),
            ("tool_failure", 5),
            ("fabricated_data", 1),
            ("wrong_approach", 5),
        ]
        .into_iter()
        .collect();
        let goals: Counts = [("research", 5)].into_iter().collect();

        let titles = run(&RuleRegistry::default(), &friction, &goals, 10);
        assert_eq!(
            titles,
            vec![
                "Manage Session Length",
                "Add Subagent Limits",
                "Add Data Verification Guardrails",
                "Provide More Upfront Constraints",
                "Build a Research Skill",
            ]
        );
    }

    #[test]
    fn test_custom_registration() {
        let mut registry = RuleRegistry::new();
        assert!(registry.is_empty());
        registry.register(Box::new(Fixed("first")));
        registry.register(Box::new(Fixed("second")));
        let empty = Counts::new();
        assert_eq!(run(&registry, &empty, &empty, 1), vec!["first", "second"]);
    }
}
