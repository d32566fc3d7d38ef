//! Fixed label, colour and ordering tables for facet vocabularies

/// Colour for keys outside a table
pub const NEUTRAL: &str = "#8b949e";

/// Name of the essential-or-very-helpful rate wherever it is shown
pub const HELPFUL_RATE: &str = "Claude helpful+";

/// Display label and chart colour for one vocabulary key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelEntry {
    pub key: &'static str,
    pub label: &'static str,
    pub color: &'static str,
}

const fn entry(key: &'static str, label: &'static str, color: &'static str) -> LabelEntry {
    LabelEntry { key, label, color }
}

/// Outcome classes in severity order
pub const OUTCOMES: &[LabelEntry] = &[
    entry("fully_achieved", "Fully Achieved", "#3fb950"),
    entry("mostly_achieved", "Mostly Achieved", "#58a6ff"),
    entry("partially_achieved", "Partially Achieved", "#d29922"),
    entry("not_achieved", "Not Achieved", "#f85149"),
    entry("abandoned", "Abandoned", NEUTRAL),
    entry("unclear", "Unclear", NEUTRAL),
];

/// Helpfulness tiers, best first
pub const HELPFULNESS: &[LabelEntry] = &[
    entry("essential", "Essential", "#3fb950"),
    entry("very_helpful", "Very Helpful", "#58a6ff"),
    entry("moderately_helpful", "Moderately Helpful", "#d29922"),
    entry("slightly_helpful", "Slightly Helpful", "#db6d28"),
    entry("unhelpful", "Unhelpful", "#f85149"),
];

/// Satisfaction signals in polarity order
pub const SATISFACTION: &[LabelEntry] = &[
    entry("satisfied", "Satisfied", "#3fb950"),
    entry("neutral", "Neutral", "#58a6ff"),
    entry("frustrated", "Frustrated", "#db6d28"),
    entry("dissatisfied", "Dissatisfied", "#f85149"),
];

pub const FRICTION: &[LabelEntry] = &[
    entry("tool_failure", "Tool Failure", "#f85149"),
    entry("missed_context", "Missed Context", "#f85149"),
    entry("slow_iteration", "Slow Iteration", "#db6d28"),
    entry("context_overflow", "Context Overflow", "#db6d28"),
    entry("wrong_approach", "Wrong Approach", "#d29922"),
    entry("buggy_code", "Buggy Code", "#d29922"),
    entry("misunderstood_request", "Misunderstood Request", NEUTRAL),
    entry("hallucinated_info", "Hallucinated Info", NEUTRAL),
    entry("fabricated_data", "Fabricated Data", NEUTRAL),
    entry("over_engineering", "Over-Engineering", NEUTRAL),
];

pub const GOALS: &[LabelEntry] = &[
    entry("bug_fix", "Bug Fix", NEUTRAL),
    entry("feature_implementation", "Feature Implementation", NEUTRAL),
    entry("testing_implementation", "Testing", NEUTRAL),
    entry("refactoring", "Refactoring", NEUTRAL),
    entry("research", "Research", NEUTRAL),
    entry("data_fix_revert", "Data Fix / Revert", NEUTRAL),
    entry("deployment", "Deployment", NEUTRAL),
    entry("documentation", "Documentation", NEUTRAL),
    entry("configuration", "Configuration", NEUTRAL),
    entry("exploration", "Exploration", NEUTRAL),
    entry("code_review", "Code Review", NEUTRAL),
    entry("design_planning", "Design & Planning", NEUTRAL),
];

pub const SESSION_TYPES: &[LabelEntry] = &[
    entry("single_task", "Single Task", NEUTRAL),
    entry("multi_task", "Multi-Task", NEUTRAL),
    entry("iterative_refinement", "Iterative Refinement", NEUTRAL),
    entry("exploration", "Exploration", NEUTRAL),
    entry("q_and_a", "Q&A", NEUTRAL),
    entry("research", "Research", NEUTRAL),
    entry("debugging", "Debugging", NEUTRAL),
    entry("design_planning", "Design Planning", NEUTRAL),
];

pub const SUCCESSES: &[LabelEntry] = &[
    entry("thorough_research", "Thorough Research", NEUTRAL),
    entry("efficient_implementation", "Efficient Implementation", NEUTRAL),
    entry("clear_explanation", "Clear Explanation", NEUTRAL),
    entry("good_debugging", "Good Debugging", NEUTRAL),
    entry("good_planning", "Good Planning", NEUTRAL),
];

fn find(table: &'static [LabelEntry], key: &str) -> Option<&'static LabelEntry> {
    table.iter().find(|e| e.key == key)
}

/// Display label for `key`, or the key itself when unknown
pub fn label(table: &'static [LabelEntry], key: &str) -> String {
    find(table, key)
        .map(|e| e.label.to_string())
        .unwrap_or_else(|| key.to_string())
}

/// Chart colour for `key`, neutral when unknown
pub fn color(table: &'static [LabelEntry], key: &str) -> &'static str {
    find(table, key).map(|e| e.color).unwrap_or(NEUTRAL)
}
