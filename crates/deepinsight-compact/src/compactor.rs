//! Raw session log -> bounded SessionSummary

use crate::event::{EventKind, RawEvent};
use crate::extract::{extract_text, extract_tool_calls};
use chrono::{DateTime, Utc};
use deepinsight_core::text::wrap_capped;
use deepinsight_core::{
    CompactorConfig, FlowEntry, Role, SessionStats, SessionSummary, ToolInvocation,
};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// A freshly built summary plus line accounting
#[derive(Debug, Clone, PartialEq)]
pub struct Compaction {
    pub summary: SessionSummary,
    /// Well-formed records seen, of any kind
    pub lines_processed: usize,
    /// Lines that were not a JSON object
    pub lines_skipped: usize,
}

/// Running state while walking one log
#[derive(Debug, Default)]
struct SessionAccumulator {
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
    git_branch: Option<String>,
    user_texts: Vec<String>,
    assistant_texts: Vec<String>,
    models: BTreeSet<String>,
    input_tokens: u64,
    output_tokens: u64,
    had_compression: bool,
    tool_usage: BTreeMap<String, u64>,
    tool_details: Vec<ToolInvocation>,
    files_touched: BTreeSet<String>,
}

impl SessionAccumulator {
    fn observe(&mut self, event: RawEvent, config: &CompactorConfig) {
        if let Some(ts) = event.timestamp {
            self.start_time = Some(self.start_time.map_or(ts, |s| s.min(ts)));
            self.end_time = Some(self.end_time.map_or(ts, |e| e.max(ts)));
        }
        if self.git_branch.is_none() {
            self.git_branch = event.git_branch;
        }

        match event.kind {
            EventKind::Summary { text } => {
                self.had_compression = true;
                if !text.is_empty() {
                    self.assistant_texts.push(wrap_capped(
                        "[CONTEXT SUMMARY: ",
                        &text,
                        "]",
                        config.max_summary_chars,
                    ));
                }
            }
            EventKind::User { content } => {
                let text = extract_text(
                    &content,
                    config.max_text_per_message,
                    config.thinking_preview_chars,
                );
                if !text.trim().is_empty() {
                    self.user_texts.push(text);
                }
            }
            EventKind::Assistant {
                model,
                usage,
                content,
            } => {
                if let Some(model) = model {
                    self.models.insert(model);
                }
                self.input_tokens = self.input_tokens.saturating_add(usage.input_tokens);
                self.output_tokens = self.output_tokens.saturating_add(usage.output_tokens);

                let text = extract_text(
                    &content,
                    config.max_text_per_message,
                    config.thinking_preview_chars,
                );
                if !text.trim().is_empty() {
                    self.assistant_texts.push(text);
                }

                for call in extract_tool_calls(&content, config) {
                    *self.tool_usage.entry(call.name.clone()).or_default() += 1;
                    if let Some(path) = call.touched_path() {
                        self.files_touched.insert(path.to_string());
                    }
                    if self.tool_details.len() < config.max_tool_details {
                        self.tool_details.push(call);
                    }
                }
            }
            EventKind::Unrecognized => {}
        }
    }

    fn finish(
        self,
        session_id: String,
        project: String,
        subagent_count: usize,
        config: &CompactorConfig,
    ) -> SessionSummary {
        let stats = SessionStats {
            user_messages: self.user_texts.len(),
            assistant_responses: self.assistant_texts.len(),
            total_input_tokens: self.input_tokens,
            total_output_tokens: self.output_tokens,
            subagent_count,
            had_context_compression: self.had_compression,
        };
        let conversation_flow =
            build_flow(self.user_texts, self.assistant_texts, config.max_exchanges);

        SessionSummary {
            session_id,
            project,
            start_time: self.start_time,
            end_time: self.end_time,
            git_branch: self.git_branch,
            models_used: self.models.into_iter().collect(),
            stats,
            tool_usage: self.tool_usage,
            tool_details: self.tool_details,
            files_touched: self
                .files_touched
                .into_iter()
                .take(config.max_files_touched)
                .collect(),
            conversation_flow,
        }
    }
}

/// Interleave user and assistant texts into at most `max_exchanges` pairs
///
/// Always starts with a user turn. Stops when user texts run out; once
/// assistant texts run out, remaining pairs carry only the user turn.
pub fn build_flow(
    user_texts: Vec<String>,
    assistant_texts: Vec<String>,
    max_exchanges: usize,
) -> Vec<FlowEntry> {
    let mut flow = Vec::new();
    let mut assistant = assistant_texts.into_iter();

    for text in user_texts.into_iter().take(max_exchanges) {
        flow.push(FlowEntry {
            role: Role::User,
            text,
        });
        if let Some(text) = assistant.next() {
            flow.push(FlowEntry {
                role: Role::Assistant,
                text,
            });
        }
    }

    flow
}

/// Builds summaries with fixed caps
#[derive(Debug, Clone, Default)]
pub struct Compactor {
    config: CompactorConfig,
}

impl Compactor {
    pub fn new(config: CompactorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompactorConfig {
        &self.config
    }

    /// Compact already-parsed JSON lines
    ///
    /// `values` holds the lines that parsed as JSON; `parse_failures` is the
    /// count of those that did not. Non-object values are counted as skipped.
    pub fn compact_values(
        &self,
        session_id: impl Into<String>,
        project: impl Into<String>,
        values: impl IntoIterator<Item = Value>,
        parse_failures: usize,
        subagent_count: usize,
    ) -> Compaction {
        let mut fold = LineFold::default();
        for value in values {
            fold.push(&value, &self.config);
        }
        fold.lines_skipped += parse_failures;
        fold.finish(session_id.into(), project.into(), subagent_count, &self.config)
    }

    /// Compact one session log on disk
    ///
    /// Lines are folded as they are read, so memory stays bounded by the
    /// summary caps rather than the log size. Identity comes from the path;
    /// subagent logs are counted from the conventional
    /// `<session_id>/subagents/` directory beside it.
    pub fn compact_file(&self, log_path: &Path) -> std::io::Result<Compaction> {
        let mut fold = LineFold::default();
        let parse_failures = deepinsight_store::for_each_jsonl(log_path, |value: Value| {
            fold.push(&value, &self.config);
        })?;
        fold.lines_skipped += parse_failures;

        let compaction = fold.finish(
            deepinsight_store::session_id(log_path),
            deepinsight_store::project_name(log_path),
            deepinsight_store::count_subagents(log_path),
            &self.config,
        );

        if compaction.lines_skipped > 0 {
            tracing::debug!(
                path = %log_path.display(),
                skipped = compaction.lines_skipped,
                "skipped malformed lines"
            );
        }
        Ok(compaction)
    }
}

/// Accumulator plus line accounting
#[derive(Debug, Default)]
struct LineFold {
    acc: SessionAccumulator,
    lines_processed: usize,
    lines_skipped: usize,
}

impl LineFold {
    fn push(&mut self, value: &Value, config: &CompactorConfig) {
        match RawEvent::from_value(value) {
            Some(event) => {
                self.lines_processed += 1;
                self.acc.observe(event, config);
            }
            None => self.lines_skipped += 1,
        }
    }

    fn finish(
        self,
        session_id: String,
        project: String,
        subagent_count: usize,
        config: &CompactorConfig,
    ) -> Compaction {
        Compaction {
            summary: self.acc.finish(session_id, project, subagent_count, config),
            lines_processed: self.lines_processed,
            lines_skipped: self.lines_skipped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user(text: &str) -> Value {
        json!({"type": "user", "message": {"role": "user", "content": text}})
    }

    fn assistant(text: &str) -> Value {
        json!({"type": "assistant", "message": {"content": [{"type": "text", "text": text}]}})
    }

    fn compact(values: Vec<Value>) -> Compaction {
        Compactor::default().compact_values("s1", "proj", values, 0, 0)
    }

    #[test]
    fn test_build_flow_alternates() {
        let flow = build_flow(
            vec!["u1".into(), "u2".into()],
            vec!["a1".into(), "a2".into()],
            40,
        );
        let roles: Vec<Role> = flow.iter().map(|e| e.role).collect();
        assert_eq!(
            roles,
            vec![Role::User, Role::Assistant, Role::User, Role::Assistant]
        );
    }

    #[test]
    fn test_build_flow_assistant_runs_out() {
        let flow = build_flow(
            vec!["u1".into(), "u2".into(), "u3".into()],
            vec!["a1".into()],
            40,
        );
        let texts: Vec<&str> = flow.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["u1", "a1", "u2", "u3"]);
    }

    #[test]
    fn test_build_flow_user_runs_out() {
        let flow = build_flow(vec!["u1".into()], vec!["a1".into(), "a2".into()], 40);
        assert_eq!(flow.len(), 2);
    }

    #[test]
    fn test_build_flow_caps_exchanges() {
        let users: Vec<String> = (0..50).map(|i| format!("u{}", i)).collect();
        let assistants: Vec<String> = (0..45).map(|i| format!("a{}", i)).collect();
        let flow = build_flow(users, assistants, 40);
        assert_eq!(flow.iter().filter(|e| e.role == Role::User).count(), 40);
        assert_eq!(flow.iter().filter(|e| e.role == Role::Assistant).count(), 40);
        assert_eq!(flow.last().unwrap().text, "a39");
    }

    #[test]
    fn test_summary_event_marks_compression() {
        let result = compact(vec![
            json!({"type": "summary", "summary": "x".repeat(2000)}),
            user("continue"),
        ]);
        let summary = result.summary;
        assert!(summary.stats.had_context_compression);
        assert_eq!(summary.conversation_flow.len(), 2);
        let pseudo = &summary.conversation_flow[1];
        assert_eq!(pseudo.role, Role::Assistant);
        assert!(pseudo.text.starts_with("[CONTEXT SUMMARY: "));
        assert_eq!(pseudo.text.chars().count(), 1000);
    }

    #[test]
    fn test_whitespace_only_user_text_dropped() {
        let result = compact(vec![user("   \n"), user("real question")]);
        assert_eq!(result.summary.stats.user_messages, 1);
        assert_eq!(result.summary.conversation_flow[0].text, "real question");
    }

    #[test]
    fn test_tokens_models_and_branch() {
        let result = compact(vec![
            json!({"type": "user", "gitBranch": "main", "message": {"content": "go"}}),
            json!({"type": "assistant", "gitBranch": "other", "message": {
                "model": "claude-sonnet", "usage": {"input_tokens": 10, "output_tokens": 3},
                "content": []
            }}),
            json!({"type": "assistant", "message": {
                "model": "claude-opus", "usage": {"input_tokens": 5},
                "content": []
            }}),
        ]);
        let summary = result.summary;
        assert_eq!(summary.git_branch.as_deref(), Some("main"));
        assert_eq!(summary.models_used, vec!["claude-opus", "claude-sonnet"]);
        assert_eq!(summary.stats.total_input_tokens, 15);
        assert_eq!(summary.stats.total_output_tokens, 3);
        assert_eq!(summary.stats.assistant_responses, 0);
    }

    #[test]
    fn test_time_bounds_cover_all_kinds() {
        let result = compact(vec![
            json!({"type": "user", "timestamp": "2025-03-02T10:00:00Z", "message": {"content": "hi"}}),
            json!({"type": "snapshot", "timestamp": "2025-03-01T08:00:00Z"}),
            json!({"type": "summary", "timestamp": "2025-03-03T12:00:00Z", "summary": "s"}),
        ]);
        let summary = result.summary;
        assert_eq!(
            summary.start_time.unwrap().to_rfc3339(),
            "2025-03-01T08:00:00+00:00"
        );
        assert_eq!(
            summary.end_time.unwrap().to_rfc3339(),
            "2025-03-03T12:00:00+00:00"
        );
        assert_eq!(result.lines_processed, 3);
    }

    #[test]
    fn test_tool_counts_exact_beyond_detail_cap() {
        let calls: Vec<Value> = (0..45)
            .map(|i| json!({"type": "tool_use", "name": "Read", "input": {"file_path": format!("/src/f{:02}.rs", i)}}))
            .collect();
        let result = compact(vec![
            json!({"type": "assistant", "message": {"content": calls}}),
            json!({"type": "assistant", "message": {"content": [
                {"type": "tool_use", "name": "Bash", "input": {"command": "ls"}},
                {"type": "tool_use", "name": "Read", "input": {"file_path": "/src/f00.rs"}}
            ]}}),
        ]);
        let summary = result.summary;
        assert_eq!(summary.tool_usage["Read"], 46);
        assert_eq!(summary.tool_usage["Bash"], 1);
        assert_eq!(summary.tool_details.len(), 30);
        assert_eq!(summary.files_touched.len(), 30);
        assert_eq!(summary.files_touched[0], "/src/f00.rs");
        let mut sorted = summary.files_touched.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted, summary.files_touched);
    }

    #[test]
    fn test_files_touched_need_separator() {
        let result = compact(vec![json!({"type": "assistant", "message": {"content": [
            {"type": "tool_use", "name": "Glob", "input": {"pattern": "*.rs"}},
            {"type": "tool_use", "name": "Edit", "input": {"file_path": "src/lib.rs"}},
            {"type": "tool_use", "name": "Bash", "input": {"command": "cat /etc/hosts"}}
        ]}})]);
        assert_eq!(result.summary.files_touched, vec!["src/lib.rs"]);
    }

    #[test]
    fn test_non_object_lines_skipped() {
        let with_noise = Compactor::default().compact_values(
            "s1",
            "proj",
            vec![user("hello"), json!(42), assistant("hi")],
            1,
            0,
        );
        let clean = compact(vec![user("hello"), assistant("hi")]);
        assert_eq!(with_noise.lines_skipped, 2);
        assert_eq!(with_noise.summary, clean.summary);
    }

    #[test]
    fn test_empty_log() {
        let result = compact(vec![]);
        assert!(result.summary.conversation_flow.is_empty());
        assert_eq!(result.summary.start_time, None);
        assert!(result.summary.tool_usage.is_empty());
        assert_eq!(result.lines_processed, 0);
    }

    #[test]
    fn test_custom_caps() {
        let config = CompactorConfig {
            max_text_per_message: 10,
            max_exchanges: 2,
            ..CompactorConfig::default()
        };
        let result = Compactor::new(config).compact_values(
            "s1",
            "proj",
            vec![user("a long first question"), user("second"), user("third")],
            0,
            0,
        );
        let flow = result.summary.conversation_flow;
        assert_eq!(flow.len(), 2);
        assert_eq!(flow[0].text, "a long fir");
    }
}
