//! Raw session log records

use chrono::{DateTime, Utc};
use serde_json::Value;

/// Token usage reported on an assistant message
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// One block of a message's content list
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Bare string inside the list
    Plain(String),
    Text(String),
    Thinking(String),
    ToolUse { name: String, input: Value },
    Other,
}

/// Message content: a single string or an ordered block list
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Text(String),
    Blocks(Vec<Block>),
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    /// Context compression marker
    Summary { text: String },
    User { content: Content },
    Assistant {
        model: Option<String>,
        usage: Usage,
        content: Content,
    },
    Unrecognized,
}

/// One well-formed log record
#[derive(Debug, Clone, PartialEq)]
pub struct RawEvent {
    pub timestamp: Option<DateTime<Utc>>,
    pub git_branch: Option<String>,
    pub kind: EventKind,
}

/// Render a JSON scalar as display text; null and absent are empty
pub(crate) fn value_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl Block {
    fn from_value(value: &Value) -> Self {
        if let Some(s) = value.as_str() {
            return Block::Plain(s.to_string());
        }
        match value.get("type").and_then(|t| t.as_str()) {
            Some("text") => Block::Text(value_text(value.get("text"))),
            Some("thinking") => Block::Thinking(value_text(value.get("thinking"))),
            Some("tool_use") => Block::ToolUse {
                name: value
                    .get("name")
                    .and_then(|n| n.as_str())
                    .unwrap_or("unknown")
                    .to_string(),
                input: value.get("input").cloned().unwrap_or(Value::Null),
            },
            _ => Block::Other,
        }
    }
}

impl Content {
    fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::String(s)) => Content::Text(s.clone()),
            Some(Value::Array(items)) => Content::Blocks(items.iter().map(Block::from_value).collect()),
            _ => Content::Empty,
        }
    }
}

/// Any finite non-negative number; fractions truncate, huge values saturate
fn token_count(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite() && *f >= 0.0)
            .map(|f| f as u64)
    })
}

impl Usage {
    fn from_value(value: Option<&Value>) -> Self {
        let field = |key: &str| {
            value
                .and_then(|u| u.get(key))
                .and_then(token_count)
                .unwrap_or(0)
        };
        Self {
            input_tokens: field("input_tokens"),
            output_tokens: field("output_tokens"),
        }
    }
}

impl RawEvent {
    /// Classify a parsed JSON line; non-object lines are not events
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;

        let timestamp = obj
            .get("timestamp")
            .and_then(|t| t.as_str())
            .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
            .map(|t| t.with_timezone(&Utc));
        let git_branch = non_empty_str(obj.get("gitBranch"));
        let message = obj.get("message");

        let kind = match obj.get("type").and_then(|t| t.as_str()) {
            Some("summary") => EventKind::Summary {
                text: value_text(obj.get("summary")),
            },
            Some("user") => EventKind::User {
                content: Content::from_value(message.and_then(|m| m.get("content"))),
            },
            Some("assistant") => EventKind::Assistant {
                model: non_empty_str(message.and_then(|m| m.get("model"))),
                usage: Usage::from_value(message.and_then(|m| m.get("usage"))),
                content: Content::from_value(message.and_then(|m| m.get("content"))),
            },
            _ => EventKind::Unrecognized,
        };

        Some(Self {
            timestamp,
            git_branch,
            kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_summary() {
        let event = RawEvent::from_value(&json!({
            "type": "summary", "summary": "Refactored the router"
        }))
        .unwrap();
        assert_eq!(
            event.kind,
            EventKind::Summary {
                text: "Refactored the router".to_string()
            }
        );
        assert_eq!(event.timestamp, None);
    }

    #[test]
    fn test_classify_user_with_metadata() {
        let event = RawEvent::from_value(&json!({
            "type": "user",
            "timestamp": "2025-03-01T10:00:00.000Z",
            "gitBranch": "feature/x",
            "message": {"role": "user", "content": "fix the bug"}
        }))
        .unwrap();
        assert_eq!(event.git_branch.as_deref(), Some("feature/x"));
        assert_eq!(
            event.timestamp.unwrap().to_rfc3339(),
            "2025-03-01T10:00:00+00:00"
        );
        assert_eq!(
            event.kind,
            EventKind::User {
                content: Content::Text("fix the bug".to_string())
            }
        );
    }

    #[test]
    fn test_classify_assistant() {
        let event = RawEvent::from_value(&json!({
            "type": "assistant",
            "message": {
                "model": "claude-opus-4",
                "usage": {"input_tokens": 120, "output_tokens": 45},
                "content": [
                    {"type": "text", "text": "Looking"},
                    {"type": "thinking", "thinking": "hmm"},
                    {"type": "tool_use", "name": "Read", "input": {"file_path": "/a.rs"}},
                    {"type": "image"},
                    "loose"
                ]
            }
        }))
        .unwrap();

        let EventKind::Assistant { model, usage, content } = event.kind else {
            panic!("expected assistant");
        };
        assert_eq!(model.as_deref(), Some("claude-opus-4"));
        assert_eq!(usage, Usage { input_tokens: 120, output_tokens: 45 });
        let Content::Blocks(blocks) = content else {
            panic!("expected blocks");
        };
        assert_eq!(blocks.len(), 5);
        assert_eq!(blocks[0], Block::Text("Looking".to_string()));
        assert_eq!(blocks[1], Block::Thinking("hmm".to_string()));
        assert!(matches!(&blocks[2], Block::ToolUse { name, .. } if name == "Read"));
        assert_eq!(blocks[3], Block::Other);
        assert_eq!(blocks[4], Block::Plain("loose".to_string()));
    }

    #[test]
    fn test_assistant_without_usage_counts_zero() {
        let event = RawEvent::from_value(&json!({"type": "assistant", "message": {}})).unwrap();
        let EventKind::Assistant { model, usage, content } = event.kind else {
            panic!("expected assistant");
        };
        assert_eq!(model, None);
        assert_eq!(usage, Usage::default());
        assert_eq!(content, Content::Empty);
    }

    #[test]
    fn test_usage_accepts_float_token_counts() {
        let event = RawEvent::from_value(&json!({"type": "assistant", "message": {
            "usage": {"input_tokens": 12.0, "output_tokens": 7.9}
        }}))
        .unwrap();
        let EventKind::Assistant { usage, .. } = event.kind else {
            panic!("expected assistant");
        };
        assert_eq!(usage, Usage { input_tokens: 12, output_tokens: 7 });

        let event = RawEvent::from_value(&json!({"type": "assistant", "message": {
            "usage": {"input_tokens": -3, "output_tokens": "many"}
        }}))
        .unwrap();
        let EventKind::Assistant { usage, .. } = event.kind else {
            panic!("expected assistant");
        };
        assert_eq!(usage, Usage::default());
    }

    #[test]
    fn test_unrecognized_keeps_timestamp() {
        let event = RawEvent::from_value(&json!({
            "type": "file-history-snapshot", "timestamp": "2025-03-01T09:00:00Z"
        }))
        .unwrap();
        assert_eq!(event.kind, EventKind::Unrecognized);
        assert!(event.timestamp.is_some());
    }

    #[test]
    fn test_bad_timestamp_ignored() {
        let event = RawEvent::from_value(&json!({"type": "user", "timestamp": "yesterday"})).unwrap();
        assert_eq!(event.timestamp, None);
    }

    #[test]
    fn test_non_object_is_not_event() {
        assert!(RawEvent::from_value(&json!([1, 2, 3])).is_none());
        assert!(RawEvent::from_value(&json!("text")).is_none());
    }
}
