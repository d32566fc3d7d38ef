//! Text and tool-call extraction from message content

use crate::event::{value_text, Block, Content};
use deepinsight_core::text::truncate_chars;
use deepinsight_core::{CompactorConfig, ToolDetail, ToolInvocation, ToolKind};
use serde_json::Value;

/// Readable text of one message, capped at `max_chars`
///
/// Thinking blocks contribute a short bracketed preview so the fact that
/// reasoning happened survives without its bulk.
pub fn extract_text(content: &Content, max_chars: usize, thinking_chars: usize) -> String {
    let blocks = match content {
        Content::Text(s) => return truncate_chars(s, max_chars).to_string(),
        Content::Blocks(blocks) => blocks,
        Content::Empty => return String::new(),
    };

    let parts: Vec<String> = blocks
        .iter()
        .filter_map(|block| match block {
            Block::Plain(s) | Block::Text(s) => Some(truncate_chars(s, max_chars).to_string()),
            Block::Thinking(t) if !t.is_empty() => Some(format!(
                "[thinking: {}...]",
                truncate_chars(t, thinking_chars)
            )),
            Block::Thinking(_) | Block::ToolUse { .. } | Block::Other => None,
        })
        .collect();

    truncate_chars(&parts.join(" "), max_chars).to_string()
}

/// First of `keys` present in `input`, rendered as text
fn first_present(input: &Value, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|k| input.get(*k))
        .map(|v| value_text(Some(v)))
        .unwrap_or_default()
}

fn capped(input: &Value, keys: &[&str], max_chars: usize) -> String {
    truncate_chars(&first_present(input, keys), max_chars).to_string()
}

fn tool_detail(kind: ToolKind, input: &Value, config: &CompactorConfig) -> ToolDetail {
    let cap = config.max_tool_detail_chars;
    match kind {
        ToolKind::Lookup => ToolDetail::Target {
            target: capped(input, &["file_path", "pattern", "path"], cap),
        },
        ToolKind::Edit => ToolDetail::Target {
            target: capped(input, &["file_path"], cap),
        },
        ToolKind::Shell => ToolDetail::Command {
            command: capped(input, &["command"], cap),
        },
        ToolKind::WebSearch => ToolDetail::Query {
            query: capped(input, &["query"], cap),
        },
        ToolKind::WebFetch => ToolDetail::Url {
            url: capped(input, &["url"], cap),
        },
        ToolKind::Spawn => ToolDetail::Spawn {
            description: capped(input, &["description"], config.max_task_description_chars),
            subagent_type: capped(input, &["subagent_type"], cap),
        },
        ToolKind::Tracking => ToolDetail::Subject {
            subject: capped(input, &["subject", "status"], cap),
        },
        ToolKind::Unknown => ToolDetail::Bare {},
    }
}

/// Tool calls of an assistant message, in block order
pub fn extract_tool_calls(content: &Content, config: &CompactorConfig) -> Vec<ToolInvocation> {
    let Content::Blocks(blocks) = content else {
        return Vec::new();
    };

    blocks
        .iter()
        .filter_map(|block| match block {
            Block::ToolUse { name, input } => Some(ToolInvocation {
                name: name.clone(),
                detail: tool_detail(ToolKind::from_name(name), input, config),
            }),
            _ => None,
        })
        .collect()
}
