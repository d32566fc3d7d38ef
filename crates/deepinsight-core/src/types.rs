//! Compacted session types and the manifest index

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tool families with a distinct field of interest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    /// Read, Glob, Grep: file path, pattern or search root
    Lookup,
    /// Edit, Write: file path
    Edit,
    /// Bash: command string
    Shell,
    WebSearch,
    WebFetch,
    /// Task: spawns a subagent
    Spawn,
    /// TaskCreate, TaskUpdate
    Tracking,
    Unknown,
}

impl ToolKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "Read" | "Glob" | "Grep" => ToolKind::Lookup,
            "Edit" | "Write" => ToolKind::Edit,
            "Bash" => ToolKind::Shell,
            "WebSearch" => ToolKind::WebSearch,
            "WebFetch" => ToolKind::WebFetch,
            "Task" => ToolKind::Spawn,
            "TaskCreate" | "TaskUpdate" => ToolKind::Tracking,
            _ => ToolKind::Unknown,
        }
    }
}

/// Per-kind detail of a tool call, flattened next to the tool name on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolDetail {
    Spawn {
        description: String,
        subagent_type: String,
    },
    Target {
        target: String,
    },
    Command {
        command: String,
    },
    Query {
        query: String,
    },
    Url {
        url: String,
    },
    Subject {
        subject: String,
    },
    Bare {},
}

impl ToolDetail {
    /// Path-or-pattern target, when the tool records one
    pub fn target(&self) -> Option<&str> {
        match self {
            ToolDetail::Target { target } => Some(target),
            _ => None,
        }
    }
}

/// One tool call extracted from an assistant event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub name: String,
    #[serde(flatten)]
    pub detail: ToolDetail,
}

impl ToolInvocation {
    pub fn kind(&self) -> ToolKind {
        ToolKind::from_name(&self.name)
    }

    /// Target that looks like a file path (contains a separator)
    pub fn touched_path(&self) -> Option<&str> {
        self.detail
            .target()
            .filter(|t| !t.is_empty() && t.contains('/'))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One turn of the compacted conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowEntry {
    pub role: Role,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub user_messages: usize,
    pub assistant_responses: usize,
    pub total_input_tokens: u64,
    pub total_output_tokens: u64,
    pub subagent_count: usize,
    pub had_context_compression: bool,
}

/// Bounded structural summary of one session log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub project: String,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub git_branch: Option<String>,
    pub models_used: Vec<String>,
    pub stats: SessionStats,
    /// Exact call counts over the whole session
    pub tool_usage: BTreeMap<String, u64>,
    /// First N calls only
    pub tool_details: Vec<ToolInvocation>,
    pub files_touched: Vec<String>,
    pub conversation_flow: Vec<FlowEntry>,
}

impl SessionSummary {
    /// Tool names by descending call count, ties broken by name
    pub fn top_tools(&self, n: usize) -> Vec<String> {
        let mut tools: Vec<(&String, &u64)> = self.tool_usage.iter().collect();
        tools.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        tools
            .into_iter()
            .take(n)
            .map(|(name, _)| name.clone())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub session_id: String,
    pub project: String,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub user_messages: usize,
    pub models: Vec<String>,
    pub subagent_count: usize,
    pub top_tools: Vec<String>,
}

impl ManifestEntry {
    pub fn from_summary(summary: &SessionSummary, top_tools: usize) -> Self {
        Self {
            session_id: summary.session_id.clone(),
            project: summary.project.clone(),
            start_time: summary.start_time,
            end_time: summary.end_time,
            user_messages: summary.stats.user_messages,
            models: summary.models_used.clone(),
            subagent_count: summary.stats.subagent_count,
            top_tools: summary.top_tools(top_tools),
        }
    }
}

/// Lightweight index over every summary of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub total_sessions: usize,
    pub generated_at: DateTime<Utc>,
    pub sessions: Vec<ManifestEntry>,
}

impl Manifest {
    /// Rebuild from scratch; never merged with a previous manifest
    pub fn build(summaries: &[SessionSummary], top_tools: usize, generated_at: DateTime<Utc>) -> Self {
        let sessions: Vec<ManifestEntry> = summaries
            .iter()
            .map(|s| ManifestEntry::from_summary(s, top_tools))
            .collect();
        Self {
            total_sessions: sessions.len(),
            generated_at,
            sessions,
        }
    }

    pub fn entry(&self, session_id: &str) -> Option<&ManifestEntry> {
        self.sessions.iter().find(|s| s.session_id == session_id)
    }
}
