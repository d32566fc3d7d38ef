use serde_json::{json, Value};
use std::path::{Path, PathBuf};

pub fn user_line(ts: &str, text: &str) -> String {
    json!({
        "type": "user",
        "timestamp": ts,
        "gitBranch": "main",
        "message": {"role": "user", "content": text}
    })
    .to_string()
}

pub fn assistant_line(ts: &str, text: &str, tool: Option<(&str, Value)>) -> String {
    let mut content = vec![json!({"type": "text", "text": text})];
    if let Some((name, input)) = tool {
        content.push(json!({"type": "tool_use", "name": name, "input": input}));
    }
    json!({
        "type": "assistant",
        "timestamp": ts,
        "message": {
            "model": "claude-opus",
            "usage": {"input_tokens": 100, "output_tokens": 20},
            "content": content
        }
    })
    .to_string()
}

/// `<root>/<project>/<id>.jsonl`
pub fn write_session(root: &Path, project: &str, id: &str, lines: &[String]) -> PathBuf {
    let path = root.join(project).join(format!("{id}.jsonl"));
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, lines.join("\n")).unwrap();
    path
}

pub fn sample_session(root: &Path, project: &str, id: &str) -> PathBuf {
    write_session(
        root,
        project,
        id,
        &[
            user_line("2025-03-01T10:00:00Z", "fix the failing checkout test"),
            assistant_line(
                "2025-03-01T10:00:30Z",
                "Looking at the test",
                Some(("Read", json!({"file_path": "/repo/tests/checkout.rs"}))),
            ),
            user_line("2025-03-01T10:02:00Z", "thanks, now run it"),
            assistant_line(
                "2025-03-01T10:03:00Z",
                "All green",
                Some(("Bash", json!({"command": "cargo test checkout"}))),
            ),
        ],
    )
}
