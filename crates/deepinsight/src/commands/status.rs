use deepinsight_core::{Facet, Manifest};
use deepinsight_store::Paths;
use std::path::{Path, PathBuf};

pub fn run(output_dir: Option<PathBuf>) -> anyhow::Result<()> {
    let mut paths = Paths::new()?;
    if let Some(dir) = output_dir {
        paths = paths.with_output_dir(dir);
    }
    println!("{}", status(&paths));
    Ok(())
}

fn count_json_files(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
                .count()
        })
        .unwrap_or(0)
}

/// Presence and size of every pipeline artifact, as JSON
fn status(paths: &Paths) -> serde_json::Value {
    let sessions_dir = paths.sessions_dir();
    let session_logs = if sessions_dir.is_dir() {
        deepinsight_store::discover_sessions(&sessions_dir).len()
    } else {
        0
    };
    let manifest: Option<Manifest> = deepinsight_store::read_json_opt(&paths.manifest_file());
    let facets: Option<Vec<Facet>> = deepinsight_store::read_json_opt(&paths.facets_file());

    serde_json::json!({
        "session_dir": sessions_dir.display().to_string(),
        "session_logs": session_logs,
        "summaries": count_json_files(&paths.summaries_dir()),
        "manifest_sessions": manifest.map(|m| m.total_sessions),
        "facets": facets.map(|f| f.len()),
        "report": paths.report_file().exists(),
        "baseline_facets": count_json_files(&paths.baseline_facets_dir()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_of_empty_output_dir() {
        let temp = tempfile::TempDir::new().unwrap();
        let paths = Paths {
            home_claude: temp.path().join(".claude"),
            output_dir: temp.path().join("out"),
        };

        let value = status(&paths);
        assert_eq!(value["session_logs"], 0);
        assert_eq!(value["summaries"], 0);
        assert!(value["manifest_sessions"].is_null());
        assert!(value["facets"].is_null());
        assert_eq!(value["report"], false);
    }

    #[test]
    fn test_status_counts_artifacts() {
        let temp = tempfile::TempDir::new().unwrap();
        let paths = Paths {
            home_claude: temp.path().join(".claude"),
            output_dir: temp.path().join("out"),
        };
        std::fs::create_dir_all(paths.summaries_dir()).unwrap();
        std::fs::write(paths.summary_file("a"), "{}").unwrap();
        std::fs::write(paths.summary_file("b"), "{}").unwrap();
        std::fs::write(paths.facets_file(), r#"[{"session_id": "a"}]"#).unwrap();

        let value = status(&paths);
        assert_eq!(value["summaries"], 2);
        assert_eq!(value["facets"], 1);
    }
}
