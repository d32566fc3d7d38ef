use super::{kib, mib};
use deepinsight_compact::{Compactor, PreprocessRun, Preprocessor, SessionOutcome, SummaryStore};
use deepinsight_core::{CompactorConfig, Error};
use deepinsight_store::Paths;
use std::collections::BTreeSet;
use std::path::PathBuf;

pub fn run(
    output_dir: Option<PathBuf>,
    session_dir: Option<PathBuf>,
    force: bool,
) -> anyhow::Result<()> {
    let mut paths = Paths::new()?;
    if let Some(dir) = output_dir {
        paths = paths.with_output_dir(dir);
    }
    let session_dir = session_dir.unwrap_or_else(|| paths.sessions_dir());

    if !session_dir.is_dir() {
        return Err(Error::SessionDirNotFound(session_dir).into());
    }
    let logs = deepinsight_store::discover_sessions(&session_dir);
    if logs.is_empty() {
        return Err(Error::NoSessions(session_dir).into());
    }

    let projects: BTreeSet<String> = logs.iter().map(|p| deepinsight_store::project_name(p)).collect();
    let raw_size: u64 = logs
        .iter()
        .filter_map(|p| std::fs::metadata(p).ok())
        .map(|m| m.len())
        .sum();

    println!("Deep Insights Preprocessing");
    println!("  Session directory: {}", session_dir.display());
    println!("  Output directory:  {}", paths.output_dir.display());
    println!("  Projects found:    {}", projects.len());
    println!("  Sessions found:    {}", logs.len());
    println!("  Raw data size:     {:.1} MB", mib(raw_size));
    println!();

    let config = CompactorConfig::default();
    let top_tools = config.manifest_top_tools;
    let preprocessor = Preprocessor::new(
        Compactor::new(config),
        SummaryStore::new(paths.summaries_dir()),
    )
    .force(force);

    let total = logs.len();
    let run = preprocessor.run(&logs, |i, _, outcome| match outcome {
        SessionOutcome::Cached(_) => {}
        SessionOutcome::Computed {
            summary,
            lines_skipped,
            bytes_written,
        } => {
            let warn = if *lines_skipped > 0 {
                format!(" ({} bad lines)", lines_skipped)
            } else {
                String::new()
            };
            println!(
                "  [{}/{}] {} -> {:.1}KB{}",
                i + 1,
                total,
                deepinsight_core::text::truncate_chars(&summary.session_id, 12),
                kib(*bytes_written),
                warn
            );
        }
        SessionOutcome::Failed { session_id, error } => {
            println!(
                "  [{}/{}] {} ERROR: {}",
                i + 1,
                total,
                deepinsight_core::text::truncate_chars(session_id, 12),
                error
            );
        }
    });

    let manifest = run.manifest(top_tools, chrono::Utc::now());
    deepinsight_store::write_json(&paths.manifest_file(), &manifest)?;
    tracing::info!(
        sessions = manifest.total_sessions,
        path = %paths.manifest_file().display(),
        "manifest written"
    );

    print_summary(&run, &paths);
    Ok(())
}

fn print_summary(run: &PreprocessRun, paths: &Paths) {
    let rule = "=".repeat(50);
    println!();
    println!("{rule}");
    println!("  Preprocessing complete");
    println!("  New:       {} sessions processed", run.new);
    if run.cached > 0 {
        println!(
            "  Skipped:   {} sessions (already processed, use --force to redo)",
            run.cached
        );
    }
    if run.failed > 0 {
        println!("  Errors:    {} sessions failed", run.failed);
    }
    if run.lines_skipped > 0 {
        println!(
            "  Bad lines: {} JSONL lines skipped (invalid JSON)",
            run.lines_skipped
        );
    }
    println!("  Total:     {} sessions in manifest", run.summaries.len());
    println!("  Raw size:  {:.1} MB", mib(run.raw_bytes));
    println!("  Summary:   {:.1} KB", kib(run.summary_bytes));
    if let Some(reduction) = run.reduction_pct() {
        println!("  Reduction: {:.1}%", reduction);
    }
    println!("  Output:    {}", paths.output_dir.display());
    println!("{rule}");
}
