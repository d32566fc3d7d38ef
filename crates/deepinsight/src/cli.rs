use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "deepinsight")]
#[command(version)]
#[command(about = "Session log compaction and cross-session insight reports")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compact raw session logs into per-session summaries and a manifest
    Preprocess {
        /// Where summaries and the manifest are written
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Root of the raw session logs (default: ~/.claude/projects)
        #[arg(short, long)]
        session_dir: Option<PathBuf>,

        /// Recompute summaries even when one already exists
        #[arg(long)]
        force: bool,
    },

    /// Aggregate facets into the report dataset
    Report {
        /// Directory holding all_facets.json and session_manifest.json
        #[arg(short, long)]
        input_dir: Option<PathBuf>,

        /// Dataset output path (default: <input-dir>/report.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip the baseline comparison even if baseline facets exist
        #[arg(long)]
        no_comparison: bool,
    },

    /// Show which pipeline artifacts exist
    Status {
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Print version information
    Version,
}
