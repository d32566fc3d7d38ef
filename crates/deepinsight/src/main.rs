mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Preprocess {
            output_dir,
            session_dir,
            force,
        } => commands::preprocess::run(output_dir, session_dir, force),
        Commands::Report {
            input_dir,
            output,
            no_comparison,
        } => commands::report::run(input_dir, output, no_comparison),
        Commands::Status { output_dir } => commands::status::run(output_dir),
        Commands::Version => commands::version::run(),
    };

    if let Err(e) = result {
        let code = e
            .downcast_ref::<deepinsight_core::Error>()
            .map_or(1, deepinsight_core::Error::exit_code);
        if code == 0 {
            println!("{e}");
        } else {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(code);
    }
}
