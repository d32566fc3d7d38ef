use super::kib;
use deepinsight_core::{Error, Facet, Manifest, ReportConfig};
use deepinsight_report::labels::HELPFUL_RATE;
use deepinsight_report::{load_baseline, InsightEngine, ReportDataset, ReportInputs};
use deepinsight_store::Paths;
use std::path::{Path, PathBuf};

pub fn run(
    input_dir: Option<PathBuf>,
    output: Option<PathBuf>,
    no_comparison: bool,
) -> anyhow::Result<()> {
    let mut paths = Paths::new()?;
    if let Some(dir) = input_dir {
        paths = paths.with_output_dir(dir);
    }
    let output = output.unwrap_or_else(|| paths.report_file());

    println!("Deep Insights Report");
    println!("  Input directory: {}", paths.output_dir.display());

    let facets = load_facets(&paths.facets_file())?;
    let manifest: Option<Manifest> = deepinsight_store::read_json_opt(&paths.manifest_file());

    println!("  Facets loaded:   {}", facets.len());
    if let Some(m) = &manifest {
        println!("  Manifest:        {} sessions", m.total_sessions);
    }

    let baseline = if no_comparison {
        None
    } else {
        Some(load_baseline(&paths.baseline_facets_dir()))
    };

    let inputs = ReportInputs::new(facets, chrono::Utc::now())
        .with_manifest(manifest)
        .with_baseline(baseline);
    let dataset = InsightEngine::new(ReportConfig::default()).build(&inputs)?;
    if dataset.limited_data {
        println!(
            "Note: Limited data, analysis based on {} sessions.",
            dataset.total_sessions
        );
    }

    let bytes = deepinsight_store::write_json(&output, &dataset)?;
    print_headline(&dataset, &output, bytes);
    Ok(())
}

fn load_facets(path: &Path) -> anyhow::Result<Vec<Facet>> {
    if !path.exists() {
        return Err(Error::FacetsNotFound(path.to_path_buf()).into());
    }
    let facets: Vec<Facet> = deepinsight_store::read_json(path)?;
    if facets.is_empty() {
        return Err(Error::NoFacets.into());
    }
    Ok(facets)
}

fn print_headline(dataset: &ReportDataset, output: &Path, bytes: u64) {
    println!();
    println!(
        "  Report generated: {} ({:.0} KB)",
        output.display(),
        kib(bytes)
    );
    println!("  Sessions:        {}", dataset.total_sessions);
    println!("  Date range:      {}", dataset.date_range);
    println!("  Goals achieved:  {:.0}%", dataset.goals_achieved_pct);
    println!(
        "  {:<17}{:.0}%",
        format!("{HELPFUL_RATE}:"),
        dataset.helpful_pct
    );
    println!("  Friction rate:   {:.0}%", dataset.friction_pct);
}
