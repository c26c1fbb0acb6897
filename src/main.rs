use anyhow::{Context, Result};
use clap::Parser;
use cotejar::{chart, cli::Cli, comparison, input, json_output};
use cotejar::cli::OutputFormat;
use cotejar::metrics::MetricLabel;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

fn run(cli: &Cli) -> Result<()> {
    let input = input::load_results(&cli.input)
        .with_context(|| format!("failed to load results from {}", cli.input.display()))?;

    let config = cli.comparison_config();
    let assessment = comparison::compare_models(&input.candidate, &input.baseline, &config)?;

    match cli.format {
        OutputFormat::Text => print!("{}", assessment.to_report_string()),
        OutputFormat::Json => {
            let report = json_output::build_report(&assessment);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    if let Some(chart_path) = &cli.chart {
        if assessment.tests.len() == MetricLabel::ALL.len() {
            chart::render_assessment(chart_path, &assessment)
                .with_context(|| format!("failed to render chart to {}", chart_path.display()))?;
            tracing::info!("chart written to {}", chart_path.display());
        } else {
            tracing::warn!(
                "skipping chart: only {} of {} metrics have valid tests",
                assessment.tests.len(),
                MetricLabel::ALL.len()
            );
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);
    run(&cli)
}
