//! CLI argument parsing for Cotejar

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::comparison::{ComparisonConfig, PValueMethod};

/// Output format for comparison reports
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

/// P-value computation policy for the signed-rank test
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MethodArg {
    /// Exact for small untied samples, normal approximation otherwise
    Auto,
    /// Exact enumeration of the null distribution
    Exact,
    /// Normal approximation with tie-corrected variance
    Normal,
}

impl From<MethodArg> for PValueMethod {
    fn from(value: MethodArg) -> Self {
        match value {
            MethodArg::Auto => PValueMethod::Auto,
            MethodArg::Exact => PValueMethod::Exact,
            MethodArg::Normal => PValueMethod::NormalApprox,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "cotejar")]
#[command(version)]
#[command(
    about = "Compare classifier evaluation metrics against a deterministic baseline",
    long_about = None
)]
pub struct Cli {
    /// Results file with candidate samples and baseline scores (JSON)
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Render a grouped bar chart to this path (.svg or .png)
    #[arg(long = "chart", value_name = "PATH")]
    pub chart: Option<PathBuf>,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Statistical significance level (alpha) for the signed-rank test
    #[arg(
        long = "significance-level",
        value_name = "ALPHA",
        default_value = "0.05"
    )]
    pub significance_level: f64,

    /// Minimum trials per metric before a test is attempted
    #[arg(long = "min-sample-size", value_name = "N", default_value = "5")]
    pub min_sample_size: usize,

    /// P-value computation policy
    #[arg(long = "method", value_enum, default_value = "auto")]
    pub method: MethodArg,

    /// Strict preset: alpha=0.01, at least 10 trials per metric
    #[arg(long, conflicts_with = "permissive")]
    pub strict: bool,

    /// Permissive preset: alpha=0.10, at least 3 trials per metric
    #[arg(long)]
    pub permissive: bool,

    /// Enable debug tracing output
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Resolve the comparison configuration from flags.
    ///
    /// Presets win over the individual threshold flags; the method flag
    /// applies either way.
    pub fn comparison_config(&self) -> ComparisonConfig {
        let mut config = if self.strict {
            ComparisonConfig::strict()
        } else if self.permissive {
            ComparisonConfig::permissive()
        } else {
            ComparisonConfig {
                significance_level: self.significance_level,
                min_sample_size: self.min_sample_size,
                method: PValueMethod::Auto,
            }
        };
        config.method = self.method.into();
        config
    }
}
