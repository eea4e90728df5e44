//! Command-line parsing for the economic trends dashboards.
//!
//! Argument parsing stays separate from the pipeline; `app` turns these
//! structs into a `PipelineConfig` and a document source.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "trends", version, about = "Economic and materials price trend dashboards")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Category-grouped materials grid with latest MoM/YoY and a trend sparkline.
    Grid(GridArgs),
    /// Consumer indicators ranked by latest month-over-month change.
    Indicators(IndicatorArgs),
    /// Plot the MoM history of one or more series.
    Chart(ChartArgs),
    /// Send a prompt to the conversational backend and show its text or chart.
    Ask(AskArgs),
    /// Write one finalized series (with derived metrics) to CSV.
    Export(ExportArgs),
}

/// Where documents are read from.
#[derive(Debug, Args, Clone, Default)]
pub struct SourceArgs {
    /// Offline JSON file with series documents (array or `{"documents": [...]}`).
    #[arg(short = 'i', long, value_name = "FILE", conflicts_with = "collection")]
    pub input: Option<PathBuf>,

    /// Store collection to fetch (defaults depend on the command).
    #[arg(long, value_name = "NAME")]
    pub collection: Option<String>,
}

/// Options shared by every command that runs the pipeline.
#[derive(Debug, Args, Clone)]
pub struct PipelineArgs {
    /// JSON category table replacing the built-in one.
    #[arg(long, value_name = "FILE")]
    pub categories: Option<PathBuf>,

    /// Recompute every derived metric, ignoring upstream values.
    #[arg(long)]
    pub recompute: bool,

    /// Number of trailing raw values in each grid sparkline.
    #[arg(long, default_value_t = crate::domain::DEFAULT_TREND_WINDOW)]
    pub trend_window: usize,

    /// Series id or name whose changes are percentage points (repeatable; replaces the defaults).
    #[arg(long = "rate-series", value_name = "ID")]
    pub rate_series: Vec<String>,

    /// Category shown first on the grid (repeatable; replaces the defaults).
    #[arg(long = "priority", value_name = "CATEGORY")]
    pub priority: Vec<String>,
}

#[derive(Debug, Args, Clone)]
pub struct GridArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub pipeline: PipelineArgs,

    /// Also print data-quality diagnostics.
    #[arg(long)]
    pub diagnostics: bool,

    /// Write the grid dashboard as pretty JSON.
    #[arg(long = "export-json", value_name = "PATH")]
    pub export_json: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct IndicatorArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub pipeline: PipelineArgs,

    /// Also print data-quality diagnostics.
    #[arg(long)]
    pub diagnostics: bool,

    /// Write the indicator ranking as pretty JSON.
    #[arg(long = "export-json", value_name = "PATH")]
    pub export_json: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct ChartArgs {
    /// Series id or name to plot (repeat for a comparison chart).
    #[arg(short = 's', long = "series", value_name = "ID", required = true)]
    pub series: Vec<String>,

    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub pipeline: PipelineArgs,

    /// Metric label used in the chart title.
    #[arg(long)]
    pub metric: Option<String>,

    /// Trailing MoM points per line.
    #[arg(long, default_value_t = crate::domain::DEFAULT_CHART_WINDOW)]
    pub window: usize,

    #[command(flatten)]
    pub size: PlotSize,

    /// Write the chart view as pretty JSON.
    #[arg(long = "export-json", value_name = "PATH")]
    pub export_json: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct AskArgs {
    /// Free-form question for the assistant.
    #[arg(required = true, num_args = 1..)]
    pub prompt: Vec<String>,

    #[command(flatten)]
    pub size: PlotSize,
}

#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    /// Series id or name to export.
    #[arg(short = 's', long = "series", value_name = "ID")]
    pub series: String,

    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub pipeline: PipelineArgs,

    /// Destination CSV file.
    #[arg(short = 'o', long, value_name = "PATH")]
    pub out: PathBuf,
}

/// Terminal plot dimensions.
#[derive(Debug, Args, Clone, Copy)]
pub struct PlotSize {
    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_accepts_repeated_series() {
        let cli = Cli::parse_from(["trends", "chart", "-s", "Cement", "--series", "Steel Mill Products", "--window", "12"]);
        match cli.command {
            Command::Chart(args) => {
                assert_eq!(args.series, vec!["Cement", "Steel Mill Products"]);
                assert_eq!(args.window, 12);
                assert_eq!(args.size.width, 80);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn input_and_collection_conflict() {
        let res = Cli::try_parse_from(["trends", "grid", "--input", "a.json", "--collection", "x"]);
        assert!(res.is_err());
    }

    #[test]
    fn ask_joins_prompt_words() {
        let cli = Cli::parse_from(["trends", "ask", "how", "is", "lumber?"]);
        match cli.command {
            Command::Ask(args) => assert_eq!(args.prompt.join(" "), "how is lumber?"),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
