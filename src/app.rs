//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - fetches documents (offline file or the observation store)
//! - runs the dashboard pipeline
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;
use tracing::info;

use crate::cli::{AskArgs, ChartArgs, Command, ExportArgs, GridArgs, IndicatorArgs, PipelineArgs, SourceArgs};
use crate::data::{AssistantClient, CONSUMER_COLLECTION, MATERIALS_COLLECTION};
use crate::domain::{MetricsPolicy, PipelineConfig};
use crate::error::AppError;

pub mod pipeline;

use pipeline::{AssistantOutcome, DocumentSource, Fetched};

/// Entry point for the `trends` binary.
pub fn run() -> Result<(), AppError> {
    crate::logging::init_logging();

    // `trends` and `trends --input x.json` behave like `trends grid ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Grid(args) => handle_grid(args),
        Command::Indicators(args) => handle_indicators(args),
        Command::Chart(args) => handle_chart(args),
        Command::Ask(args) => handle_ask(args),
        Command::Export(args) => handle_export(args),
    }
}

fn handle_grid(args: GridArgs) -> Result<(), AppError> {
    let config = pipeline_config_from_args(&args.pipeline);
    let categorizer = pipeline::categorizer_for(&config)?;
    let source = document_source(&args.source, MATERIALS_COLLECTION);

    let grid = match pipeline::load_grid(&source, &config, &categorizer) {
        Fetched::Ready(grid) => grid,
        Fetched::Failed(err) => return Err(err),
    };

    println!("{}", crate::report::format_grid(&grid));
    if args.diagnostics {
        print!("{}", crate::report::format_diagnostics(&grid.diagnostics));
    }

    if let Some(path) = &args.export_json {
        crate::io::export::write_json(path, &grid)?;
        info!(path = %path.display(), "grid exported");
    }

    if grid.series_count == 0 {
        return Err(AppError::new(3, "No usable series after filtering."));
    }
    Ok(())
}

fn handle_indicators(args: IndicatorArgs) -> Result<(), AppError> {
    let config = pipeline_config_from_args(&args.pipeline);
    let categorizer = pipeline::categorizer_for(&config)?;
    let source = document_source(&args.source, CONSUMER_COLLECTION);

    let dashboard = match pipeline::load_indicators(&source, &config, &categorizer) {
        Fetched::Ready(dashboard) => dashboard,
        Fetched::Failed(err) => return Err(err),
    };

    println!("{}", crate::report::format_indicators(&dashboard));
    if args.diagnostics {
        print!("{}", crate::report::format_diagnostics(&dashboard.diagnostics));
    }

    if let Some(path) = &args.export_json {
        crate::io::export::write_json(path, &dashboard)?;
        info!(path = %path.display(), "indicators exported");
    }

    if dashboard.indicators.is_empty() {
        return Err(AppError::new(3, "No usable series after filtering."));
    }
    Ok(())
}

fn handle_chart(args: ChartArgs) -> Result<(), AppError> {
    let mut config = pipeline_config_from_args(&args.pipeline);
    config.chart_window = args.window;
    let categorizer = pipeline::categorizer_for(&config)?;
    let source = document_source(&args.source, MATERIALS_COLLECTION);

    let documents = pipeline::fetch_series_documents(&source, &args.series)?;
    let view = pipeline::build_chart(&documents, &args.series, args.metric.as_deref(), &config, &categorizer)?;

    if let Some(path) = &args.export_json {
        crate::io::export::write_json(path, &view)?;
        info!(path = %path.display(), "chart exported");
    }

    print!("{}", crate::plot::render_chart(&view, args.size.width, args.size.height));
    Ok(())
}

fn handle_ask(args: AskArgs) -> Result<(), AppError> {
    let client = AssistantClient::from_env()?;
    let prompt = args.prompt.join(" ");

    match pipeline::ask_assistant(&client, &prompt) {
        Fetched::Ready(AssistantOutcome::Text(text)) => println!("{text}"),
        Fetched::Ready(AssistantOutcome::Chart(view)) => {
            print!("{}", crate::plot::render_chart(&view, args.size.width, args.size.height));
        }
        Fetched::Ready(AssistantOutcome::Silent) => {}
        Fetched::Failed(err) => return Err(err),
    }
    Ok(())
}

fn handle_export(args: ExportArgs) -> Result<(), AppError> {
    let config = pipeline_config_from_args(&args.pipeline);
    let categorizer = pipeline::categorizer_for(&config)?;
    let source = document_source(&args.source, MATERIALS_COLLECTION);

    let wanted = vec![args.series.clone()];
    let documents = pipeline::fetch_series_documents(&source, &wanted)?;
    let (series, _) = pipeline::prepare_series(&documents, &config, &categorizer);

    let key = args.series.trim();
    let found = series
        .iter()
        .find(|s| s.id == key)
        .or_else(|| series.iter().find(|s| s.name == key))
        .ok_or_else(|| AppError::new(3, format!("Series '{key}' not found or has no data.")))?;

    crate::io::export::write_series_csv(&args.out, found)?;
    info!(series = %found.id, rows = found.observations.len(), path = %args.out.display(), "series exported");
    Ok(())
}

fn document_source(args: &SourceArgs, default_collection: &str) -> DocumentSource {
    match (&args.input, &args.collection) {
        (Some(path), _) => DocumentSource::File(path.clone()),
        (None, Some(collection)) => DocumentSource::Store {
            collection: collection.clone(),
        },
        (None, None) => DocumentSource::Store {
            collection: default_collection.to_string(),
        },
    }
}

pub fn pipeline_config_from_args(args: &PipelineArgs) -> PipelineConfig {
    let defaults = PipelineConfig::default();
    PipelineConfig {
        trend_window: args.trend_window,
        category_priority: if args.priority.is_empty() {
            defaults.category_priority
        } else {
            args.priority.clone()
        },
        rate_series: if args.rate_series.is_empty() {
            defaults.rate_series
        } else {
            args.rate_series.clone()
        },
        metrics: MetricsPolicy {
            recompute: args.recompute,
        },
        category_table: args.categories.clone(),
        ..defaults
    }
}

/// Rewrite argv so `trends` defaults to `trends grid`.
///
/// Rules:
/// - `trends`                          -> `trends grid`
/// - `trends --input x.json ...`       -> `trends grid --input x.json ...`
/// - `trends --help/--version/-h`      -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("grid".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "grid".to_string());
    }
    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_and_flag_first_invocations_become_grid() {
        assert_eq!(rewrite_args(args(&["trends"])), args(&["trends", "grid"]));
        assert_eq!(
            rewrite_args(args(&["trends", "--input", "a.json"])),
            args(&["trends", "grid", "--input", "a.json"])
        );
        assert_eq!(rewrite_args(args(&["trends", "--help"])), args(&["trends", "--help"]));
        assert_eq!(rewrite_args(args(&["trends", "chart", "-s", "x"])), args(&["trends", "chart", "-s", "x"]));
    }

    #[test]
    fn empty_lists_keep_defaults() {
        let pa = PipelineArgs {
            categories: Some(PathBuf::from("cats.json")),
            recompute: true,
            trend_window: 12,
            rate_series: Vec::new(),
            priority: vec!["Lumber".to_string()],
        };
        let config = pipeline_config_from_args(&pa);
        assert_eq!(config.trend_window, 12);
        assert_eq!(config.chart_window, crate::domain::DEFAULT_CHART_WINDOW);
        assert_eq!(config.category_priority, vec!["Lumber"]);
        assert_eq!(config.rate_series, PipelineConfig::default().rate_series);
        assert!(config.metrics.recompute);
        assert_eq!(config.category_table, Some(PathBuf::from("cats.json")));
    }

    #[test]
    fn input_file_wins_over_default_collection() {
        let file = SourceArgs {
            input: Some(PathBuf::from("docs.json")),
            collection: None,
        };
        assert!(matches!(document_source(&file, MATERIALS_COLLECTION), DocumentSource::File(_)));

        let store = document_source(&SourceArgs::default(), CONSUMER_COLLECTION);
        assert!(matches!(store, DocumentSource::Store { ref collection } if collection == CONSUMER_COLLECTION));
    }
}
