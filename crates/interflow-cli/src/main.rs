//! Interflow command line.

use std::io::{self, IsTerminal};

use anyhow::Result;
use clap::{ColorChoice, Parser};
use serde::Serialize;
use tracing::level_filters::LevelFilter;

use interflow_cli::logging::{LogConfig, init_logging};
use interflow_cli::render::{analysis_table, needs_table};

mod cli;
mod commands;

use crate::cli::{Cli, Command, FiltersCommand, OutputFormatArg};
use crate::commands::{
    FiltersView, NeedsView, open_cache, run_analyse, run_filters_reset, run_filters_show,
    run_needs,
};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(&cli) {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> Result<()> {
    let json = cli.format == OutputFormatArg::Json;
    match &cli.command {
        Command::Needs(args) => {
            let cache = open_cache(cli.cache_file.as_deref())?;
            let view = run_needs(args, cache)?;
            if json {
                print_json(&view.rows)
            } else {
                print_needs(&view);
                Ok(())
            }
        }
        Command::Analyse(args) => {
            let analysis = run_analyse(args)?;
            if json {
                print_json(&analysis)
            } else {
                if let Some(window) = &analysis.window {
                    println!("Horizon: {} to {}", window.start, window.end());
                }
                println!("{}", analysis_table(&analysis));
                Ok(())
            }
        }
        Command::Filters(FiltersCommand::Show { route }) => {
            let cache = open_cache(cli.cache_file.as_deref())?;
            let view = run_filters_show(route, &cache)?;
            if json {
                print_json(&view.entry)
            } else {
                print_filters(&view);
                Ok(())
            }
        }
        Command::Filters(FiltersCommand::Reset { route }) => {
            let cache = open_cache(cli.cache_file.as_deref())?;
            run_filters_reset(route, cache)
        }
    }
}

fn print_needs(view: &NeedsView) {
    println!("URL: {}", view.url);
    println!("Filters from: {}", view.source.as_str());
    println!("{}", needs_table(&view.rows));
    println!("{} of {} needs shown", view.rows.len(), view.total);
}

fn print_filters(view: &FiltersView) {
    println!("Cache: {}", view.path.display());
    match &view.entry {
        Some(entry) => println!("{}: {entry}", view.route),
        None => println!("{}: defaults", view.route),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Logging setup for the parsed flags. An explicit level on the command line
/// wins over `RUST_LOG`.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let level = cli
        .log_level
        .map_or_else(|| cli.verbosity.tracing_level_filter(), LevelFilter::from);
    let explicit = cli.verbosity.is_present() || cli.log_level.is_some();
    let ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    LogConfig::default()
        .with_level(level)
        .with_env_override(!explicit)
        .with_format(cli.log_format.into())
        .with_log_file(cli.log_file.clone())
        .with_ansi(ansi)
}
