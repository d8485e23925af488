//! SeismoView - Explore earthquakes from your terminal.
//!
//! Fetches the USGS earthquake CSV feed once and shows it as a scatter chart
//! and a sortable, filterable table that highlight the same record.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

mod app;
mod chart;
mod cli;
mod client;
mod errors;
mod feed;
mod filters;
mod models;
mod output;
mod selection;
mod table;
mod tui;

use app::{App, AppConfig};
use cli::{Cli, Command};
use client::UsgsClient;
use selection::SelectionPolicy;
use table::TableView;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::View(args) => {
            init_file_tracing(cli.verbose, cli.quiet, &args.log_file)?;
            cmd_view(args)
        }
        Command::Dump(args) => {
            init_tracing(cli.verbose, cli.quiet);
            cmd_dump(args)
        }
    }
}

/// Log level filter based on verbosity.
fn env_filter(verbose: bool, quiet: bool) -> EnvFilter {
    if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    }
}

/// Initialize tracing subscriber on stderr.
fn init_tracing(verbose: bool, quiet: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose, quiet))
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Initialize tracing subscriber into a file, keeping the terminal clean for
/// the interactive view.
fn init_file_tracing(verbose: bool, quiet: bool, path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose, quiet))
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

/// Execute the `view` command - interactive chart and table.
fn cmd_view(args: cli::ViewArgs) -> Result<()> {
    let client = UsgsClient::new().context("failed to create USGS client")?;

    let config = AppConfig {
        page_size: args.page_size,
        policy: if args.sticky_click {
            SelectionPolicy::StickyClick
        } else {
            SelectionPolicy::Transient
        },
        x_axis: args.x_axis,
        y_axis: args.y_axis,
    };

    let pending = app::spawn_load(client, args.source.source());
    let mut app = App::new(config, pending);

    tui::run(&mut app).context("terminal UI failed")
}

/// Execute the `dump` command - fetch, filter, sort and print.
fn cmd_dump(args: cli::DumpArgs) -> Result<()> {
    let client = UsgsClient::new().context("failed to create USGS client")?;

    let quakes = client
        .fetch_quakes(&args.source.source())
        .context("failed to fetch earthquake feed")?;

    // Same filter and sort rules as the interactive table
    let mut table = TableView::default();
    if let Some(date) = args.date {
        table.set_filter(date);
    }
    table.set_sort(args.sort);

    let mut rows = table.sorted_rows(&quakes);
    if let Some(limit) = args.limit {
        rows.truncate(limit);
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    output::write_events(&mut handle, &rows, args.format)?;

    Ok(())
}
