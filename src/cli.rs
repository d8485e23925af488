//! Command-line interface definitions.
//!
//! Uses clap derive API for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::client::{FeedSource, FeedType};
use crate::filters::DayFilter;
use crate::models::NumericField;
use crate::output::Format;
use crate::table::{DEFAULT_PAGE_SIZE, Sort};

/// Interactive earthquake scatter chart and table in your terminal.
#[derive(Parser, Debug)]
#[command(name = "seismoview")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose debug logging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    pub quiet: bool,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Explore the feed as a linked chart and table
    View(ViewArgs),

    /// Print the decoded feed (one-shot fetch and exit)
    Dump(DumpArgs),
}

/// Where to fetch the feed from.
#[derive(Args, Debug)]
pub struct SourceArgs {
    /// Summary feed to fetch
    #[arg(long, default_value = "all_month", value_parser = parse_feed_type)]
    pub feed: FeedType,

    /// Fetch this URL instead of the summary feed (same CSV layout)
    #[arg(long)]
    pub url: Option<String>,
}

impl SourceArgs {
    #[must_use]
    pub fn source(&self) -> FeedSource {
        self.url
            .clone()
            .map_or(FeedSource::Summary(self.feed), FeedSource::Url)
    }
}

/// Arguments for the `view` command.
#[derive(Parser, Debug)]
pub struct ViewArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Table rows per page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE, value_parser = parse_page_size)]
    pub page_size: usize,

    /// Keep a clicked record selected until clicked again or Esc
    #[arg(long)]
    pub sticky_click: bool,

    /// Initial chart x axis
    #[arg(long, default_value = "longitude", value_parser = parse_field)]
    pub x_axis: NumericField,

    /// Initial chart y axis
    #[arg(long, default_value = "latitude", value_parser = parse_field)]
    pub y_axis: NumericField,

    /// Log file (the terminal is taken by the view)
    #[arg(long, default_value = "seismoview.log")]
    pub log_file: PathBuf,
}

/// Arguments for the `dump` command.
#[derive(Parser, Debug)]
pub struct DumpArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Only records on this local calendar day (YYYY-MM-DD)
    #[arg(long, value_parser = parse_day)]
    pub date: Option<String>,

    /// Sort column, optionally with direction: mag, depth:desc, time:asc
    #[arg(long, value_parser = parse_sort)]
    pub sort: Option<Sort>,

    /// Maximum number of records to show
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Output format
    #[arg(long, short = 'f', default_value = "human", value_parser = parse_format)]
    pub format: Format,
}

/// Parse a feed type from string.
fn parse_feed_type(s: &str) -> Result<FeedType, String> {
    s.parse()
}

/// Parse an output format from string.
fn parse_format(s: &str) -> Result<Format, String> {
    s.parse()
}

/// Parse a chart axis field from string.
fn parse_field(s: &str) -> Result<NumericField, String> {
    s.parse()
}

/// Parse a table sort from string.
fn parse_sort(s: &str) -> Result<Sort, String> {
    s.parse()
}

/// Check that a date filter parses, keeping the original text.
fn parse_day(s: &str) -> Result<String, String> {
    s.parse::<DayFilter>().map(|_| s.to_string())
}

/// Parse a positive page size.
fn parse_page_size(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("page size must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(format!("invalid page size: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Column, SortDirection};

    #[test]
    fn test_view_defaults() {
        let cli = Cli::try_parse_from(["seismoview", "view"]).unwrap();
        let Command::View(args) = cli.command else {
            panic!("expected view command");
        };
        assert_eq!(args.source.source(), FeedSource::Summary(FeedType::AllMonth));
        assert_eq!(args.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(args.x_axis, NumericField::Longitude);
        assert_eq!(args.y_axis, NumericField::Latitude);
        assert!(!args.sticky_click);
    }

    #[test]
    fn test_dump_args() {
        let cli = Cli::try_parse_from([
            "seismoview",
            "dump",
            "--url",
            "http://localhost/q.csv",
            "--date",
            "2024-01-05",
            "--sort",
            "mag:desc",
            "-n",
            "5",
            "-f",
            "ndjson",
        ])
        .unwrap();
        let Command::Dump(args) = cli.command else {
            panic!("expected dump command");
        };
        assert_eq!(args.source.source(), FeedSource::Url("http://localhost/q.csv".into()));
        assert_eq!(args.date.as_deref(), Some("2024-01-05"));
        assert_eq!(
            args.sort,
            Some(Sort { column: Column::Magnitude, direction: SortDirection::Descending })
        );
        assert_eq!(args.limit, Some(5));
        assert_eq!(args.format, Format::Ndjson);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Cli::try_parse_from(["seismoview", "dump", "--date", "someday"]).is_err());
        assert!(Cli::try_parse_from(["seismoview", "view", "--page-size", "0"]).is_err());
        assert!(Cli::try_parse_from(["seismoview", "view", "--x-axis", "place"]).is_err());
    }
}
