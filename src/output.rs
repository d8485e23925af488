//! Output formatters for the `dump` command.
//!
//! Supports human-readable (with colors), JSON, and NDJSON formats.

use std::io::{self, Write};

use crate::models::Earthquake;
use crate::table::Column;

// ANSI color codes
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

// Magnitude-based colors
const RED: &str = "\x1b[91m"; // mag >= 7.0
const YELLOW: &str = "\x1b[93m"; // mag >= 6.0
const CYAN: &str = "\x1b[96m"; // mag >= 4.5
const GREEN: &str = "\x1b[92m"; // mag >= 3.0
const WHITE: &str = "\x1b[97m"; // mag < 3.0 or missing

/// Output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Human-readable terminal output (default)
    #[default]
    Human,
    /// JSON array
    Json,
    /// Newline-delimited JSON (one object per line)
    Ndjson,
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            "ndjson" => Ok(Self::Ndjson),
            _ => Err(format!("unknown format: {s} (expected: human, json, ndjson)")),
        }
    }
}

/// Get the color code for a magnitude value.
fn magnitude_color(mag: f64) -> &'static str {
    match mag {
        m if m >= 7.0 => RED,
        m if m >= 6.0 => YELLOW,
        m if m >= 4.5 => CYAN,
        m if m >= 3.0 => GREEN,
        _ => WHITE,
    }
}

/// Write records in human-readable format, one line each, using the same
/// cell text as the table view.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_human<W: Write>(writer: &mut W, quakes: &[&Earthquake]) -> io::Result<()> {
    for quake in quakes {
        let color = magnitude_color(quake.mag);
        let mag = if quake.mag.is_nan() {
            "?".to_string()
        } else {
            format!("{:.1}", quake.mag)
        };
        let place = quake.place.as_deref().unwrap_or("Unknown location");

        writeln!(
            writer,
            "{color}{BOLD}M{mag:<4}{RESET} │ \
             {time} │ \
             {DIM}{lat:>9} {lon:>10} {depth:>7}km{RESET} │ \
             {place}",
            time = Column::Time.cell(quake),
            lat = Column::Latitude.cell(quake),
            lon = Column::Longitude.cell(quake),
            depth = Column::Depth.cell(quake),
        )?;
    }
    Ok(())
}

/// Write records as a JSON array. Missing numbers are written as `null`.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json<W: Write>(writer: &mut W, quakes: &[&Earthquake]) -> io::Result<()> {
    let json = serde_json::to_string_pretty(quakes)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{json}")
}

/// Write records as newline-delimited JSON.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_ndjson<W: Write>(writer: &mut W, quakes: &[&Earthquake]) -> io::Result<()> {
    for quake in quakes {
        let json = serde_json::to_string(quake)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        writeln!(writer, "{json}")?;
    }
    Ok(())
}

/// Write records in the specified format.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_events<W: Write>(
    writer: &mut W,
    quakes: &[&Earthquake],
    format: Format,
) -> io::Result<()> {
    match format {
        Format::Human => write_human(writer, quakes),
        Format::Json => write_json(writer, quakes),
        Format::Ndjson => write_ndjson(writer, quakes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::quake;

    #[test]
    fn test_format_parse() {
        assert_eq!("human".parse::<Format>().unwrap(), Format::Human);
        assert_eq!("json".parse::<Format>().unwrap(), Format::Json);
        assert_eq!("ndjson".parse::<Format>().unwrap(), Format::Ndjson);
        assert!("invalid".parse::<Format>().is_err());
    }

    #[test]
    fn test_ndjson_writes_nan_as_null() {
        let q = quake("us1", "2024-01-05T10:00:00Z", f64::NAN);
        let mut out = Vec::new();
        write_ndjson(&mut out, &[&q]).unwrap();

        let line = String::from_utf8(out).unwrap();
        let value: serde_json::Value = serde_json::from_str(line.trim()).unwrap();
        assert_eq!(value["id"], "us1-2024-01-05T10:00:00Z");
        assert!(value["mag"].is_null());
        assert_eq!(line.lines().count(), 1);
    }

    #[test]
    fn test_human_marks_missing_magnitude() {
        let q = quake("us1", "2024-01-05T10:00:00Z", f64::NAN);
        let mut out = Vec::new();
        write_human(&mut out, &[&q]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("M?"));
        assert!(text.contains("Unknown location"));
    }
}
