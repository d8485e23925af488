//! Decoding of the USGS summary CSV feed.
//!
//! The feed's column layout is fixed:
//!
//! ```text
//! time,latitude,longitude,depth,mag,magType,nst,gap,dmin,rms,net,id,updated,place,type,...
//! ```
//!
//! Only the columns named below are read. The header line is checked against
//! these names so a layout change is reported instead of shifting fields.

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, warn};

use crate::errors::SeismoviewError;
use crate::models::{Earthquake, RecordId};

pub const TIME: usize = 0;
pub const LATITUDE: usize = 1;
pub const LONGITUDE: usize = 2;
pub const DEPTH: usize = 3;
pub const MAG: usize = 4;
// 5..=10: magType, nst, gap, dmin, rms, net
pub const ID: usize = 11;
// 12: updated
pub const PLACE: usize = 13;

/// Columns a complete data line has (up to and including place).
const MIN_COLUMNS: usize = PLACE + 1;

/// Expected header names for the columns we read.
const EXPECTED_HEADER: [(usize, &str); 7] = [
    (TIME, "time"),
    (LATITUDE, "latitude"),
    (LONGITUDE, "longitude"),
    (DEPTH, "depth"),
    (MAG, "mag"),
    (ID, "id"),
    (PLACE, "place"),
];

/// Tokenize one line, honoring quoted fields.
fn read_record(line: &str) -> Result<StringRecord, SeismoviewError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());

    let mut record = StringRecord::new();
    reader.read_record(&mut record)?;
    Ok(record)
}

/// Parse a numeric column; empty or malformed values become NaN.
fn parse_number(raw: &str) -> f64 {
    raw.trim().parse().unwrap_or(f64::NAN)
}

/// Check the header line against the known layout.
///
/// # Errors
///
/// Returns [`SeismoviewError::Schema`] naming the first column whose header
/// differs from the expected name.
pub fn validate_header(line: &str) -> Result<(), SeismoviewError> {
    let header = read_record(line)?;

    for (column, expected) in EXPECTED_HEADER {
        let found = header.get(column).map(str::trim).unwrap_or_default();
        if !found.eq_ignore_ascii_case(expected) {
            return Err(SeismoviewError::Schema {
                column,
                expected,
                found: found.to_string(),
            });
        }
    }
    Ok(())
}

/// Build a record from tokenized columns. Missing columns read as empty.
fn decode_record(record: &StringRecord) -> Earthquake {
    let column = |index: usize| record.get(index).unwrap_or_default();
    let time = column(TIME);
    let place = column(PLACE).trim();

    Earthquake {
        id: RecordId::from_columns(column(ID), time),
        time: time.to_string(),
        latitude: parse_number(column(LATITUDE)),
        longitude: parse_number(column(LONGITUDE)),
        depth: parse_number(column(DEPTH)),
        mag: parse_number(column(MAG)),
        place: (!place.is_empty()).then(|| place.to_string()),
    }
}

/// Decode one data line (the header must already be skipped).
///
/// A line cut short keeps what it has: missing numbers are NaN, a missing
/// place is `None` and a missing id leaves only the time in the record id.
///
/// # Errors
///
/// Returns an error if the line cannot be tokenized.
pub fn decode_line(line: &str) -> Result<Earthquake, SeismoviewError> {
    Ok(decode_record(&read_record(line)?))
}

/// Decode a whole feed body into records, in feed order.
///
/// The first line must be the header. Blank lines are skipped.
///
/// # Errors
///
/// Returns an error if the body is empty or the header does not match the
/// known layout. Short data lines are kept and logged.
pub fn decode_feed(body: &str) -> Result<Vec<Earthquake>, SeismoviewError> {
    let mut lines = body.lines().enumerate();

    let (_, header) = lines.next().ok_or(SeismoviewError::MissingHeader)?;
    if header.trim().is_empty() {
        return Err(SeismoviewError::MissingHeader);
    }
    validate_header(header)?;

    let mut quakes = Vec::new();
    for (index, line) in lines.filter(|(_, line)| !line.trim().is_empty()) {
        let record = read_record(line)?;
        if record.len() < MIN_COLUMNS {
            warn!(
                line = index + 1,
                found = record.len(),
                needed = MIN_COLUMNS,
                "short feed line, missing columns left empty"
            );
        }
        quakes.push(decode_record(&record));
    }

    debug!("decoded {} records", quakes.len());
    Ok(quakes)
}

#[cfg(test)]
pub(crate) const SAMPLE_HEADER: &str = "time,latitude,longitude,depth,mag,magType,nst,gap,dmin,rms,net,id,updated,place,type,horizontalError,depthError,magError,magNst,status,locationSource,magSource";

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_ROW: &str = "2024-01-05T10:00:00.000Z,38.8,-122.8,2.1,1.4,md,20,50,0.01,0.02,nc,nc73900000,2024-01-05T10:10:00.000Z,\"5 km NW of The Geysers, CA\",earthquake,0.2,0.5,0.1,10,automatic,nc,nc";

    #[test]
    fn test_id_joins_id_and_time_columns() {
        let quake = decode_line(FULL_ROW).unwrap();
        assert_eq!(quake.id.as_str(), "nc73900000-2024-01-05T10:00:00.000Z");
    }

    #[test]
    fn test_quoted_place_keeps_comma() {
        let quake = decode_line(FULL_ROW).unwrap();
        assert_eq!(quake.place.as_deref(), Some("5 km NW of The Geysers, CA"));
    }

    #[test]
    fn test_empty_numeric_columns_become_nan() {
        let line = "2024-01-05T10:00:00.000Z,,-122.8,abc,,md,,,,,nc,nc1,2024-01-05T10:10:00.000Z,,earthquake";
        let quake = decode_line(line).unwrap();
        assert!(quake.latitude.is_nan());
        assert!(quake.depth.is_nan());
        assert!(quake.mag.is_nan());
        assert!((quake.longitude - (-122.8)).abs() < f64::EPSILON);
        assert!(quake.place.is_none());
    }

    #[test]
    fn test_values_are_not_range_checked() {
        let line = "2024-01-05T10:00:00.000Z,95,-200,-3.5,-1.2,ml,,,,,ak,ak1,x,Somewhere";
        let quake = decode_line(line).unwrap();
        assert!((quake.latitude - 95.0).abs() < f64::EPSILON);
        assert!((quake.depth - (-3.5)).abs() < f64::EPSILON);
        assert!((quake.mag - (-1.2)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_short_row_keeps_leading_columns() {
        let quake = decode_line("2024-01-05T10:00:00.000Z,1,2,3,4").unwrap();
        assert!((quake.latitude - 1.0).abs() < f64::EPSILON);
        assert!((quake.mag - 4.0).abs() < f64::EPSILON);
        assert!(quake.place.is_none());
        assert_eq!(quake.id.as_str(), "-2024-01-05T10:00:00.000Z");
    }

    #[test]
    fn test_two_line_body_decodes_one_full_record() {
        let body = format!("{SAMPLE_HEADER}\n{FULL_ROW}\n");
        let quakes = decode_feed(&body).unwrap();

        assert_eq!(quakes.len(), 1);
        let quake = &quakes[0];
        assert_eq!(quake.time, "2024-01-05T10:00:00.000Z");
        assert!((quake.latitude - 38.8).abs() < f64::EPSILON);
        assert!((quake.longitude - (-122.8)).abs() < f64::EPSILON);
        assert!((quake.depth - 2.1).abs() < f64::EPSILON);
        assert!((quake.mag - 1.4).abs() < f64::EPSILON);
        assert_eq!(quake.place.as_deref(), Some("5 km NW of The Geysers, CA"));
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let body = format!("{SAMPLE_HEADER}\n\n{FULL_ROW}\n   \n{FULL_ROW}\n");
        assert_eq!(decode_feed(&body).unwrap().len(), 2);
    }

    #[test]
    fn test_layout_change_fails_loudly() {
        let header = SAMPLE_HEADER.replace("place", "region");
        let body = format!("{header}\n{FULL_ROW}\n");
        let err = decode_feed(&body).unwrap_err();
        assert!(matches!(
            err,
            SeismoviewError::Schema { column: PLACE, expected: "place", .. }
        ));
    }

    #[test]
    fn test_empty_body() {
        assert!(matches!(
            decode_feed(""),
            Err(SeismoviewError::MissingHeader)
        ));
    }

    #[test]
    fn test_truncated_line_does_not_drop_the_batch() {
        let mut body = format!("{SAMPLE_HEADER}\n");
        for _ in 0..500 {
            body.push_str(FULL_ROW);
            body.push('\n');
        }
        body.push_str("2024-01-05T11:00:00.000Z,1,2,3\n");

        let quakes = decode_feed(&body).unwrap();
        assert_eq!(quakes.len(), 501);
        assert!(quakes[..500].iter().all(|q| (q.mag - 1.4).abs() < f64::EPSILON));

        let last = &quakes[500];
        assert!((last.depth - 3.0).abs() < f64::EPSILON);
        assert!(last.mag.is_nan());
        assert!(last.place.is_none());
    }
}
