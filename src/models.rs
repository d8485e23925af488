//! Data models for decoded earthquake records.
//!
//! One [`Earthquake`] per data line of the USGS CSV feed. Numeric columns
//! that are empty or malformed hold `f64::NAN`; nothing is range-checked.

use std::fmt;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use serde::Serialize;

/// Identifier of one record, `<feed id>-<feed time>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Build the id from the feed's id and time columns.
    #[must_use]
    pub fn from_columns(id: &str, time: &str) -> Self {
        Self(format!("{id}-{time}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single earthquake event.
#[derive(Debug, Clone, Serialize)]
pub struct Earthquake {
    /// Unique within one fetched batch (not verified)
    pub id: RecordId,

    /// Event time as supplied by the feed
    pub time: String,

    /// Latitude (degrees)
    pub latitude: f64,

    /// Longitude (degrees)
    pub longitude: f64,

    /// Depth in kilometers (positive down)
    pub depth: f64,

    /// Magnitude value
    pub mag: f64,

    /// Human-readable place description
    pub place: Option<String>,
}

impl Earthquake {
    /// Event time converted to the local timezone.
    ///
    /// Times with an offset (the feed uses `Z`) are converted; times without
    /// one are taken as already local. Returns `None` when the value cannot be
    /// parsed.
    #[must_use]
    pub fn local_time(&self) -> Option<DateTime<Local>> {
        parse_local_time(&self.time)
    }
}

/// Parse a timestamp into local time.
#[must_use]
pub fn parse_local_time(raw: &str) -> Option<DateTime<Local>> {
    let raw = raw.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Some(t.with_timezone(&Local));
    }

    const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Local.from_local_datetime(&naive).earliest();
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .and_then(|naive| Local.from_local_datetime(&naive).earliest())
}

/// Numeric fields that can be bound to a chart axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericField {
    Longitude,
    Latitude,
    Depth,
    Mag,
}

impl NumericField {
    /// All fields in selector order.
    pub const ALL: [Self; 4] = [Self::Longitude, Self::Latitude, Self::Depth, Self::Mag];

    /// Read this field from a record.
    #[must_use]
    pub fn value(self, quake: &Earthquake) -> f64 {
        match self {
            Self::Longitude => quake.longitude,
            Self::Latitude => quake.latitude,
            Self::Depth => quake.depth,
            Self::Mag => quake.mag,
        }
    }

    /// Record field name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Longitude => "longitude",
            Self::Latitude => "latitude",
            Self::Depth => "depth",
            Self::Mag => "mag",
        }
    }

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Longitude => "Longitude",
            Self::Latitude => "Latitude",
            Self::Depth => "Depth",
            Self::Mag => "Magnitude",
        }
    }

    /// Next field in selector order, wrapping around.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Longitude => Self::Latitude,
            Self::Latitude => Self::Depth,
            Self::Depth => Self::Mag,
            Self::Mag => Self::Longitude,
        }
    }
}

impl std::str::FromStr for NumericField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "longitude" | "lon" => Ok(Self::Longitude),
            "latitude" | "lat" => Ok(Self::Latitude),
            "depth" => Ok(Self::Depth),
            "mag" | "magnitude" => Ok(Self::Mag),
            _ => Err(format!(
                "unknown field: {s} (expected: longitude, latitude, depth, mag)"
            )),
        }
    }
}

#[cfg(test)]
pub(crate) fn quake(id: &str, time: &str, mag: f64) -> Earthquake {
    Earthquake {
        id: RecordId::from_columns(id, time),
        time: time.to_string(),
        latitude: 0.0,
        longitude: 0.0,
        depth: 0.0,
        mag,
        place: None,
    }
}
