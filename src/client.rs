//! USGS earthquake feed client.
//!
//! Provides blocking HTTP access to the USGS summary CSV feeds.
//! Uses reqwest with rustls for TLS.

use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{debug, instrument};

use crate::errors::SeismoviewError;
use crate::feed;
use crate::models::Earthquake;

/// Default request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// User agent string for API requests.
const USER_AGENT: &str = concat!("seismoview/", env!("CARGO_PKG_VERSION"));

/// USGS base URL for earthquake feeds.
const USGS_BASE_URL: &str = "https://earthquake.usgs.gov";

/// Summary feed fetched when none is given.
pub const DEFAULT_FEED: FeedType = FeedType::AllMonth;

/// Available feed types for summary feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedType {
    AllHour,
    AllDay,
    AllWeek,
    AllMonth,
    Mag1Hour,
    Mag1Day,
    Mag1Week,
    Mag1Month,
    Mag25Hour,
    Mag25Day,
    Mag25Week,
    Mag25Month,
    Mag45Hour,
    Mag45Day,
    Mag45Week,
    Mag45Month,
    SignificantHour,
    SignificantDay,
    SignificantWeek,
    SignificantMonth,
}

impl FeedType {
    /// Get the URL path segment for this feed type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AllHour => "all_hour",
            Self::AllDay => "all_day",
            Self::AllWeek => "all_week",
            Self::AllMonth => "all_month",
            Self::Mag1Hour => "1.0_hour",
            Self::Mag1Day => "1.0_day",
            Self::Mag1Week => "1.0_week",
            Self::Mag1Month => "1.0_month",
            Self::Mag25Hour => "2.5_hour",
            Self::Mag25Day => "2.5_day",
            Self::Mag25Week => "2.5_week",
            Self::Mag25Month => "2.5_month",
            Self::Mag45Hour => "4.5_hour",
            Self::Mag45Day => "4.5_day",
            Self::Mag45Week => "4.5_week",
            Self::Mag45Month => "4.5_month",
            Self::SignificantHour => "significant_hour",
            Self::SignificantDay => "significant_day",
            Self::SignificantWeek => "significant_week",
            Self::SignificantMonth => "significant_month",
        }
    }
}

impl std::str::FromStr for FeedType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all_hour" => Ok(Self::AllHour),
            "all_day" => Ok(Self::AllDay),
            "all_week" => Ok(Self::AllWeek),
            "all_month" => Ok(Self::AllMonth),
            "1.0_hour" => Ok(Self::Mag1Hour),
            "1.0_day" => Ok(Self::Mag1Day),
            "1.0_week" => Ok(Self::Mag1Week),
            "1.0_month" => Ok(Self::Mag1Month),
            "2.5_hour" => Ok(Self::Mag25Hour),
            "2.5_day" => Ok(Self::Mag25Day),
            "2.5_week" => Ok(Self::Mag25Week),
            "2.5_month" => Ok(Self::Mag25Month),
            "4.5_hour" => Ok(Self::Mag45Hour),
            "4.5_day" => Ok(Self::Mag45Day),
            "4.5_week" => Ok(Self::Mag45Week),
            "4.5_month" => Ok(Self::Mag45Month),
            "significant_hour" => Ok(Self::SignificantHour),
            "significant_day" => Ok(Self::SignificantDay),
            "significant_week" => Ok(Self::SignificantWeek),
            "significant_month" => Ok(Self::SignificantMonth),
            _ => Err(format!("unknown feed type: {s}")),
        }
    }
}

/// Where the feed body comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    /// One of the USGS summary feeds
    Summary(FeedType),
    /// An explicit URL serving the same CSV layout
    Url(String),
}

impl Default for FeedSource {
    fn default() -> Self {
        Self::Summary(DEFAULT_FEED)
    }
}

impl FeedSource {
    /// Resolve the request URL against a base.
    #[must_use]
    pub fn url(&self, base_url: &str) -> String {
        match self {
            Self::Summary(feed_type) => format!(
                "{base_url}/earthquakes/feed/v1.0/summary/{}.csv",
                feed_type.as_str()
            ),
            Self::Url(url) => url.clone(),
        }
    }
}

/// Client for the USGS earthquake feeds.
pub struct UsgsClient {
    client: Client,
    base_url: String,
}

impl UsgsClient {
    /// Create a new USGS client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new() -> Result<Self, SeismoviewError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: USGS_BASE_URL.to_string(),
        })
    }

    /// Fetch the raw CSV body of a feed.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server answers with a
    /// non-success status.
    #[instrument(skip(self))]
    pub fn fetch_csv(&self, source: &FeedSource) -> Result<String, SeismoviewError> {
        let url = source.url(&self.base_url);

        debug!("fetching feed from {}", url);

        let response = self.client.get(&url).send()?;

        // Check status before reading the body
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(SeismoviewError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text()?;
        debug!("fetched {} bytes", body.len());
        Ok(body)
    }

    /// Fetch and decode a feed.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body does not match the
    /// known CSV layout.
    pub fn fetch_quakes(&self, source: &FeedSource) -> Result<Vec<Earthquake>, SeismoviewError> {
        let body = self.fetch_csv(source)?;
        feed::decode_feed(&body)
    }
}
