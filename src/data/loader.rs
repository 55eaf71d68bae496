//! Feed Loader Module
//! Fetches the USGS GeoJSON earthquake feed and parses it into typed records.

use log::debug;
use reqwest::blocking::Client;
use serde::Deserialize;
use thiserror::Error;

/// USGS summary feed: every earthquake recorded over the past week.
pub const FEED_URL: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_week.geojson";

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to fetch feed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Failed to parse feed body: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Raw GeoJSON feed document.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedDocument {
    pub features: Vec<Feature>,
}

/// One earthquake event as reported by the feed.
#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    pub geometry: Geometry,
    pub properties: Properties,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    /// Longitude, latitude, depth in km.
    pub coordinates: Vec<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Properties {
    /// Null for some unreviewed events.
    pub mag: Option<f64>,
    /// Event time, epoch milliseconds.
    pub time: i64,
}

/// Fetches the earthquake feed with a blocking HTTP client.
pub struct FeedLoader {
    client: Client,
    url: String,
}

impl Default for FeedLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedLoader {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            url: FEED_URL.to_owned(),
        }
    }

    /// Perform one GET against the feed URL and parse the body.
    ///
    /// A failed request or a non-success status surfaces as
    /// [`LoaderError::Network`], a malformed body as [`LoaderError::Parse`].
    /// Nothing is retried.
    pub fn fetch(&self) -> Result<FeedDocument, LoaderError> {
        debug!("GET {}", self.url);
        let body = self
            .client
            .get(&self.url)
            .send()?
            .error_for_status()?
            .text()?;
        let doc = serde_json::from_str(&body)?;
        Ok(doc)
    }
}
