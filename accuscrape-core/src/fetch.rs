//! Fetch adapter: one GET per page type, browser-like headers, no retries.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER, USER_AGENT};
use reqwest::{Client, StatusCode};
use tracing::warn;

use crate::model::LocationMatch;

pub const BASE_URL: &str = "https://www.accuweather.com";
pub const AUTOCOMPLETE_URL: &str = "https://www.accuweather.com/web-api/autocomplete";

const LOCALE: &str = "vi";
const COUNTRY: &str = "vn";

const USER_AGENT_VALUE: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:141.0) Gecko/20100101 Firefox/141.0";

/// Per-request timeout. The source design left fetches unbounded, which let
/// one slow page stall a whole refresh cycle; 30 s keeps a cycle bounded.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Health/activity page groups crawled by the health pipeline.
pub const HEALTH_PAGES: [&str; 6] = [
    "allergies",
    "outdoor",
    "travel",
    "home-garden",
    "pests",
    "entertainment",
];

/// The page types the scraper knows how to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    CurrentWeather,
    DailyForecast,
    HourlyForecast,
    AirQuality,
    MinuteCast,
    /// One of the [`HEALTH_PAGES`] groups.
    Health(&'static str),
}

impl Page {
    pub fn slug(&self) -> String {
        match self {
            Page::CurrentWeather => "current-weather".to_string(),
            Page::DailyForecast => "daily-weather-forecast".to_string(),
            Page::HourlyForecast => "hourly-weather-forecast".to_string(),
            Page::AirQuality => "air-quality-index".to_string(),
            Page::MinuteCast => "minute-weather-forecast".to_string(),
            Page::Health(group) => format!("{group}-weather"),
        }
    }

    pub fn url(&self, location_key: &str) -> String {
        format!(
            "{BASE_URL}/{LOCALE}/{COUNTRY}/any/{location_key}/{}/{location_key}",
            self.slug()
        )
    }
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.slug())
    }
}

/// Transport-level failure for one page fetch. Reported upward immediately;
/// there is no retry or backoff.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("unexpected status {0}")]
    Status(StatusCode),
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Source of raw page markup, keyed by page type and location.
///
/// The HTTP implementation lives in [`HttpPageSource`]; tests substitute
/// canned fixtures.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch(&self, page: Page, location_key: &str) -> Result<String, FetchError>;
}

/// Real page source issuing one GET per call over a shared client.
#[derive(Debug, Clone)]
pub struct HttpPageSource {
    http: Client,
}

impl HttpPageSource {
    pub fn new(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch(&self, page: Page, location_key: &str) -> Result<String, FetchError> {
        let res = self
            .http
            .get(page.url(location_key))
            .headers(default_headers())
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        Ok(res.text().await?)
    }
}

/// Shared HTTP client with the bounded per-request timeout. The same client
/// is reused for every fetch in every cycle.
pub fn default_client() -> reqwest::Result<Client> {
    Client::builder().timeout(FETCH_TIMEOUT).build()
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(REFERER, HeaderValue::from_static("https://www.accuweather.com/"));
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("vi,en-US;q=0.9,en;q=0.8"),
    );
    headers
}

/// Location autocomplete lookup, used during initial configuration only.
///
/// An empty or malformed response yields an empty list, never an error:
/// the caller treats "no matches" and "lookup failed" the same way.
pub async fn search_locations(http: &Client, query: &str) -> Vec<LocationMatch> {
    let mut headers = default_headers();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/json, text/javascript, */*; q=0.01"),
    );

    let res = match http
        .get(AUTOCOMPLETE_URL)
        .query(&[("query", query), ("language", LOCALE)])
        .headers(headers)
        .send()
        .await
    {
        Ok(res) => res,
        Err(err) => {
            warn!(error = %err, "location autocomplete request failed");
            return Vec::new();
        }
    };

    if !res.status().is_success() {
        warn!(status = %res.status(), "location autocomplete returned an error status");
        return Vec::new();
    }

    match res.json::<Vec<LocationMatch>>().await {
        Ok(matches) => matches
            .into_iter()
            .filter(|m| !m.key.is_empty() && !m.localized_name.is_empty())
            .collect(),
        Err(err) => {
            warn!(error = %err, "location autocomplete returned malformed JSON");
            Vec::new()
        }
    }
}
