//! Core library for the `accuscrape` weather scraper.
//!
//! This crate defines:
//! - Locale-aware value extractors and the condition vocabulary
//! - Per-page HTML parsers for the six AccuWeather page types
//! - The fetch adapter and location autocomplete lookup
//! - The refresh coordinator that merges the pipelines into a snapshot
//! - Health/activity bucket classification
//! - On-disk configuration (location + poll interval)
//!
//! It is used by `accuscrape-cli`, but can also be reused by other binaries
//! or services that want the snapshot without the CLI surface.

pub mod config;
pub mod coordinator;
pub mod extract;
pub mod fetch;
pub mod groups;
pub mod model;
pub mod parse;

pub use config::Config;
pub use coordinator::{Coordinator, RefreshError};
pub use fetch::{FetchError, HttpPageSource, Page, PageSource, default_client, search_locations};
pub use model::{
    ActivityGroup, AirQuality, CurrentConditions, ForecastEntry, HealthActivityItem, LocationMatch,
    LocationRef, MinuteCast, Pollutant, Snapshot, WeatherCondition,
};
