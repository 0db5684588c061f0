//! Refresh coordinator: runs the six fetch+parse pipelines concurrently and
//! merges their results into one snapshot.

use std::collections::BTreeMap;

use tracing::warn;

use crate::fetch::{FetchError, HEALTH_PAGES, Page, PageSource};
use crate::groups;
use crate::model::{
    ActivityGroup, AirQuality, CurrentConditions, ForecastEntry, HealthActivityItem, LocationRef,
    MinuteCast, Snapshot,
};
use crate::parse;

/// A refresh cycle could not produce a usable snapshot.
///
/// Current conditions is the only load-bearing pipeline; the other five are
/// best-effort enrichments that degrade to their neutral values.
#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    #[error("current conditions unavailable for location {0}")]
    CurrentUnavailable(String),
}

/// Per-cycle snapshot builder for one configured location.
///
/// Stateless across cycles: every [`refresh`](Coordinator::refresh) builds a
/// fresh snapshot and nothing is carried over or merged.
pub struct Coordinator<S> {
    source: S,
    location: LocationRef,
}

impl<S: PageSource> Coordinator<S> {
    pub fn new(source: S, location: LocationRef) -> Self {
        Self { source, location }
    }

    pub fn location(&self) -> &LocationRef {
        &self.location
    }

    /// Run one refresh cycle.
    ///
    /// The six pipelines run concurrently; each failure is isolated, logged
    /// and neutralized so it cannot take a sibling down. Only a missing
    /// current-conditions result fails the cycle.
    pub async fn refresh(&self) -> Result<Snapshot, RefreshError> {
        let (current, daily, hourly, air_quality, health_activities, minutecast) = tokio::join!(
            self.current(),
            self.daily(),
            self.hourly(),
            self.air_quality(),
            self.health_activities(),
            self.minutecast(),
        );

        let current = or_neutral(Page::CurrentWeather, current, None);
        let daily_forecast = or_neutral(Page::DailyForecast, daily, Vec::new());
        let hourly_forecast = or_neutral(Page::HourlyForecast, hourly, Vec::new());
        let air_quality = or_neutral(Page::AirQuality, air_quality, AirQuality::default());
        let minutecast = or_neutral(Page::MinuteCast, minutecast, None);

        let Some(current) = current else {
            return Err(RefreshError::CurrentUnavailable(self.location.key.clone()));
        };

        Ok(Snapshot {
            current,
            daily_forecast,
            hourly_forecast,
            air_quality,
            health_activities,
            minutecast,
            location: self.location.clone(),
        })
    }

    async fn current(&self) -> Result<Option<CurrentConditions>, FetchError> {
        let html = self.page(Page::CurrentWeather).await?;
        Ok(parse::parse_current(&html))
    }

    async fn daily(&self) -> Result<Vec<ForecastEntry>, FetchError> {
        let html = self.page(Page::DailyForecast).await?;
        Ok(parse::parse_daily(&html))
    }

    async fn hourly(&self) -> Result<Vec<ForecastEntry>, FetchError> {
        let html = self.page(Page::HourlyForecast).await?;
        Ok(parse::parse_hourly(&html))
    }

    async fn air_quality(&self) -> Result<AirQuality, FetchError> {
        let html = self.page(Page::AirQuality).await?;
        Ok(parse::parse_air_quality(&html))
    }

    async fn minutecast(&self) -> Result<Option<MinuteCast>, FetchError> {
        let html = self.page(Page::MinuteCast).await?;
        Ok(parse::parse_minutecast(&html))
    }

    /// Crawl the six health/activity group pages, best-effort per page, and
    /// classify the union of their items. A page that fails contributes
    /// nothing; the bucket map itself is always well-formed.
    async fn health_activities(&self) -> BTreeMap<ActivityGroup, Vec<HealthActivityItem>> {
        let mut items = Vec::new();
        for group in HEALTH_PAGES {
            match self.page(Page::Health(group)).await {
                Ok(html) => items.extend(parse::parse_health_activities(&html)),
                Err(err) => {
                    warn!(page = %Page::Health(group), error = %err, "health page fetch failed");
                }
            }
        }
        groups::group_activities(items)
    }

    async fn page(&self, page: Page) -> Result<String, FetchError> {
        self.source.fetch(page, &self.location.key).await
    }
}

/// Substitute a failed pipeline's documented neutral value, keeping the
/// aggregate well-formed.
fn or_neutral<T>(page: Page, result: Result<T, FetchError>, neutral: T) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            warn!(page = %page, error = %err, "pipeline failed; substituting neutral value");
            neutral
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use std::collections::HashMap;

    const CURRENT_HTML: &str = r#"
    <div class="current-weather-card">
      <div class="display-temp">30°</div>
      <div class="phrase">Nắng</div>
    </div>
    "#;
    const DAILY_HTML: &str = r#"
    <div class="daily-wrapper">
      <a class="daily-forecast-card">
        <div class="temp"><span class="high">32°</span><span class="low">/24°</span></div>
      </a>
      <div class="half-day-card-content"><div class="phrase">Mưa rào</div></div>
    </div>
    "#;
    const HOURLY_HTML: &str = r#"
    <div class="accordion-item hour">
      <div class="hourly-card-subcontaint"><div class="date"><div>10:00</div></div></div>
      <div class="temp metric">29°</div>
    </div>
    "#;
    const HEALTH_HTML: &str =
        r#"<script>var indexListData = [{"slug":"mosquito-activity","value":8.0}];</script>"#;

    /// Canned page source; pages not present in the map fail with a 503.
    struct StubSource {
        pages: HashMap<Page, String>,
    }

    impl StubSource {
        fn new(pages: &[(Page, &str)]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(page, html)| (*page, html.to_string()))
                    .collect(),
            }
        }
    }

    #[async_trait]
    impl PageSource for StubSource {
        async fn fetch(&self, page: Page, _location_key: &str) -> Result<String, FetchError> {
            self.pages
                .get(&page)
                .cloned()
                .ok_or(FetchError::Status(StatusCode::SERVICE_UNAVAILABLE))
        }
    }

    fn location() -> LocationRef {
        LocationRef {
            key: "353412".to_string(),
            name: "Hanoi".to_string(),
        }
    }

    #[tokio::test]
    async fn failed_enrichment_pipelines_are_neutralized() {
        // Air quality, minute-cast and all health pages fail; the snapshot
        // still carries everything else plus the neutral substitutes.
        let source = StubSource::new(&[
            (Page::CurrentWeather, CURRENT_HTML),
            (Page::DailyForecast, DAILY_HTML),
            (Page::HourlyForecast, HOURLY_HTML),
        ]);
        let snapshot = Coordinator::new(source, location()).refresh().await.unwrap();

        assert_eq!(snapshot.current.temperature, Some(30.0));
        assert_eq!(snapshot.daily_forecast.len(), 1);
        assert_eq!(snapshot.hourly_forecast.len(), 1);
        assert_eq!(snapshot.air_quality, AirQuality::default());
        assert!(snapshot.minutecast.is_none());
        assert!(snapshot.health_activities.values().all(Vec::is_empty));
        assert_eq!(snapshot.location.key, "353412");
    }

    #[tokio::test]
    async fn missing_current_conditions_fails_the_cycle() {
        let source = StubSource::new(&[
            (Page::DailyForecast, DAILY_HTML),
            (Page::HourlyForecast, HOURLY_HTML),
        ]);
        let err = Coordinator::new(source, location()).refresh().await.unwrap_err();
        assert!(matches!(err, RefreshError::CurrentUnavailable(key) if key == "353412"));
    }

    #[tokio::test]
    async fn current_page_without_anchor_also_fails_the_cycle() {
        // The fetch succeeds but the page carries no current-weather card.
        let source = StubSource::new(&[(Page::CurrentWeather, "<html><body></body></html>")]);
        let err = Coordinator::new(source, location()).refresh().await.unwrap_err();
        assert!(matches!(err, RefreshError::CurrentUnavailable(_)));
    }

    #[tokio::test]
    async fn health_items_are_classified_into_buckets() {
        let mut pages = vec![(Page::CurrentWeather, CURRENT_HTML)];
        for group in HEALTH_PAGES {
            pages.push((Page::Health(group), HEALTH_HTML));
        }
        let snapshot = Coordinator::new(StubSource::new(&pages), location())
            .refresh()
            .await
            .unwrap();

        // The same item arrives from each of the six group pages.
        assert_eq!(snapshot.health_activities[&ActivityGroup::Pests].len(), 6);
        assert!(snapshot.health_activities[&ActivityGroup::Outdoor].is_empty());
    }
}
