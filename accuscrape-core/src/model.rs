use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, TimeZone, Timelike};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Site-assigned location identifier plus its display name.
///
/// The key is opaque; it is obtained once via the autocomplete lookup and
/// never reinterpreted afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRef {
    pub key: String,
    pub name: String,
}

/// One row of the location autocomplete response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LocationMatch {
    pub key: String,
    pub localized_name: String,
    pub long_name: Option<String>,
}

/// Fixed condition vocabulary the scraped phrases are mapped onto.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeatherCondition {
    Sunny,
    ClearNight,
    #[serde(rename = "partlycloudy")]
    Partlycloudy,
    Cloudy,
    Fog,
    Rainy,
    Pouring,
    Lightning,
    LightningRainy,
    Snowy,
    SnowyRainy,
    Windy,
    #[default]
    Unknown,
}

impl WeatherCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherCondition::Sunny => "sunny",
            WeatherCondition::ClearNight => "clear-night",
            WeatherCondition::Partlycloudy => "partlycloudy",
            WeatherCondition::Cloudy => "cloudy",
            WeatherCondition::Fog => "fog",
            WeatherCondition::Rainy => "rainy",
            WeatherCondition::Pouring => "pouring",
            WeatherCondition::Lightning => "lightning",
            WeatherCondition::LightningRainy => "lightning-rainy",
            WeatherCondition::Snowy => "snowy",
            WeatherCondition::SnowyRainy => "snowy-rainy",
            WeatherCondition::Windy => "windy",
            WeatherCondition::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current conditions scraped from the current-weather page.
///
/// The typed convenience fields are derived opportunistically from `details`;
/// when the site renames a label the typed field goes `None` but the raw
/// label/value pair still lands in `details`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CurrentConditions {
    pub time: Option<String>,
    pub temperature: Option<f64>,
    pub temperature_unit: String,
    pub condition: WeatherCondition,
    pub phrase: Option<String>,
    pub realfeel: Option<String>,
    pub realfeel_shade: Option<String>,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
    pub wind_speed: Option<f64>,
    pub wind_bearing: Option<String>,
    pub visibility: Option<f64>,
    pub cloud_coverage: Option<f64>,
    pub uv_index: Option<f64>,
    pub details: BTreeMap<String, String>,
}

/// One daily or hourly forecast row, in page order.
///
/// `temperature_low` is populated by the daily parser only;
/// `apparent_temperature`, `cloud_coverage` and `visibility` by the hourly
/// parser only. Everything else is shared.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ForecastEntry {
    pub label: Option<String>,
    pub condition: WeatherCondition,
    pub phrase: Option<String>,
    pub temperature: Option<f64>,
    pub temperature_low: Option<f64>,
    pub apparent_temperature: Option<f64>,
    pub precipitation_probability: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
    pub wind_bearing: Option<String>,
    pub uv_index: Option<f64>,
    pub cloud_coverage: Option<f64>,
    pub visibility: Option<f64>,
    pub details: BTreeMap<String, String>,
}

/// One pollutant reading from the air-quality page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Pollutant {
    pub aqi: Option<f64>,
    pub value: Option<f64>,
    pub unit: Option<String>,
}

/// Air-quality summary plus per-pollutant readings.
///
/// `Default` doubles as the neutral value substituted when the air-quality
/// pipeline fails.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AirQuality {
    pub category: Option<String>,
    pub description: Option<String>,
    pub pollutants: BTreeMap<String, Pollutant>,
}

/// One health/activity index item deserialized from the embedded
/// `indexListData` script array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HealthActivityItem {
    pub name: Option<String>,
    pub localized_name: Option<String>,
    pub value: Option<f64>,
    pub category: Option<String>,
    pub localized_category: Option<String>,
    pub category_phrase: Option<String>,
    pub category_value: Option<f64>,
    pub status_color: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<i64>,
    pub slug: Option<String>,
    pub index_date: Option<String>,
    pub lifestyle_category: Option<i64>,
}

/// Fixed buckets the health/activity items are classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityGroup {
    AllergyHealth,
    Outdoor,
    Travel,
    HomeGarden,
    Pests,
    AllergyOther,
    Entertainment,
    Other,
}

impl ActivityGroup {
    pub const fn all() -> &'static [ActivityGroup] {
        &[
            ActivityGroup::AllergyHealth,
            ActivityGroup::Outdoor,
            ActivityGroup::Travel,
            ActivityGroup::HomeGarden,
            ActivityGroup::Pests,
            ActivityGroup::AllergyOther,
            ActivityGroup::Entertainment,
            ActivityGroup::Other,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityGroup::AllergyHealth => "allergy_health",
            ActivityGroup::Outdoor => "outdoor",
            ActivityGroup::Travel => "travel",
            ActivityGroup::HomeGarden => "home_garden",
            ActivityGroup::Pests => "pests",
            ActivityGroup::AllergyOther => "allergy_other",
            ActivityGroup::Entertainment => "entertainment",
            ActivityGroup::Other => "other",
        }
    }

    /// Human-readable section heading used by consumers.
    pub fn label(&self) -> &'static str {
        match self {
            ActivityGroup::AllergyHealth => "Allergies & health",
            ActivityGroup::Outdoor => "Outdoor activities",
            ActivityGroup::Travel => "Travel & commute",
            ActivityGroup::HomeGarden => "Home & garden",
            ActivityGroup::Pests => "Pests & insects",
            ActivityGroup::AllergyOther => "Other allergens",
            ActivityGroup::Entertainment => "Entertainment",
            ActivityGroup::Other => "Other",
        }
    }
}

impl std::fmt::Display for ActivityGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minute-by-minute precipitation outlook plus whatever current readings the
/// minute-cast page exposes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MinuteCast {
    pub summary: String,
    pub temperature: Option<i64>,
    pub condition: Option<String>,
    pub realfeel: Option<i64>,
    pub time: Option<String>,
    pub forecast_type: &'static str,
}

impl MinuteCast {
    pub const FORECAST_TYPE: &'static str = "minutecast";
}

/// Complete per-cycle aggregate for one location.
///
/// Built fresh on every refresh; the previous snapshot is replaced wholesale,
/// never merged into. `current` is mandatory: a cycle that cannot obtain it
/// fails outright instead of producing a snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub current: CurrentConditions,
    pub daily_forecast: Vec<ForecastEntry>,
    pub hourly_forecast: Vec<ForecastEntry>,
    pub air_quality: AirQuality,
    pub health_activities: BTreeMap<ActivityGroup, Vec<HealthActivityItem>>,
    pub minutecast: Option<MinuteCast>,
    pub location: LocationRef,
}

/// Best-effort reconstruction of a daily forecast date from its localized
/// label (e.g. "Th 5 18/9" or "CN 21/9").
///
/// The label carries only day/month; the year is inferred with a rollover
/// heuristic (month before the current one means next year). Labels that
/// yield no valid date fall back to `base` plus the row index. This is a
/// heuristic mapping, not a guaranteed-correct calendar date.
pub fn daily_entry_datetime<Tz: TimeZone>(
    label: Option<&str>,
    base: &DateTime<Tz>,
    index: usize,
) -> DateTime<Tz> {
    let at_noon = |date: NaiveDate| {
        date.and_hms_opt(12, 0, 0)
            .and_then(|naive| base.timezone().from_local_datetime(&naive).single())
            .unwrap_or_else(|| base.clone())
    };
    let fallback_date = base
        .date_naive()
        .checked_add_days(Days::new(index as u64))
        .unwrap_or_else(|| base.date_naive());

    let Some(label) = label else {
        return at_noon(fallback_date);
    };

    let re = Regex::new(r"(\d{1,2})/(\d{1,2})").unwrap();
    if let Some(caps) = re.captures(label) {
        let day: u32 = caps[1].parse().unwrap_or(0);
        let month: u32 = caps[2].parse().unwrap_or(0);
        let year = if month != 0 && month < base.month() {
            base.year() + 1
        } else {
            base.year()
        };
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return at_noon(date);
        }
    }

    at_noon(fallback_date)
}

/// Timestamp for the hourly forecast row at `index`: the current hour,
/// truncated, plus `index` hours. Best-effort, same caveats as the daily
/// reconstruction.
pub fn hourly_entry_datetime<Tz: TimeZone>(base: &DateTime<Tz>, index: usize) -> DateTime<Tz> {
    let truncated = base
        .with_minute(0)
        .and_then(|d| d.with_second(0))
        .and_then(|d| d.with_nanosecond(0))
        .unwrap_or_else(|| base.clone());
    truncated + Duration::hours(index as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn condition_serializes_to_fixed_vocabulary() {
        let json = serde_json::to_string(&WeatherCondition::LightningRainy).unwrap();
        assert_eq!(json, "\"lightning-rainy\"");
        let json = serde_json::to_string(&WeatherCondition::Partlycloudy).unwrap();
        assert_eq!(json, "\"partlycloudy\"");
    }

    #[test]
    fn daily_datetime_uses_label_day_and_month() {
        let base = Utc.with_ymd_and_hms(2025, 9, 17, 8, 30, 0).unwrap();
        let dt = daily_entry_datetime(Some("Th 5 18/9"), &base, 0);
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 9, 18, 12, 0, 0).unwrap());
    }

    #[test]
    fn daily_datetime_rolls_year_over_when_month_is_behind() {
        let base = Utc.with_ymd_and_hms(2025, 12, 30, 8, 0, 0).unwrap();
        let dt = daily_entry_datetime(Some("Th 6 2/1"), &base, 3);
        assert_eq!(dt, Utc.with_ymd_and_hms(2026, 1, 2, 12, 0, 0).unwrap());
    }

    #[test]
    fn daily_datetime_falls_back_to_base_plus_index() {
        let base = Utc.with_ymd_and_hms(2025, 9, 17, 8, 0, 0).unwrap();
        // No day/month pattern in the label.
        let dt = daily_entry_datetime(Some("CN"), &base, 2);
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 9, 19, 12, 0, 0).unwrap());
        // Day/month pattern that is not a real date.
        let dt = daily_entry_datetime(Some("Th 2 31/2"), &base, 1);
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 9, 18, 12, 0, 0).unwrap());
    }

    #[test]
    fn hourly_datetime_truncates_and_crosses_midnight() {
        let base = Utc.with_ymd_and_hms(2025, 3, 1, 23, 45, 12).unwrap();
        let dt = hourly_entry_datetime(&base, 2);
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 3, 2, 1, 0, 0).unwrap());
    }
}
