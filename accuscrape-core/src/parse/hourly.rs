//! Hourly-forecast page parser.

use std::collections::BTreeMap;

use scraper::Html;

use crate::extract::{extract_numeric, extract_temperature, extract_wind, map_condition};
use crate::model::{ForecastEntry, WeatherCondition};
use crate::parse::{first_own_text, sel, select_text};

/// Parse the hourly-forecast page into one entry per hour row, in page
/// order. The hour rows are the accordion items carrying the `hour` class;
/// a document without any yields an empty vec.
pub fn parse_hourly(html: &str) -> Vec<ForecastEntry> {
    let doc = Html::parse_document(html);
    let mut entries = Vec::new();

    for item in doc.select(&sel(".accordion-item.hour")) {
        let label = select_text(item, ".hourly-card-subcontaint .date div");
        let temperature = select_text(item, ".temp.metric").and_then(|t| extract_temperature(&t));
        let apparent_temperature =
            select_text(item, ".real-feel__text").and_then(|t| extract_temperature(&t));
        let phrase = select_text(item, ".phrase");
        let condition = phrase
            .as_deref()
            .map(map_condition)
            .unwrap_or(WeatherCondition::Unknown);
        let precipitation_probability =
            select_text(item, ".precip").and_then(|t| extract_numeric(&t));

        // Label/value pairs live in two nested panel locations; both are
        // scanned and written into the same map, so later panels override
        // earlier ones on a label collision.
        let mut details = BTreeMap::new();
        for panel_css in [".panel p", ".hourly-content-container .panel p"] {
            for p in item.select(&sel(panel_css)) {
                let label = first_own_text(p);
                let value = select_text(p, ".value");
                if let (Some(label), Some(value)) = (label, value) {
                    details.insert(label, value);
                }
            }
        }

        let (wind_speed, wind_bearing) = details
            .get("Gió")
            .map(|text| extract_wind(text))
            .unwrap_or((None, None));

        entries.push(ForecastEntry {
            label,
            condition,
            phrase,
            temperature,
            temperature_low: None,
            apparent_temperature,
            precipitation_probability,
            humidity: details.get("Độ ẩm").and_then(|v| extract_numeric(v)),
            wind_speed,
            wind_bearing,
            uv_index: details.get("Chỉ số UV tối đa").and_then(|v| extract_numeric(v)),
            cloud_coverage: details.get("Mật độ mây").and_then(|v| extract_numeric(v)),
            visibility: details.get("Tầm nhìn").and_then(|v| extract_numeric(v)),
            details,
        });
    }

    entries
}
