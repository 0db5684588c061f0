//! Daily-forecast page parser.

use std::collections::BTreeMap;

use scraper::Html;

use crate::extract::{extract_numeric, extract_temperature, extract_wind, map_condition};
use crate::model::{ForecastEntry, WeatherCondition};
use crate::parse::{first_own_text, sel, select_text, text_of};

/// Parse the daily-forecast page into one entry per day block, in page
/// order. A document without any complete day block yields an empty vec.
pub fn parse_daily(html: &str) -> Vec<ForecastEntry> {
    let doc = Html::parse_document(html);
    let mut entries = Vec::new();

    for wrapper in doc.select(&sel(".daily-wrapper")) {
        let Some(card) = wrapper.select(&sel(".daily-forecast-card")).next() else {
            continue;
        };
        let Some(content) = wrapper.select(&sel(".half-day-card-content")).next() else {
            continue;
        };

        // Two-part date label: day name + day/month as separate spans.
        let mut label = None;
        if let Some(date_h2) = card.select(&sel(".info h2.date")).next() {
            let spans: Vec<String> = date_h2.select(&sel("span")).map(text_of).collect();
            if spans.len() >= 2 {
                label = Some(format!("{} {}", spans[0], spans[1]));
            }
        }
        if label.is_none() {
            label = select_text(card, ".date");
        }

        // The precip marker shares its element with an icon; only the text
        // node carries the probability.
        let precipitation_probability = card
            .select(&sel(".precip"))
            .next()
            .and_then(first_own_text)
            .and_then(|t| extract_numeric(&t));

        let phrase = select_text(content, ".phrase");
        let condition = phrase
            .as_deref()
            .map(map_condition)
            .unwrap_or(WeatherCondition::Unknown);

        let mut high = None;
        let mut low = None;
        if let Some(temp) = card.select(&sel(".temp")).next() {
            high = select_text(temp, ".high").and_then(|t| extract_temperature(&t));
            low = select_text(temp, ".low").and_then(|t| extract_temperature(&t));
        }

        // Details merged from the two side-by-side panels.
        let mut details = BTreeMap::new();
        for panel in content.select(&sel(".panels .left, .panels .right")) {
            for item in panel.select(&sel("p.panel-item")) {
                let label = first_own_text(item);
                let value = select_text(item, ".value");
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
            temperature: high,
            temperature_low: low,
            apparent_temperature: None,
            precipitation_probability,
            humidity: details.get("Độ ẩm").and_then(|v| extract_numeric(v)),
            wind_speed,
            wind_bearing,
            uv_index: details.get("Chỉ số UV tối đa").and_then(|v| extract_numeric(v)),
            cloud_coverage: None,
            visibility: None,
            details,
        });
    }

    entries
}
