//! Air-quality page parser.

use std::collections::BTreeMap;

use regex::Regex;
use scraper::Html;

use crate::extract::extract_numeric;
use crate::model::{AirQuality, Pollutant};
use crate::parse::{sel, text_of};

/// `data-qa` prefix on pollutant blocks. Block identity comes from this
/// attribute rather than the visible heading, which is locale-dependent.
const POLLUTANT_QA_PREFIX: &str = "airQualityPollutant";

/// Parse the air-quality page. A document without the summary card or any
/// pollutant block yields the neutral value (`AirQuality::default()`).
pub fn parse_air_quality(html: &str) -> AirQuality {
    let doc = Html::parse_document(html);

    let category = doc
        .select(&sel(".air-quality-card .category"))
        .next()
        .map(text_of)
        .filter(|t| !t.is_empty());
    let description = doc
        .select(&sel(".air-quality-card .statement"))
        .next()
        .map(text_of)
        .filter(|t| !t.is_empty());

    // Several unit spellings appear in the wild, including ASCII variants.
    let value_re =
        Regex::new(r"([\d.,]+)\s*(µg/m³|mg/m³|ppm|ppb|μg/m³|mg/m3|µg/m3|%)").unwrap();

    let mut pollutants = BTreeMap::new();
    for block in doc.select(&sel(".air-quality-pollutant")) {
        let Some(qa) = block.value().attr("data-qa") else {
            continue;
        };
        let name = qa.strip_prefix(POLLUTANT_QA_PREFIX).unwrap_or(qa);
        if name.is_empty() {
            continue;
        }

        let aqi = block
            .select(&sel("h3.column"))
            .next()
            .map(text_of)
            .and_then(|t| extract_numeric(&t));

        let block_text = block
            .text()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        let mut value = None;
        let mut unit = None;
        if let Some(caps) = value_re.captures(&block_text) {
            value = caps[1].replace(',', ".").parse().ok();
            unit = Some(caps[2].to_string());
        }

        pollutants.insert(name.to_string(), Pollutant { aqi, value, unit });
    }

    AirQuality {
        category,
        description,
        pollutants,
    }
}
