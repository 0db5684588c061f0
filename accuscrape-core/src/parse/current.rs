//! Current-conditions page parser.

use std::collections::BTreeMap;

use scraper::Html;

use crate::extract::{extract_numeric, extract_temperature, extract_wind, map_condition};
use crate::model::{CurrentConditions, WeatherCondition};
use crate::parse::{sel, select_text, text_of};

/// Parse the current-weather page. Returns `None` when the current-weather
/// card (the page anchor) is absent.
///
/// The typed fields are derived from the label/value detail table by exact
/// label match; a renamed label only drops the typed field while the raw
/// pair stays in `details`.
pub fn parse_current(html: &str) -> Option<CurrentConditions> {
    let doc = Html::parse_document(html);
    let card = doc.select(&sel(".current-weather-card")).next()?;

    let time = select_text(card, ".card-header .sub");
    let temperature =
        select_text(card, ".display-temp").and_then(|t| extract_temperature(&t));
    let phrase = select_text(card, ".phrase");
    let condition = phrase
        .as_deref()
        .map(map_condition)
        .unwrap_or(WeatherCondition::Unknown);

    // The "extra" block holds RealFeel and RealFeel Shade as its first two
    // divs, in that order.
    let mut realfeel = None;
    let mut realfeel_shade = None;
    if let Some(extra) = card.select(&sel(".current-weather-extra")).next() {
        let div_sel = sel("div");
        let mut divs = extra.select(&div_sel).map(text_of);
        realfeel = divs.next().filter(|t| !t.is_empty());
        realfeel_shade = divs.next().filter(|t| !t.is_empty());
    }

    let mut details = BTreeMap::new();
    for item in card.select(&sel(".current-weather-details .detail-item")) {
        let label = item.select(&sel("div:nth-child(1)")).next().map(text_of);
        let value = item.select(&sel("div:nth-child(2)")).next().map(text_of);
        if let (Some(label), Some(value)) = (label, value) {
            if !label.is_empty() {
                details.insert(label, value);
            }
        }
    }

    let (wind_speed, wind_bearing) = details
        .get("Gió")
        .map(|text| extract_wind(text))
        .unwrap_or((None, None));

    let numeric = |label: &str| details.get(label).and_then(|v| extract_numeric(v));

    Some(CurrentConditions {
        time,
        temperature,
        temperature_unit: "°C".to_string(),
        condition,
        phrase,
        realfeel,
        realfeel_shade,
        humidity: numeric("Độ ẩm"),
        pressure: numeric("Khí áp"),
        wind_speed,
        wind_bearing,
        visibility: numeric("Tầm nhìn"),
        cloud_coverage: numeric("Mật độ mây"),
        uv_index: numeric("Chỉ số UV tối đa"),
        details,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"
    <div class="current-weather-card">
      <div class="card-header"><h1>Thời tiết hiện tại</h1><p class="sub">21:30</p></div>
      <div class="display-temp">29°C</div>
      <div class="phrase">Mưa rào</div>
      <div class="current-weather-extra">
        <div>RealFeel® 33°</div>
        <div>RealFeel Shade™ 31°</div>
      </div>
      <div class="current-weather-details">
        <div class="detail-item"><div>Độ ẩm</div><div>87%</div></div>
        <div class="detail-item"><div>Khí áp</div><div>1009 mb</div></div>
        <div class="detail-item"><div>Gió</div><div>ĐB 11 km/h</div></div>
        <div class="detail-item"><div>Tầm nhìn</div><div>8 km</div></div>
        <div class="detail-item"><div>Mật độ mây</div><div>92%</div></div>
        <div class="detail-item"><div>Chỉ số UV tối đa</div><div>1</div></div>
      </div>
    </div>
    "#;

    #[test]
    fn parses_full_card() {
        let current = parse_current(FIXTURE).unwrap();

        assert_eq!(current.time.as_deref(), Some("21:30"));
        assert_eq!(current.temperature, Some(29.0));
        assert_eq!(current.temperature_unit, "°C");
        assert_eq!(current.condition, WeatherCondition::Rainy);
        assert_eq!(current.phrase.as_deref(), Some("Mưa rào"));
        assert_eq!(current.realfeel.as_deref(), Some("RealFeel® 33°"));
        assert_eq!(current.realfeel_shade.as_deref(), Some("RealFeel Shade™ 31°"));
        assert_eq!(current.humidity, Some(87.0));
        assert_eq!(current.pressure, Some(1009.0));
        assert_eq!(current.wind_speed, Some(11.0));
        assert_eq!(current.wind_bearing.as_deref(), Some("ĐB"));
        assert_eq!(current.visibility, Some(8.0));
        assert_eq!(current.cloud_coverage, Some(92.0));
        assert_eq!(current.uv_index, Some(1.0));
        assert_eq!(current.details.len(), 6);
    }

    #[test]
    fn missing_anchor_yields_none() {
        assert_eq!(parse_current("<html><body>no card here</body></html>"), None);
        assert_eq!(parse_current(""), None);
    }

    #[test]
    fn renamed_label_drops_typed_field_but_keeps_detail() {
        let html = r#"
        <div class="current-weather-card">
          <div class="display-temp">18°</div>
          <div class="current-weather-details">
            <div class="detail-item"><div>Độ ẩm tương đối</div><div>64%</div></div>
          </div>
        </div>
        "#;
        let current = parse_current(html).unwrap();

        assert_eq!(current.humidity, None);
        assert_eq!(
            current.details.get("Độ ẩm tương đối").map(String::as_str),
            Some("64%")
        );
    }

    #[test]
    fn partial_card_leaves_missing_fields_unset() {
        let html = r#"<div class="current-weather-card"><div class="phrase">Nhiều mây</div></div>"#;
        let current = parse_current(html).unwrap();

        assert_eq!(current.temperature, None);
        assert_eq!(current.time, None);
        assert_eq!(current.condition, WeatherCondition::Cloudy);
        assert!(current.details.is_empty());
    }
}
