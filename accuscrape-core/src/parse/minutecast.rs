//! Minute-cast (minute-by-minute precipitation) page parser.
//!
//! The minute-cast markup is the least stable of the six pages, so this
//! parser is two-tier: structured selectors first, full-page text patterns
//! as the fallback.

use regex::Regex;
use scraper::Html;

use crate::model::MinuteCast;
use crate::parse::{sel, select_text, text_of};

/// Summary selectors in priority order; the first non-empty match wins.
const SUMMARY_SELECTORS: [&str; 4] = [
    ".minute-cast-chart .summary",
    ".minute-cast-chart",
    ".minutecast-summary",
    ".chart-summary",
];

/// Candidate containers for the current-conditions sub-section.
const CURRENT_SELECTORS: [&str; 3] = [
    ".current-weather",
    ".minute-cast-current",
    ".current-conditions",
];

const EMPTY_SUMMARY: &str = "Không có dữ liệu MinuteCast";

/// Parse the minute-cast page. Returns `None` when neither the structured
/// elements nor the text-pattern fallbacks find anything at all.
pub fn parse_minutecast(html: &str) -> Option<MinuteCast> {
    let doc = Html::parse_document(html);

    let mut summary = None;
    for css in SUMMARY_SELECTORS {
        if let Some(text) = doc
            .select(&sel(css))
            .next()
            .map(text_of)
            .filter(|t| !t.is_empty())
        {
            summary = Some(text);
            break;
        }
    }

    let mut temperature = None;
    let mut condition = None;
    let mut realfeel = None;
    let mut time = None;

    let section = CURRENT_SELECTORS
        .into_iter()
        .find_map(|css| doc.select(&sel(css)).next());
    if let Some(section) = section {
        temperature = select_text(section, ".temp, .temperature")
            .as_deref()
            .and_then(degrees);
        condition = select_text(section, ".phrase, .condition, .weather-phrase");
        realfeel = select_text(section, ".realfeel, .real-feel")
            .as_deref()
            .and_then(degrees);
        time = select_text(section, ".time, .current-time");
    }

    // Pattern fallback over the whole page for whatever the structured pass
    // left unfilled.
    if temperature.is_none() || condition.is_none() || realfeel.is_none() || time.is_none() {
        let body_text = doc
            .root_element()
            .text()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if condition.is_none() {
            // The phrase survives inside an HTML-encoded JSON fragment.
            let re = Regex::new(r#"\\&quot;Phrase\\&quot;:\\&quot;([^\\]+)\\&quot;"#).unwrap();
            condition = re.captures(html).map(|caps| caps[1].to_string());
        }
        if temperature.is_none() {
            let re = Regex::new(r"(\d+)°\s*C").unwrap();
            temperature = re.captures(&body_text).and_then(|caps| caps[1].parse().ok());
        }
        if realfeel.is_none() {
            let re = Regex::new(r"RealFeel®?\s*(\d+)°").unwrap();
            realfeel = re.captures(&body_text).and_then(|caps| caps[1].parse().ok());
        }
        if time.is_none() {
            let re = Regex::new(r"\d{2}:\d{2}").unwrap();
            time = re.find(&body_text).map(|m| m.as_str().to_string());
        }
    }

    if summary.is_none()
        && temperature.is_none()
        && condition.is_none()
        && realfeel.is_none()
        && time.is_none()
    {
        return None;
    }

    Some(MinuteCast {
        summary: summary.unwrap_or_else(|| EMPTY_SUMMARY.to_string()),
        temperature,
        condition,
        realfeel,
        time,
        forecast_type: MinuteCast::FORECAST_TYPE,
    })
}

fn degrees(text: &str) -> Option<i64> {
    let re = Regex::new(r"(\d+)°").unwrap();
    re.captures(text).and_then(|caps| caps[1].parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_markup_wins() {
        let html = r#"
        <div class="minute-cast-chart"><p class="summary">Mưa tạnh trong 18 phút</p></div>
        <div class="current-weather">
          <span class="temp">27° C</span>
          <span class="phrase">Mưa nhẹ</span>
          <span class="realfeel">RealFeel® 30°</span>
          <span class="time">21:45</span>
        </div>
        "#;
        let cast = parse_minutecast(html).unwrap();

        assert_eq!(cast.summary, "Mưa tạnh trong 18 phút");
        assert_eq!(cast.temperature, Some(27));
        assert_eq!(cast.condition.as_deref(), Some("Mưa nhẹ"));
        assert_eq!(cast.realfeel, Some(30));
        assert_eq!(cast.time.as_deref(), Some("21:45"));
        assert_eq!(cast.forecast_type, "minutecast");
    }

    #[test]
    fn summary_selectors_are_prioritized() {
        let html = r#"
        <div class="chart-summary">fallback text</div>
        <div class="minute-cast-chart"><p class="summary">Không có mưa</p></div>
        "#;
        let cast = parse_minutecast(html).unwrap();
        assert_eq!(cast.summary, "Không có mưa");
    }

    #[test]
    fn pattern_fallback_fills_missing_fields() {
        let html = concat!(
            r#"<div class="minutecast-summary">Mưa kéo dài 40 phút nữa</div>"#,
            r#"<p>Hiện tại 26° C lúc 09:15, RealFeel® 29°</p>"#,
            r#"<script>x = "\&quot;Phrase\&quot;:\&quot;Mưa rào\&quot;"</script>"#,
        );
        let cast = parse_minutecast(html).unwrap();

        assert_eq!(cast.summary, "Mưa kéo dài 40 phút nữa");
        assert_eq!(cast.temperature, Some(26));
        assert_eq!(cast.condition.as_deref(), Some("Mưa rào"));
        assert_eq!(cast.realfeel, Some(29));
        assert_eq!(cast.time.as_deref(), Some("09:15"));
    }

    #[test]
    fn empty_page_yields_none() {
        assert!(parse_minutecast("<html><body></body></html>").is_none());
        assert!(parse_minutecast("").is_none());
    }
}
