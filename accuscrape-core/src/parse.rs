//! Per-page HTML parsers.
//!
//! Every parser takes raw markup and produces its normalized record(s).
//! Selector lookups are optional throughout: a missing element yields a
//! `None`/empty field, never an abort. Only a missing page anchor (the root
//! card or repeated block the page is built around) downgrades the whole
//! parse to the page's documented empty value.

use regex::Regex;
use scraper::{ElementRef, Selector};

pub mod air_quality;
pub mod current;
pub mod daily;
pub mod health;
pub mod hourly;
pub mod minutecast;

pub use air_quality::parse_air_quality;
pub use current::parse_current;
pub use daily::parse_daily;
pub use health::parse_health_activities;
pub use hourly::parse_hourly;
pub use minutecast::parse_minutecast;

/// Compile a constant CSS selector. The selectors in this crate are string
/// literals, so a parse failure is a programming error, not input-dependent.
pub(crate) fn sel(css: &str) -> Selector {
    Selector::parse(css).unwrap()
}

/// All text under an element, concatenated and trimmed.
pub(crate) fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// First matching element's trimmed text, `None` when nothing matches or the
/// match is empty.
pub(crate) fn select_text(scope: ElementRef<'_>, css: &str) -> Option<String> {
    scope
        .select(&sel(css))
        .next()
        .map(text_of)
        .filter(|t| !t.is_empty())
}

/// First non-empty direct text node of an element, skipping child elements.
///
/// Labels on the forecast pages share their parent with an icon or a styled
/// value span; this picks up just the leading text node.
pub(crate) fn first_own_text(el: ElementRef<'_>) -> Option<String> {
    el.children()
        .filter_map(|node| node.value().as_text())
        .map(|t| t.trim().to_string())
        .find(|t| !t.is_empty())
}

/// Extract the JSON array assigned to a script-level variable, e.g.
/// `var indexListData = [...];`.
///
/// This is the single fragile regex boundary for embedded-JSON pages; the
/// bracket match is non-greedy and the caller deserializes the slice.
pub fn extract_script_array(html: &str, var_name: &str) -> Option<String> {
    let pattern = format!(r"(?s)var {}\s*=\s*(\[.*?\]);", regex::escape(var_name));
    let re = Regex::new(&pattern).ok()?;
    re.captures(html).map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn first_own_text_skips_child_elements() {
        let doc = Html::parse_fragment("<p><svg>icon</svg> 40% <span class=\"value\">x</span></p>");
        let p = doc.select(&sel("p")).next().unwrap();
        assert_eq!(first_own_text(p), Some("40%".to_string()));
    }

    #[test]
    fn script_array_extraction_is_non_greedy() {
        let html = r#"<script>var indexListData = [{"a":1}]; var other = [2];</script>"#;
        assert_eq!(
            extract_script_array(html, "indexListData"),
            Some(r#"[{"a":1}]"#.to_string())
        );
        assert_eq!(extract_script_array(html, "missingVar"), None);
    }

    #[test]
    fn script_array_spans_newlines() {
        let html = "var indexListData = [\n  {\"slug\": \"running\"}\n];";
        let json = extract_script_array(html, "indexListData").unwrap();
        assert!(json.contains("running"));
    }
}
