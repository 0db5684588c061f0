//! Locale-aware value extraction from scraped text runs.
//!
//! The source pages are served in Vietnamese, so everything here tolerates
//! both Vietnamese and English spellings and treats the comma as a decimal
//! separator. All extractors signal failure with `None`; they never panic on
//! malformed input.

use regex::Regex;

use crate::model::WeatherCondition;
use crate::model::WeatherCondition::*;

/// Vietnamese phrase table, consulted before anything else.
///
/// Matching is by substring containment on the lowercased phrase, so longer
/// phrases must precede their prefixes ("mưa to" before "mưa").
const VI_CONDITIONS: &[(&str, WeatherCondition)] = &[
    ("có thể có mưa rào hoặc mưa dông", LightningRainy),
    ("cơn mưa rào hoặc mưa dông", LightningRainy),
    ("mưa dông ở một số phần trong khu vực", LightningRainy),
    ("một vài cơn mưa rào và mưa dông", LightningRainy),
    ("một vài cơn mưa dông", LightningRainy),
    ("mưa dông", LightningRainy),
    ("sấm sét", LightningRainy),
    ("dông", Lightning),
    ("mưa tuyết", SnowyRainy),
    ("tuyết", Snowy),
    ("mưa to", Pouring),
    ("một vài cơn mưa rào", Rainy),
    ("mưa rào", Rainy),
    ("đôi lúc có mưa", Rainy),
    ("khả năng có mưa", Rainy),
    ("một chút mưa", Rainy),
    ("mưa nhẹ", Rainy),
    ("mưa vừa", Rainy),
    ("mưa", Rainy),
    ("sương mù", Fog),
    ("mây ngày càng nhiều", Cloudy),
    ("nhiều mây", Cloudy),
    ("u ám", Cloudy),
    ("âm u", Cloudy),
    ("nắng sau đó có ít mây", Partlycloudy),
    ("mây và nắng", Partlycloudy),
    ("mây rải rác", Partlycloudy),
    ("ít mây", Partlycloudy),
    ("có mây", Partlycloudy),
    ("đêm quang đãng", ClearNight),
    ("quang đãng", Sunny),
    ("nắng nhiều", Sunny),
    ("nắng nhẹ", Sunny),
    ("nắng", Sunny),
    ("gió", Windy),
];

/// English phrase table, consulted when the Vietnamese table yields nothing.
const EN_CONDITIONS: &[(&str, WeatherCondition)] = &[
    ("rain and snow mixed", SnowyRainy),
    ("rain and snow", SnowyRainy),
    ("freezing rain", Snowy),
    ("mostly cloudy w/ t-storms", LightningRainy),
    ("partly sunny w/ t-storms", LightningRainy),
    ("partly cloudy w/ t-storms", LightningRainy),
    ("t-storms", LightningRainy),
    ("mostly cloudy w/ showers", Rainy),
    ("partly sunny w/ showers", Rainy),
    ("partly cloudy w/ showers", Rainy),
    ("showers", Rainy),
    ("mostly cloudy w/ flurries", Snowy),
    ("partly sunny w/ flurries", Snowy),
    ("partly cloudy w/ flurries", Snowy),
    ("flurries", Snowy),
    ("hazy sunshine", Partlycloudy),
    ("hazy moonlight", Partlycloudy),
    ("intermittent clouds", Partlycloudy),
    ("partly sunny", Partlycloudy),
    ("partly cloudy", Partlycloudy),
    ("mostly cloudy", Cloudy),
    ("overcast", Cloudy),
    ("cloudy", Cloudy),
    ("fog", Fog),
    ("clear night", ClearNight),
    ("mostly clear", ClearNight),
    ("mostly sunny", Sunny),
    ("sunny", Sunny),
    ("clear", Sunny),
    ("sleet", Snowy),
    ("freezing", Snowy),
    ("ice", Snowy),
    ("snow", Snowy),
    ("rain", Rainy),
    ("windy", Windy),
    ("hot", Sunny),
    ("cold", Sunny),
];

/// Map a scraped condition phrase onto the fixed vocabulary.
///
/// The Vietnamese table takes strict precedence over the English one, which
/// takes precedence over the keyword fallback. Unmatched phrases are
/// `Unknown`.
pub fn map_condition(phrase: &str) -> WeatherCondition {
    let phrase = phrase.trim().to_lowercase();
    if phrase.is_empty() {
        return Unknown;
    }

    for (needle, condition) in VI_CONDITIONS {
        if phrase.contains(needle) {
            return *condition;
        }
    }
    for (needle, condition) in EN_CONDITIONS {
        if phrase.contains(needle) {
            return *condition;
        }
    }

    if phrase.contains("mưa") || phrase.contains("rain") {
        Rainy
    } else if phrase.contains("mây") || phrase.contains("cloud") {
        Cloudy
    } else if phrase.contains("nắng") || phrase.contains("sun") {
        Sunny
    } else if phrase.contains("gió") || phrase.contains("wind") {
        Windy
    } else {
        Unknown
    }
}

/// Parse the first decimal number out of `text`, stripping degree and
/// percent signs first. The comma is treated as a decimal separator; a run
/// mixing both separators (e.g. "1.234,5") fails the parse and yields `None`.
pub fn extract_numeric(text: &str) -> Option<f64> {
    let cleaned = text.replace(['°', '%'], "");
    let re = Regex::new(r"[\d.,]+").unwrap();
    let run = re.find(&cleaned)?;
    run.as_str().replace(',', ".").parse().ok()
}

/// Like [`extract_numeric`] but admits a leading minus sign, for
/// temperatures below zero.
pub fn extract_temperature(text: &str) -> Option<f64> {
    let re = Regex::new(r"-?[\d.,]+").unwrap();
    let run = re.find(text)?;
    run.as_str().replace(',', ".").parse().ok()
}

/// Pull wind speed and compass direction out of a combined text run such as
/// "17 km/h ĐB". Speed requires an adjacent unit token; the direction is the
/// first short run of Latin or Vietnamese compass letters, found
/// independently of the speed.
pub fn extract_wind(text: &str) -> (Option<f64>, Option<String>) {
    let speed_re = Regex::new(r"([\d.,]+)\s*(?:km/h|m/s|mph)").unwrap();
    let speed = speed_re
        .captures(text)
        .and_then(|caps| caps[1].replace(',', ".").parse().ok());

    let dir_re = Regex::new(r"[NSEW]{1,3}|[BTĐN]{1,3}").unwrap();
    let direction = dir_re.find(text).map(|m| m.as_str().to_string());

    (speed, direction)
}

/// Translate a Vietnamese compass abbreviation to the Latin one; anything
/// unrecognized passes through untouched.
pub fn localize_bearing(bearing: &str) -> String {
    match bearing.to_uppercase().as_str() {
        "B" => "N",
        "ĐB" => "NE",
        "Đ" => "E",
        "ĐN" => "SE",
        "N" => "S",
        "TN" => "SW",
        "T" => "W",
        "TB" => "NW",
        _ => return bearing.to_string(),
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_strips_degree_and_percent() {
        assert_eq!(extract_numeric("24°"), Some(24.0));
        assert_eq!(extract_numeric("87%"), Some(87.0));
        assert_eq!(extract_numeric("1.013 mb"), Some(1.013));
    }

    #[test]
    fn numeric_treats_comma_as_decimal_separator() {
        assert_eq!(extract_numeric("29,5°"), Some(29.5));
    }

    #[test]
    fn numeric_rejects_mixed_separators() {
        // "1.234,5" normalizes to "1.234.5" which is not a float; the run
        // as a whole fails rather than guessing a locale.
        assert_eq!(extract_numeric("1.234,5"), None);
    }

    #[test]
    fn numeric_returns_none_without_digits() {
        assert_eq!(extract_numeric(""), None);
        assert_eq!(extract_numeric("n/a"), None);
        assert_eq!(extract_numeric("°%"), None);
    }

    #[test]
    fn temperature_admits_negative_values() {
        assert_eq!(extract_temperature("-3°"), Some(-3.0));
        assert_eq!(extract_temperature("31°"), Some(31.0));
        assert_eq!(extract_temperature(""), None);
    }

    #[test]
    fn wind_requires_unit_for_speed() {
        let (speed, dir) = extract_wind("17 km/h ĐB");
        assert_eq!(speed, Some(17.0));
        assert_eq!(dir, Some("ĐB".to_string()));

        let (speed, dir) = extract_wind("17 knots NW");
        assert_eq!(speed, None);
        assert_eq!(dir, Some("NW".to_string()));
    }

    #[test]
    fn wind_direction_is_independent_of_speed() {
        let (speed, dir) = extract_wind("WSW");
        assert_eq!(speed, None);
        assert_eq!(dir, Some("WSW".to_string()));

        let (speed, dir) = extract_wind("");
        assert_eq!(speed, None);
        assert_eq!(dir, None);
    }

    #[test]
    fn vietnamese_table_takes_precedence() {
        // "mưa to" must hit the Vietnamese heavy-rain entry before the
        // shorter "mưa" entry or any English rule gets a look.
        assert_eq!(map_condition("Mưa to"), WeatherCondition::Pouring);
        assert_eq!(map_condition("mưa rào"), WeatherCondition::Rainy);
        assert_eq!(map_condition("dông"), WeatherCondition::Lightning);
        assert_eq!(map_condition("mưa dông"), WeatherCondition::LightningRainy);
    }

    #[test]
    fn english_table_is_consulted_second() {
        assert_eq!(map_condition("Mostly cloudy"), WeatherCondition::Cloudy);
        assert_eq!(
            map_condition("Partly sunny w/ t-storms"),
            WeatherCondition::LightningRainy
        );
        assert_eq!(map_condition("Clear night"), WeatherCondition::ClearNight);
        assert_eq!(map_condition("Ice"), WeatherCondition::Snowy);
    }

    #[test]
    fn keyword_fallback_and_unknown() {
        assert_eq!(map_condition("chủ yếu là mây"), WeatherCondition::Cloudy);
        assert_eq!(map_condition(""), WeatherCondition::Unknown);
        assert_eq!(map_condition("???"), WeatherCondition::Unknown);
    }

    #[test]
    fn bearing_localization() {
        assert_eq!(localize_bearing("B"), "N");
        assert_eq!(localize_bearing("đb"), "NE");
        assert_eq!(localize_bearing("TB"), "NW");
        assert_eq!(localize_bearing("NW"), "NW");
    }
}
