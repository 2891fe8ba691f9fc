// Duration extraction from free-form instruction text
// Handles English and Chinese phrasing, including fuzzy numerals like
// "十二" (12) and "半" (half). Malformed input degrades to 0/None; nothing
// in this module can fail.

use regex::Regex;
use std::sync::OnceLock;

/// A duration found inside instruction text.
#[derive(Debug, Clone, PartialEq)]
pub struct DurationMatch {
    /// Resolved duration in seconds.
    pub seconds: f64,
    /// The exact substring matched, used verbatim as a timer label.
    pub label: String,
}

fn plain_number() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9.]+$").expect("plain number pattern is valid"))
}

fn duration_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Unit alternatives are ordered longest-first so "minutes" is consumed
    // as one token rather than as "min" with a dangling "utes".
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)([0-9.]+|[零一二兩三四五六七八九十百半]+)\s*(minutes?|mins?|hours?|hrs?|seconds?|secs?|分鐘|分|小時|秒鐘|秒)",
        )
        .expect("duration pattern is valid")
    })
}

/// Resolve a quantity written as digits or as a Chinese numeral string.
///
/// Digits (including decimals) parse directly. "半" means one half. Chinese
/// numerals are scanned left to right: a multiplier character (十/百)
/// multiplies the pending digit (an implicit leading one when there is
/// none) into the running total, so "十二" is 12 and "兩百三十" is 230.
/// Characters outside the digit map are skipped; unparseable input
/// resolves to 0.
pub fn parse_fuzzy_number(text: &str) -> f64 {
    let clean = text.trim();
    if clean.is_empty() {
        return 0.0;
    }

    if plain_number().is_match(clean) {
        return clean.parse::<f64>().unwrap_or(0.0);
    }

    if clean == "半" {
        return 0.5;
    }

    let mut total: f64 = 0.0;
    let mut current: f64 = 0.0;
    for ch in clean.chars() {
        let value = match ch {
            '零' => 0.0,
            '一' => 1.0,
            '二' | '兩' => 2.0,
            '三' => 3.0,
            '四' => 4.0,
            '五' => 5.0,
            '六' => 6.0,
            '七' => 7.0,
            '八' => 8.0,
            '九' => 9.0,
            '十' => 10.0,
            '百' => 100.0,
            _ => continue,
        };
        if value == 10.0 || value == 100.0 {
            if current == 0.0 {
                current = 1.0;
            }
            total += current * value;
            current = 0.0;
        } else {
            current = value;
        }
    }
    total + current
}

/// Convert a numeric quantity plus a unit word into seconds.
///
/// Unit matching is case-insensitive and prefix/substring based: `min*` or
/// 分 means minutes, `hour*`/`hr*` or 小 means hours, `sec*` or 秒 means
/// seconds. Unknown units and NaN quantities resolve to 0.
pub fn duration_to_seconds(quantity: f64, unit: &str) -> f64 {
    if quantity.is_nan() {
        return 0.0;
    }

    let u = unit.to_lowercase();
    if u.starts_with("min") || u.contains('分') {
        quantity * 60.0
    } else if u.starts_with("hour") || u.starts_with("hr") || u.contains('小') {
        quantity * 3600.0
    } else if u.starts_with("sec") || u.contains('秒') {
        quantity
    } else {
        0.0
    }
}

/// Convert a textual quantity (digits or fuzzy numerals) plus a unit word
/// into seconds.
pub fn parse_duration_to_seconds(quantity: &str, unit: &str) -> f64 {
    duration_to_seconds(parse_fuzzy_number(quantity), unit)
}

/// Find the first embedded duration in `text`.
///
/// Returns the resolved seconds together with the exact matched substring,
/// or `None` when the text mentions no duration.
pub fn find_duration_in_text(text: &str) -> Option<DurationMatch> {
    let captures = duration_pattern().captures(text)?;
    let quantity = captures.get(1)?.as_str();
    let unit = captures.get(2)?.as_str();
    Some(DurationMatch {
        seconds: parse_duration_to_seconds(quantity, unit),
        label: captures.get(0)?.as_str().to_string(),
    })
}

#[cfg(test)]
#[path = "duration_test.rs"]
mod tests;
