//! Canonicalization of colony-forming-unit counts and their log conversion.

use std::fmt;

use lazy_regex::{regex_captures, regex_is_match, regex_replace_all};
use serde::{Serialize, Serializer};

use super::strain::Strain;

/// The sampling days of a preservation test.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Day {
    Day0,
    Day7,
    Day14,
    Day28,
}

impl Day {
    pub const ALL: [Day; 4] = [Day::Day0, Day::Day7, Day::Day14, Day::Day28];

    /// Days after inoculation.
    pub fn offset(self) -> u64 {
        match self {
            Day::Day0 => 0,
            Day::Day7 => 7,
            Day::Day14 => 14,
            Day::Day28 => 28,
        }
    }
}

fn superscript_digit(c: char) -> Option<char> {
    let digit = match c {
        '⁰' => '0',
        '¹' => '1',
        '²' => '2',
        '³' => '3',
        '⁴' => '4',
        '⁵' => '5',
        '⁶' => '6',
        '⁷' => '7',
        '⁸' => '8',
        '⁹' => '9',
        _ => return None,
    };
    Some(digit)
}

/// Raw tokens shorter than this, lacking an explicit exponent, are not
/// trusted on later days.
const MIN_TRUSTED_LEN: usize = 6;

/// Canonicalizes one CFU cell.
///
/// Japanese script is dropped and the `く`/`C` and `O` misreads are fixed.
/// Superscript exponents become `^n`. The exponential form becomes
/// `<base>×10^<exp>`, and less-than and less-or-equal forms become `<10^n`,
/// `<n` or `≤n`.
///
/// For every strain but the mould, a short token on day 7, 14 or 28 is
/// replaced with the detection limit of that day.
pub fn clean_cfu(raw: &str, strain: Strain, day: Day) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }

    let value = raw.replace(['く', 'C'], "<").replace('O', "0");
    let value = regex_replace_all!(r"[ぁ-んァ-ン一-龯]+", &value, "");
    let value = regex_replace_all!(r"[⁰¹²³⁴⁵⁶⁷⁸⁹]+", &value, |sup: &str| {
        format!("^{}", sup.chars().filter_map(superscript_digit).collect::<String>())
    });
    let value = value.trim();

    if value.contains(['×', 'x', 'X']) {
        if let Some((_, base, exp)) =
            regex_captures!(r"^([0-9.]+)\s*[×xX]\s*10\s*\^?\s*([0-9]+)", value)
        {
            return format!("{base}×10^{exp}");
        }
    }

    if value.contains('<') {
        if let Some((_, exp)) = regex_captures!(r"<\s*10\s*\^\s*([0-9]+)", value) {
            return format!("<10^{exp}");
        }
        // A lost superscript reads as one trailing digit.
        if let Some((_, exp)) = regex_captures!(r"^<\s*10([1-9])$", value) {
            return format!("<10^{exp}");
        }
        if let Some((_, n)) = regex_captures!(r"<\s*([0-9]+)", value) {
            return format!("<{n}");
        }
        return "<10".to_string();
    }

    if value.contains('≤') {
        if let Some((_, n)) = regex_captures!(r"≤\s*([0-9]+)", value) {
            return format!("≤{n}");
        }
    }

    if day != Day::Day0 && strain.is_detection_limited() {
        return detection_limit_override(raw, value, day);
    }

    value.to_string()
}

fn detection_limit_override(raw: &str, value: &str, day: Day) -> String {
    if raw.chars().count() >= MIN_TRUSTED_LEN {
        return value.to_string();
    }
    let power_signal =
        raw.contains('2') && raw.contains(['^', '²', '⁰', '¹', '³']) && day != Day::Day28;
    let limit = if day == Day::Day7 || power_signal {
        "<10^2"
    } else {
        "<10"
    };
    log::debug!("{day}: short count {raw:?} read as detection limit {limit}");
    limit.to_string()
}

/// A CFU count on the log10 scale.
#[derive(Clone, Debug, PartialEq)]
pub enum LogValue {
    /// Rounded to one decimal place.
    Number(f64),
    /// An inequality such as `<2.0`, the empty string, or text that could not
    /// be converted.
    Text(String),
}

impl fmt::Display for LogValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogValue::Number(n) => write!(f, "{n:.1}"),
            LogValue::Text(s) => f.write_str(s),
        }
    }
}

impl Serialize for LogValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            LogValue::Number(n) => serializer.serialize_f64(*n),
            LogValue::Text(s) => serializer.serialize_str(s),
        }
    }
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

fn positive_log10(s: &str) -> Option<f64> {
    s.parse::<f64>()
        .ok()
        .filter(|n| *n > 0.0)
        .map(|n| round1(n.log10()))
}

/// Converts a cleaned CFU value to log10.
///
/// `<10^n` becomes `<n.0`, `<n` and `≤n` become the threshold's log with the
/// same prefix. Exponential and plain numbers become [LogValue::Number].
/// Anything else passes through as text.
pub fn convert_to_log(cfu: &str) -> LogValue {
    let cfu = cfu.trim();
    if cfu.is_empty() {
        return LogValue::Text(String::new());
    }

    if let Some((_, exp)) = regex_captures!(r"^<\s*10\^(\d+)$", cfu) {
        return LogValue::Text(format!("<{exp}.0"));
    }
    if let Some((_, prefix, n)) = regex_captures!(r"^([<≤])\s*(\d+(?:\.\d+)?)$", cfu) {
        return match positive_log10(n) {
            Some(log) => LogValue::Text(format!("{prefix}{log:.1}")),
            None => LogValue::Text(cfu.to_string()),
        };
    }
    if let Some((_, base, exp)) = regex_captures!(r"^([0-9.]+)×10\^(\d+)$", cfu) {
        if let (Ok(base), Ok(exp)) = (base.parse::<f64>(), exp.parse::<i32>()) {
            if base > 0.0 {
                return LogValue::Number(round1(f64::from(exp) + base.log10()));
            }
        }
    }
    if regex_is_match!(r"^\d+(?:\.\d+)?$", cfu) {
        if let Some(log) = positive_log10(cfu) {
            return LogValue::Number(log);
        }
    }

    log::debug!("CFU value {cfu:?} has no log form");
    LogValue::Text(cfu.to_string())
}

/// The pass/fail mark of a judgment column.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, strum_macros::Display)]
pub enum Judgment {
    #[default]
    #[strum(to_string = "적합")]
    #[serde(rename = "적합")]
    Pass,
    #[strum(to_string = "부적합")]
    #[serde(rename = "부적합")]
    Fail,
}

impl Judgment {
    /// A cell marked with an X or a check is a fail; anything else, including
    /// an absent cell, is a pass.
    pub fn from_cell(text: Option<&str>) -> Judgment {
        match text {
            Some(text) if text.contains(['X', '×', 'v', 'V']) => Judgment::Fail,
            _ => Judgment::Pass,
        }
    }
}
