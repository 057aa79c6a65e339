//! Cleaning of individual OCR'd cell strings.

use lazy_regex::{regex_is_match, regex_replace_all};

/// Removes OCR checkbox markers (`:selected:`, `:unchecked:`, ...) and line
/// breaks, then trims surrounding whitespace.
pub fn clean(raw: &str) -> String {
    let mut value = raw.replace(['\n', '\r'], "");
    // Removing one marker can splice together another.
    loop {
        let stripped =
            regex_replace_all!(r"(?i):(?:un)?(?:selected|checked):", &value, "").into_owned();
        if stripped.len() == value.len() {
            break;
        }
        value = stripped;
    }
    value.trim().to_string()
}

/// Cleans `raw` as [clean] and then canonicalizes the punctuation of a
/// numeric measurement token.
///
/// Tokens carrying the "fill to" notation (containing `TO`) are returned
/// after cleaning only.
pub fn normalize_numeric_token(raw: &str) -> String {
    let mut value = clean(raw);
    if is_fill_to(&value) {
        return value;
    }

    if regex_is_match!(r"^\d+[,:]\d+$", &value) {
        value = value.replace([',', ':'], ".");
    }

    if is_times_glyph(&value) || value == "x" {
        value = "X".to_string();
    }

    if value.matches('.').count() > 1 {
        if let Some((head, tail)) = value.rsplit_once('.') {
            value = format!("{}.{}", head.replace('.', ""), tail);
        }
    }

    if let Some(head) = value.strip_suffix('.') {
        if !head.is_empty() && head.chars().all(|c| c.is_ascii_digit()) {
            value = head.to_string();
        }
    }

    value.replace('=', "").trim().to_string()
}

/// True for the glyphs OCR produces in place of a letter X.
pub fn is_times_glyph(s: &str) -> bool {
    matches!(s, "×" | "✕" | "✗" | "*")
}

/// True if the value uses the "fill to 100" notation (`TO100`, `to 100`).
pub fn is_fill_to(s: &str) -> bool {
    s.to_uppercase().contains("TO")
}

/// Keeps only ASCII letters and digits.
pub fn strip_non_alphanumeric(s: &str) -> String {
    s.chars().filter(char::is_ascii_alphanumeric).collect()
}

/// Returns the uppercased letter if `s` is exactly one ASCII letter.
pub fn single_letter(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => Some(c.to_ascii_uppercase()),
        _ => None,
    }
}

/// Reduces an identifier-row cell to the letter it most likely denotes, if
/// any: markers and punctuation are dropped and a lone `1` reads as `I`.
pub fn identifier_letter(raw: &str) -> Option<char> {
    match strip_non_alphanumeric(&clean(raw)).as_str() {
        "1" => Some('I'),
        token => single_letter(token),
    }
}

/// Corrects the digit/letter confusions OCR makes in phase labels and
/// uppercases the result.
pub fn correct_phase(raw: &str) -> String {
    clean(raw)
        .chars()
        .map(|c| match c {
            '1' | 'l' => 'I',
            '0' => 'O',
            '8' => 'B',
            other => other,
        })
        .collect::<String>()
        .to_uppercase()
}

/// True if a normalized measurement value has an accepted shape: a plain
/// number, an inequality, a range, a percentage, or the "fill to" notation.
pub fn is_accepted_measurement(value: &str) -> bool {
    let value = value.trim();
    is_fill_to(value)
        || regex_is_match!(r"^\d+\.?\d*$", value)
        || regex_is_match!(r"^[<>≤≥]\s*\d+\.?\d*$", value)
        || regex_is_match!(r"^\d+\.?\d*\s*[-~]\s*\d+\.?\d*$", value)
        || regex_is_match!(r"^\d+\.?\d*%$", value)
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;
    use test_casing::{TestCases, cases, test_casing};

    use super::*;

    const CLEAN_CASES: TestCases<(&str, &str)> = cases! {
        [
            ("", ""),
            ("  12.5 ", "12.5"),
            (":selected: A", "A"),
            ("B:UNSELECTED:", "B"),
            (":Checked:", ""),
            ("1\n2\r", "12"),
            (":sel:selected:ected:", ""),
            (":sel\nected: 3", "3"),
            ("연구소 :unchecked:", "연구소"),
        ]
    };

    #[test_casing(9, CLEAN_CASES)]
    #[gtest]
    fn test_clean(input: &str, expected: &str) {
        expect_eq!(clean(input), expected);
    }

    #[test_casing(9, CLEAN_CASES)]
    #[gtest]
    fn test_clean_is_idempotent(input: &str, _expected: &str) {
        let once = clean(input);
        expect_eq!(clean(&once), once);
    }

    #[gtest]
    fn test_clean_is_idempotent_on_noisy_text() {
        for input in [
            " \r\n:UNSELECTED:\n ",
            "::selected::",
            ":un:checked:checked:",
            "\t 5,0 :checked:\t",
            ":selected :checked:",
        ] {
            let once = clean(input);
            expect_eq!(clean(&once), once);
        }
    }

    const NUMERIC_TOKEN_CASES: TestCases<(&str, &str)> = cases! {
        [
            ("8,00", "8.00"),
            ("5:00", "5.00"),
            ("2,0", "2.0"),
            ("×", "X"),
            ("✗", "X"),
            ("*", "X"),
            ("x", "X"),
            ("1.2.3", "12.3"),
            ("10.", "10"),
            ("=5", "5"),
            ("TO100", "TO100"),
            ("to 100", "to 100"),
            (" :selected:0.5 ", "0.5"),
            ("1,000,5", "1,000,5"),
        ]
    };

    #[test_casing(14, NUMERIC_TOKEN_CASES)]
    #[gtest]
    fn test_normalize_numeric_token(input: &str, expected: &str) {
        expect_eq!(normalize_numeric_token(input), expected);
    }

    const PHASE_CASES: TestCases<(&str, &str)> = cases! {
        [
            ("l", "I"),
            ("8", "B"),
            ("1", "I"),
            ("0", "O"),
            ("a", "A"),
            (":selected:b", "B"),
            ("", ""),
        ]
    };

    #[test_casing(7, PHASE_CASES)]
    #[gtest]
    fn test_correct_phase(input: &str, expected: &str) {
        expect_eq!(correct_phase(input), expected);
    }

    const MEASUREMENT_SHAPE_CASES: TestCases<(&str, bool)> = cases! {
        [
            ("10", true),
            ("0.5", true),
            ("0", true),
            ("<10", true),
            ("≥ 5.5", true),
            ("5-10", true),
            ("5 ~ 10", true),
            ("12.5%", true),
            ("TO100", true),
            ("확인요청", false),
            ("X", false),
        ]
    };

    #[test_casing(11, MEASUREMENT_SHAPE_CASES)]
    #[gtest]
    fn test_is_accepted_measurement(input: &str, expected: bool) {
        expect_eq!(is_accepted_measurement(input), expected);
    }

    #[gtest]
    fn test_identifier_letter() {
        expect_that!(identifier_letter("u"), some(eq('U')));
        expect_that!(identifier_letter(" H- "), some(eq('H')));
        expect_that!(identifier_letter("1"), some(eq('I')));
        expect_that!(identifier_letter(":selected:Q"), some(eq('Q')));
        expect_that!(identifier_letter("0"), none());
        expect_that!(identifier_letter("AB"), none());
        expect_that!(identifier_letter(""), none());
    }
}
