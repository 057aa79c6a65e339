//! Sampling dates of a preservation test.

use chrono::{Datelike, Days, NaiveDate};
use lazy_regex::regex_captures;
use serde::Serialize;

use super::cfu::Day;

/// The dates of day 0, 7, 14 and 28, each as `MM/DD`.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct TestDates(pub [String; 4]);

impl TestDates {
    pub fn get(&self, day: Day) -> &str {
        let index = Day::ALL.iter().position(|d| *d == day).unwrap_or(0);
        &self.0[index]
    }

    /// Reads the dates cell of a table.
    ///
    /// Eight or more two-digit tokens are read as four month/day pairs.
    /// Otherwise the cell is read as the day-0 date and the later dates are
    /// computed from it.
    pub fn parse(text: &str) -> Option<TestDates> {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        if tokens.len() >= 8 && tokens.iter().all(|t| is_two_digits(t)) {
            let dates = std::array::from_fn(|i| format!("{}/{}", tokens[2 * i], tokens[2 * i + 1]));
            return Some(TestDates(dates));
        }

        let start = parse_start_date(text)?;
        let mut dates: [String; 4] = Default::default();
        for (slot, day) in dates.iter_mut().zip(Day::ALL) {
            let date = start.checked_add_days(Days::new(day.offset()))?;
            *slot = format!("{:02}/{:02}", date.month(), date.day());
        }
        Some(TestDates(dates))
    }
}

fn is_two_digits(token: &str) -> bool {
    token.len() == 2 && token.bytes().all(|b| b.is_ascii_digit())
}

/// Year used when a date has only a month and a day.
const PLACEHOLDER_YEAR: i32 = 1900;

/// Reads `M/D`, `M-D`, `M.D`, `M D` or `M월 D일`. Month-first is tried
/// before day-first.
fn parse_start_date(text: &str) -> Option<NaiveDate> {
    let (_, a, b) = regex_captures!(r"^(\d{1,2})\s*(?:[ \-/.]|월)\s*(\d{1,2})\s*일?$", text.trim())?;
    let a: u32 = a.parse().ok()?;
    let b: u32 = b.parse().ok()?;
    NaiveDate::from_ymd_opt(PLACEHOLDER_YEAR, a, b)
        .or_else(|| NaiveDate::from_ymd_opt(PLACEHOLDER_YEAR, b, a))
}
