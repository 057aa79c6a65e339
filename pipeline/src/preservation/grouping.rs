//! Extraction of test-number and prescription-number pairs from the free-text
//! grouping labels of a preservation-test table.

use lazy_regex::{Lazy, Regex, regex, regex_replace_all};
use serde::Serialize;

/// The test number and prescription number that identify a group of strain
/// rows. Either may be missing when the label only yielded the other.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq, Serialize)]
pub struct GroupingKey {
    pub test_number: Option<String>,
    pub prescription_number: Option<String>,
}

impl GroupingKey {
    pub fn new(test_number: Option<&str>, prescription_number: Option<&str>) -> Self {
        Self {
            test_number: test_number.map(str::to_string),
            prescription_number: prescription_number.map(str::to_string),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.test_number.is_none() && self.prescription_number.is_none()
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct Found {
    start: usize,
    end: usize,
    text: String,
}

impl Found {
    fn overlaps(&self, other: &Found) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Keeps matches not overlapping an earlier (higher priority) one, in text
/// order, with repeated numbers removed.
fn resolve_overlaps(candidates: Vec<Found>) -> Vec<String> {
    let mut accepted: Vec<Found> = Vec::new();
    for candidate in candidates {
        if accepted.iter().all(|a| !a.overlaps(&candidate)) {
            accepted.push(candidate);
        }
    }
    accepted.sort_by_key(|f| f.start);

    let mut numbers: Vec<String> = Vec::new();
    for found in accepted {
        if !numbers.contains(&found.text) {
            numbers.push(found.text);
        }
    }
    numbers
}

fn find_all(pattern: &Regex, text: &str, out: &mut Vec<Found>) {
    out.extend(pattern.find_iter(text).map(|m| Found {
        start: m.start(),
        end: m.end(),
        text: m.as_str().to_string(),
    }));
}

/// Uppercases, reads `!` as `I`, joins `-` to what follows it and collapses
/// whitespace.
fn prepare_label(label: &str) -> String {
    let label = label.to_uppercase().replace('!', "I");
    let label = regex_replace_all!(r"-\s+", &label, "-");
    regex_replace_all!(r"\s+", &label, " ").trim().to_string()
}

/// Test numbers in label order: `YYLddIdd` or `YYLddIddd`, where OCR may
/// have read the `I` as `1` or split the code with a space.
pub fn test_numbers(label: &str) -> Vec<String> {
    let label = prepare_label(label);
    let mut candidates = Vec::new();

    find_all(regex!(r"\b\d{2}[A-L]\d{2}I\d{2,3}\b"), &label, &mut candidates);

    for m in regex!(r"\b\d{2}[A-L]\d{2}1\d{2,3}\b").find_iter(&label) {
        let raw = m.as_str();
        let corrected = format!("{}I{}", &raw[..5], &raw[6..]);
        log::info!("test number {raw:?} read as {corrected:?}");
        candidates.push(Found {
            start: m.start(),
            end: m.end(),
            text: corrected,
        });
    }

    for caps in regex!(r"(\d{2})([A-L])(\d)\s+(\d)(\d{2,3})").captures_iter(&label) {
        let (Some(whole), Some(year), Some(letter), Some(d1), Some(d2), Some(tail)) = (
            caps.get(0),
            caps.get(1),
            caps.get(2),
            caps.get(3),
            caps.get(4),
            caps.get(5),
        ) else {
            continue;
        };
        let tail = tail.as_str();
        let assembled = format!(
            "{}{}{}{}I{}",
            year.as_str(),
            letter.as_str(),
            d1.as_str(),
            d2.as_str(),
            &tail[..2]
        );
        log::info!("test number {:?} reassembled as {assembled:?}", whole.as_str());
        candidates.push(Found {
            start: whole.start(),
            end: whole.end(),
            text: assembled,
        });
    }

    resolve_overlaps(candidates)
}

/// Prescription-number shapes in priority order.
fn prescription_patterns() -> [&'static Lazy<Regex>; 15] {
    [
        regex!(r"\b[A-Z]{2,4}\d{4,5}[A-Z]?-[A-Z]{1,4}\d?\b"),
        regex!(r"\b[A-Z]{3}\d{5}-[A-Z]{2,4}\b"),
        regex!(r"\bM-[A-Z]{2,4}\d{4,5}-[A-Z]{1,4}\d?\b"),
        regex!(r"\b[A-Z]{2,4}\d{4,5}[A-Z]-[A-Z]{1,4}[A-Z]?\b"),
        regex!(r"\b[A-Z]{3,6}\d{2,4}-[A-Z]{1,4}\b"),
        regex!(r"\b[A-Z]{2,4}\d{3,6}-[A-Z]{1,5}\b"),
        regex!(r"\b[A-Z]{2,5}\d{4}-[A-Z]{1,3}\d{0,2}\b"),
        regex!(r"\b[A-Z]{1,3}\d{4,5}-[A-Z]{2,4}[A-Z]?\b"),
        regex!(r"\b[A-Z]{2,4}\d{4}-[A-Z]\d[A-Z]{1,3}\b"),
        regex!(r"\b[A-Z]{2,4}\d{3,4}[A-Z]?-[A-Z]{1,4}\d*\b"),
        regex!(r"\b[A-Z]{2,4}\d{4,5}[A-Z]?-[A-Z]{1,5}\d?\b"),
        regex!(r"\b[A-Z]{2,4}\d{4,5}[A-Z]?-\s*[A-Z]{1,5}\d?\b"),
        regex!(r"\b[A-Z]{2,4}\d{4,5}[A-Z]?-[A-Z]{1,5}\d[A-Z]+\b"),
        regex!(r"\b[A-Z]{2,4}\d{3,5}-[A-Z]{1,4}\d{1,2}\b"),
        regex!(r"\b[A-Z]{2,5}\d{3,5}-[A-Z]{2,5}[A-Z\d]*\b"),
    ]
}

/// Prescription numbers in label order, such as `GB1919-ZMB` or
/// `M-AB12345-CD`.
pub fn prescription_numbers(label: &str) -> Vec<String> {
    let label = prepare_label(label);
    let mut candidates = Vec::new();
    for pattern in prescription_patterns() {
        find_all(pattern, &label, &mut candidates);
    }
    resolve_overlaps(candidates)
}

/// Pairs the numbers of a label by position. A surplus on either side pairs
/// with a missing partner.
pub fn grouping_keys(label: &str) -> Vec<GroupingKey> {
    let tests = test_numbers(label);
    let prescriptions = prescription_numbers(label);
    let keys: Vec<GroupingKey> = (0..tests.len().max(prescriptions.len()))
        .map(|i| {
            GroupingKey::new(
                tests.get(i).map(String::as_str),
                prescriptions.get(i).map(String::as_str),
            )
        })
        .collect();
    if keys.len() > 1 {
        log::info!("label {label:?} holds {} grouping keys", keys.len());
    }
    keys
}
