//! Keyword vocabularies and scan limits that steer structure inference.
//!
//! Every field has a default, so an empty YAML document (or no document at
//! all) yields the stock configuration.

use std::io::Read;

use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
#[error("invalid extraction configuration: {0}")]
pub struct ConfigError(#[from] serde_yaml_ng::Error);

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExtractionConfig {
    pub keywords: Keywords,
    pub limits: ScanLimits,
}

impl ExtractionConfig {
    pub fn from_yaml_reader<R: Read>(reader: R) -> Result<Self, ConfigError> {
        Ok(serde_yaml_ng::from_reader(reader)?)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }
}

/// Header keyword groups, matched as case-insensitive substrings.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Keywords {
    pub phase: Vec<String>,
    pub code: Vec<String>,
    pub material: Vec<String>,
    /// Extra keywords that identify the name column, beyond `material`.
    pub name_extra: Vec<String>,
}

impl Default for Keywords {
    fn default() -> Self {
        fn strings(words: &[&str]) -> Vec<String> {
            words.iter().map(|w| w.to_string()).collect()
        }
        Self {
            phase: strings(&["PHASE", "상", "STAGE"]),
            code: strings(&["CODE", "코드", "원료코드"]),
            material: strings(&["MATERIAL", "원료", "RAW", "원료명"]),
            name_extra: strings(&["NAME"]),
        }
    }
}

fn contains_any(words: &[String], text: &str) -> bool {
    let upper = text.to_uppercase();
    words.iter().any(|w| upper.contains(&w.to_uppercase()))
}

impl Keywords {
    pub fn is_phase(&self, text: &str) -> bool {
        contains_any(&self.phase, text)
    }

    pub fn is_code(&self, text: &str) -> bool {
        contains_any(&self.code, text)
    }

    pub fn is_material(&self, text: &str) -> bool {
        contains_any(&self.material, text)
    }

    pub fn is_name(&self, text: &str) -> bool {
        self.is_material(text) || contains_any(&self.name_extra, text)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScanLimits {
    /// Number of leading rows searched for the header.
    pub header_rows: usize,
    /// Single-letter cells required to accept an identifier row.
    pub min_identifier_letters: usize,
    /// Rows after the header inspected for column data density.
    pub data_window_rows: usize,
    /// Filled rows needed before a column without an identifier counts as a
    /// measurement column.
    pub min_data_rows: usize,
    /// Longer identifier-row tokens are discarded as noise.
    pub max_identifier_len: usize,
}

impl Default for ScanLimits {
    fn default() -> Self {
        Self {
            header_rows: 15,
            min_identifier_letters: 3,
            data_window_rows: 20,
            min_data_rows: 5,
            max_identifier_len: 5,
        }
    }
}
