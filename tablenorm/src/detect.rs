//! Outcome values for the ordered detection strategies.
//!
//! Each structural decision (header row, identifier row, column role)
//! records which named strategy produced it and whether that strategy is a
//! genuine detection or a documented fallback default.

use std::fmt::Display;

use serde::Serialize;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Confidence {
    Detected,
    Fallback,
}

/// A strategy in an ordered detection list.
pub trait Strategy: Copy + Display {
    fn confidence(self) -> Confidence;
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Detection<T, S> {
    pub value: T,
    pub strategy: S,
}

impl<T, S: Strategy> Detection<T, S> {
    pub fn new(value: T, strategy: S) -> Self {
        Self { value, strategy }
    }

    pub fn confidence(&self) -> Confidence {
        self.strategy.confidence()
    }

    pub fn is_fallback(&self) -> bool {
        self.confidence() == Confidence::Fallback
    }
}
