//! State carried across the rows of one page and across pages of one
//! document.

use std::collections::VecDeque;

use crate::preservation::{dates::TestDates, grouping::GroupingKey};

/// Owns the grouping key that applies to the current row, the keys queued
/// for rows whose own label was lost, and the last dates read.
///
/// Use one coordinator per document and call [PageCoordinator::reset_page]
/// before each page.
#[derive(Debug, Default)]
pub struct PageCoordinator {
    current: GroupingKey,
    queue: VecDeque<GroupingKey>,
    ecoli_rows: usize,
    last_dates: Option<TestDates>,
}

impl PageCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the first key current and queues the rest. An empty list keeps
    /// the current key.
    pub fn apply_label(&mut self, keys: Vec<GroupingKey>) {
        let mut keys = keys.into_iter();
        let Some(first) = keys.next() else {
            log::debug!("label yielded no grouping key, keeping {:?}", self.current);
            return;
        };
        self.current = first;
        let before = self.queue.len();
        self.queue.extend(keys);
        if self.queue.len() > before {
            log::info!(
                "queued {} grouping keys for later rows",
                self.queue.len() - before
            );
        }
    }

    /// Counts an E.coli row and returns how many have been seen on this page.
    pub fn count_ecoli(&mut self) -> usize {
        self.ecoli_rows += 1;
        self.ecoli_rows
    }

    /// Makes the next queued key current. Returns false when the queue is
    /// empty.
    pub fn take_fallback(&mut self) -> bool {
        match self.queue.pop_front() {
            Some(key) => {
                log::info!("using queued grouping key {key:?}");
                self.current = key;
                true
            }
            None => false,
        }
    }

    pub fn current_key(&self) -> &GroupingKey {
        &self.current
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Remembers freshly read dates, or falls back to the last ones read.
    pub fn resolve_dates(&mut self, read: Option<TestDates>) -> Option<TestDates> {
        match read {
            Some(dates) => {
                self.last_dates = Some(dates.clone());
                Some(dates)
            }
            None => {
                if self.last_dates.is_some() {
                    log::info!("dates unreadable, reusing {:?}", self.last_dates);
                } else {
                    log::warn!("dates unreadable and none known");
                }
                self.last_dates.clone()
            }
        }
    }

    /// Clears everything but the last dates.
    pub fn reset_page(&mut self) {
        self.current = GroupingKey::default();
        self.queue.clear();
        self.ecoli_rows = 0;
    }

    pub fn reset_document(&mut self) {
        self.reset_page();
        self.last_dates = None;
    }
}
