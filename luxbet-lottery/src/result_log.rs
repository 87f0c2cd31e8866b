use crate::PeriodId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one closed round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettledResult {
    pub period: String,
    pub winning_number: u8,
    pub settled_at: DateTime<Utc>,
}

impl SettledResult {
    pub fn new(period: PeriodId, winning_number: u8) -> Self {
        Self {
            period: period.to_string(),
            winning_number,
            settled_at: Utc::now(),
        }
    }
}

/// What the results panel should draw. `Waiting` is distinct from any result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultFeed<'a> {
    Waiting,
    Results(&'a [SettledResult]),
}

/// Newest-first settled results, bounded to `capacity` entries.
#[derive(Debug, Clone)]
pub struct ResultLog {
    entries: Vec<SettledResult>,
    capacity: usize,
}

impl ResultLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Vec::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Prepend, then drop the oldest entries beyond capacity.
    pub fn record(&mut self, result: SettledResult) {
        self.entries.insert(0, result);
        self.entries.truncate(self.capacity);
    }

    pub fn all(&self) -> &[SettledResult] {
        &self.entries
    }

    pub fn feed(&self) -> ResultFeed<'_> {
        if self.entries.is_empty() {
            ResultFeed::Waiting
        } else {
            ResultFeed::Results(&self.entries)
        }
    }

    pub fn latest(&self) -> Option<&SettledResult> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
