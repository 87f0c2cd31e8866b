use serde::{Deserialize, Serialize};
use std::fmt;

/// Round identifier, shown as a fixed-width 12 digit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PeriodId(pub u64);

impl PeriodId {
    pub fn next(self) -> Self {
        PeriodId(self.0.saturating_add(1))
    }
}

impl fmt::Display for PeriodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:012}", self.0)
    }
}

/// Where the active round sits between two settlements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Counting down, numbers can still be picked.
    Open,
    /// Bet placed, selection frozen until settlement.
    Locked,
}

/// The single active round. Only `RoundScheduler` mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    pub(crate) period: PeriodId,
    pub(crate) time_remaining: u32,
    pub(crate) selected_number: Option<u8>,
    pub(crate) bet_locked: bool,
}

impl Round {
    pub(crate) fn new(period: PeriodId, round_seconds: u32) -> Self {
        Self {
            period,
            time_remaining: round_seconds,
            selected_number: None,
            bet_locked: false,
        }
    }

    pub fn period(&self) -> PeriodId {
        self.period
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn selected_number(&self) -> Option<u8> {
        self.selected_number
    }

    pub fn bet_locked(&self) -> bool {
        self.bet_locked
    }

    pub fn phase(&self) -> RoundPhase {
        if self.bet_locked {
            RoundPhase::Locked
        } else {
            RoundPhase::Open
        }
    }

    /// `MM:SS`, e.g. `00:07`.
    pub fn countdown_label(&self) -> String {
        format!(
            "{:02}:{:02}",
            self.time_remaining / 60,
            self.time_remaining % 60
        )
    }

    pub fn is_urgent(&self, threshold_seconds: u32) -> bool {
        self.time_remaining < threshold_seconds
    }
}
