use crate::{LotteryError, PeriodId, Result, ResultLog, Round, SettledResult};
use luxbet_core::GameConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Result of a single one-second tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    Counting { remaining: u32 },
    Settled(SettledResult),
}

/// Owns the active round and the result history; every mutation of either
/// goes through here.
#[derive(Debug)]
pub struct RoundScheduler {
    round_seconds: u32,
    max_number: u8,
    round: Round,
    log: ResultLog,
    rng: StdRng,
}

impl RoundScheduler {
    pub fn new(config: &GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Deterministic draws, for simulations and tests.
    pub fn with_seed(config: &GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &GameConfig, rng: StdRng) -> Self {
        let round_seconds = config.round_seconds.max(1);
        Self {
            round_seconds,
            max_number: config.max_number.max(1),
            round: Round::new(PeriodId(config.initial_period), round_seconds),
            log: ResultLog::new(config.history_capacity),
            rng,
        }
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    pub fn results(&self) -> &ResultLog {
        &self.log
    }

    pub fn max_number(&self) -> u8 {
        self.max_number
    }

    /// Advance the countdown by one second. The value that would reach zero
    /// settles the round instead, so observers only ever see `1..=round_seconds`.
    pub fn tick(&mut self) -> TickOutcome {
        if self.round.time_remaining <= 1 {
            return TickOutcome::Settled(self.settle_round());
        }

        self.round.time_remaining -= 1;
        TickOutcome::Counting {
            remaining: self.round.time_remaining,
        }
    }

    /// Close the current round: draw a winner independent of the player's
    /// pick, log it under the current period and open the next period with a
    /// full countdown and cleared selection.
    pub fn settle_round(&mut self) -> SettledResult {
        let winning_number = self.rng.gen_range(1..=self.max_number);
        let result = SettledResult::new(self.round.period, winning_number);

        self.log.record(result.clone());
        let closed = self.round.period;
        self.round = Round::new(closed.next(), self.round_seconds);

        tracing::info!(
            "Period {} settled, winning number {}; period {} open",
            closed,
            winning_number,
            self.round.period
        );
        result
    }

    pub fn select_number(&mut self, number: u8) -> Result<()> {
        if self.round.bet_locked {
            return Err(LotteryError::BetLocked(self.round.period));
        }

        if number == 0 || number > self.max_number {
            return Err(LotteryError::NumberOutOfRange {
                number,
                max: self.max_number,
            });
        }

        self.round.selected_number = Some(number);
        Ok(())
    }

    pub fn place_bet(&mut self) -> Result<()> {
        if self.round.bet_locked {
            return Err(LotteryError::BetAlreadyPlaced(self.round.period));
        }

        let number = self.round.selected_number.ok_or(LotteryError::NoSelection)?;
        self.round.bet_locked = true;

        tracing::info!("Bet placed on #{} for period {}", number, self.round.period);
        Ok(())
    }

    /// A suggestion requested during `period` may only land in that same,
    /// still unlocked round.
    pub fn accepts_suggestion(&self, period: PeriodId) -> bool {
        self.round.period == period && !self.round.bet_locked
    }
}
