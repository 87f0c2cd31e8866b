use crate::error::{LuxbetError, Result};
use crate::types::Rupees;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
/// Largest period id that still renders as 12 digits.
pub const MAX_PERIOD: u64 = 999_999_999_999;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Seconds in one round; the countdown starts here.
    pub round_seconds: u32,
    pub tick_interval: Duration,
    /// Highest pickable number; the range is always `1..=max_number`.
    pub max_number: u8,
    pub history_capacity: usize,
    pub initial_period: u64,
    /// Countdown values below this are rendered as urgent.
    pub urgent_seconds: u32,
    pub bet: BetTerms,
    pub prediction: PredictionConfig,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BetTerms {
    pub stake: Rupees,
    pub multiplier: u64,
}

impl BetTerms {
    /// Display-only payout for a winning ticket. Never credited anywhere.
    pub fn potential_win(&self) -> Rupees {
        Rupees(self.stake.0.saturating_mul(self.multiplier))
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct PredictionConfig {
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub endpoint: String,
    pub model: String,
    pub request_timeout: Duration,
    /// Artificial latency of the offline demo predictor.
    pub demo_delay: Duration,
}

impl PredictionConfig {
    pub fn has_credential(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.trim().is_empty())
    }
}

impl std::fmt::Debug for PredictionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredictionConfig")
            .field("has_credential", &self.has_credential())
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("request_timeout", &self.request_timeout)
            .field("demo_delay", &self.demo_delay)
            .finish()
    }
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_GEMINI_ENDPOINT.to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            request_timeout: Duration::from_secs(10),
            demo_delay: Duration::from_millis(1500),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            round_seconds: 60,
            tick_interval: Duration::from_secs(1),
            max_number: 50,
            history_capacity: 5,
            initial_period: 202310240001,
            urgent_seconds: 10,
            bet: BetTerms {
                stake: Rupees(50),
                multiplier: 33,
            },
            prediction: PredictionConfig::default(),
        }
    }
}

impl GameConfig {
    /// Defaults overridden by `LUXBET_*` variables, API key from
    /// `GEMINI_API_KEY` or `API_KEY`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let read = |key: &str| lookup(key).filter(|raw| !raw.trim().is_empty());

        let api_key = read("GEMINI_API_KEY").or_else(|| read("API_KEY"));

        Self {
            round_seconds: parse_or(read("LUXBET_ROUND_SECONDS"), defaults.round_seconds),
            tick_interval: Duration::from_millis(parse_or(
                read("LUXBET_TICK_MS"),
                defaults.tick_interval.as_millis() as u64,
            )),
            max_number: parse_or(read("LUXBET_MAX_NUMBER"), defaults.max_number),
            history_capacity: parse_or(
                read("LUXBET_HISTORY_CAPACITY"),
                defaults.history_capacity,
            ),
            initial_period: parse_or(read("LUXBET_INITIAL_PERIOD"), defaults.initial_period),
            urgent_seconds: parse_or(read("LUXBET_URGENT_SECONDS"), defaults.urgent_seconds),
            bet: BetTerms {
                stake: Rupees(parse_or(read("LUXBET_STAKE"), defaults.bet.stake.0)),
                multiplier: parse_or(read("LUXBET_MULTIPLIER"), defaults.bet.multiplier),
            },
            prediction: PredictionConfig {
                api_key,
                endpoint: read("LUXBET_GEMINI_ENDPOINT").unwrap_or(defaults.prediction.endpoint),
                model: read("LUXBET_GEMINI_MODEL").unwrap_or(defaults.prediction.model),
                request_timeout: Duration::from_millis(parse_or(
                    read("LUXBET_PREDICTION_TIMEOUT_MS"),
                    defaults.prediction.request_timeout.as_millis() as u64,
                )),
                demo_delay: Duration::from_millis(parse_or(
                    read("LUXBET_DEMO_DELAY_MS"),
                    defaults.prediction.demo_delay.as_millis() as u64,
                )),
            },
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.prediction.api_key = Some(api_key.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.round_seconds == 0 {
            return Err(LuxbetError::config("Round duration must be at least 1 second"));
        }

        if self.tick_interval.is_zero() {
            return Err(LuxbetError::config("Tick interval must be greater than 0"));
        }

        if self.max_number == 0 {
            return Err(LuxbetError::config("Number range must contain at least 1"));
        }

        if self.initial_period == 0 || self.initial_period > MAX_PERIOD {
            return Err(LuxbetError::config(format!(
                "Initial period must be within 1..={}",
                MAX_PERIOD
            )));
        }

        if self.history_capacity == 0 {
            return Err(LuxbetError::config("History capacity must be greater than 0"));
        }

        if self.bet.stake.0 == 0 || self.bet.multiplier == 0 {
            return Err(LuxbetError::config("Stake and multiplier must be greater than 0"));
        }

        if self.prediction.endpoint.is_empty() {
            return Err(LuxbetError::config("Prediction endpoint cannot be empty"));
        }

        if self.prediction.model.is_empty() {
            return Err(LuxbetError::config("Prediction model cannot be empty"));
        }

        Ok(())
    }
}

fn parse_or<T: FromStr>(raw: Option<String>, fallback: T) -> T {
    raw.and_then(|raw| raw.trim().parse::<T>().ok())
        .unwrap_or(fallback)
}
