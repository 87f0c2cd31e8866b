use thiserror::Error;

pub type Result<T> = std::result::Result<T, LotteryError>;

#[derive(Error, Debug)]
pub enum LotteryError {
    #[error("Core error: {0}")]
    Core(#[from] luxbet_core::LuxbetError),

    #[error("Number {number} outside 1..={max}")]
    NumberOutOfRange { number: u8, max: u8 },

    #[error("Period {0} is locked, selection cannot change")]
    BetLocked(crate::PeriodId),

    #[error("Bet already placed for period {0}")]
    BetAlreadyPlaced(crate::PeriodId),

    #[error("No number selected")]
    NoSelection,

    #[error("Prediction error: {0}")]
    Prediction(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LotteryError {
    pub fn prediction(msg: impl Into<String>) -> Self {
        Self::Prediction(msg.into())
    }
}
