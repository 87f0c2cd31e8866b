//! Pick-a-number lottery core for LuxBet Royale
//!
//! One round runs at a time. A one-second ticker counts it down and, at the
//! tick that would reach zero, settles it: a winning number is drawn, logged
//! in a short newest-first history, and the next period opens with the
//! player's pick cleared. A prediction provider may pre-fill the pick but
//! never touches settlement.
//!
//! This is a demo: draws are not fair or verifiable and no money moves.

pub mod error;
pub mod prediction;
pub mod result_log;
pub mod round;
pub mod scheduler;
pub mod session;
pub mod ticker;

pub use error::{LotteryError, Result};
pub use prediction::{
    provider_from_config, GeminiPredictor, PredictionProvider, RandomPredictor, Suggestion,
    SuggestionSource,
};
pub use result_log::{ResultFeed, ResultLog, SettledResult};
pub use round::{PeriodId, Round, RoundPhase};
pub use scheduler::{RoundScheduler, TickOutcome};
pub use session::{GameEvent, GameSession, GameSnapshot, SuggestionOutcome};
pub use ticker::RoundTicker;

use luxbet_core::{GameConfig, Player};

/// Enter the game screen with the provider the configuration calls for
pub fn enter_game(config: GameConfig, player: Player) -> Result<GameSession> {
    let provider = provider_from_config(&config);
    GameSession::enter(config, player, provider)
}
