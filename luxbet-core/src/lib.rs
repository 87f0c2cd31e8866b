//! LuxBet Royale core - shared vocabulary for the lottery mockup
//!
//! Configuration, the read-only player context handed to the game, and the
//! register/home/game screen routing of the hosting shell. Nothing here is
//! persisted; every session starts from defaults.

pub mod config;
pub mod error;
pub mod navigation;
pub mod types;

pub use config::{BetTerms, GameConfig, PredictionConfig};
pub use error::{LuxbetError, Result};
pub use navigation::{Navigator, RegistrationForm, Screen};
pub use types::{Player, Rupees};
