pub mod gemini;

pub use gemini::{parse_suggestion, GeminiPredictor};

use async_trait::async_trait;
use luxbet_core::GameConfig;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

pub const DEMO_REASON: &str = "The stars align mysteriously for this number today (Demo Mode).";
pub const FALLBACK_REASON: &str = "Fate has chosen this number randomly.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuggestionSource {
    /// Parsed from the generative model's answer.
    Model,
    /// No credential configured.
    Demo,
    /// The model call failed.
    Fallback,
}

/// A number to pre-fill the player's pick, with a line of justification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub number: u8,
    pub reason: String,
    pub source: SuggestionSource,
}

impl Suggestion {
    pub fn demo(max_number: u8) -> Self {
        Self {
            number: random_number(max_number),
            reason: DEMO_REASON.to_string(),
            source: SuggestionSource::Demo,
        }
    }

    pub fn fallback(max_number: u8) -> Self {
        Self {
            number: random_number(max_number),
            reason: FALLBACK_REASON.to_string(),
            source: SuggestionSource::Fallback,
        }
    }
}

fn random_number(max_number: u8) -> u8 {
    rand::thread_rng().gen_range(1..=max_number.max(1))
}

/// Source of number suggestions. Implementations fail closed: whatever goes
/// wrong internally, the caller receives an in-range number and a reason.
#[async_trait]
pub trait PredictionProvider: Send + Sync {
    async fn request_suggestion(&self) -> Suggestion;
}

/// Offline predictor: a uniform pick after a short artificial delay.
#[derive(Debug, Clone)]
pub struct RandomPredictor {
    delay: Duration,
    max_number: u8,
}

impl RandomPredictor {
    pub fn new(delay: Duration, max_number: u8) -> Self {
        Self { delay, max_number }
    }
}

#[async_trait]
impl PredictionProvider for RandomPredictor {
    async fn request_suggestion(&self) -> Suggestion {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Suggestion::demo(self.max_number)
    }
}

/// Gemini when a client can be built, the offline predictor otherwise.
pub fn provider_from_config(config: &GameConfig) -> Arc<dyn PredictionProvider> {
    match GeminiPredictor::new(config) {
        Ok(predictor) => Arc::new(predictor),
        Err(e) => {
            tracing::warn!("Prediction client unavailable, using demo mode: {}", e);
            Arc::new(RandomPredictor::new(
                config.prediction.demo_delay,
                config.max_number,
            ))
        }
    }
}
