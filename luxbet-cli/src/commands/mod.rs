mod play;
mod render;
mod simulate;

pub use play::run_play;
pub use simulate::run_simulate;

use anyhow::Result;
use luxbet_core::GameConfig;
use luxbet_lottery::{provider_from_config, SuggestionSource};

pub async fn run_suggest(config: &GameConfig) -> Result<()> {
    config.validate()?;

    if config.prediction.has_credential() {
        println!("Asking {} for a lucky number...", config.prediction.model);
    } else {
        println!("No API key configured, using demo mode...");
    }

    let provider = provider_from_config(config);
    let suggestion = provider.request_suggestion().await;

    println!("Lucky number: #{}", suggestion.number);
    println!("Reason: {}", suggestion.reason);
    if suggestion.source == SuggestionSource::Fallback {
        println!("(the model could not be reached, picked at random)");
    }

    Ok(())
}

pub fn show_config(config: &GameConfig) -> Result<()> {
    config.validate()?;

    println!("{}", serde_json::to_string_pretty(config)?);
    println!(
        "API key: {}",
        if config.prediction.has_credential() {
            "configured"
        } else {
            "not configured (demo mode)"
        }
    );
    Ok(())
}
