use super::render;
use anyhow::Result;
use luxbet_core::GameConfig;
use luxbet_lottery::{RoundScheduler, TickOutcome};

pub fn run_simulate(config: &GameConfig, rounds: u32, seed: Option<u64>) -> Result<()> {
    config.validate()?;

    let mut scheduler = match seed {
        Some(seed) => RoundScheduler::with_seed(config, seed),
        None => RoundScheduler::new(config),
    };

    let ticks = u64::from(rounds) * u64::from(config.round_seconds);
    let mut settled = 0u32;
    for _ in 0..ticks {
        if let TickOutcome::Settled(result) = scheduler.tick() {
            settled += 1;
            tracing::debug!("Simulated period {} -> #{}", result.period, result.winning_number);
        }
    }

    let round = scheduler.round();
    println!("Simulated {} ticks, {} rounds settled", ticks, settled);
    println!(
        "Current period {} with {} remaining",
        round.period(),
        round.countdown_label()
    );
    println!();
    println!(
        "Previous results (last {}):",
        scheduler.results().capacity()
    );
    println!("{}", render::results(scheduler.results().feed()));

    Ok(())
}
