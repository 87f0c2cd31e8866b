use super::render;
use anyhow::{Context, Result};
use dialoguer::{Confirm, Input, Password};
use luxbet_core::{GameConfig, Navigator, Player, RegistrationForm, Screen};
use luxbet_lottery::{GameEvent, GameSession, SuggestionOutcome};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::broadcast::error::RecvError;

type StdinLines = Lines<BufReader<Stdin>>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum GameCommand {
    Select(u8),
    Bet,
    Ai,
    Status,
    Results,
    Back,
    Quit,
    Help,
    Unknown(String),
}

fn parse_command(line: &str) -> Option<GameCommand> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    if let Ok(number) = line.trim_start_matches('#').parse::<u8>() {
        return Some(GameCommand::Select(number));
    }

    let command = match line.to_ascii_lowercase().as_str() {
        "bet" | "b" => GameCommand::Bet,
        "ai" | "a" => GameCommand::Ai,
        "status" | "s" => GameCommand::Status,
        "results" | "r" => GameCommand::Results,
        "back" | "home" => GameCommand::Back,
        "quit" | "q" | "exit" => GameCommand::Quit,
        "help" | "h" | "?" => GameCommand::Help,
        _ => GameCommand::Unknown(line.to_string()),
    };
    Some(command)
}

enum GameExit {
    Home,
    Quit,
}

pub async fn run_play(config: GameConfig, skip_register: bool) -> Result<()> {
    config.validate()?;

    let player = Player::demo();
    let mut navigator = Navigator::default();

    if skip_register {
        navigator.login()?;
    } else {
        register(&mut navigator).await?;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        match navigator.current() {
            Screen::Register => {
                navigator.login()?;
            }
            Screen::Home => {
                println!();
                println!("{}", render::home(&player, &config));
                println!("Type 'play' to start, or 'quit' to exit.");

                let Some(line) = lines.next_line().await.context("Failed to read input")? else {
                    return Ok(());
                };
                match line.trim().to_ascii_lowercase().as_str() {
                    "play" | "p" | "game" => {
                        navigator.enter_game()?;
                    }
                    "quit" | "q" | "exit" => return Ok(()),
                    _ => println!("Unknown option"),
                }
            }
            Screen::Game => match run_game(&config, &player, &mut lines).await? {
                GameExit::Home => {
                    navigator.return_home()?;
                }
                GameExit::Quit => return Ok(()),
            },
        }
    }
}

async fn register(navigator: &mut Navigator) -> Result<()> {
    println!("LuxBet Royale - create your account");

    loop {
        let form = prompt_registration()?;
        match navigator.register(&form).await {
            Ok(_) => {
                println!("Registration complete. Welcome!");
                return Ok(());
            }
            Err(luxbet_core::LuxbetError::Registration(reason)) => {
                println!("{}", reason);
            }
            Err(e) => return Err(e.into()),
        }
    }
}

fn prompt_registration() -> luxbet_core::Result<RegistrationForm> {
    let phone: String = Input::new()
        .with_prompt(format!("Phone Number ({})", luxbet_core::navigation::COUNTRY_CODE))
        .interact_text()?;

    let verification_code: String = Input::new()
        .with_prompt("Verification Code")
        .allow_empty(true)
        .interact_text()?;

    let password = Password::new().with_prompt("Set Password").interact()?;
    let confirm_password = Password::new().with_prompt("Confirm Password").interact()?;

    let invite_code: String = Input::new()
        .with_prompt("Invite Code (Optional)")
        .allow_empty(true)
        .interact_text()?;

    let accepted_terms = Confirm::new()
        .with_prompt("I have read and agree to the Privacy Agreement")
        .default(true)
        .interact()?;

    Ok(RegistrationForm {
        phone,
        verification_code,
        password,
        confirm_password,
        invite_code: Some(invite_code).filter(|code| !code.trim().is_empty()),
        accepted_terms,
    })
}

async fn run_game(config: &GameConfig, player: &Player, lines: &mut StdinLines) -> Result<GameExit> {
    let session = Arc::new(luxbet_lottery::enter_game(config.clone(), player.clone())?);
    let renderer = tokio::spawn(render_events(session.subscribe(), config.urgent_seconds));

    println!();
    println!("{}", render::number_grid(config.max_number, None));
    println!("{}", render::game_status(&session.snapshot()));
    print_help();

    let exit = loop {
        let Some(line) = lines.next_line().await.context("Failed to read command")? else {
            break GameExit::Quit;
        };
        let Some(command) = parse_command(&line) else {
            continue;
        };

        match command {
            GameCommand::Select(number) => {
                if session.select_number(number) {
                    println!("{}", render::number_grid(config.max_number, Some(number)));
                    println!("{}", render::game_status(&session.snapshot()));
                } else if session.snapshot().bet_locked {
                    println!("Bet already placed, wait for the next period");
                } else {
                    println!("Pick a number between 1 and {}", config.max_number);
                }
            }
            GameCommand::Bet => {
                if !session.place_bet() {
                    println!("Select a number first (or wait for the next period)");
                }
            }
            GameCommand::Ai => {
                let session = session.clone();
                tokio::spawn(async move {
                    let outcome = session.request_suggestion().await;
                    if let Some(message) = suggestion_message(&session, &outcome) {
                        println!("{}", message);
                    }
                });
            }
            GameCommand::Status => {
                let snapshot = session.snapshot();
                println!("{}", render::number_grid(config.max_number, snapshot.selected_number));
                println!("{}", render::game_status(&snapshot));
            }
            GameCommand::Results => {
                println!("{}", render::results(session.snapshot().feed()));
            }
            GameCommand::Back => break GameExit::Home,
            GameCommand::Quit => break GameExit::Quit,
            GameCommand::Help => print_help(),
            GameCommand::Unknown(input) => println!("Unknown command '{}', type 'help'", input),
        }
    };

    session.leave();
    renderer.abort();
    Ok(exit)
}

async fn render_events(
    mut events: tokio::sync::broadcast::Receiver<GameEvent>,
    urgent_seconds: u32,
) {
    loop {
        match events.recv().await {
            Ok(GameEvent::Settled(result)) => {
                println!(
                    "Period {} closed - winning number #{}",
                    result.period, result.winning_number
                );
            }
            Ok(GameEvent::Tick { period, remaining }) => {
                if remaining % 15 == 0 || remaining == urgent_seconds {
                    println!("Period {} - {}s left", period, remaining);
                }
            }
            Ok(GameEvent::BetPlaced { number, .. }) => {
                println!("Bet placed on #{} - good luck!", number);
            }
            Ok(GameEvent::SuggestionStarted { .. }) => println!("Asking the AI for a number..."),
            Ok(_) => {}
            Err(RecvError::Lagged(skipped)) => {
                tracing::debug!("Renderer skipped {} events", skipped);
            }
            Err(RecvError::Closed) => break,
        }
    }
}

/// Nothing is shown once the player has left the session the request came from.
fn suggestion_message(session: &GameSession, outcome: &SuggestionOutcome) -> Option<String> {
    if !session.is_active() {
        return None;
    }

    let message = match outcome {
        SuggestionOutcome::Applied(suggestion) => {
            format!("AI chose #{}: {}", suggestion.number, suggestion.reason)
        }
        SuggestionOutcome::Discarded(suggestion) => {
            format!("AI pick #{} arrived too late, ignored", suggestion.number)
        }
        SuggestionOutcome::Busy => "AI is still thinking...".to_string(),
        SuggestionOutcome::Locked => "Bet already placed".to_string(),
    };
    Some(message)
}

fn print_help() {
    println!("Commands: <1-50> pick | bet | ai | status | results | back | quit");
}
