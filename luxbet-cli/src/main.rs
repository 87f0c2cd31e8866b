mod commands;

use clap::{Parser, Subcommand};
use luxbet_core::GameConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "luxbet")]
#[command(about = "LuxBet Royale - pick-a-number lottery demo")]
#[command(version)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Gemini API key (overrides GEMINI_API_KEY / API_KEY)
    #[arg(long, global = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register, then play rounds interactively
    Play {
        /// Use the demo login instead of the registration form
        #[arg(long)]
        skip_register: bool,
    },
    /// Ask the predictor for one lucky number
    Suggest,
    /// Run rounds offline and print the result history
    Simulate {
        /// Number of full rounds to run
        #[arg(short, long, default_value_t = 1)]
        rounds: u32,
        /// Seed for reproducible draws
        #[arg(short, long)]
        seed: Option<u64>,
    },
    /// Show the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "luxbet_cli={},luxbet_lottery={},luxbet_core={}",
            log_level, log_level, log_level
        )))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = GameConfig::from_env();
    if let Some(api_key) = cli.api_key {
        config = config.with_api_key(api_key);
    }

    // Execute command
    let result = match cli.command {
        Commands::Play { skip_register } => commands::run_play(config, skip_register).await,
        Commands::Suggest => commands::run_suggest(&config).await,
        Commands::Simulate { rounds, seed } => commands::run_simulate(&config, rounds, seed),
        Commands::Config => commands::show_config(&config),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
