use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod catalog;
mod commands;
mod config;

use commands::{ConfigCommand, ConvertCommand, DiffCommand, UpdateCommand};
use config::Config;

#[derive(Parser)]
#[command(name = "lahella")]
#[command(version)]
#[command(about = "Keep a YAML activity catalog in sync with lahella.fi", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert between catalog records and API payloads
    Convert(ConvertCommand),

    /// Compare the catalog with saved server activities
    Diff(DiffCommand),

    /// Build an update payload for one activity
    Update(UpdateCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lahella=info,lahella_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Save config path for init command
    let cli_config_path = cli.config.clone();

    let config = Config::load(cli.config)?;

    match &cli.command {
        Some(Commands::Convert(cmd)) => {
            cmd.run(&config)?;
        }
        Some(Commands::Diff(cmd)) => {
            cmd.run(&config)?;
        }
        Some(Commands::Update(cmd)) => {
            cmd.run(&config)?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(&config, cli_config_path)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
