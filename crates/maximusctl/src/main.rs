//! Maximusctl - play MAXIMUS learning modules from the terminal.
//!
//! Mounts one module with a fresh V-Bucks ledger and drives it from stdin.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use maximus_common::{logging, DifficultyOracle, HttpLlmClient, MaximusConfig};
use maximus_shared::{CurrencyLedger, ModuleKind, APP_NAME};
use maximusctl::modules::{
    CodingStrategy, DrawingStrategy, KindnessStrategy, MathStrategy, ReadingStrategy,
    TypingStrategy,
};
use maximusctl::shell;
use maximusctl::SessionController;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::info;

#[derive(Parser)]
#[command(name = "maximusctl")]
#[command(about = "MAXIMUS - learning games that earn V-Bucks", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (overrides $MAXIMUS_CONFIG and the default locations)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Disable the LLM; every module uses its local fallback
    #[arg(long, global = true)]
    offline: bool,

    /// Debug logging (overridden by $MAXIMUS_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the learning modules
    Modules,

    /// Play one module
    Play {
        /// Module name or route (math, reading, typing, draw, coding, being-nice)
        module: String,
    },

    /// Show the effective configuration
    Config {
        /// Write it to the user config file
        #[arg(long)]
        save: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = MaximusConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Modules => list_modules(),
        Commands::Play { module } => {
            let kind = match module.parse::<ModuleKind>() {
                Ok(kind) => kind,
                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(e.code());
                }
            };
            play(kind, &config, cli.offline).await
        }
        Commands::Config { save } => show_config(&config, save),
    }
}

fn list_modules() -> Result<()> {
    println!("{} modules:", APP_NAME);
    for kind in ModuleKind::ALL {
        let tag = if kind.uses_oracle() { " (AI)" } else { "" };
        println!(
            "  {:<12} {:<20} {}{}",
            kind.slug(),
            kind.route(),
            kind.description(),
            tag
        );
    }
    Ok(())
}

fn show_config(config: &MaximusConfig, save: bool) -> Result<()> {
    print!("{}", config.to_toml()?);
    if save {
        config.save()?;
        println!(
            "Saved to {}",
            MaximusConfig::user_config_path()?.display()
        );
    }
    Ok(())
}

fn build_oracle(config: &MaximusConfig, offline: bool) -> Result<DifficultyOracle> {
    let mut llm = config.llm.clone();
    if offline {
        llm.enabled = false;
    }
    let client = HttpLlmClient::new(llm).context("Failed to create LLM client")?;
    Ok(DifficultyOracle::new(Arc::new(client)))
}

async fn play(kind: ModuleKind, config: &MaximusConfig, offline: bool) -> Result<()> {
    let ledger = Arc::new(CurrencyLedger::new(config.ledger.tier_size)?);
    let oracle = build_oracle(config, offline)?;
    info!(module = %kind, route = %kind.route(), offline, "mounting module");

    let input = BufReader::new(tokio::io::stdin());
    let mut out = std::io::stdout();

    match kind {
        ModuleKind::Math => {
            let mut session = SessionController::new(MathStrategy::new(oracle), ledger);
            shell::play(&mut session, input, &mut out).await
        }
        ModuleKind::Reading => {
            let strategy = ReadingStrategy::new(oracle, config.reading.tick());
            let mut session = SessionController::new(strategy, ledger);
            shell::play(&mut session, input, &mut out).await
        }
        ModuleKind::Typing => {
            let mut session = SessionController::new(TypingStrategy::new(oracle), ledger);
            shell::play(&mut session, input, &mut out).await
        }
        ModuleKind::Drawing => {
            let strategy = DrawingStrategy::new(Arc::clone(&ledger), &config.drawing);
            let mut session = SessionController::new(strategy, ledger);
            shell::play(&mut session, input, &mut out).await
        }
        ModuleKind::Coding => {
            let mut session = SessionController::new(CodingStrategy::new(), ledger);
            shell::play(&mut session, input, &mut out).await
        }
        ModuleKind::Kindness => {
            let mut session = SessionController::new(KindnessStrategy::new(oracle), ledger);
            shell::play(&mut session, input, &mut out).await
        }
    }
}
