use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use refreshkit_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "refreshkit")]
#[command(author, version, about = "Pull-to-refresh and infinite loading playground")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Use this configuration file instead of ~/.config/refreshkit/config.toml
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the terminal demo
    Run,
    /// Replay a scripted scroll session headlessly
    Simulate {
        /// Trace file (.toml or .json)
        #[arg(short = 't', long)]
        trace: PathBuf,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write the default configuration if none exists
    Init,
    /// Print the configuration file path
    Path,
}

/// Filter from RUST_LOG, falling back to the configured level
fn env_filter(config: &AppConfig) -> EnvFilter {
    EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()))
}

/// The terminal UI owns the screen, so its logs go to a file
fn init_file_logging(config: &AppConfig) -> Result<()> {
    let path = config.log_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

fn init_stderr_logging(config: &AppConfig) {
    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => AppConfig::load()?,
    };

    // Handle commands
    match cli.command {
        Some(Commands::Run) | None => {
            init_file_logging(&config)?;
            commands::run::run(config).await
        }
        Some(Commands::Simulate { trace, json }) => {
            init_stderr_logging(&config);
            commands::simulate::run(&config, &trace, json)
        }
        Some(Commands::Config { action }) => {
            init_stderr_logging(&config);
            match action {
                ConfigAction::Show => commands::config::show(&config),
                ConfigAction::Init => commands::config::init(),
                ConfigAction::Path => commands::config::path(cli.config.as_deref()),
            }
        }
    }
}
