use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

mod cli;

use cli::Cli;
use cli::commands::Commands;
use flashcall::assistant::Assistant;
use flashcall::config::Config;
use flashcall::daemon::run_daemon;
use flashcall::domain::UserId;
use flashcall::llm::build_client;
use flashcall::storage::{CardStore, JsonlCardStore};

fn setup_logging(default_level: &str) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("flashcall")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("flashcall.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn open_store(config: &Config) -> Result<Arc<JsonlCardStore>> {
    let store = JsonlCardStore::open(&config.storage.data_dir)
        .with_context(|| format!("Failed to open card store in {}", config.storage.data_dir.display()))?;
    Ok(Arc::new(store))
}

fn build_assistant(config: &Config) -> Result<Arc<Assistant>> {
    let llm = build_client(&config.llm).context("Failed to create generation service client")?;
    let store = open_store(config)?;
    Ok(Arc::new(Assistant::new(llm, store, config.llm.max_tokens)))
}

async fn handle_ask_command(user: &str, message: &str, verbose: bool, config: &Config) -> Result<()> {
    info!("Ask for user {} ({} chars)", user, message.len());
    let assistant = build_assistant(config)?;

    let reply = assistant
        .assist(&UserId::new(user), message)
        .await
        .context("Assistant request failed")?;

    if verbose {
        match reply.tool_called {
            Some(tool) => eprintln!("{} {}", "Tool:".green(), tool.as_str().cyan()),
            None => eprintln!("{} {}", "Tool:".green(), "none".dimmed()),
        }
    }

    println!("{}", serde_json::to_string_pretty(&reply)?);
    Ok(())
}

async fn handle_daemon_command(verbose: bool, config: &Config) -> Result<()> {
    let assistant = build_assistant(config)?;

    if verbose {
        eprintln!(
            "{} {}",
            "Daemon listening on".cyan(),
            config.daemon.socket_path.display()
        );
    }

    run_daemon(&config.daemon, assistant).await.context("Daemon failed")?;
    Ok(())
}

async fn handle_cards_command(user: &str, config: &Config) -> Result<()> {
    let store = open_store(config)?;
    let count = store
        .count_cards(&UserId::new(user))
        .await
        .context("Failed to count cards")?;
    println!("{}", count);
    Ok(())
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    match &cli.command {
        Commands::Ask { user, message } => {
            let text = Commands::message_text(message);
            handle_ask_command(user, &text, cli.is_verbose(), config).await
        }
        Commands::Daemon => handle_daemon_command(cli.is_verbose(), config).await,
        Commands::Cards { user } => handle_cards_command(user, config).await,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    // Setup logging with the configured level as the default filter
    setup_logging(config.log_level.as_deref().unwrap_or("info")).context("Failed to setup logging")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).await.context("Application failed")?;

    Ok(())
}
