//! Tripwise - step-by-step travel planner
//!
//! CLI entry point for the wizard and its diagnostics.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use tracing::info;

use tripwise::cli::{Cli, Command};
use tripwise::config::Config;
use tripwise::model::ModelClient;
use tripwise::prompts::PromptLoader;

fn setup_logging(level: &str) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tripwise")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Write to a log file so output never interleaves with the wizard on stdout
    let level: tracing::Level = level
        .parse()
        .map_err(|_| eyre::eyre!("Invalid log level: {}", level))?;
    let log_file = fs::File::create(log_dir.join("tripwise.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: CLI flag > config file > INFO
    let level = cli
        .log_level
        .clone()
        .or_else(|| Config::load_log_level(cli.config.as_ref()))
        .unwrap_or_else(|| "info".to_string());
    setup_logging(&level).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!(
        "Tripwise loaded config: provider={}, model={}",
        config.llm.provider, config.llm.model
    );

    match cli.command.unwrap_or(Command::Plan) {
        Command::Plan => tripwise::repl::run_interactive(&config).await,
        Command::Ask { prompt, raw } => cmd_ask(&config, &prompt, raw).await,
        Command::Templates => cmd_templates(&config),
        Command::Check => cmd_check(&config),
    }
}

/// Send one prompt through the model client
async fn cmd_ask(config: &Config, prompt: &str, raw: bool) -> Result<()> {
    config.validate()?;
    let model = ModelClient::from_config(&config.llm);

    let reply = model
        .invoke(prompt, !raw)
        .await
        .map_err(|e| eyre::eyre!("Model call failed: {}", e))?;

    if raw {
        println!("{}", reply.into_text());
    } else {
        let json = reply.into_json().unwrap_or_default();
        println!("{}", serde_json::to_string_pretty(&json)?);
    }
    Ok(())
}

/// List prompt templates with their sources
fn cmd_templates(config: &Config) -> Result<()> {
    let loader = PromptLoader::from_config(&config.prompts);

    println!("Prompt templates:");
    println!();
    for (name, source) in loader.list() {
        println!("  {:14} {}", name, source);
    }
    Ok(())
}

/// Validate configuration
fn cmd_check(config: &Config) -> Result<()> {
    println!("Provider: {}", config.llm.provider);
    println!("Model:    {}", config.llm.model);
    println!("Endpoint: {}", config.llm.base_url);

    match config.llm.api_key_source() {
        Ok(source) => {
            println!("API key:  {} ({})", "found".green(), source);
            Ok(())
        }
        Err(e) => {
            println!("API key:  {}", "missing".red());
            Err(e.wrap_err("Configuration is incomplete"))
        }
    }
}
