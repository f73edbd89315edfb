//! Config command - manage configuration.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Subcommand};
use console::style;
use serde_json::Value;
use tracing::debug;

use flytax_core::FlytaxConfig;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Write a configuration file with default values
    Init {
        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },

    /// Get a configuration value (e.g., "parser.timeout_secs")
    Get { key: String },

    /// Set a configuration value; JSON values are parsed, anything else is a string
    Set { key: String, value: String },

    /// Show configuration file path
    Path,
}

pub async fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let path = config_path.map(PathBuf::from).unwrap_or_else(default_config_path);

    match args.command {
        ConfigCommand::Show => {
            if !path.exists() {
                eprintln!("{} No config file found, showing defaults.", style("ℹ").blue());
            }
            println!("{}", serde_json::to_string_pretty(&load_from(&path)?)?);
        }
        ConfigCommand::Init { force } => {
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    path.display()
                );
            }
            save_to(&path, &FlytaxConfig::default())?;
            println!("{} Created configuration file at {}", style("✓").green(), path.display());
        }
        ConfigCommand::Get { key } => {
            let json = serde_json::to_value(load_from(&path)?)?;
            let value = lookup(&json, &key)
                .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))?;
            println!("{}", serde_json::to_string_pretty(value)?);
        }
        ConfigCommand::Set { key, value } => {
            let parsed: Value =
                serde_json::from_str(&value).unwrap_or_else(|_| Value::String(value.clone()));

            let mut json = serde_json::to_value(load_from(&path)?)?;
            let slot = lookup_mut(&mut json, &key)
                .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))?;
            *slot = parsed.clone();

            let config: FlytaxConfig = serde_json::from_value(json)
                .with_context(|| format!("Invalid value for {}", key))?;
            config.validate()?;
            save_to(&path, &config)?;

            println!("{} Set {} = {}", style("✓").green(), key, parsed);
        }
        ConfigCommand::Path => {
            println!("Configuration file: {}", path.display());
            if path.exists() {
                println!("Status: {}", style("exists").green());
            } else {
                println!("Status: {}", style("not created").yellow());
                println!();
                println!("Run 'flytax config init' to create a configuration file.");
            }
        }
    }

    Ok(())
}

/// Load configuration for a command.
///
/// An explicit path must exist; otherwise the default location is used when
/// present, and built-in defaults when not.
pub fn load(config_path: Option<&str>) -> anyhow::Result<FlytaxConfig> {
    match config_path {
        Some(path) => {
            let path = Path::new(path);
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            Ok(FlytaxConfig::from_file(path)?)
        }
        None => load_from(&default_config_path()),
    }
}

fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("flytax")
        .join("config.json")
}

fn load_from(path: &Path) -> anyhow::Result<FlytaxConfig> {
    if path.exists() {
        debug!("Loading configuration from {}", path.display());
        Ok(FlytaxConfig::from_file(path)?)
    } else {
        Ok(FlytaxConfig::default())
    }
}

fn save_to(path: &Path, config: &FlytaxConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    config.save(path)?;
    Ok(())
}

fn lookup<'a>(json: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.').try_fold(json, |current, part| current.get(part))
}

fn lookup_mut<'a>(json: &'a mut Value, key: &str) -> Option<&'a mut Value> {
    key.split('.').try_fold(json, |current, part| current.get_mut(part))
}
