// Copyright (c) 2026 tccprofile contributors
// SPDX-License-Identifier: Apache-2.0

//! # tccprofile
//!
//! Builds privacy preferences policy (TCC/PPPC) configuration profiles that
//! allow or deny applications access to protected resources.
//!
//! ## Commands
//!
//! - `tccprofile generate` - Build a profile from per-resource application paths
//! - `tccprofile identities` - List code signing identities for `--sign`
//! - `tccprofile services` - Show the resource catalog
//! - `tccprofile config show|validate|generate` - Configuration management
//!
//! Logs go to stderr so a profile streamed to stdout stays clean.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use tccprofile_cli::commands::{self, ConfigCommand, GenerateArgs};
use tccprofile_core::ResourceKind;

/// Privacy preferences profile generator
#[derive(Parser)]
#[command(name = "tccprofile")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery, including
    /// TCCPROFILE_CONFIG_PATH)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "TCCPROFILE_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a privacy preferences profile
    #[command(name = "generate")]
    Generate(Box<GenerateArgs>),

    /// List valid code signing identities
    #[command(name = "identities")]
    Identities,

    /// Show the resources a profile can control
    #[command(name = "services")]
    Services {
        /// Show only this resource (case-insensitive)
        #[arg(value_name = "RESOURCE")]
        resource: Option<ResourceKind>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(&cli.log_level)?;
    debug!(config = ?cli.config, "Starting tccprofile");

    match cli.command {
        Commands::Generate(args) => commands::generate::execute(*args, cli.config),
        Commands::Identities => commands::identities::execute(cli.config),
        Commands::Services { resource, json } => commands::services::execute(resource, json),
        Commands::Config { command } => commands::config::handle_command(command, cli.config),
    }
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    Ok(())
}
