// Copyright (c) 2026 tccprofile contributors
// SPDX-License-Identifier: Apache-2.0

//! Configuration management commands
//!
//! Commands: show, validate, generate

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::PathBuf;

use tccprofile_core::domain::generator_config::{
    GeneratorConfigManifest, CONFIG_PATH_ENV, SIGN_CERTIFICATE_ENV,
};

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show config file paths checked
        #[arg(long)]
        paths: bool,

        /// Print the effective configuration as YAML
        #[arg(long)]
        yaml: bool,
    },

    /// Validate configuration file
    Validate {
        /// Path to config file (default: discover)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Generate sample configuration
    Generate {
        /// Output path (default: ./tccprofile.yaml)
        #[arg(short, long, default_value = "./tccprofile.yaml")]
        output: PathBuf,

        /// Include examples and comments
        #[arg(long)]
        examples: bool,
    },
}

pub fn handle_command(command: ConfigCommand, config_override: Option<PathBuf>) -> Result<()> {
    match command {
        ConfigCommand::Show { paths, yaml } => show(config_override, paths, yaml),
        ConfigCommand::Validate { file } => validate(file.or(config_override)),
        ConfigCommand::Generate { output, examples } => generate(output, examples),
    }
}

fn show(config_override: Option<PathBuf>, show_paths: bool, yaml: bool) -> Result<()> {
    let config = GeneratorConfigManifest::load_or_default(config_override.clone())
        .context("Failed to load configuration")?;

    if yaml {
        print!("{}", config.to_yaml_string()?);
        return Ok(());
    }

    if show_paths {
        println!("{}", "Configuration discovery paths:".bold());
        if let Some(path) = &config_override {
            println!("  1. --config flag: {}", path.display());
        } else {
            println!("  1. --config flag: {}", "(not set)".dimmed());
        }
        println!(
            "  2. {}: {}",
            CONFIG_PATH_ENV,
            std::env::var(CONFIG_PATH_ENV)
                .unwrap_or_else(|_| "(not set)".to_string())
                .dimmed()
        );
        for (index, path) in GeneratorConfigManifest::candidate_paths().iter().enumerate() {
            println!("  {}. {}", index + 3, path.display());
        }
        println!();
    }

    let unset = || "(not set)".dimmed().to_string();
    let defaults = &config.spec.defaults;

    println!("{}", "Current configuration:".bold());
    println!("  Name: {}", config.metadata.name);
    println!();

    println!("{}", "Profile defaults:".bold());
    println!(
        "  Description: {}",
        defaults.description.clone().unwrap_or_else(unset)
    );
    println!(
        "  Display name: {}",
        defaults.display_name.clone().unwrap_or_else(unset)
    );
    println!(
        "  Identifier: {}",
        defaults.identifier.clone().unwrap_or_else(unset)
    );
    println!(
        "  Organization: {}",
        defaults.organization.clone().unwrap_or_else(unset)
    );
    println!(
        "  Sign certificate: {}{}",
        defaults.sign_certificate.clone().unwrap_or_else(unset),
        if std::env::var(SIGN_CERTIFICATE_ENV).is_ok() {
            format!(" (from {})", SIGN_CERTIFICATE_ENV).dimmed().to_string()
        } else {
            String::new()
        }
    );
    println!();

    println!("{}", "Tools:".bold());
    println!("  codesign: {}", config.spec.tools.codesign.display());
    println!("  file: {}", config.spec.tools.file.display());
    println!("  security: {}", config.spec.tools.security.display());
    println!();

    Ok(())
}

fn validate(config_path: Option<PathBuf>) -> Result<()> {
    println!("Validating configuration...");

    let config = GeneratorConfigManifest::load_or_default(config_path)
        .context("Failed to load configuration")?;

    config
        .validate()
        .context("Configuration validation failed")?;

    println!("{}", "✓ Configuration is valid".green());

    Ok(())
}

fn generate(output: PathBuf, with_examples: bool) -> Result<()> {
    let sample = sample_config(with_examples);

    std::fs::write(&output, sample)
        .with_context(|| format!("Failed to write config to {:?}", output))?;

    println!(
        "{}",
        format!("✓ Configuration generated: {}", output.display()).green()
    );

    Ok(())
}

fn sample_config(with_examples: bool) -> &'static str {
    if with_examples {
        include_str!("../../templates/config-with-examples.yaml")
    } else {
        include_str!("../../templates/config-minimal.yaml")
    }
}
