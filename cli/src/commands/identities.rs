// Copyright (c) 2026 tccprofile contributors
// SPDX-License-Identifier: Apache-2.0

//! Lists code signing identities usable with `generate --sign`.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

use tccprofile_core::domain::generator_config::GeneratorConfigManifest;
use tccprofile_core::infrastructure::signing_identities::list_signing_identities;

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = GeneratorConfigManifest::load_or_default(config_path)
        .context("Failed to load configuration")?;

    let identities = list_signing_identities(&config.spec.tools.security)
        .context("Failed to list code signing identities")?;

    if identities.is_empty() {
        println!("{}", "No valid code signing identities found".yellow());
        return Ok(());
    }

    println!("{}", "Code signing identities:".bold());
    for name in identities {
        println!("  {}", name);
    }

    Ok(())
}
