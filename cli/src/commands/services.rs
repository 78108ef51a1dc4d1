// Copyright (c) 2026 tccprofile contributors
// SPDX-License-Identifier: Apache-2.0

//! Prints the resource catalog.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use tccprofile_core::ResourceKind;

#[derive(Debug, Serialize)]
struct ServiceRow {
    name: ResourceKind,
    description: &'static str,
    deny_only: bool,
    requires_receiver: bool,
}

fn rows(only: Option<ResourceKind>) -> Vec<ServiceRow> {
    ResourceKind::ALL
        .iter()
        .filter(|kind| only.is_none_or(|wanted| wanted == **kind))
        .map(|kind| ServiceRow {
            name: *kind,
            description: kind.description(),
            deny_only: kind.is_deny_only(),
            requires_receiver: kind.requires_receiver(),
        })
        .collect()
}

pub fn execute(resource: Option<ResourceKind>, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&rows(resource))?);
        return Ok(());
    }

    println!("{}", "Resources:".bold());
    for row in rows(resource) {
        let mut markers = Vec::new();
        if row.deny_only {
            markers.push("deny only".red().to_string());
        }
        if row.requires_receiver {
            markers.push("sender,receiver".cyan().to_string());
        }
        let suffix = if markers.is_empty() {
            String::new()
        } else {
            format!(" [{}]", markers.join(", "))
        };
        println!("  {:<30} {}{}", row.name.as_str().bold(), row.description.dimmed(), suffix);
    }

    Ok(())
}
