// Copyright (c) 2026 tccprofile contributors
// SPDX-License-Identifier: Apache-2.0

//! Host-backed [`IdentityProbe`].
//!
//! Content classification shells out to `file --mime-type -b`; bundle
//! identifiers come from `<bundle>/Contents/Info.plist`. All calls block.

use crate::domain::identity::{BundleMetadataError, ContentType, IdentityProbe, ToolError};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::Command;

const INFO_PLIST: &str = "Contents/Info.plist";
const BUNDLE_IDENTIFIER_KEY: &str = "CFBundleIdentifier";

pub struct SystemProbe {
    file_tool: PathBuf,
}

impl SystemProbe {
    pub fn new(file_tool: impl Into<PathBuf>) -> Self {
        Self {
            file_tool: file_tool.into(),
        }
    }
}

impl Default for SystemProbe {
    fn default() -> Self {
        Self::new("/usr/bin/file")
    }
}

impl IdentityProbe for SystemProbe {
    fn check_readable(&self, path: &Path) -> std::io::Result<()> {
        // Directories (bundles) open fine on unix; this checks existence and permission.
        File::open(path).map(|_| ())
    }

    fn content_type(&self, path: &Path) -> Result<ContentType, ToolError> {
        let tool = self.file_tool.display().to_string();
        let output = Command::new(&self.file_tool)
            .arg("--mime-type")
            .arg("-b")
            .arg(path)
            .output()
            .map_err(|source| ToolError::Launch {
                tool: tool.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ToolError::Failed {
                tool,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        parse_mime_output(&String::from_utf8_lossy(&output.stdout)).ok_or_else(|| {
            ToolError::UnexpectedOutput {
                tool,
                detail: format!("no MIME type reported for {}", path.display()),
            }
        })
    }

    fn bundle_identifier(&self, bundle: &Path) -> Result<String, BundleMetadataError> {
        let info_plist = bundle.join(INFO_PLIST);
        let value = plist::Value::from_file(&info_plist).map_err(|e| BundleMetadataError::Unreadable {
            path: info_plist.clone(),
            reason: e.to_string(),
        })?;

        value
            .as_dictionary()
            .and_then(|dict| dict.get(BUNDLE_IDENTIFIER_KEY))
            .and_then(plist::Value::as_string)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .ok_or(BundleMetadataError::MissingIdentifier { path: info_plist })
    }

    fn first_line(&self, path: &Path) -> std::io::Result<String> {
        let mut line = String::new();
        BufReader::new(File::open(path)?).read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// `file -b --mime-type` prints only the type. Some builds still prefix the
/// path, so anything up to the last `": "` is dropped.
fn parse_mime_output(stdout: &str) -> Option<ContentType> {
    let line = stdout.lines().next()?.trim();
    let essence = line.rsplit_once(": ").map_or(line, |(_, mime)| mime).trim();
    (!essence.is_empty()).then(|| ContentType::new(essence))
}
