// Copyright (c) 2026 tccprofile contributors
// SPDX-License-Identifier: Apache-2.0

//! `codesign(1)` / `security(1)` backed [`SigningInspector`].
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure Layer
//! - **Purpose:** Read designated requirements and CMS-sign finished profiles
//!
//! `codesign -dr - <path>` prints the requirement on stdout and its banner on
//! stderr. Unsigned code exits 1 with "not signed" on stderr.

use crate::domain::identity::{SigningError, SigningInspector, ToolError};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

const DESIGNATED_MARKER: &str = "designated => ";
const UNSIGNED_MARKER: &str = "not signed";

pub struct CodesignInspector {
    codesign: PathBuf,
    security: PathBuf,
}

impl CodesignInspector {
    pub fn new(codesign: impl Into<PathBuf>, security: impl Into<PathBuf>) -> Self {
        Self {
            codesign: codesign.into(),
            security: security.into(),
        }
    }
}

impl Default for CodesignInspector {
    fn default() -> Self {
        Self::new("/usr/bin/codesign", "/usr/bin/security")
    }
}

impl SigningInspector for CodesignInspector {
    fn designated_requirement(&self, path: &Path) -> Result<String, SigningError> {
        let tool = self.codesign.display().to_string();
        let output = Command::new(&self.codesign)
            .args(["-dr", "-"])
            .arg(path)
            .output()
            .map_err(|source| ToolError::Launch {
                tool: tool.clone(),
                source,
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            if output.status.code() == Some(1) && stderr.contains(UNSIGNED_MARKER) {
                return Err(SigningError::Unsigned {
                    path: path.to_path_buf(),
                });
            }
            return Err(ToolError::Failed {
                tool,
                status: output.status.to_string(),
                stderr: stderr.trim().to_string(),
            }
            .into());
        }

        // Some releases print the requirement on stderr alongside the banner.
        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_designated_requirement(&stdout)
            .or_else(|| parse_designated_requirement(&stderr))
            .ok_or_else(|| SigningError::MissingRequirement {
                path: path.to_path_buf(),
            })
    }

    fn sign(&self, certificate: &str, input: &Path, output: &Path) -> Result<(), SigningError> {
        let tool = self.security.display().to_string();
        debug!(certificate = %certificate, input = %input.display(), "Signing profile");

        let result = Command::new(&self.security)
            .args(["cms", "-S", "-N", certificate, "-i"])
            .arg(input)
            .arg("-o")
            .arg(output)
            .output()
            .map_err(|source| ToolError::Launch { tool, source })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr).trim().to_string();
            return Err(SigningError::SignerFailed {
                certificate: certificate.to_string(),
                input: input.to_path_buf(),
                detail: if stderr.is_empty() {
                    result.status.to_string()
                } else {
                    stderr
                },
            });
        }

        Ok(())
    }
}

/// Extract the requirement text following `designated => `.
///
/// The marker is not always at the start of its line.
pub fn parse_designated_requirement(output: &str) -> Option<String> {
    output
        .lines()
        .find_map(|line| line.split_once(DESIGNATED_MARKER))
        .map(|(_, requirement)| requirement.trim().to_string())
        .filter(|requirement| !requirement.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_line() {
        let output = "designated => identifier \"com.apple.Terminal\" and anchor apple\n";
        assert_eq!(
            parse_designated_requirement(output).as_deref(),
            Some("identifier \"com.apple.Terminal\" and anchor apple")
        );
    }

    #[test]
    fn test_parse_multi_line_with_prefix() {
        let output = "Executable=/usr/bin/python\n\
                      # designated => identifier \"com.apple.python\" and anchor apple\n";
        assert_eq!(
            parse_designated_requirement(output).as_deref(),
            Some("identifier \"com.apple.python\" and anchor apple")
        );
    }

    #[test]
    fn test_parse_missing() {
        assert_eq!(parse_designated_requirement("Executable=/bin/ls\n"), None);
        assert_eq!(parse_designated_requirement("designated => \n"), None);
    }
}
