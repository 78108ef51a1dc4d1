// Copyright (c) 2026 tccprofile contributors
// SPDX-License-Identifier: Apache-2.0

//! Lists code signing identities available in the user's keychains.

use crate::domain::identity::ToolError;
use regex::Regex;
use std::path::Path;
use std::process::Command;
use std::sync::LazyLock;

static QUOTED_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""(.*?)""#).expect("quoted name pattern compiles"));

/// Names of valid code signing identities, in keychain order.
///
/// Runs `security find-identity -p codesigning -v`.
pub fn list_signing_identities(security: &Path) -> Result<Vec<String>, ToolError> {
    let tool = security.display().to_string();
    let output = Command::new(security)
        .args(["find-identity", "-p", "codesigning", "-v"])
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

    Ok(parse_identities(&String::from_utf8_lossy(&output.stdout)))
}

/// Pull the quoted identity name out of each listing line.
///
/// ```text
///   1) 0123ABCD "Developer ID Application: Example (TEAMID)"
///      1 valid identities found
/// ```
pub fn parse_identities(output: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for captures in output.lines().filter_map(|line| QUOTED_NAME.captures(line)) {
        let name = captures[1].to_string();
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_identities() {
        let output = r#"  1) 0123456789ABCDEF0123456789ABCDEF01234567 "Developer ID Application: Example Org (ABCDE12345)"
  2) 89ABCDEF0123456789ABCDEF0123456789ABCDEF "Apple Development: jo@example.com (ZYXWV98765)"
     2 valid identities found
"#;
        assert_eq!(
            parse_identities(output),
            vec![
                "Developer ID Application: Example Org (ABCDE12345)".to_string(),
                "Apple Development: jo@example.com (ZYXWV98765)".to_string(),
            ]
        );
    }

    #[test]
    fn test_duplicate_names_listed_once() {
        let output = r#"  1) AAAA "Developer ID Application: Example Org (ABCDE12345)"
  2) BBBB "Developer ID Application: Example Org (ABCDE12345)"
     2 valid identities found
"#;
        assert_eq!(parse_identities(output).len(), 1);
    }

    #[test]
    fn test_parse_no_identities() {
        assert!(parse_identities("     0 valid identities found\n").is_empty());
    }
}
