// Copyright (c) 2026 tccprofile contributors
// SPDX-License-Identifier: Apache-2.0
//! # Application Identity
//!
//! Value objects describing how the platform identifies an application
//! ([`ResolvedIdentity`]) and the two capability interfaces the resolver
//! needs from the host system:
//!
//! | Trait | Responsibility | Implementation |
//! |-------|----------------|----------------|
//! | [`IdentityProbe`] | read access, content type, bundle metadata, first line | `infrastructure::system_probe::SystemProbe` |
//! | [`SigningInspector`] | designated requirement, signed check, profile signing | `infrastructure::codesign::CodesignInspector` |
//!
//! Both are plain synchronous traits. Every call blocks until the external
//! tool returns; there is no timeout and no retry.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Identity model and host-system capability contracts

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure while running one of the host's external tools.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Failed to launch {tool}: {source}")]
    Launch {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with {status}: {stderr}")]
    Failed {
        tool: String,
        status: String,
        stderr: String,
    },

    #[error("Unexpected output from {tool}: {detail}")]
    UnexpectedOutput { tool: String, detail: String },
}

#[derive(Debug, Error)]
pub enum BundleMetadataError {
    #[error("Failed to read bundle metadata at {path:?}: {reason}")]
    Unreadable { path: PathBuf, reason: String },

    #[error("Bundle metadata at {path:?} has no CFBundleIdentifier")]
    MissingIdentifier { path: PathBuf },
}

#[derive(Debug, Error)]
pub enum SigningError {
    #[error("Code at {path:?} is not signed; a code requirement cannot be produced for unsigned code")]
    Unsigned { path: PathBuf },

    #[error("No designated requirement in code signing output for {path:?}")]
    MissingRequirement { path: PathBuf },

    #[error("Signing {input:?} with certificate '{certificate}' failed: {detail}")]
    SignerFailed {
        certificate: String,
        input: PathBuf,
        detail: String,
    },

    #[error(transparent)]
    Tool(#[from] ToolError),
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("No such file or directory: {path:?}")]
    NotFound { path: PathBuf },

    #[error("Permission denied accessing {path:?}")]
    PermissionDenied { path: PathBuf },

    #[error("Failed to access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot check code signing for {script:?}: interpreter '{interpreter}' is resolved through env")]
    UnsupportedInterpreter { script: PathBuf, interpreter: String },

    #[error("Unsigned script {script:?} has no interpreter line to follow")]
    MissingInterpreter { script: PathBuf },

    #[error("Failed to classify {path:?}: {source}")]
    Classification {
        path: PathBuf,
        #[source]
        source: ToolError,
    },

    #[error(transparent)]
    Signing(#[from] SigningError),
}

impl ResolveError {
    /// Map an I/O failure on `path` into the structured filesystem variants.
    pub fn from_io(path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => ResolveError::NotFound {
                path: path.to_path_buf(),
            },
            std::io::ErrorKind::PermissionDenied => ResolveError::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => ResolveError::Io {
                path: path.to_path_buf(),
                source: err,
            },
        }
    }
}

/// `IdentifierType` values understood by the profile consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierType {
    BundleId,
    Path,
}

impl IdentifierType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentifierType::BundleId => "bundleID",
            IdentifierType::Path => "path",
        }
    }
}

impl fmt::Display for IdentifierType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the platform will recognise an application at enforcement time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResolvedIdentity {
    /// `CFBundleIdentifier` read from the bundle's `Contents/Info.plist`.
    BundleId(String),
    /// Filesystem path of the executable or script.
    Path(String),
}

impl ResolvedIdentity {
    pub fn path(path: &Path) -> Self {
        ResolvedIdentity::Path(path.display().to_string())
    }

    pub fn identifier(&self) -> &str {
        match self {
            ResolvedIdentity::BundleId(id) | ResolvedIdentity::Path(id) => id,
        }
    }

    pub fn identifier_type(&self) -> IdentifierType {
        match self {
            ResolvedIdentity::BundleId(_) => IdentifierType::BundleId,
            ResolvedIdentity::Path(_) => IdentifierType::Path,
        }
    }
}

/// MIME content type as reported by the content classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    essence: String,
}

const SCRIPT_SUBTYPES: [&str; 4] = ["x-shellscript", "x-python", "x-perl", "x-ruby"];

impl ContentType {
    pub fn new(essence: impl Into<String>) -> Self {
        Self {
            essence: essence.into().trim().to_ascii_lowercase(),
        }
    }

    pub fn subtype(&self) -> &str {
        self.essence
            .split_once('/')
            .map(|(_, sub)| sub)
            .unwrap_or(&self.essence)
    }

    /// Interpreted text: identified by path, signed through its interpreter.
    pub fn is_script(&self) -> bool {
        SCRIPT_SUBTYPES.contains(&self.subtype())
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.essence)
    }
}

/// Extract the interpreter path from a script's first line.
///
/// `#!/bin/bash -e` yields `/bin/bash`. An interpreter located through
/// `env` is rejected because the binary it would run depends on the
/// target's `PATH`.
pub fn interpreter_from_shebang(script: &Path, first_line: &str) -> Result<PathBuf, ResolveError> {
    let Some(rest) = first_line.strip_prefix("#!") else {
        return Err(ResolveError::MissingInterpreter {
            script: script.to_path_buf(),
        });
    };

    let rest = rest.trim();
    let Some(interpreter) = rest.split_whitespace().next() else {
        return Err(ResolveError::MissingInterpreter {
            script: script.to_path_buf(),
        });
    };

    if interpreter == "env" || interpreter.ends_with("/env") {
        return Err(ResolveError::UnsupportedInterpreter {
            script: script.to_path_buf(),
            interpreter: rest.to_string(),
        });
    }

    Ok(PathBuf::from(interpreter))
}

/// Read-only probes against the host filesystem and content classifier.
pub trait IdentityProbe {
    /// Succeeds when `path` exists and is readable by the current user.
    fn check_readable(&self, path: &Path) -> std::io::Result<()>;

    /// Classify `path` by content.
    fn content_type(&self, path: &Path) -> Result<ContentType, ToolError>;

    /// `CFBundleIdentifier` from `<bundle>/Contents/Info.plist`.
    fn bundle_identifier(&self, bundle: &Path) -> Result<String, BundleMetadataError>;

    /// First line of a text file, without the trailing newline.
    fn first_line(&self, path: &Path) -> std::io::Result<String>;
}

/// Code signing inspection and signing.
pub trait SigningInspector {
    /// The designated requirement of the code at `path`.
    ///
    /// # Errors
    ///
    /// [`SigningError::Unsigned`] when the inspector reports the code as
    /// unsigned; [`SigningError::Tool`] for any other non-zero outcome.
    fn designated_requirement(&self, path: &Path) -> Result<String, SigningError>;

    fn is_signed(&self, path: &Path) -> Result<bool, SigningError> {
        match self.designated_requirement(path) {
            Ok(_) => Ok(true),
            Err(SigningError::Unsigned { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Sign `input` with the identity named `certificate`, writing `output`.
    fn sign(&self, certificate: &str, input: &Path, output: &Path) -> Result<(), SigningError>;
}
