// Copyright (c) 2026 tccprofile contributors
// SPDX-License-Identifier: Apache-2.0

//! Profile Writer and Signer
//!
//! # DDD Pattern: Application Service
//!
//! - **Layer:** Application
//! - **Responsibility:** Emit a finished document to a file or stream, then
//!   optionally sign the written file
//! - **Collaborators:**
//!   - Domain: `ProfileDocument`, `SigningInspector`
//!   - Infrastructure: `plist_codec`
//!
//! The document is encoded in memory before anything touches the
//! destination, so a failed encode never leaves a partial file. The signed
//! copy is a sibling named `<stem>_Signed.mobileconfig`; the unsigned file
//! is left in place.

use crate::domain::error::{ProfileError, WriteError};
use crate::domain::identity::{SigningError, SigningInspector};
use crate::domain::profile::{ProfileDocument, PROFILE_EXTENSION};
use crate::infrastructure::plist_codec;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

const SIGNED_SUFFIX: &str = "_Signed";

/// Files produced by a write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenProfile {
    pub path: PathBuf,
    pub signed_path: Option<PathBuf>,
}

pub struct ProfileSigner<'a, S: SigningInspector> {
    inspector: &'a S,
}

impl<'a, S: SigningInspector> ProfileSigner<'a, S> {
    pub fn new(inspector: &'a S) -> Self {
        Self { inspector }
    }

    /// Sign `input` with `certificate`, returning the signed sibling's path.
    pub fn sign(&self, certificate: &str, input: &Path) -> Result<PathBuf, SigningError> {
        let output = signed_path(input);
        self.inspector.sign(certificate, input, &output)?;
        info!(certificate = %certificate, path = %output.display(), "Signed profile written");
        Ok(output)
    }
}

pub struct ProfileWriter;

impl ProfileWriter {
    /// Readable XML form, without the encoder's trailing newline.
    pub fn render(document: &ProfileDocument) -> Result<String, WriteError> {
        let bytes = plist_codec::encode_xml(document)?;
        let text = String::from_utf8(bytes).map_err(|e| WriteError::Encode(e.to_string()))?;
        Ok(text.trim_end().to_string())
    }

    /// Write the readable form to `out`, e.g. standard output.
    pub fn write_to<W: Write>(document: &ProfileDocument, out: &mut W) -> Result<(), WriteError> {
        let text = Self::render(document)?;
        writeln!(out, "{}", text)
            .and_then(|_| out.flush())
            .map_err(|source| WriteError::Io {
                path: PathBuf::from("<stdout>"),
                source,
            })
    }

    /// Write the document to `requested` (normalized by [`profile_path`]) and
    /// sign it when `signing` names a certificate.
    pub fn write_file<S: SigningInspector>(
        document: &ProfileDocument,
        requested: &Path,
        signing: Option<(&ProfileSigner<'_, S>, &str)>,
    ) -> Result<WrittenProfile, ProfileError> {
        let path = profile_path(requested)?;
        let bytes = plist_codec::encode_xml(document)?;

        std::fs::write(&path, bytes).map_err(|source| WriteError::Io {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), "Profile written");

        let signed_path = match signing {
            Some((signer, certificate)) => Some(signer.sign(certificate, &path)?),
            None => None,
        };

        Ok(WrittenProfile { path, signed_path })
    }
}

/// Expand a leading `~` and force the `.mobileconfig` extension.
pub fn profile_path(requested: &Path) -> Result<PathBuf, WriteError> {
    let mut path = expand_home(requested);
    if path.file_name().is_none() {
        return Err(WriteError::InvalidPath {
            path: requested.to_path_buf(),
        });
    }
    path.set_extension(PROFILE_EXTENSION);
    Ok(path)
}

/// `<dir>/<stem>_Signed.mobileconfig` for `<dir>/<stem>.<ext>`.
pub fn signed_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{}{}.{}", stem, SIGNED_SUFFIX, PROFILE_EXTENSION))
}

fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_path_forces_extension() {
        assert_eq!(
            profile_path(Path::new("/tmp/out.plist")).unwrap(),
            PathBuf::from("/tmp/out.mobileconfig")
        );
        assert_eq!(
            profile_path(Path::new("/tmp/out")).unwrap(),
            PathBuf::from("/tmp/out.mobileconfig")
        );
        assert_eq!(
            profile_path(Path::new("/tmp/out.mobileconfig")).unwrap(),
            PathBuf::from("/tmp/out.mobileconfig")
        );
        assert!(profile_path(Path::new("/")).is_err());
    }

    #[test]
    fn test_profile_path_expands_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(
                profile_path(Path::new("~/Desktop/tcc")).unwrap(),
                home.join("Desktop/tcc.mobileconfig")
            );
        }
    }

    #[test]
    fn test_signed_path() {
        assert_eq!(
            signed_path(Path::new("/tmp/tcc.mobileconfig")),
            PathBuf::from("/tmp/tcc_Signed.mobileconfig")
        );
    }
}
