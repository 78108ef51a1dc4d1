// Copyright (c) 2026 tccprofile contributors
// SPDX-License-Identifier: Apache-2.0
//! # Application Spec Parsing
//!
//! Normalizes the raw per-resource application strings supplied by the user
//! into [`AppSpec`] values. The raw form is:
//!
//! ```text
//! sendingPath[:overridePath][,receivingPath[:overridePath]]
//! ```
//!
//! Only [`ResourceKind::AppleEvents`] consults the receiving segment, and for
//! that resource it is mandatory: exactly one `,` and at most one `:` per
//! segment. Every other resource reads the sending segment only; anything
//! after the first `,` is ignored without validation.
//!
//! Parsing is all-or-nothing. [`ServiceSpecParser::parse`] validates every
//! string for every resource before returning, so a malformed spec is
//! reported before any identity resolution runs.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Input normalization and de-duplication of application specs

use crate::domain::resource::ResourceKind;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpecError {
    #[error(
        "Malformed {kind} spec '{spec}': {reason}. Expected /Path/Sending.app,/Path/Receiving.app \
         or /Path/Sending.app:/Override/Sending.app,/Path/Receiving.app:/Override/Receiving.app"
    )]
    MalformedReceiverSpec {
        kind: ResourceKind,
        spec: String,
        reason: String,
    },

    #[error("Empty application path in {kind} spec '{spec}'")]
    EmptyPath { kind: ResourceKind, spec: String },
}

/// One application named in a spec: the path to inspect and an optional
/// override for the path the platform will actually see at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AppRef {
    pub path: PathBuf,
    pub path_override: Option<PathBuf>,
}

impl AppRef {
    pub fn new(path: impl Into<PathBuf>, path_override: Option<PathBuf>) -> Self {
        Self {
            path: path.into(),
            path_override,
        }
    }

    /// Base file name with its extension stripped (`/Applications/Foo.app` -> `Foo`).
    pub fn display_name(&self) -> String {
        display_name(&self.path)
    }
}

pub(crate) fn display_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Normalized application pair for one resource.
///
/// `receiving` is populated only for resources where
/// [`ResourceKind::requires_receiver`] holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AppSpec {
    pub sending: AppRef,
    pub receiving: Option<AppRef>,
}

/// Raw spec strings per resource, as supplied by the CLI or a form.
pub type RawServiceSpecs = BTreeMap<ResourceKind, Vec<String>>;

/// Parsed, de-duplicated specs per resource.
///
/// Holds a key only for resources that received at least one spec; the
/// per-resource lists keep first-seen input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceSpecs {
    specs: BTreeMap<ResourceKind, Vec<AppSpec>>,
}

impl ServiceSpecs {
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn get(&self, kind: ResourceKind) -> Option<&[AppSpec]> {
        self.specs.get(&kind).map(Vec::as_slice)
    }

    /// Iterate resources in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, &[AppSpec])> {
        self.specs.iter().map(|(kind, specs)| (*kind, specs.as_slice()))
    }

    pub fn app_count(&self) -> usize {
        self.specs.values().map(Vec::len).sum()
    }
}

pub struct ServiceSpecParser;

impl ServiceSpecParser {
    /// Parse every raw spec for every resource.
    ///
    /// # Errors
    ///
    /// Returns the first [`SpecError`] encountered; nothing is returned
    /// partially.
    pub fn parse(raw: &RawServiceSpecs) -> Result<ServiceSpecs, SpecError> {
        let mut specs: BTreeMap<ResourceKind, Vec<AppSpec>> = BTreeMap::new();

        for (kind, entries) in raw {
            for entry in entries {
                let spec = Self::parse_one(*kind, entry)?;
                let list = specs.entry(*kind).or_default();
                if !list.contains(&spec) {
                    list.push(spec);
                } else {
                    tracing::debug!(resource = %kind, spec = %entry, "Dropping duplicate application spec");
                }
            }
        }

        Ok(ServiceSpecs { specs })
    }

    /// Parse a single raw spec string for `kind`.
    pub fn parse_one(kind: ResourceKind, raw: &str) -> Result<AppSpec, SpecError> {
        if kind.requires_receiver() {
            let commas = raw.matches(',').count();
            if commas != 1 {
                return Err(SpecError::MalformedReceiverSpec {
                    kind,
                    spec: raw.to_string(),
                    reason: format!(
                        "expected exactly one ',' between sender and receiver, found {}",
                        commas
                    ),
                });
            }

            let (sending, receiving) = raw.split_once(',').unwrap_or((raw, ""));
            for segment in [sending, receiving] {
                if segment.matches(':').count() > 1 {
                    return Err(SpecError::MalformedReceiverSpec {
                        kind,
                        spec: raw.to_string(),
                        reason: format!("too many ':' in '{}', one per application is expected", segment),
                    });
                }
            }

            return Ok(AppSpec {
                sending: Self::parse_segment(kind, raw, sending)?,
                receiving: Some(Self::parse_segment(kind, raw, receiving)?),
            });
        }

        let sending = match raw.split_once(',') {
            Some((sending, ignored)) => {
                tracing::debug!(
                    resource = %kind,
                    ignored = %ignored,
                    "Ignoring receiver segment for resource without a receiver"
                );
                sending
            }
            None => raw,
        };

        Ok(AppSpec {
            sending: Self::parse_segment(kind, raw, sending)?,
            receiving: None,
        })
    }

    fn parse_segment(kind: ResourceKind, raw: &str, segment: &str) -> Result<AppRef, SpecError> {
        let (path, path_override) = match segment.split_once(':') {
            Some((path, path_override)) => (path, Some(path_override)),
            None => (segment, None),
        };

        if path.is_empty() {
            return Err(SpecError::EmptyPath {
                kind,
                spec: raw.to_string(),
            });
        }

        Ok(AppRef {
            path: PathBuf::from(path),
            path_override: path_override
                .filter(|o| !o.is_empty())
                .map(PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(kind: ResourceKind, entries: &[&str]) -> RawServiceSpecs {
        BTreeMap::from([(kind, entries.iter().map(|s| s.to_string()).collect())])
    }

    #[test]
    fn test_plain_path() {
        let spec = ServiceSpecParser::parse_one(ResourceKind::Calendar, "/Applications/Foo.app").unwrap();
        assert_eq!(spec.sending.path, PathBuf::from("/Applications/Foo.app"));
        assert_eq!(spec.sending.path_override, None);
        assert_eq!(spec.receiving, None);
    }

    #[test]
    fn test_path_with_override() {
        let spec = ServiceSpecParser::parse_one(
            ResourceKind::SystemPolicyAllFiles,
            "/Volumes/Ext/tool:/usr/local/bin/tool",
        )
        .unwrap();
        assert_eq!(spec.sending.path, PathBuf::from("/Volumes/Ext/tool"));
        assert_eq!(spec.sending.path_override, Some(PathBuf::from("/usr/local/bin/tool")));
    }

    #[test]
    fn test_empty_override_is_none() {
        let spec = ServiceSpecParser::parse_one(ResourceKind::Photos, "/Applications/Foo.app:").unwrap();
        assert_eq!(spec.sending.path_override, None);
    }

    #[test]
    fn test_receiver_ignored_for_other_resources() {
        let spec =
            ServiceSpecParser::parse_one(ResourceKind::AddressBook, "/Apps/A.app,/Apps/B.app,/Apps/C.app")
                .unwrap();
        assert_eq!(spec.sending.path, PathBuf::from("/Apps/A.app"));
        assert_eq!(spec.receiving, None);
    }

    #[test]
    fn test_apple_events_pair() {
        let spec = ServiceSpecParser::parse_one(
            ResourceKind::AppleEvents,
            "/Volumes/X/A.app:/Applications/A.app,/Apps/B.app",
        )
        .unwrap();
        assert_eq!(spec.sending.path, PathBuf::from("/Volumes/X/A.app"));
        assert_eq!(spec.sending.path_override, Some(PathBuf::from("/Applications/A.app")));
        let receiving = spec.receiving.unwrap();
        assert_eq!(receiving.path, PathBuf::from("/Apps/B.app"));
        assert_eq!(receiving.path_override, None);
    }

    #[test]
    fn test_apple_events_requires_exactly_two_segments() {
        let one = ServiceSpecParser::parse_one(ResourceKind::AppleEvents, "/Apps/A.app");
        assert!(matches!(one, Err(SpecError::MalformedReceiverSpec { .. })));

        let three = ServiceSpecParser::parse_one(ResourceKind::AppleEvents, "/Apps/A.app,/Apps/B.app,/Apps/C.app");
        assert!(matches!(three, Err(SpecError::MalformedReceiverSpec { .. })));
    }

    #[test]
    fn test_apple_events_rejects_double_colon() {
        let result = ServiceSpecParser::parse_one(ResourceKind::AppleEvents, "/a:/b:/c,/Apps/B.app");
        assert!(matches!(result, Err(SpecError::MalformedReceiverSpec { .. })));
    }

    #[test]
    fn test_apple_events_rejects_empty_receiver() {
        let result = ServiceSpecParser::parse_one(ResourceKind::AppleEvents, "/Apps/A.app,");
        assert!(matches!(result, Err(SpecError::EmptyPath { .. })));
    }

    #[test]
    fn test_parse_rejects_before_returning_anything() {
        let mut input = raw(ResourceKind::Calendar, &["/Apps/Good.app"]);
        input.insert(ResourceKind::AppleEvents, vec!["/Apps/OnlyOne.app".to_string()]);
        assert!(ServiceSpecParser::parse(&input).is_err());
    }

    #[test]
    fn test_duplicates_collapse_in_order() {
        let input = raw(
            ResourceKind::Accessibility,
            &["/Apps/B.app", "/Apps/A.app", "/Apps/B.app", "/Apps/B.app,/ignored"],
        );
        let parsed = ServiceSpecParser::parse(&input).unwrap();
        let specs = parsed.get(ResourceKind::Accessibility).unwrap();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].sending.path, PathBuf::from("/Apps/B.app"));
        assert_eq!(specs[1].sending.path, PathBuf::from("/Apps/A.app"));
    }

    #[test]
    fn test_empty_list_produces_no_key() {
        let input = raw(ResourceKind::Camera, &[]);
        let parsed = ServiceSpecParser::parse(&input).unwrap();
        assert!(parsed.is_empty());
        assert!(parsed.get(ResourceKind::Camera).is_none());
    }

    #[test]
    fn test_display_name_strips_extension() {
        let app = AppRef::new("/Applications/Utilities/Terminal.app", None);
        assert_eq!(app.display_name(), "Terminal");
        let script = AppRef::new("/usr/local/bin/backup.sh", None);
        assert_eq!(script.display_name(), "backup");
    }
}
