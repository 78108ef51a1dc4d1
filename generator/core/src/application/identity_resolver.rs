// Copyright (c) 2026 tccprofile contributors
// SPDX-License-Identifier: Apache-2.0

//! Identity Resolver
//!
//! Determines how the platform will recognise an application at enforcement
//! time and which code signing requirement it must satisfy.
//!
//! # DDD Pattern: Application Service
//!
//! - **Layer:** Application
//! - **Responsibility:** Identity and code requirement lookup for one application
//! - **Collaborators:**
//!   - Domain: `IdentityProbe`, `SigningInspector` capability traits
//!   - Infrastructure: `SystemProbe`, `CodesignInspector` (injected)
//!
//! # Effective Path
//!
//! An override replaces the inspected path only when neither the original
//! nor the override is an application bundle. A bundle is identified by its
//! own `Info.plist`, whatever its deployed location; a bare executable or
//! script is identified by the path that is actually invoked.
//!
//! # Requirement Flow
//!
//! 1. The effective path must exist and be readable
//! 2. Classify content; unsigned scripts are replaced by their interpreter
//! 3. Ask the inspector for the designated requirement
//!
//! Every failure in the requirement flow is fatal.

use crate::domain::identity::{
    interpreter_from_shebang, IdentityProbe, ResolveError, ResolvedIdentity, SigningInspector,
};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const BUNDLE_EXTENSION: &str = "app";

pub struct IdentityResolver<'a, P: IdentityProbe, S: SigningInspector> {
    probe: &'a P,
    inspector: &'a S,
}

impl<'a, P: IdentityProbe, S: SigningInspector> IdentityResolver<'a, P, S> {
    pub fn new(probe: &'a P, inspector: &'a S) -> Self {
        Self { probe, inspector }
    }

    /// The path that identity and requirement lookups actually inspect.
    pub fn effective_path(path: &Path, path_override: Option<&Path>) -> PathBuf {
        let chosen = match path_override {
            Some(over) if !is_bundle(over) && !is_bundle(path) => over,
            _ => path,
        };
        trim_trailing_separators(chosen)
    }

    /// Identity of the application at `path`.
    ///
    /// Never fails: anything that prevents a bundle identifier from being
    /// read degrades to a path identity.
    pub fn resolve(&self, path: &Path, path_override: Option<&Path>) -> ResolvedIdentity {
        let effective = Self::effective_path(path, path_override);

        match self.probe.content_type(&effective) {
            Ok(content) if content.is_script() => {
                debug!(path = %effective.display(), content_type = %content, "Script identified by path");
                return ResolvedIdentity::path(&effective);
            }
            Ok(_) => {}
            Err(e) => {
                warn!(path = %effective.display(), error = %e, "Content classification failed");
            }
        }

        match self.probe.bundle_identifier(&effective) {
            Ok(identifier) => {
                debug!(path = %effective.display(), bundle_id = %identifier, "Resolved bundle identifier");
                ResolvedIdentity::BundleId(identifier)
            }
            Err(e) => {
                warn!(
                    path = %effective.display(),
                    reason = %e,
                    "Bundle metadata unavailable, using path identity"
                );
                ResolvedIdentity::path(&effective)
            }
        }
    }

    /// Designated code requirement for the application at `path`.
    pub fn requirement(&self, path: &Path, path_override: Option<&Path>) -> Result<String, ResolveError> {
        let effective = Self::effective_path(path, path_override);

        self.probe
            .check_readable(&effective)
            .map_err(|e| ResolveError::from_io(&effective, e))?;

        let content = self
            .probe
            .content_type(&effective)
            .map_err(|source| ResolveError::Classification {
                path: effective.clone(),
                source,
            })?;

        let mut target = effective.clone();
        if content.is_script() && !self.inspector.is_signed(&effective)? {
            let first_line = self
                .probe
                .first_line(&effective)
                .map_err(|e| ResolveError::from_io(&effective, e))?;
            target = interpreter_from_shebang(&effective, &first_line)?;
            debug!(
                script = %effective.display(),
                interpreter = %target.display(),
                "Unsigned script, checking interpreter signature"
            );
        }

        let requirement = self.inspector.designated_requirement(&target)?;
        debug!(path = %target.display(), requirement = %requirement, "Resolved code requirement");
        Ok(requirement)
    }
}

fn is_bundle(path: &Path) -> bool {
    trim_trailing_separators(path)
        .extension()
        .is_some_and(|ext| ext == BUNDLE_EXTENSION)
}

fn trim_trailing_separators(path: &Path) -> PathBuf {
    let text = path.to_string_lossy();
    let trimmed = text.trim_end_matches('/');
    if trimmed.is_empty() {
        path.to_path_buf()
    } else {
        PathBuf::from(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::identity::{BundleMetadataError, ContentType, SigningError, ToolError};
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct StubProbe {
        content: HashMap<PathBuf, &'static str>,
        bundles: HashMap<PathBuf, &'static str>,
        first_lines: HashMap<PathBuf, &'static str>,
        unreadable: Vec<PathBuf>,
    }

    impl IdentityProbe for StubProbe {
        fn check_readable(&self, path: &Path) -> std::io::Result<()> {
            if self.unreadable.iter().any(|p| p == path) {
                return Err(std::io::ErrorKind::PermissionDenied.into());
            }
            if self.content.contains_key(path) {
                Ok(())
            } else {
                Err(std::io::ErrorKind::NotFound.into())
            }
        }

        fn content_type(&self, path: &Path) -> Result<ContentType, ToolError> {
            self.content
                .get(path)
                .map(|c| ContentType::new(*c))
                .ok_or_else(|| ToolError::Failed {
                    tool: "file".to_string(),
                    status: "exit status: 1".to_string(),
                    stderr: "cannot open".to_string(),
                })
        }

        fn bundle_identifier(&self, bundle: &Path) -> Result<String, BundleMetadataError> {
            self.bundles
                .get(bundle)
                .map(|id| id.to_string())
                .ok_or_else(|| BundleMetadataError::MissingIdentifier {
                    path: bundle.join("Contents/Info.plist"),
                })
        }

        fn first_line(&self, path: &Path) -> std::io::Result<String> {
            self.first_lines
                .get(path)
                .map(|l| l.to_string())
                .ok_or_else(|| std::io::ErrorKind::NotFound.into())
        }
    }

    #[derive(Default)]
    struct StubInspector {
        requirements: HashMap<PathBuf, &'static str>,
        inspected: RefCell<Vec<PathBuf>>,
    }

    impl SigningInspector for StubInspector {
        fn designated_requirement(&self, path: &Path) -> Result<String, SigningError> {
            self.inspected.borrow_mut().push(path.to_path_buf());
            self.requirements
                .get(path)
                .map(|r| r.to_string())
                .ok_or_else(|| SigningError::Unsigned {
                    path: path.to_path_buf(),
                })
        }

        fn sign(&self, _certificate: &str, _input: &Path, _output: &Path) -> Result<(), SigningError> {
            Ok(())
        }
    }

    #[test]
    fn test_effective_path_rules() {
        type R<'a> = IdentityResolver<'a, StubProbe, StubInspector>;
        let tool = Path::new("/Volumes/Ext/tool");
        let target = Path::new("/usr/local/bin/tool");
        assert_eq!(R::effective_path(tool, Some(target)), PathBuf::from("/usr/local/bin/tool"));
        assert_eq!(R::effective_path(tool, None), PathBuf::from("/Volumes/Ext/tool"));

        let app = Path::new("/Volumes/Ext/Foo.app/");
        assert_eq!(
            R::effective_path(app, Some(Path::new("/Applications/Foo.app"))),
            PathBuf::from("/Volumes/Ext/Foo.app")
        );
        assert_eq!(
            R::effective_path(tool, Some(Path::new("/Applications/Foo.app"))),
            PathBuf::from("/Volumes/Ext/tool")
        );
    }

    #[test]
    fn test_resolve_bundle_and_fallback() {
        let mut probe = StubProbe::default();
        probe.content.insert("/Applications/Foo.app".into(), "inode/directory");
        probe.bundles.insert("/Applications/Foo.app".into(), "com.example.foo");
        probe.content.insert("/usr/local/bin/tool".into(), "application/x-mach-binary");
        let inspector = StubInspector::default();
        let resolver = IdentityResolver::new(&probe, &inspector);

        assert_eq!(
            resolver.resolve(Path::new("/Applications/Foo.app"), None),
            ResolvedIdentity::BundleId("com.example.foo".to_string())
        );
        assert_eq!(
            resolver.resolve(Path::new("/usr/local/bin/tool"), None),
            ResolvedIdentity::Path("/usr/local/bin/tool".to_string())
        );
        // Unclassifiable paths still resolve.
        assert_eq!(
            resolver.resolve(Path::new("/missing/thing"), None),
            ResolvedIdentity::Path("/missing/thing".to_string())
        );
    }

    #[test]
    fn test_resolve_script_is_path_even_with_plist() {
        let mut probe = StubProbe::default();
        probe.content.insert("/opt/run.sh".into(), "text/x-shellscript");
        probe.bundles.insert("/opt/run.sh".into(), "com.example.never");
        let inspector = StubInspector::default();
        let resolver = IdentityResolver::new(&probe, &inspector);

        assert_eq!(
            resolver.resolve(Path::new("/opt/run.sh"), None),
            ResolvedIdentity::Path("/opt/run.sh".to_string())
        );
    }

    #[test]
    fn test_requirement_follows_shebang_for_unsigned_script() {
        let mut probe = StubProbe::default();
        probe.content.insert("/opt/run.py".into(), "text/x-python");
        probe.first_lines.insert("/opt/run.py".into(), "#!/usr/bin/python");
        let mut inspector = StubInspector::default();
        inspector
            .requirements
            .insert("/usr/bin/python".into(), "identifier \"com.apple.python\" and anchor apple");
        let resolver = IdentityResolver::new(&probe, &inspector);

        let requirement = resolver.requirement(Path::new("/opt/run.py"), None).unwrap();
        assert_eq!(requirement, "identifier \"com.apple.python\" and anchor apple");
        assert_eq!(
            inspector.inspected.borrow().last(),
            Some(&PathBuf::from("/usr/bin/python"))
        );
    }

    #[test]
    fn test_requirement_uses_signed_script_directly() {
        let mut probe = StubProbe::default();
        probe.content.insert("/opt/run.sh".into(), "text/x-shellscript");
        let mut inspector = StubInspector::default();
        inspector.requirements.insert("/opt/run.sh".into(), "identifier run");
        let resolver = IdentityResolver::new(&probe, &inspector);

        assert_eq!(resolver.requirement(Path::new("/opt/run.sh"), None).unwrap(), "identifier run");
    }

    #[test]
    fn test_requirement_errors() {
        let mut probe = StubProbe::default();
        probe.content.insert("/opt/env.py".into(), "text/x-python");
        probe.first_lines.insert("/opt/env.py".into(), "#!/usr/bin/env python3");
        probe.content.insert("/usr/local/bin/unsigned".into(), "application/x-mach-binary");
        probe.content.insert("/secret/tool".into(), "application/x-mach-binary");
        probe.unreadable.push("/secret/tool".into());
        let inspector = StubInspector::default();
        let resolver = IdentityResolver::new(&probe, &inspector);

        assert!(matches!(
            resolver.requirement(Path::new("/nope"), None),
            Err(ResolveError::NotFound { .. })
        ));
        assert!(matches!(
            resolver.requirement(Path::new("/secret/tool"), None),
            Err(ResolveError::PermissionDenied { .. })
        ));
        assert!(matches!(
            resolver.requirement(Path::new("/opt/env.py"), None),
            Err(ResolveError::UnsupportedInterpreter { .. })
        ));
        assert!(matches!(
            resolver.requirement(Path::new("/usr/local/bin/unsigned"), None),
            Err(ResolveError::Signing(SigningError::Unsigned { .. }))
        ));
    }

    #[test]
    fn test_requirement_uses_override_for_bare_executables() {
        let mut probe = StubProbe::default();
        probe.content.insert("/usr/local/bin/tool".into(), "application/x-mach-binary");
        let mut inspector = StubInspector::default();
        inspector.requirements.insert("/usr/local/bin/tool".into(), "identifier tool");
        let resolver = IdentityResolver::new(&probe, &inspector);

        let requirement = resolver
            .requirement(Path::new("/Volumes/Ext/tool"), Some(Path::new("/usr/local/bin/tool")))
            .unwrap();
        assert_eq!(requirement, "identifier tool");
    }
}
