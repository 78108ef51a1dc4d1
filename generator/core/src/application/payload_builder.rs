// Copyright (c) 2026 tccprofile contributors
// SPDX-License-Identifier: Apache-2.0

//! Payload Builder
//!
//! Turns parsed application specs into the concrete `Services` map.
//!
//! # DDD Pattern: Application Service
//!
//! - **Layer:** Application
//! - **Responsibility:** Build one allow/deny entry per distinct application spec
//! - **Collaborators:**
//!   - Domain: `ServiceSpecs`, `ServiceEntry`, `Services`, `ResourceKind`
//!   - Application: `IdentityResolver`
//!
//! Deny-only resources always produce `allowed = false`. Resources iterate in
//! catalog order; entries keep the order of their specs.

use crate::application::identity_resolver::IdentityResolver;
use crate::domain::app_spec::{AppRef, ServiceSpecs};
use crate::domain::identity::{IdentityProbe, ResolveError, ResolvedIdentity, SigningInspector};
use crate::domain::profile::Services;
use crate::domain::resource::ResourceKind;
use crate::domain::service_entry::{allow_statement, ReceiverIdentity, ServiceEntry};
use tracing::{debug, info};

pub struct PayloadBuilder<'a, P: IdentityProbe, S: SigningInspector> {
    resolver: IdentityResolver<'a, P, S>,
}

impl<'a, P: IdentityProbe, S: SigningInspector> PayloadBuilder<'a, P, S> {
    pub fn new(resolver: IdentityResolver<'a, P, S>) -> Self {
        Self { resolver }
    }

    /// Build the services map. The first resolution failure aborts the build.
    pub fn build(&self, specs: &ServiceSpecs, allow: bool) -> Result<Services, ResolveError> {
        let mut services = Services::new();

        for (kind, app_specs) in specs.iter() {
            let allowed = entry_allowed(kind, allow);
            if allow && !allowed {
                info!(resource = %kind, "Resource is deny-only, entries will deny access");
            }

            for spec in app_specs {
                let (identity, code_requirement) = self.resolve_app(&spec.sending)?;

                let (receiver, comment) = match (&spec.receiving, kind.requires_receiver()) {
                    (Some(receiving), true) => {
                        let (receiver_identity, receiver_requirement) = self.resolve_app(receiving)?;
                        let comment = format!(
                            "{} {} to send {} control to {}",
                            allow_statement(allowed),
                            spec.sending.display_name(),
                            kind,
                            receiving.display_name()
                        );
                        (
                            Some(ReceiverIdentity {
                                identity: receiver_identity,
                                code_requirement: receiver_requirement,
                            }),
                            comment,
                        )
                    }
                    _ => (None, control_comment(kind, allowed, &spec.sending)),
                };

                let entry = ServiceEntry::new(allowed, code_requirement, comment, identity, receiver);
                if !services.insert(kind, entry) {
                    debug!(resource = %kind, path = %spec.sending.path.display(), "Skipping identical entry");
                }
            }
        }

        Ok(services)
    }

    fn resolve_app(
        &self,
        app: &AppRef,
    ) -> Result<(ResolvedIdentity, String), ResolveError> {
        let path_override = app.path_override.as_deref();
        let code_requirement = self.resolver.requirement(&app.path, path_override)?;
        let identity = self.resolver.resolve(&app.path, path_override);
        debug!(
            path = %app.path.display(),
            identifier = %identity.identifier(),
            identifier_type = %identity.identifier_type(),
            "Resolved application"
        );
        Ok((identity, code_requirement))
    }
}

/// `global_allow AND NOT deny_only`.
pub fn entry_allowed(kind: ResourceKind, global_allow: bool) -> bool {
    global_allow && !kind.is_deny_only()
}

fn control_comment(kind: ResourceKind, allowed: bool, app: &AppRef) -> String {
    format!("{} {} control for {}", allow_statement(allowed), kind, app.display_name())
}
