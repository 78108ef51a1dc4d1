// Copyright (c) 2026 tccprofile contributors
// SPDX-License-Identifier: Apache-2.0

//! Profile Assembler
//!
//! Wraps a finished `Services` map in the root and nested payload metadata.
//!
//! # DDD Pattern: Application Service
//!
//! - **Layer:** Application
//! - **Responsibility:** Build the immutable `ProfileDocument`
//! - **Collaborators:**
//!   - Domain: `ProfileDocument`, `PolicyPayload`, removal schedule
//!
//! The root and nested payloads get distinct random UUIDs, rendered
//! uppercase. The nested identifier is `<root identifier>.<nested uuid>`.

use crate::domain::error::ProfileError;
use crate::domain::profile::{PolicyPayload, ProfileDocument, ProfileMetadata, Services};
use crate::domain::removal::removal_instant;
use tracing::{debug, warn};
use uuid::Uuid;

/// Optional removal controls for a profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovalOptions {
    /// Password required to remove the profile; stored in plain text.
    pub password: Option<String>,
    /// Local wall-clock time on the target, `YYYY-mm-dd HH:MM`.
    pub date: Option<String>,
    /// IANA time zone of the target machine.
    pub timezone: Option<String>,
}

pub struct ProfileAssembler;

impl ProfileAssembler {
    pub fn assemble(
        metadata: ProfileMetadata,
        services: Services,
        removal: &RemovalOptions,
    ) -> Result<ProfileDocument, ProfileError> {
        if let Some(field) = metadata.first_missing_field() {
            return Err(ProfileError::MissingMetadata(field));
        }
        if services.is_empty() {
            return Err(ProfileError::NoServices);
        }

        let removal_date = removal_instant(removal.date.as_deref(), removal.timezone.as_deref())?;
        let removal_password = removal.password.clone().filter(|p| !p.is_empty());
        if removal_password.is_some() {
            warn!("Removal password is stored in plain text; sign the profile before deploying it");
        }

        let (root_uuid, payload_uuid) = distinct_uuids();

        let payload = PolicyPayload {
            description: metadata.description.clone(),
            display_name: metadata.display_name.clone(),
            identifier: format!("{}.{}", metadata.identifier, payload_uuid),
            organization: metadata.organization.clone(),
            uuid: payload_uuid,
            services,
        };

        debug!(
            identifier = %metadata.identifier,
            uuid = %root_uuid,
            payload_identifier = %payload.identifier,
            entries = payload.services.entry_count(),
            "Assembled profile"
        );

        Ok(ProfileDocument {
            metadata,
            uuid: root_uuid,
            removal_password,
            removal_date,
            payload,
        })
    }
}

fn distinct_uuids() -> (String, String) {
    let root = Uuid::new_v4();
    let mut nested = Uuid::new_v4();
    while nested == root {
        nested = Uuid::new_v4();
    }
    (uppercase(root), uppercase(nested))
}

fn uppercase(uuid: Uuid) -> String {
    uuid.hyphenated().to_string().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::identity::ResolvedIdentity;
    use crate::domain::resource::ResourceKind;
    use crate::domain::service_entry::ServiceEntry;

    fn metadata() -> ProfileMetadata {
        ProfileMetadata {
            description: "Grants calendar access".to_string(),
            display_name: "TCC Whitelist".to_string(),
            identifier: "com.example.tcc".to_string(),
            organization: "Example Org".to_string(),
        }
    }

    fn services() -> Services {
        let mut services = Services::new();
        services.insert(
            ResourceKind::Calendar,
            ServiceEntry::new(
                true,
                "identifier \"com.example.foo\"".to_string(),
                "Allow Calendar control for Foo".to_string(),
                ResolvedIdentity::BundleId("com.example.foo".to_string()),
                None,
            ),
        );
        services
    }

    #[test]
    fn test_identifiers_and_uuids() {
        let doc = ProfileAssembler::assemble(metadata(), services(), &RemovalOptions::default()).unwrap();
        assert_ne!(doc.uuid(), doc.payload().uuid());
        assert_eq!(doc.uuid(), doc.uuid().to_uppercase());
        assert_eq!(
            doc.payload().identifier(),
            format!("{}.{}", doc.identifier(), doc.payload().uuid())
        );
        assert_ne!(doc.payload().identifier(), doc.identifier());
        assert_eq!(doc.version(), 1);
        assert_eq!(doc.scope().as_str(), "system");
    }

    #[test]
    fn test_removal_password() {
        let doc = ProfileAssembler::assemble(metadata(), services(), &RemovalOptions::default()).unwrap();
        assert!(!doc.removal_disallowed());
        assert_eq!(doc.removal_password(), None);

        let removal = RemovalOptions {
            password: Some("hunter2".to_string()),
            ..Default::default()
        };
        let doc = ProfileAssembler::assemble(metadata(), services(), &removal).unwrap();
        assert!(doc.removal_disallowed());
        assert_eq!(doc.removal_password(), Some("hunter2"));
    }

    #[test]
    fn test_removal_date_requires_timezone() {
        let removal = RemovalOptions {
            date: Some("2030-01-01 09:00".to_string()),
            ..Default::default()
        };
        let result = ProfileAssembler::assemble(metadata(), services(), &removal);
        assert!(matches!(result, Err(ProfileError::Schedule(_))));
    }

    #[test]
    fn test_rejects_empty_inputs() {
        let result = ProfileAssembler::assemble(metadata(), Services::new(), &RemovalOptions::default());
        assert!(matches!(result, Err(ProfileError::NoServices)));

        let mut incomplete = metadata();
        incomplete.organization.clear();
        let result = ProfileAssembler::assemble(incomplete, services(), &RemovalOptions::default());
        assert!(matches!(result, Err(ProfileError::MissingMetadata("Organization"))));
    }
}
