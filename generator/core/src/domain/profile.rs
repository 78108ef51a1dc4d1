// Copyright (c) 2026 tccprofile contributors
// SPDX-License-Identifier: Apache-2.0
//! # Profile Document
//!
//! In-memory form of the configuration profile: root metadata plus exactly
//! one privacy preferences policy payload carrying the `Services` map.
//!
//! ```text
//! ProfileDocument (PayloadType = Configuration, PayloadScope = system)
//! └── PolicyPayload (PayloadType = com.apple.TCC.configuration-profile-policy)
//!     └── Services: ResourceKind -> [ServiceEntry]
//! ```
//!
//! Documents are built once by the assembler and never mutated afterwards;
//! fields are read through accessors.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Profile aggregate and its fixed platform constants

use crate::domain::resource::ResourceKind;
use crate::domain::service_entry::ServiceEntry;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Root `PayloadType`.
pub const PROFILE_PAYLOAD_TYPE: &str = "Configuration";
/// Nested payload `PayloadType`.
pub const POLICY_PAYLOAD_TYPE: &str = "com.apple.TCC.configuration-profile-policy";
/// The consuming platform requires `PayloadVersion` to be exactly 1.
pub const PAYLOAD_VERSION: u64 = 1;
/// Canonical file extension for profiles.
pub const PROFILE_EXTENSION: &str = "mobileconfig";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadScope {
    System,
}

impl PayloadScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayloadScope::System => "system",
        }
    }
}

/// User-supplied descriptive fields shared by the root and nested payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileMetadata {
    pub description: String,
    pub display_name: String,
    pub identifier: String,
    pub organization: String,
}

impl ProfileMetadata {
    /// Name of the first empty field, if any.
    pub fn first_missing_field(&self) -> Option<&'static str> {
        [
            ("Description", &self.description),
            ("Name", &self.display_name),
            ("Identifier", &self.identifier),
            ("Organization", &self.organization),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
    }
}

/// Resource kind -> ordered, de-duplicated entries. Iterates in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Services {
    entries: BTreeMap<ResourceKind, Vec<ServiceEntry>>,
}

impl Services {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `entry` under `kind` unless an identical entry is already present.
    /// Returns `true` when the entry was added.
    pub fn insert(&mut self, kind: ResourceKind, entry: ServiceEntry) -> bool {
        let list = self.entries.entry(kind).or_default();
        if list.contains(&entry) {
            return false;
        }
        list.push(entry);
        true
    }

    pub fn get(&self, kind: ResourceKind) -> Option<&[ServiceEntry]> {
        self.entries.get(&kind).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, &[ServiceEntry])> {
        self.entries.iter().map(|(kind, list)| (*kind, list.as_slice()))
    }

    pub fn kinds(&self) -> impl Iterator<Item = ResourceKind> + '_ {
        self.entries.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}

/// The single element of the root `PayloadContent` array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyPayload {
    pub(crate) description: String,
    pub(crate) display_name: String,
    pub(crate) identifier: String,
    pub(crate) organization: String,
    pub(crate) uuid: String,
    pub(crate) services: Services,
}

impl PolicyPayload {
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Root identifier + `.` + this payload's UUID.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn organization(&self) -> &str {
        &self.organization
    }

    pub fn payload_type(&self) -> &'static str {
        POLICY_PAYLOAD_TYPE
    }

    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    pub fn version(&self) -> u64 {
        PAYLOAD_VERSION
    }

    pub fn services(&self) -> &Services {
        &self.services
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileDocument {
    pub(crate) metadata: ProfileMetadata,
    pub(crate) uuid: String,
    pub(crate) removal_password: Option<String>,
    pub(crate) removal_date: Option<DateTime<Utc>>,
    pub(crate) payload: PolicyPayload,
}

impl ProfileDocument {
    pub fn description(&self) -> &str {
        &self.metadata.description
    }

    pub fn display_name(&self) -> &str {
        &self.metadata.display_name
    }

    pub fn identifier(&self) -> &str {
        &self.metadata.identifier
    }

    pub fn organization(&self) -> &str {
        &self.metadata.organization
    }

    pub fn scope(&self) -> PayloadScope {
        PayloadScope::System
    }

    pub fn payload_type(&self) -> &'static str {
        PROFILE_PAYLOAD_TYPE
    }

    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    pub fn version(&self) -> u64 {
        PAYLOAD_VERSION
    }

    /// True exactly when a removal password is set.
    pub fn removal_disallowed(&self) -> bool {
        self.removal_password.is_some()
    }

    /// Stored in plain text; sign the profile before deploying it.
    pub fn removal_password(&self) -> Option<&str> {
        self.removal_password.as_deref()
    }

    pub fn removal_date(&self) -> Option<DateTime<Utc>> {
        self.removal_date
    }

    pub fn payload(&self) -> &PolicyPayload {
        &self.payload
    }

    pub fn services(&self) -> &Services {
        &self.payload.services
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::identity::ResolvedIdentity;

    fn entry(id: &str) -> ServiceEntry {
        ServiceEntry::new(
            true,
            format!("identifier \"{}\"", id),
            format!("Allow Calendar control for {}", id),
            ResolvedIdentity::BundleId(id.to_string()),
            None,
        )
    }

    #[test]
    fn test_services_deduplicates() {
        let mut services = Services::new();
        assert!(services.insert(ResourceKind::Calendar, entry("com.a")));
        assert!(!services.insert(ResourceKind::Calendar, entry("com.a")));
        assert!(services.insert(ResourceKind::Calendar, entry("com.b")));
        assert_eq!(services.get(ResourceKind::Calendar).unwrap().len(), 2);
    }

    #[test]
    fn test_services_iterate_in_catalog_order() {
        let mut services = Services::new();
        services.insert(ResourceKind::AppleEvents, entry("com.a"));
        services.insert(ResourceKind::AddressBook, entry("com.a"));
        services.insert(ResourceKind::Camera, entry("com.a"));
        let kinds: Vec<_> = services.kinds().collect();
        assert_eq!(
            kinds,
            vec![ResourceKind::AddressBook, ResourceKind::Camera, ResourceKind::AppleEvents]
        );
    }

    #[test]
    fn test_metadata_missing_field() {
        let metadata = ProfileMetadata {
            description: "d".to_string(),
            display_name: "  ".to_string(),
            identifier: "com.example".to_string(),
            organization: String::new(),
        };
        assert_eq!(metadata.first_missing_field(), Some("Name"));
    }
}
