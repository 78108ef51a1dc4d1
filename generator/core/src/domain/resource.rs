// Copyright (c) 2026 tccprofile contributors
// SPDX-License-Identifier: Apache-2.0
//! # Resource Catalog
//!
//! The fixed set of protected resources a privacy preferences policy can
//! govern. Each variant carries the attributes the payload builder consults:
//!
//! | Attribute | Variants |
//! |-----------|----------|
//! | deny-only | `Camera`, `ListenEvent`, `Microphone`, `ScreenCapture` |
//! | requires receiver | `AppleEvents` |
//!
//! Declaration order is the catalog order. `Ord` is derived, so a
//! `BTreeMap<ResourceKind, _>` iterates in catalog order.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Replaces string-keyed service lookups with an exhaustive enum

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("Unknown resource kind: {0}")]
pub struct UnknownResourceKind(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ResourceKind {
    AddressBook,
    Calendar,
    Reminders,
    Photos,
    Camera,
    FileProviderPresence,
    ListenEvent,
    MediaLibrary,
    Microphone,
    Accessibility,
    PostEvent,
    ScreenCapture,
    SpeechRecognition,
    SystemPolicyAllFiles,
    SystemPolicyDesktopFolder,
    SystemPolicyDocumentsFolder,
    SystemPolicyDownloadsFolder,
    SystemPolicyRemovableVolumes,
    SystemPolicyNetworkVolumes,
    SystemPolicySysAdminFiles,
    AppleEvents,
}

impl ResourceKind {
    /// Every resource kind, in catalog order.
    pub const ALL: [ResourceKind; 21] = [
        ResourceKind::AddressBook,
        ResourceKind::Calendar,
        ResourceKind::Reminders,
        ResourceKind::Photos,
        ResourceKind::Camera,
        ResourceKind::FileProviderPresence,
        ResourceKind::ListenEvent,
        ResourceKind::MediaLibrary,
        ResourceKind::Microphone,
        ResourceKind::Accessibility,
        ResourceKind::PostEvent,
        ResourceKind::ScreenCapture,
        ResourceKind::SpeechRecognition,
        ResourceKind::SystemPolicyAllFiles,
        ResourceKind::SystemPolicyDesktopFolder,
        ResourceKind::SystemPolicyDocumentsFolder,
        ResourceKind::SystemPolicyDownloadsFolder,
        ResourceKind::SystemPolicyRemovableVolumes,
        ResourceKind::SystemPolicyNetworkVolumes,
        ResourceKind::SystemPolicySysAdminFiles,
        ResourceKind::AppleEvents,
    ];

    /// Key used for this resource in the profile's `Services` dictionary.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::AddressBook => "AddressBook",
            ResourceKind::Calendar => "Calendar",
            ResourceKind::Reminders => "Reminders",
            ResourceKind::Photos => "Photos",
            ResourceKind::Camera => "Camera",
            ResourceKind::FileProviderPresence => "FileProviderPresence",
            ResourceKind::ListenEvent => "ListenEvent",
            ResourceKind::MediaLibrary => "MediaLibrary",
            ResourceKind::Microphone => "Microphone",
            ResourceKind::Accessibility => "Accessibility",
            ResourceKind::PostEvent => "PostEvent",
            ResourceKind::ScreenCapture => "ScreenCapture",
            ResourceKind::SpeechRecognition => "SpeechRecognition",
            ResourceKind::SystemPolicyAllFiles => "SystemPolicyAllFiles",
            ResourceKind::SystemPolicyDesktopFolder => "SystemPolicyDesktopFolder",
            ResourceKind::SystemPolicyDocumentsFolder => "SystemPolicyDocumentsFolder",
            ResourceKind::SystemPolicyDownloadsFolder => "SystemPolicyDownloadsFolder",
            ResourceKind::SystemPolicyRemovableVolumes => "SystemPolicyRemovableVolumes",
            ResourceKind::SystemPolicyNetworkVolumes => "SystemPolicyNetworkVolumes",
            ResourceKind::SystemPolicySysAdminFiles => "SystemPolicySysAdminFiles",
            ResourceKind::AppleEvents => "AppleEvents",
        }
    }

    /// The platform refuses to let a profile grant these; entries are always `Allowed = false`.
    pub fn is_deny_only(&self) -> bool {
        matches!(
            self,
            ResourceKind::Camera
                | ResourceKind::ListenEvent
                | ResourceKind::Microphone
                | ResourceKind::ScreenCapture
        )
    }

    /// Entries for this resource name both a sending and a receiving application.
    pub fn requires_receiver(&self) -> bool {
        matches!(self, ResourceKind::AppleEvents)
    }

    /// Short human description, shown by `tccprofile services`.
    pub fn description(&self) -> &'static str {
        match self {
            ResourceKind::AddressBook => "Contacts",
            ResourceKind::Calendar => "Calendars",
            ResourceKind::Reminders => "Reminders",
            ResourceKind::Photos => "Photos library",
            ResourceKind::Camera => "Camera",
            ResourceKind::FileProviderPresence => "File Provider presence",
            ResourceKind::ListenEvent => "Input monitoring",
            ResourceKind::MediaLibrary => "Apple Music, music and video activity, media library",
            ResourceKind::Microphone => "Microphone",
            ResourceKind::Accessibility => "Control the computer via accessibility APIs",
            ResourceKind::PostEvent => "Send CoreGraphics events",
            ResourceKind::ScreenCapture => "Screen recording",
            ResourceKind::SpeechRecognition => "Speech recognition",
            ResourceKind::SystemPolicyAllFiles => "All protected files",
            ResourceKind::SystemPolicyDesktopFolder => "Desktop folder",
            ResourceKind::SystemPolicyDocumentsFolder => "Documents folder",
            ResourceKind::SystemPolicyDownloadsFolder => "Downloads folder",
            ResourceKind::SystemPolicyRemovableVolumes => "Removable volumes",
            ResourceKind::SystemPolicyNetworkVolumes => "Network volumes",
            ResourceKind::SystemPolicySysAdminFiles => "System administration files",
            ResourceKind::AppleEvents => "Send restricted Apple Events to another application",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = UnknownResourceKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownResourceKind(s.to_string()))
    }
}
