// Copyright (c) 2026 tccprofile contributors
// SPDX-License-Identifier: Apache-2.0
//! Domain model for privacy preferences profiles: the resource catalog,
//! application specs, identities, service entries, the profile aggregate and
//! the generator configuration.

pub mod app_spec;
pub mod error;
pub mod generator_config;
pub mod identity;
pub mod profile;
pub mod removal;
pub mod resource;
pub mod service_entry;

pub use app_spec::{AppRef, AppSpec, RawServiceSpecs, ServiceSpecParser, ServiceSpecs, SpecError};
pub use error::{ProfileError, WriteError};
pub use identity::{
    ContentType, IdentifierType, IdentityProbe, ResolveError, ResolvedIdentity, SigningError,
    SigningInspector, ToolError,
};
pub use profile::{PolicyPayload, ProfileDocument, ProfileMetadata, Services};
pub use resource::ResourceKind;
pub use service_entry::{ReceiverIdentity, ServiceEntry};
