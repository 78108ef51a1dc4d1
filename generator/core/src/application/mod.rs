// Copyright (c) 2026 tccprofile contributors
// SPDX-License-Identifier: Apache-2.0

pub mod generate_profile;
pub mod identity_resolver;
pub mod payload_builder;
pub mod profile_assembler;
pub mod profile_writer;

// Re-export use cases for convenience
pub use generate_profile::{GenerateProfile, GenerateProfileRequest, GenerationOutcome};
pub use identity_resolver::IdentityResolver;
pub use payload_builder::PayloadBuilder;
pub use profile_assembler::{ProfileAssembler, RemovalOptions};
pub use profile_writer::{ProfileSigner, ProfileWriter, WrittenProfile};
