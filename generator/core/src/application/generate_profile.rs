// Copyright (c) 2026 tccprofile contributors
// SPDX-License-Identifier: Apache-2.0

//! Generate Profile Use Case
//!
//! # DDD Pattern: Application Service
//!
//! - **Layer:** Application
//! - **Responsibility:** Run one complete generation, raw input to written profile
//! - **Collaborators:**
//!   - Domain: `ServiceSpecParser`, removal schedule
//!   - Application: `IdentityResolver`, `PayloadBuilder`, `ProfileAssembler`,
//!     `ProfileWriter`, `ProfileSigner`
//!
//! # Flow
//!
//! 1. Parse every raw spec (all-or-nothing)
//! 2. Check metadata, removal schedule and signing target before any tool runs
//! 3. Resolve identities and requirements, build `Services`
//! 4. Assemble the document in memory
//! 5. Write to the destination file, or stream to `out`
//! 6. Sign the written file when a certificate was requested

use crate::application::identity_resolver::IdentityResolver;
use crate::application::payload_builder::PayloadBuilder;
use crate::application::profile_assembler::{ProfileAssembler, RemovalOptions};
use crate::application::profile_writer::{ProfileSigner, ProfileWriter, WrittenProfile};
use crate::domain::app_spec::{RawServiceSpecs, ServiceSpecParser};
use crate::domain::error::{ProfileError, WriteError};
use crate::domain::identity::{IdentityProbe, SigningInspector};
use crate::domain::profile::{ProfileDocument, ProfileMetadata};
use crate::domain::removal::removal_instant;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Everything a single generation needs.
#[derive(Debug, Clone)]
pub struct GenerateProfileRequest {
    pub services: RawServiceSpecs,
    pub metadata: ProfileMetadata,
    /// Grant access instead of denying it. Ignored for deny-only resources.
    pub allow: bool,
    pub removal: RemovalOptions,
    /// `None` streams the profile to the caller's writer.
    pub output: Option<PathBuf>,
    pub sign_certificate: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Written(WrittenProfile),
    Streamed,
}

pub struct GenerateProfile<'a, P: IdentityProbe, S: SigningInspector> {
    probe: &'a P,
    inspector: &'a S,
}

impl<'a, P: IdentityProbe, S: SigningInspector> GenerateProfile<'a, P, S> {
    pub fn new(probe: &'a P, inspector: &'a S) -> Self {
        Self { probe, inspector }
    }

    /// Steps 1 to 4: produce the in-memory document without writing it.
    pub fn build(&self, request: &GenerateProfileRequest) -> Result<ProfileDocument, ProfileError> {
        let specs = ServiceSpecParser::parse(&request.services)?;
        if specs.is_empty() {
            return Err(ProfileError::NoServices);
        }
        if let Some(field) = request.metadata.first_missing_field() {
            return Err(ProfileError::MissingMetadata(field));
        }
        removal_instant(
            request.removal.date.as_deref(),
            request.removal.timezone.as_deref(),
        )?;
        if request.sign_certificate.is_some() && request.output.is_none() {
            return Err(WriteError::SigningRequiresFile.into());
        }

        info!(
            resources = specs.iter().count(),
            applications = specs.app_count(),
            allow = request.allow,
            "Resolving applications"
        );

        let builder = PayloadBuilder::new(IdentityResolver::new(self.probe, self.inspector));
        let services = builder.build(&specs, request.allow)?;

        ProfileAssembler::assemble(request.metadata.clone(), services, &request.removal)
    }

    /// Full run. Nothing is written if any step before the write fails.
    pub fn execute<W: Write>(
        &self,
        request: &GenerateProfileRequest,
        out: &mut W,
    ) -> Result<GenerationOutcome, ProfileError> {
        let document = self.build(request)?;

        match &request.output {
            Some(path) => {
                let signer = ProfileSigner::new(self.inspector);
                let signing = request
                    .sign_certificate
                    .as_deref()
                    .map(|certificate| (&signer, certificate));
                let written = ProfileWriter::write_file(&document, path, signing)?;
                Ok(GenerationOutcome::Written(written))
            }
            None => {
                ProfileWriter::write_to(&document, out)?;
                Ok(GenerationOutcome::Streamed)
            }
        }
    }
}
