// Copyright (c) 2026 tccprofile contributors
// SPDX-License-Identifier: Apache-2.0
//! Aggregate error for a profile generation run.

use crate::domain::app_spec::SpecError;
use crate::domain::identity::{ResolveError, SigningError};
use crate::domain::removal::ScheduleError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("Failed to encode profile: {0}")]
    Encode(String),

    #[error("Signing requires an output file path; profiles written to stdout cannot be signed")]
    SigningRequiresFile,

    #[error("Output path {path:?} has no file name")]
    InvalidPath { path: PathBuf },

    #[error("Failed to write profile to {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Any failure that aborts generation. No file is written when one occurs
/// before the write step.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("No application was supplied for any resource")]
    NoServices,

    #[error("Missing profile metadata: {0} must not be empty")]
    MissingMetadata(&'static str),

    #[error(transparent)]
    Spec(#[from] SpecError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Signing(#[from] SigningError),

    #[error(transparent)]
    Write(#[from] WriteError),
}
