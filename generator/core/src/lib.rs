// Copyright (c) 2026 tccprofile contributors
// SPDX-License-Identifier: Apache-2.0
//! Privacy preferences (TCC/PPPC) configuration profile generator.
//!
//! Turns per-resource application paths into a `.mobileconfig` profile that
//! allows or denies those applications access to protected resources.
//!
//! # Architecture
//!
//! - **Layer:** Core System
//! - **Purpose:** Spec parsing, identity resolution, profile assembly and output

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use domain::*;
