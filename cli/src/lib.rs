// Copyright (c) 2026 tccprofile contributors
// SPDX-License-Identifier: Apache-2.0
//! tccprofile CLI library - exposes testable components
//!
//! # Architecture
//!
//! - **Layer:** Interface / Presentation Layer
//! - **Purpose:** Argument parsing and terminal output around `tccprofile-core`

pub mod commands;
