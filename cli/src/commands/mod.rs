// Copyright (c) 2026 tccprofile contributors
// SPDX-License-Identifier: Apache-2.0

//! Command implementations for the tccprofile CLI

pub mod config;
pub mod generate;
pub mod identities;
pub mod services;

pub use self::config::ConfigCommand;
pub use self::generate::GenerateArgs;
