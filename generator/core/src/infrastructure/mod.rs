// Copyright (c) 2026 tccprofile contributors
// SPDX-License-Identifier: Apache-2.0
//! Adapters onto the host system: external tools, bundle metadata and the
//! plist output format.

pub mod codesign;
pub mod plist_codec;
pub mod signing_identities;
pub mod system_probe;

pub use codesign::CodesignInspector;
pub use system_probe::SystemProbe;
