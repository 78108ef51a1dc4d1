// Copyright (c) 2026 tccprofile contributors
// SPDX-License-Identifier: Apache-2.0

//! Profile generation command
//!
//! Every resource flag takes one or more application specs:
//!
//! ```text
//! /Path/App.app[:/Override/Path][,/Receiving/App.app[:/Override/Path]]
//! ```
//!
//! The receiving half is only read by `--apple-event`.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use tccprofile_core::application::{
    GenerateProfile, GenerateProfileRequest, GenerationOutcome, RemovalOptions,
};
use tccprofile_core::domain::generator_config::{GeneratorConfigManifest, ProfileDefaults};
use tccprofile_core::infrastructure::{CodesignInspector, SystemProbe};
use tccprofile_core::{ProfileMetadata, RawServiceSpecs, ResourceKind};

#[derive(Args, Debug, Default)]
pub struct GenerateArgs {
    /// AddressBook payload for the given applications
    #[arg(long = "address-book", visible_alias = "ab", value_name = "APP", num_args = 1..)]
    pub address_book: Vec<String>,

    /// Calendar payload for the given applications
    #[arg(long, visible_alias = "cal", value_name = "APP", num_args = 1..)]
    pub calendar: Vec<String>,

    /// Reminders payload for the given applications
    #[arg(long, visible_alias = "rem", value_name = "APP", num_args = 1..)]
    pub reminders: Vec<String>,

    /// Photos payload for the given applications
    #[arg(long, visible_alias = "pho", value_name = "APP", num_args = 1..)]
    pub photos: Vec<String>,

    /// Camera payload (deny only)
    #[arg(long, visible_alias = "cam", value_name = "APP", num_args = 1..)]
    pub camera: Vec<String>,

    /// ListenEvent payload (deny only)
    #[arg(long, visible_alias = "lis", value_name = "APP", num_args = 1..)]
    pub listenevents: Vec<String>,

    /// ScreenCapture payload (deny only)
    #[arg(long, visible_alias = "screen", value_name = "APP", num_args = 1..)]
    pub screencapture: Vec<String>,

    /// Microphone payload (deny only)
    #[arg(long, visible_alias = "mic", value_name = "APP", num_args = 1..)]
    pub microphone: Vec<String>,

    /// Accessibility payload for the given applications
    #[arg(long, visible_alias = "acc", value_name = "APP", num_args = 1..)]
    pub accessibility: Vec<String>,

    /// PostEvent payload, allowing synthetic keyboard and mouse events
    #[arg(long = "post-event", visible_alias = "pe", value_name = "APP", num_args = 1..)]
    pub post_event: Vec<String>,

    /// SystemPolicyAllFiles payload for the given applications
    #[arg(long, visible_alias = "af", value_name = "APP", num_args = 1..)]
    pub allfiles: Vec<String>,

    /// FileProviderPresence payload for the given applications
    #[arg(long, visible_alias = "file", value_name = "APP", num_args = 1..)]
    pub fileprovider: Vec<String>,

    /// MediaLibrary payload for the given applications
    #[arg(long, visible_alias = "media", value_name = "APP", num_args = 1..)]
    pub medialibrary: Vec<String>,

    /// SpeechRecognition payload for the given applications
    #[arg(long, visible_alias = "speech", value_name = "APP", num_args = 1..)]
    pub speechrecognition: Vec<String>,

    /// SystemPolicyDesktopFolder payload for the given applications
    #[arg(long, visible_alias = "desk", value_name = "APP", num_args = 1..)]
    pub desktopfolder: Vec<String>,

    /// SystemPolicyDocumentsFolder payload for the given applications
    #[arg(long, visible_alias = "doc", value_name = "APP", num_args = 1..)]
    pub documentsfolder: Vec<String>,

    /// SystemPolicyDownloadsFolder payload for the given applications
    #[arg(long, visible_alias = "down", value_name = "APP", num_args = 1..)]
    pub downloadsfolder: Vec<String>,

    /// SystemPolicyRemovableVolumes payload for the given applications
    #[arg(long, visible_alias = "rvol", value_name = "APP", num_args = 1..)]
    pub removablevolumes: Vec<String>,

    /// SystemPolicyNetworkVolumes payload for the given applications
    #[arg(long, visible_alias = "nvol", value_name = "APP", num_args = 1..)]
    pub networkvolumes: Vec<String>,

    /// AppleEvents payload: each value is SENDING,RECEIVING
    #[arg(long = "apple-event", visible_alias = "ae", value_name = "SENDER,RECEIVER", num_args = 1..)]
    pub apple_event: Vec<String>,

    /// SystemPolicySysAdminFiles payload for the given applications
    #[arg(long, visible_alias = "sf", value_name = "APP", num_args = 1..)]
    pub sysadminfiles: Vec<String>,

    /// Allow access instead of denying it (deny-only resources still deny)
    #[arg(long)]
    pub allow: bool,

    /// Write the profile here (extension forced to .mobileconfig); default stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Profile description
    #[arg(long = "payload-description", visible_alias = "pd", value_name = "TEXT")]
    pub payload_description: Option<String>,

    /// Profile display name
    #[arg(long = "payload-name", visible_alias = "pn", value_name = "TEXT")]
    pub payload_name: Option<String>,

    /// Profile identifier, e.g. org.example.tcc
    #[arg(long = "payload-identifier", visible_alias = "pi", value_name = "ID")]
    pub payload_identifier: Option<String>,

    /// Organization name
    #[arg(long = "payload-org", visible_alias = "po", value_name = "TEXT")]
    pub payload_org: Option<String>,

    /// Only allow removal with this password (stored in plain text)
    #[arg(long, value_name = "PASSWORD")]
    pub removable: Option<String>,

    /// Sign the written profile with this certificate (see `tccprofile identities`)
    #[arg(short, long, value_name = "CERTIFICATE")]
    pub sign: Option<String>,

    /// Remove the profile automatically at this local time on the target
    #[arg(long = "removal-date", value_name = "YYYY-mm-dd HH:MM")]
    pub removal_date: Option<String>,

    /// IANA time zone of the target, e.g. Australia/Brisbane
    #[arg(long = "timezone", visible_alias = "tz", value_name = "ZONE")]
    pub timezone: Option<String>,
}

impl GenerateArgs {
    /// Raw specs keyed by resource; flags left unset contribute nothing.
    pub fn raw_specs(&self) -> RawServiceSpecs {
        let by_kind: [(ResourceKind, &Vec<String>); 21] = [
            (ResourceKind::AddressBook, &self.address_book),
            (ResourceKind::Calendar, &self.calendar),
            (ResourceKind::Reminders, &self.reminders),
            (ResourceKind::Photos, &self.photos),
            (ResourceKind::Camera, &self.camera),
            (ResourceKind::FileProviderPresence, &self.fileprovider),
            (ResourceKind::ListenEvent, &self.listenevents),
            (ResourceKind::MediaLibrary, &self.medialibrary),
            (ResourceKind::Microphone, &self.microphone),
            (ResourceKind::Accessibility, &self.accessibility),
            (ResourceKind::PostEvent, &self.post_event),
            (ResourceKind::ScreenCapture, &self.screencapture),
            (ResourceKind::SpeechRecognition, &self.speechrecognition),
            (ResourceKind::SystemPolicyAllFiles, &self.allfiles),
            (ResourceKind::SystemPolicyDesktopFolder, &self.desktopfolder),
            (ResourceKind::SystemPolicyDocumentsFolder, &self.documentsfolder),
            (ResourceKind::SystemPolicyDownloadsFolder, &self.downloadsfolder),
            (ResourceKind::SystemPolicyRemovableVolumes, &self.removablevolumes),
            (ResourceKind::SystemPolicyNetworkVolumes, &self.networkvolumes),
            (ResourceKind::SystemPolicySysAdminFiles, &self.sysadminfiles),
            (ResourceKind::AppleEvents, &self.apple_event),
        ];

        by_kind
            .into_iter()
            .filter(|(_, specs)| !specs.is_empty())
            .map(|(kind, specs)| (kind, specs.clone()))
            .collect()
    }

    /// Flags win over configured defaults.
    pub fn metadata(&self, defaults: &ProfileDefaults) -> ProfileMetadata {
        let pick = |flag: &Option<String>, default: &Option<String>| {
            flag.clone().or_else(|| default.clone()).unwrap_or_default()
        };
        ProfileMetadata {
            description: pick(&self.payload_description, &defaults.description),
            display_name: pick(&self.payload_name, &defaults.display_name),
            identifier: pick(&self.payload_identifier, &defaults.identifier),
            organization: pick(&self.payload_org, &defaults.organization),
        }
    }

    /// An explicit `--sign` always counts. The configured certificate only
    /// applies when the profile goes to a file.
    fn sign_certificate(&self, defaults: &ProfileDefaults) -> Option<String> {
        self.sign.clone().or_else(|| {
            self.output
                .as_ref()
                .and_then(|_| defaults.sign_certificate.clone())
        })
    }

    pub fn request(&self, defaults: &ProfileDefaults) -> GenerateProfileRequest {
        GenerateProfileRequest {
            services: self.raw_specs(),
            metadata: self.metadata(defaults),
            allow: self.allow,
            removal: RemovalOptions {
                password: self.removable.clone(),
                date: self.removal_date.clone(),
                timezone: self.timezone.clone(),
            },
            output: self.output.clone(),
            sign_certificate: self.sign_certificate(defaults),
        }
    }
}

pub fn execute(args: GenerateArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = GeneratorConfigManifest::load_or_default(config_path)
        .context("Failed to load configuration")?;
    config
        .validate()
        .context("Configuration validation failed")?;

    let request = args.request(&config.spec.defaults);

    let tools = &config.spec.tools;
    let probe = SystemProbe::new(&tools.file);
    let inspector = CodesignInspector::new(&tools.codesign, &tools.security);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let outcome = GenerateProfile::new(&probe, &inspector)
        .execute(&request, &mut out)
        .context("Failed to generate profile")?;

    if let GenerationOutcome::Written(written) = outcome {
        println!(
            "{}",
            format!("✓ Profile written: {}", written.path.display()).green()
        );
        if let Some(signed) = written.signed_path {
            println!(
                "{}",
                format!("✓ Signed profile written: {}", signed.display()).green()
            );
        }
    }

    Ok(())
}
