// Copyright (c) 2026 tccprofile contributors
// SPDX-License-Identifier: Apache-2.0

// Generator Configuration Types
//
// Optional YAML configuration for the profile generator:
// - Manifest format (apiVersion/kind/metadata/spec)
// - Default profile metadata used when CLI flags are omitted
// - Paths of the host tools used for classification and code signing
//
// A removal time zone is intentionally not configurable: it must describe the
// target machine and is always supplied together with the removal date.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_API_VERSION: &str = "tccprofile/v1";
pub const CONFIG_KIND: &str = "GeneratorConfig";
pub const CONFIG_PATH_ENV: &str = "TCCPROFILE_CONFIG_PATH";
pub const SIGN_CERTIFICATE_ENV: &str = "TCCPROFILE_SIGN_CERTIFICATE";

/// Top-level generator configuration manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfigManifest {
    /// API version (must be "tccprofile/v1")
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Resource kind (must be "GeneratorConfig")
    pub kind: String,

    pub metadata: ManifestMetadata,

    #[serde(default)]
    pub spec: GeneratorConfigSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestMetadata {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratorConfigSpec {
    /// Profile metadata defaults
    #[serde(default)]
    pub defaults: ProfileDefaults,

    /// Host tool locations
    #[serde(default)]
    pub tools: ToolPaths,
}

/// Fallback values for the profile metadata flags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDefaults {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Reverse-DNS profile identifier, e.g. "com.example.tcc"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,

    /// Signing identity name, as listed by `tccprofile identities`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sign_certificate: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolPaths {
    #[serde(default = "default_codesign")]
    pub codesign: PathBuf,

    /// Content classifier (`file --mime-type`)
    #[serde(default = "default_file")]
    pub file: PathBuf,

    /// Profile signer and identity listing (`security cms`, `security find-identity`)
    #[serde(default = "default_security")]
    pub security: PathBuf,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            codesign: default_codesign(),
            file: default_file(),
            security: default_security(),
        }
    }
}

fn default_codesign() -> PathBuf {
    PathBuf::from("/usr/bin/codesign")
}

fn default_file() -> PathBuf {
    PathBuf::from("/usr/bin/file")
}

fn default_security() -> PathBuf {
    PathBuf::from("/usr/bin/security")
}

impl Default for GeneratorConfigManifest {
    fn default() -> Self {
        Self {
            api_version: CONFIG_API_VERSION.to_string(),
            kind: CONFIG_KIND.to_string(),
            metadata: ManifestMetadata {
                name: "default".to_string(),
                version: None,
            },
            spec: GeneratorConfigSpec::default(),
        }
    }
}

impl GeneratorConfigManifest {
    /// Load configuration from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse configuration from YAML string
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> anyhow::Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Discover configuration file using precedence order
    /// 1. TCCPROFILE_CONFIG_PATH environment variable
    /// 2. ./tccprofile.yaml (working directory)
    /// 3. ~/.tccprofile/config.yaml (user home)
    /// 4. /etc/tccprofile/config.yaml (system)
    pub fn discover_config() -> Option<PathBuf> {
        Self::discover_from(std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
    }

    /// A missing environment path falls through to the standard locations.
    fn discover_from(env_path: Option<PathBuf>) -> Option<PathBuf> {
        env_path
            .into_iter()
            .chain(Self::candidate_paths())
            .find(|path| path.exists())
    }

    /// Standard locations checked after the environment variable, in order.
    pub fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("./tccprofile.yaml")];
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".tccprofile").join("config.yaml"));
        }
        paths.push(PathBuf::from("/etc/tccprofile/config.yaml"));
        paths
    }

    /// Load configuration with discovery, fallback to default
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        // An explicit path must exist and parse.
        if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            let mut config = Self::from_yaml_file(&path)
                .map_err(|e| anyhow::anyhow!("Failed to load config at {:?}: {}", path, e))?;
            config.apply_env_overrides();
            return Ok(config);
        }

        if let Some(config_path) = Self::discover_config() {
            tracing::info!("Loading configuration from discovered path: {:?}", config_path);
            let mut config = Self::from_yaml_file(&config_path)
                .map_err(|e| anyhow::anyhow!("Failed to load config at {:?}: {}", config_path, e))?;
            config.apply_env_overrides();
            Ok(config)
        } else {
            tracing::debug!("No configuration file found in standard locations. Using defaults.");
            let mut config = Self::default();
            config.apply_env_overrides();
            Ok(config)
        }
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(cert) = lookup(SIGN_CERTIFICATE_ENV).filter(|v| !v.trim().is_empty()) {
            tracing::info!("Environment override: {} set", SIGN_CERTIFICATE_ENV);
            self.spec.defaults.sign_certificate = Some(cert);
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_version != CONFIG_API_VERSION {
            anyhow::bail!(
                "Invalid apiVersion: '{}'. Must be '{}'",
                self.api_version,
                CONFIG_API_VERSION
            );
        }

        if self.kind != CONFIG_KIND {
            anyhow::bail!("Invalid kind: '{}'. Must be '{}'", self.kind, CONFIG_KIND);
        }

        if self.metadata.name.is_empty() {
            anyhow::bail!("metadata.name cannot be empty");
        }

        let tools = &self.spec.tools;
        for (name, path) in [
            ("codesign", &tools.codesign),
            ("file", &tools.file),
            ("security", &tools.security),
        ] {
            if path.as_os_str().is_empty() {
                anyhow::bail!("spec.tools.{} cannot be empty", name);
            }
            if !path.is_absolute() {
                anyhow::bail!("spec.tools.{} must be an absolute path: {:?}", name, path);
            }
        }

        if let Some(identifier) = &self.spec.defaults.identifier {
            if identifier.trim().is_empty() {
                anyhow::bail!("spec.defaults.identifier cannot be blank");
            }
        }

        Ok(())
    }
}
