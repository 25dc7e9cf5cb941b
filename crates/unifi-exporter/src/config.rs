//! Layered configuration: defaults, TOML file, `UNIFI_EXPORTER_*`
//! environment, then command-line flags.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use unifi_exporter_api::{ControllerPlatform, TlsMode, TransportConfig};
use unifi_exporter_core::DEFAULT_NAMESPACE;

use crate::cli::Cli;

const ENV_PREFIX: &str = "UNIFI_EXPORTER_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting '{field}'")]
    Missing { field: &'static str },

    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── File / environment shape ────────────────────────────────────────

/// Controller platform as written in config files and on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Platform {
    /// UniFi OS console (UDM, UCG, Cloud Key Gen2+)
    UnifiOs,
    /// Standalone Network Application
    Classic,
}

impl From<Platform> for ControllerPlatform {
    fn from(p: Platform) -> Self {
        match p {
            Platform::UnifiOs => Self::UnifiOs,
            Platform::Classic => Self::ClassicController,
        }
    }
}

#[derive(Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controller: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Plaintext in the file; prefer `UNIFI_EXPORTER_PASSWORD`.
    #[serde(default, skip_serializing)]
    pub password: Option<String>,

    /// Site names to scrape. Empty means every site the user can see.
    #[serde(default)]
    pub sites: Vec<String>,

    #[serde(default = "default_namespace")]
    pub namespace: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    /// HTTP timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            controller: None,
            username: None,
            password: None,
            sites: Vec::new(),
            namespace: default_namespace(),
            insecure: false,
            ca_cert: None,
            timeout: default_timeout(),
            platform: None,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("controller", &self.controller)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("sites", &self.sites)
            .field("namespace", &self.namespace)
            .field("insecure", &self.insecure)
            .field("ca_cert", &self.ca_cert)
            .field("timeout", &self.timeout)
            .field("platform", &self.platform)
            .finish()
    }
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.into()
}
fn default_timeout() -> u64 {
    30
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "unifi-exporter", "unifi-exporter").map_or_else(
        || PathBuf::from("unifi-exporter.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Loading ─────────────────────────────────────────────────────────

/// Load defaults, then the TOML file (missing is fine), then environment.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);

    let config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed(ENV_PREFIX))
        .extract()?;

    Ok(config)
}

impl Config {
    /// Apply command-line flags on top of file and environment values.
    pub fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(ref controller) = cli.controller {
            self.controller = Some(controller.clone());
        }
        if let Some(ref username) = cli.username {
            self.username = Some(username.clone());
        }
        if !cli.sites.is_empty() {
            self.sites.clone_from(&cli.sites);
        }
        if let Some(ref namespace) = cli.namespace {
            self.namespace.clone_from(namespace);
        }
        if cli.insecure {
            self.insecure = true;
        }
        if let Some(ref ca_cert) = cli.ca_cert {
            self.ca_cert = Some(ca_cert.clone());
        }
        if let Some(timeout) = cli.timeout {
            self.timeout = timeout;
        }
        if let Some(platform) = cli.platform {
            self.platform = Some(platform);
        }
    }

    /// Validate and turn into runtime settings.
    pub fn resolve(self) -> Result<Settings, ConfigError> {
        let controller = self
            .controller
            .ok_or(ConfigError::Missing { field: "controller" })?;
        let controller: Url = controller.parse().map_err(|_| ConfigError::Validation {
            field: "controller".into(),
            reason: format!("invalid URL: {controller}"),
        })?;

        let username = self
            .username
            .ok_or(ConfigError::Missing { field: "username" })?;
        let password = self
            .password
            .map(SecretString::from)
            .ok_or(ConfigError::Missing { field: "password" })?;

        if !is_valid_namespace(&self.namespace) {
            return Err(ConfigError::Validation {
                field: "namespace".into(),
                reason: format!(
                    "'{}' is not a valid metric name prefix ([a-zA-Z_:][a-zA-Z0-9_:]*)",
                    self.namespace
                ),
            });
        }

        let tls = if self.insecure {
            TlsMode::DangerAcceptInvalid
        } else if let Some(ca_path) = self.ca_cert {
            TlsMode::CustomCa(ca_path)
        } else {
            TlsMode::System
        };

        Ok(Settings {
            controller,
            username,
            password,
            sites: self.sites,
            namespace: self.namespace,
            platform: self.platform.map(ControllerPlatform::from),
            transport: TransportConfig {
                tls,
                timeout: Duration::from_secs(self.timeout),
                cookie_jar: None,
            },
        })
    }
}

fn is_valid_namespace(ns: &str) -> bool {
    let mut chars = ns.chars();
    match chars.next() {
        None => true,
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_' || first == ':')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
        }
    }
}

// ── Resolved settings ───────────────────────────────────────────────

/// Everything a scrape needs, validated.
#[derive(Debug)]
pub struct Settings {
    pub controller: Url,
    pub username: String,
    pub password: SecretString,
    pub sites: Vec<String>,
    pub namespace: String,
    /// `None` means detect.
    pub platform: Option<ControllerPlatform>,
    pub transport: TransportConfig,
}
