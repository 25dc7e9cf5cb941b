//! Exporter error types with miette diagnostics.
//!
//! Maps config, API and registry failures into user-facing errors with
//! actionable help text and a distinct process exit code.

use miette::Diagnostic;
use thiserror::Error;

use unifi_exporter_core::{CollectError, RegistryError};

use crate::config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const CONFIG: i32 = 3;
    pub const AUTH: i32 = 4;
    pub const CONNECTION: i32 = 5;
    pub const SCRAPE: i32 = 6;
}

#[derive(Debug, Error, Diagnostic)]
pub enum ExporterError {
    // ── Configuration ────────────────────────────────────────────────
    #[error("Invalid configuration")]
    #[diagnostic(
        code(unifi_exporter::config),
        help(
            "Set controller, username and password in {path},\n\
             via UNIFI_EXPORTER_* environment variables, or with flags.\n\
             Run: unifi-exporter --help"
        )
    )]
    Config {
        #[source]
        source: ConfigError,
        path: String,
    },

    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to controller at {url}")]
    #[diagnostic(
        code(unifi_exporter::connection_failed),
        help(
            "Check that the controller is running and reachable.\n\
             For self-signed certificates use --insecure (-k) or --ca-cert."
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: unifi_exporter_api::Error,
    },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed for user '{username}'")]
    #[diagnostic(
        code(unifi_exporter::auth_failed),
        help("Verify the username and password. A local (non-SSO) account is required.")
    )]
    AuthFailed {
        username: String,
        #[source]
        source: unifi_exporter_api::Error,
    },

    // ── Sites ────────────────────────────────────────────────────────
    #[error("Site '{name}' not found on controller")]
    #[diagnostic(
        code(unifi_exporter::site_not_found),
        help("Available sites: {available}")
    )]
    SiteNotFound { name: String, available: String },

    // ── Scrape ───────────────────────────────────────────────────────
    #[error("Controller API error")]
    #[diagnostic(code(unifi_exporter::api_error))]
    Api(#[from] unifi_exporter_api::Error),

    #[error("Scrape reported {failed} collection error(s)")]
    #[diagnostic(
        code(unifi_exporter::scrape_failed),
        help("Metrics that did collect were still written. Run with -v for details.")
    )]
    Scrape {
        failed: usize,
        #[source]
        first: CollectError,
    },

    #[error("Failed to render metrics")]
    #[diagnostic(code(unifi_exporter::registry))]
    Registry(#[from] RegistryError),

    // ── Output ───────────────────────────────────────────────────────
    #[error("Failed to write metrics to {path}")]
    #[diagnostic(code(unifi_exporter::output))]
    Output {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ExporterError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } | Self::SiteNotFound { .. } => exit_code::CONFIG,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Scrape { .. } => exit_code::SCRAPE,
            Self::Api(_) | Self::Registry(_) | Self::Output { .. } => exit_code::GENERAL,
        }
    }
}
