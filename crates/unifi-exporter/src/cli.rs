//! Command-line flags. Every flag overrides the matching config key.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::config::Platform;

/// Export UniFi controller alarms as Prometheus metrics.
///
/// Logs in to the controller, scrapes active alarms for each site once,
/// and writes the text exposition format to stdout or a file (for the
/// node_exporter textfile collector).
#[derive(Debug, Parser)]
#[command(name = "unifi-exporter", version, about, long_about)]
pub struct Cli {
    /// Config file path [default: platform config dir/unifi-exporter/config.toml]
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Controller base URL, e.g. https://192.168.1.1
    #[arg(long, value_name = "URL")]
    pub controller: Option<String>,

    /// Controller username (password via UNIFI_EXPORTER_PASSWORD or config)
    #[arg(long, short = 'u')]
    pub username: Option<String>,

    /// Only scrape this site (repeatable); default is every site
    #[arg(long = "site", short = 's', value_name = "NAME")]
    pub sites: Vec<String>,

    /// Metric namespace prefix
    #[arg(long)]
    pub namespace: Option<String>,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k')]
    pub insecure: bool,

    /// Custom CA certificate (PEM)
    #[arg(long, value_name = "PATH")]
    pub ca_cert: Option<PathBuf>,

    /// HTTP timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Controller platform; detected when omitted
    #[arg(long, value_enum)]
    pub platform: Option<Platform>,

    /// Write metrics to this file atomically instead of stdout
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', action = ArgAction::Count)]
    pub verbose: u8,
}
