use thiserror::Error;

/// Top-level error type for the `unifi-exporter-api` crate.
///
/// Covers every failure mode of the legacy API surface: authentication,
/// transport, the `{meta, data}` envelope, and decoding.
/// `unifi-exporter-core` wraps these as per-site fetch failures.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login failed or the session was rejected.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake, certificate, or client construction error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Legacy API ──────────────────────────────────────────────────
    /// Error from the legacy API (parsed from the `{meta: {rc, msg}}` envelope).
    #[error("Legacy API error: {message}")]
    LegacyApi { message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Platform ────────────────────────────────────────────────────
    /// Operation not supported on this controller platform.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(&'static str),
}

impl Error {
    /// Returns `true` if this error indicates auth has expired
    /// and re-authentication might resolve it.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }
}
