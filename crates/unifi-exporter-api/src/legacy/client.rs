// Legacy API HTTP client
//
// Wraps `reqwest::Client` with UniFi-specific URL construction, envelope
// unwrapping, and platform-aware path prefixing. Endpoint modules
// (sites, alarms, auth) are implemented as inherent methods in
// separate files to keep this module focused on transport mechanics.

use std::sync::{PoisonError, RwLock};

use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::auth::ControllerPlatform;
use crate::error::Error;
use crate::legacy::models::LegacyResponse;
use crate::transport::TransportConfig;

/// Longest body excerpt carried in error messages.
const BODY_PREVIEW_CHARS: usize = 200;

/// UniFi OS wraps some errors as `{"error":{"code":N,"message":"..."}}` with HTTP 200.
#[derive(serde::Deserialize)]
struct UnifiOsError {
    error: Option<UnifiOsErrorInner>,
}

#[derive(serde::Deserialize)]
struct UnifiOsErrorInner {
    code: u16,
    message: Option<String>,
}

/// Raw HTTP client for the UniFi controller's legacy API.
///
/// Unlike a per-site client, one `LegacyClient` serves every site: the
/// site name is passed to each site-scoped call. All methods return
/// unwrapped `data` payloads -- the envelope is stripped before the caller
/// sees it.
///
/// The client is `Send + Sync` and safe to share between overlapping
/// scrapes; the only interior state is the CSRF token.
pub struct LegacyClient {
    http: reqwest::Client,
    base_url: Url,
    platform: ControllerPlatform,
    /// CSRF token for UniFi OS. Required on POST requests through the
    /// `/proxy/network/` path. Captured from login response headers and
    /// rotated via `X-Updated-CSRF-Token`.
    csrf_token: RwLock<Option<String>>,
}

impl LegacyClient {
    /// Create a new legacy client from a `TransportConfig`.
    ///
    /// If the config doesn't already include a cookie jar, one is created
    /// automatically (legacy auth requires cookies). The `base_url` should be
    /// the controller root (e.g. `https://192.168.1.1` for UniFi OS or
    /// `https://controller:8443` for standalone).
    pub fn new(
        base_url: Url,
        platform: ControllerPlatform,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let config = if transport.cookie_jar.is_some() {
            transport.clone()
        } else {
            transport.clone().with_cookie_jar()
        };
        let http = config.build_client()?;
        Ok(Self::with_client(http, base_url, platform))
    }

    /// Create a legacy client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url, platform: ControllerPlatform) -> Self {
        Self {
            http,
            base_url,
            platform,
            csrf_token: RwLock::new(None),
        }
    }

    /// The underlying HTTP client (for auth flows that need direct access).
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// The controller base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The controller platform this client was built for.
    pub fn platform(&self) -> ControllerPlatform {
        self.platform
    }

    // ── CSRF token management ─────────────────────────────────────────

    /// Store a CSRF token (captured from login response headers).
    pub(crate) fn set_csrf_token(&self, token: String) {
        debug!("storing CSRF token");
        *self
            .csrf_token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    /// Update CSRF token if the response contains a rotated value.
    fn update_csrf_from_response(&self, headers: &reqwest::header::HeaderMap) {
        let new_token = headers
            .get("X-Updated-CSRF-Token")
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        if let Some(token) = new_token {
            trace!("CSRF token rotated");
            *self
                .csrf_token
                .write()
                .unwrap_or_else(PoisonError::into_inner) = Some(token);
        }
    }

    /// Apply the stored CSRF token to a request builder.
    pub(crate) fn apply_csrf(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let guard = self
            .csrf_token
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        match guard.as_deref() {
            Some(token) => builder.header("X-CSRF-Token", token),
            None => builder,
        }
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for a controller-level API path.
    ///
    /// Applies the platform-specific legacy prefix, then appends `/api/{path}`.
    /// For example, on UniFi OS: `https://host/proxy/network/api/{path}`
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let prefix = self.platform.legacy_prefix().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}{prefix}/api/{path}"))?)
    }

    /// Build a site-scoped URL: `{base}{prefix}/api/s/{site}/{path}`
    pub(crate) fn site_url(&self, site: &str, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let prefix = self.platform.legacy_prefix().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}{prefix}/api/s/{site}/{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and unwrap the legacy envelope.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>, Error> {
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;

        self.parse_envelope(resp).await
    }

    /// Parse the `{ meta, data }` envelope, returning `data` on success
    /// or an `Error::LegacyApi` if `meta.rc != "ok"`.
    ///
    /// Also handles UniFi OS error responses that use a different shape:
    /// `{"error": {"code": 403, "message": "..."}}` (returned with HTTP 200).
    async fn parse_envelope<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<Vec<T>, Error> {
        let status = resp.status();

        self.update_csrf_from_response(resp.headers());

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::Authentication {
                message: "session expired or invalid credentials".into(),
            });
        }

        if status == reqwest::StatusCode::FORBIDDEN {
            return Err(Error::LegacyApi {
                message: "insufficient permissions (HTTP 403)".into(),
            });
        }

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::LegacyApi {
                message: format!("HTTP {status}: {}", preview(&body)),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;

        if let Ok(wrapper) = serde_json::from_str::<UnifiOsError>(&body) {
            if let Some(err) = wrapper.error {
                let msg = err.message.unwrap_or_default();
                return Err(if err.code == 401 {
                    Error::Authentication { message: msg }
                } else {
                    Error::LegacyApi {
                        message: format!("UniFi OS error {}: {msg}", err.code),
                    }
                });
            }
        }

        let envelope: LegacyResponse<T> =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: format!("{e} (body preview: {:?})", preview(&body)),
                body: body.clone(),
            })?;

        match envelope.meta.rc.as_str() {
            "ok" => Ok(envelope.data),
            _ => Err(Error::LegacyApi {
                message: envelope
                    .meta
                    .msg
                    .unwrap_or_else(|| format!("rc={}", envelope.meta.rc)),
            }),
        }
    }
}

/// Leading slice of `body`, cut on a character boundary.
fn preview(body: &str) -> &str {
    match body.char_indices().nth(BODY_PREVIEW_CHARS) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str, platform: ControllerPlatform) -> LegacyClient {
        LegacyClient::with_client(reqwest::Client::new(), Url::parse(base).unwrap(), platform)
    }

    #[test]
    fn site_url_classic() {
        let c = client("https://controller:8443/", ControllerPlatform::ClassicController);
        let url = c.site_url("default", "stat/alarm").unwrap();
        assert_eq!(url.as_str(), "https://controller:8443/api/s/default/stat/alarm");
    }

    #[test]
    fn site_url_unifi_os() {
        let c = client("https://192.168.1.1", ControllerPlatform::UnifiOs);
        let url = c.site_url("office", "stat/alarm").unwrap();
        assert_eq!(
            url.as_str(),
            "https://192.168.1.1/proxy/network/api/s/office/stat/alarm"
        );
    }

    #[test]
    fn api_url_unifi_os() {
        let c = client("https://192.168.1.1", ControllerPlatform::UnifiOs);
        let url = c.api_url("self/sites").unwrap();
        assert_eq!(url.as_str(), "https://192.168.1.1/proxy/network/api/self/sites");
    }

    #[test]
    fn preview_respects_char_boundaries() {
        let body = "é".repeat(300);
        let cut = preview(&body);
        assert_eq!(cut.chars().count(), BODY_PREVIEW_CHARS);
        assert_eq!(preview("short"), "short");
    }
}
