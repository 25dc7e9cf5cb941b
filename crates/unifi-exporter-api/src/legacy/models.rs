// Legacy API response types
//
// Models for the UniFi controller's legacy JSON API. All responses are wrapped
// in the `LegacyResponse<T>` envelope. Fields use `#[serde(default)]` liberally
// because the API is inconsistent about field presence across firmware versions.

use serde::Deserialize;

// ── Response Envelope ────────────────────────────────────────────────

/// Standard UniFi legacy API response envelope.
///
/// Every legacy endpoint wraps its payload:
/// ```json
/// { "meta": { "rc": "ok", "msg": "optional" }, "data": [...] }
/// ```
#[derive(Debug, Deserialize)]
pub struct LegacyResponse<T> {
    pub meta: Meta,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

/// Metadata from the legacy envelope. `rc` == `"ok"` means success.
#[derive(Debug, Deserialize)]
pub struct Meta {
    pub rc: String,
    #[serde(default)]
    pub msg: Option<String>,
}

// ── Site ─────────────────────────────────────────────────────────────

/// Site object from `/api/self/sites`.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacySite {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub desc: Option<String>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Alarm ────────────────────────────────────────────────────────────

/// Alarm object from `stat/alarm`.
///
/// The originating device is reported under a type-specific prefix:
/// `ap`/`ap_name` for access points, `sw`/`sw_name` for switches and
/// `gw`/`gw_name` for gateways.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyAlarm {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub subsystem: Option<String>,
    #[serde(default)]
    pub ap: Option<String>,
    #[serde(default)]
    pub ap_name: Option<String>,
    #[serde(default)]
    pub sw: Option<String>,
    #[serde(default)]
    pub sw_name: Option<String>,
    #[serde(default)]
    pub gw: Option<String>,
    #[serde(default)]
    pub gw_name: Option<String>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl LegacyAlarm {
    /// MAC of the device that raised the alarm (AP, then switch, then gateway).
    pub fn device_mac(&self) -> Option<&str> {
        self.ap
            .as_deref()
            .or(self.sw.as_deref())
            .or(self.gw.as_deref())
    }

    /// Name of the device that raised the alarm (AP, then switch, then gateway).
    pub fn device_name(&self) -> Option<&str> {
        self.ap_name
            .as_deref()
            .or(self.sw_name.as_deref())
            .or(self.gw_name.as_deref())
    }
}
