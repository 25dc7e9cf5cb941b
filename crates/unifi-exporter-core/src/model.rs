// Domain model for the exporter
//
// `Site` and `AlarmEvent` are what collectors consume. They are converted
// from the legacy API types at the source boundary so collectors never see
// wire-level optionality.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use unifi_exporter_api::{LegacyAlarm, LegacySite};

/// A controller site: the name used in API paths and the label shown in
/// metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    pub name: String,
    pub label: String,
}

impl Site {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
        }
    }
}

impl From<LegacySite> for Site {
    fn from(site: LegacySite) -> Self {
        let label = site
            .desc
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| site.name.clone());
        Self {
            name: site.name,
            label,
        }
    }
}

/// One active alarm at a site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmEvent {
    pub id: String,
    /// Name of the device that raised the alarm.
    pub device_name: String,
    pub device_mac: Option<MacAddress>,
    /// Category key, e.g. `EVT_AP_Lost_Contact`.
    pub key: String,
    pub message: String,
    pub subsystem: String,
}

impl From<LegacyAlarm> for AlarmEvent {
    fn from(alarm: LegacyAlarm) -> Self {
        Self {
            device_name: alarm.device_name().unwrap_or_default().to_owned(),
            device_mac: alarm
                .device_mac()
                .filter(|m| !m.is_empty())
                .map(MacAddress::new),
            id: alarm.id,
            key: alarm.key.unwrap_or_default(),
            message: alarm.msg.unwrap_or_default(),
            subsystem: alarm.subsystem.unwrap_or_default(),
        }
    }
}

/// MAC address normalized to lowercase colon-separated hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MacAddress(String);

impl MacAddress {
    /// Create a normalized MAC address from any common format.
    /// Accepts colon-separated, dash-separated, or bare 12-digit hex.
    pub fn new(raw: impl AsRef<str>) -> Self {
        let lower = raw.as_ref().trim().to_lowercase();

        if lower.len() == 12 && lower.chars().all(|c| c.is_ascii_hexdigit()) {
            let pairs: Vec<&str> = (0..12)
                .step_by(2)
                .filter_map(|i| lower.get(i..i + 2))
                .collect();
            return Self(pairs.join(":"));
        }

        Self(lower.replace('-', ":"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for MacAddress {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}
