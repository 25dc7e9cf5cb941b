// unifi-exporter-api: Async client for the UniFi controller legacy API
//
// Only the endpoints the exporter reads are covered: platform detection,
// session login, site listing, and per-site active alarms.

pub mod auth;
pub mod error;
pub mod legacy;
pub mod transport;

pub use auth::ControllerPlatform;
pub use error::Error;
pub use legacy::LegacyClient;
pub use legacy::models::{LegacyAlarm, LegacySite};
pub use transport::{TlsMode, TransportConfig};
