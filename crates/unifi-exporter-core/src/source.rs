// Alarm source seam
//
// Collectors depend on `AlarmSource`, not on the HTTP client, so tests can
// drive them with canned responses.

use std::future::Future;

use tracing::debug;

use unifi_exporter_api::LegacyClient;

use crate::model::AlarmEvent;

/// Error returned by an alarm source: network, authentication, decode, or
/// a non-`ok` controller envelope.
pub type SourceError = unifi_exporter_api::Error;

/// Anything that can list the active alarms of a site by name.
///
/// Implementations must tolerate concurrent calls from overlapping scrapes.
pub trait AlarmSource: Send + Sync {
    fn alarms(
        &self,
        site: &str,
    ) -> impl Future<Output = Result<Vec<AlarmEvent>, SourceError>> + Send;
}

impl AlarmSource for LegacyClient {
    async fn alarms(&self, site: &str) -> Result<Vec<AlarmEvent>, SourceError> {
        let alarms = self.list_alarms(site).await?;
        debug!(site, count = alarms.len(), "fetched alarms");
        Ok(alarms.into_iter().map(AlarmEvent::from).collect())
    }
}
