// Legacy API alarm endpoint

use tracing::debug;

use crate::error::Error;
use crate::legacy::client::LegacyClient;
use crate::legacy::models::LegacyAlarm;

impl LegacyClient {
    /// List active alarms for one site, in controller response order.
    ///
    /// `GET /api/s/{site}/stat/alarm`
    pub async fn list_alarms(&self, site: &str) -> Result<Vec<LegacyAlarm>, Error> {
        let url = self.site_url(site, "stat/alarm")?;
        debug!(site, "listing alarms");
        self.get(url).await
    }
}
