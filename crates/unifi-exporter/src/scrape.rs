//! One scrape: connect, log in, discover sites, collect alarms, log out.

use std::sync::Arc;

use tracing::{debug, info};

use unifi_exporter_api::LegacyClient;
use unifi_exporter_core::{AlarmCollector, Gathered, Registry, Site};

use crate::config::Settings;
use crate::error::ExporterError;

/// Run a single scrape against the configured controller.
///
/// The session is always closed afterwards; a failed logout is only
/// logged.
pub async fn scrape(settings: &Settings) -> Result<Gathered, ExporterError> {
    let platform = match settings.platform {
        Some(platform) => platform,
        None => LegacyClient::detect_platform(&settings.controller, &settings.transport)
            .await
            .map_err(|e| connection_failed(settings, e))?,
    };
    debug!(?platform, url = %settings.controller, "using controller platform");

    let client = LegacyClient::new(settings.controller.clone(), platform, &settings.transport)
        .map_err(|e| connection_failed(settings, e))?;
    let client = Arc::new(client);

    client
        .login(&settings.username, &settings.password)
        .await
        .map_err(|e| login_failed(settings, e))?;

    let result = collect(&client, settings).await;

    if let Err(e) = client.logout().await {
        debug!(error = %e, "logout failed");
    }

    result
}

async fn collect(
    client: &Arc<LegacyClient>,
    settings: &Settings,
) -> Result<Gathered, ExporterError> {
    let discovered: Vec<Site> = client
        .list_sites()
        .await?
        .into_iter()
        .map(Site::from)
        .collect();
    let sites = select_sites(discovered, &settings.sites)?;

    info!(sites = sites.len(), "collecting alarms");

    let collector = AlarmCollector::new(&settings.namespace, Arc::clone(client), sites);
    let mut registry = Registry::new();
    registry.register(Arc::new(collector))?;

    Ok(registry.gather().await)
}

/// Keep the requested sites, in controller discovery order.
///
/// An empty request keeps every discovered site. Requesting a name the
/// controller does not know is an error.
pub fn select_sites(discovered: Vec<Site>, requested: &[String]) -> Result<Vec<Site>, ExporterError> {
    if requested.is_empty() {
        return Ok(discovered);
    }

    if let Some(missing) = requested
        .iter()
        .find(|name| !discovered.iter().any(|s| &s.name == *name))
    {
        let available = discovered
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(ExporterError::SiteNotFound {
            name: missing.clone(),
            available,
        });
    }

    Ok(discovered
        .into_iter()
        .filter(|s| requested.contains(&s.name))
        .collect())
}

fn connection_failed(settings: &Settings, source: unifi_exporter_api::Error) -> ExporterError {
    ExporterError::ConnectionFailed {
        url: settings.controller.to_string(),
        source,
    }
}

fn login_failed(settings: &Settings, source: unifi_exporter_api::Error) -> ExporterError {
    if source.is_auth_expired() {
        ExporterError::AuthFailed {
            username: settings.username.clone(),
            source,
        }
    } else {
        connection_failed(settings, source)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn discovered() -> Vec<Site> {
        vec![
            Site::new("default", "Default"),
            Site::new("lab", "Lab"),
            Site::new("branch", "Branch Office"),
        ]
    }

    #[test]
    fn empty_request_keeps_everything() {
        let sites = select_sites(discovered(), &[]).unwrap();
        assert_eq!(sites, discovered());
    }

    #[test]
    fn selection_follows_discovery_order() {
        let requested = vec!["branch".to_owned(), "default".to_owned()];
        let sites = select_sites(discovered(), &requested).unwrap();

        let names: Vec<_> = sites.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["default", "branch"]);
    }

    #[test]
    fn unknown_site_is_rejected() {
        let requested = vec!["default".to_owned(), "warehouse".to_owned()];
        let err = select_sites(discovered(), &requested).unwrap_err();

        match err {
            ExporterError::SiteNotFound { name, available } => {
                assert_eq!(name, "warehouse");
                assert_eq!(available, "default, lab, branch");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
