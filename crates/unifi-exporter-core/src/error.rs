// ── Core error types ──
//
// A scrape has exactly one failure kind that matters to operators: fetching
// a site's alarms failed. The remaining variants cover programming errors
// (label cardinality) and a consumer that went away mid-scrape.

use std::sync::Arc;

use thiserror::Error;

/// Error produced while collecting one scrape.
///
/// `Clone` so the same error can travel on the invalid sample pushed to the
/// sink and be returned to the caller.
#[derive(Debug, Clone, Error)]
pub enum CollectError {
    /// The controller call for a site failed; later sites were not queried.
    #[error("failed to fetch alarms for site '{site}': {source}")]
    Fetch {
        site: String,
        source: Arc<unifi_exporter_api::Error>,
    },

    #[error(transparent)]
    Metric(#[from] MetricError),

    /// Two samples of one family carried identical label values; the later
    /// one was dropped.
    #[error("metric {fq_name} was collected before with the same label values {{{labels}}}")]
    DuplicateSeries { fq_name: String, labels: String },

    /// The receiving half of the sample sink was dropped.
    #[error("sample sink closed before collection finished")]
    SinkClosed,
}

impl CollectError {
    pub(crate) fn fetch(site: &str, source: unifi_exporter_api::Error) -> Self {
        Self::Fetch {
            site: site.to_owned(),
            source: Arc::new(source),
        }
    }

    /// The site whose fetch failed, if this is a fetch failure.
    pub fn site(&self) -> Option<&str> {
        match self {
            Self::Fetch { site, .. } => Some(site),
            Self::Metric(_) | Self::DuplicateSeries { .. } | Self::SinkClosed => None,
        }
    }
}

/// Error building a sample against its descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetricError {
    #[error("metric {fq_name}: expected {expected} label values, got {got}")]
    LabelCardinality {
        fq_name: String,
        expected: usize,
        got: usize,
    },
}

/// Error registering collectors or rendering a scrape.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("descriptor {fq_name} is already registered")]
    DuplicateDescriptor { fq_name: String },

    #[error("failed to encode metrics: {0}")]
    Encode(#[from] prometheus::Error),

    #[error("encoded metrics are not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
