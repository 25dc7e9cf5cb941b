//! Alarm collector.
//!
//! Emits two gauge families per scrape:
//!
//! - `<namespace>_alarms_total{site}`: number of active alarms per site.
//! - `<namespace>_alarms{site,id,name,mac,key,message,subsystem}`: one row
//!   per active alarm. The value of every row is the site's alarm count,
//!   not 1.
//!
//! Sites are queried in order, one at a time. The first failing site ends
//! the scrape: an invalid sample carrying the error is pushed and the
//! remaining sites are skipped.

use std::sync::Arc;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use tracing::{debug, error};

use crate::collector::Collector;
use crate::error::CollectError;
use crate::metrics::{Desc, DescSink, Sample, SampleSink, ValueType, build_fq_name};
use crate::model::{AlarmEvent, Site};
use crate::source::AlarmSource;

const SUBSYSTEM: &str = "alarms";

const LABELS_SITE_ONLY: &[&str] = &["site"];
const LABELS_ALARMS: &[&str] = &["site", "id", "name", "mac", "key", "message", "subsystem"];

/// Prometheus collector for active UniFi alarms.
pub struct AlarmCollector<S> {
    alarms_total: Arc<Desc>,
    alarms: Arc<Desc>,
    source: Arc<S>,
    sites: Arc<[Site]>,
}

impl<S: AlarmSource> AlarmCollector<S> {
    /// Build the collector. Performs no I/O.
    pub fn new(namespace: &str, source: Arc<S>, sites: Vec<Site>) -> Self {
        Self {
            alarms_total: Arc::new(Desc::new(
                build_fq_name(namespace, SUBSYSTEM, "total"),
                "Total number of active alarms",
                LABELS_SITE_ONLY,
            )),
            alarms: Arc::new(Desc::new(
                build_fq_name(namespace, "", SUBSYSTEM),
                "Number of active alarms",
                LABELS_ALARMS,
            )),
            source,
            sites: sites.into(),
        }
    }

    /// Descriptor of the per-site aggregate family.
    pub fn alarms_total_desc(&self) -> &Arc<Desc> {
        &self.alarms_total
    }

    /// Descriptor of the per-alarm family.
    pub fn alarms_desc(&self) -> &Arc<Desc> {
        &self.alarms
    }

    /// Collect one scrape, returning the first error.
    ///
    /// On error an invalid sample for the per-alarm family has already been
    /// pushed to `sink`.
    pub async fn collect_error(&self, sink: &SampleSink) -> Result<(), CollectError> {
        let Err(err) = self.collect_sites(sink).await else {
            return Ok(());
        };

        if sink
            .send(Sample::invalid(&self.alarms, err.clone()))
            .is_err()
        {
            debug!("sample sink closed, dropping invalid sample");
        }
        Err(err)
    }

    async fn collect_sites(&self, sink: &SampleSink) -> Result<(), CollectError> {
        for site in &*self.sites {
            debug!(site = %site.name, "collecting alarms");

            let events = self
                .source
                .alarms(&site.name)
                .await
                .map_err(|e| CollectError::fetch(&site.name, e))?;

            let count = count_value(events.len());

            push(
                sink,
                Sample::new_const(
                    &self.alarms_total,
                    ValueType::Gauge,
                    count,
                    vec![site.label.clone()],
                )?,
            )?;

            for event in &events {
                push(
                    sink,
                    Sample::new_const(
                        &self.alarms,
                        ValueType::Gauge,
                        count,
                        alarm_labels(site, event),
                    )?,
                )?;
            }
        }

        Ok(())
    }
}

impl<S: AlarmSource> Collector for AlarmCollector<S> {
    fn describe(&self, sink: &DescSink) {
        for desc in [&self.alarms_total, &self.alarms] {
            if sink.send(Arc::clone(desc)).is_err() {
                break;
            }
        }
    }

    fn collect<'a>(&'a self, sink: &'a SampleSink) -> BoxFuture<'a, ()> {
        async move {
            if let Err(err) = self.collect_error(sink).await {
                error!(
                    desc = self.alarms.fq_name(),
                    site = err.site().unwrap_or_default(),
                    error = %err,
                    "failed collecting alarm metrics"
                );
            }
        }
        .boxed()
    }
}

/// Label values in `LABELS_ALARMS` order.
fn alarm_labels(site: &Site, event: &AlarmEvent) -> Vec<String> {
    vec![
        site.label.clone(),
        event.id.clone(),
        event.device_name.clone(),
        event
            .device_mac
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
        event.key.clone(),
        event.message.clone(),
        event.subsystem.clone(),
    ]
}

fn push(sink: &SampleSink, sample: Sample) -> Result<(), CollectError> {
    sink.send(sample).map_err(|_| CollectError::SinkClosed)
}

fn count_value(n: usize) -> f64 {
    f64::from(u32::try_from(n).unwrap_or(u32::MAX))
}
