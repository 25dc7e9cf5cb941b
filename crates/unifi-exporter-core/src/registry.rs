//! Explicit collector registration and scrape rendering.
//!
//! The registry owns no global state: the binary builds one, registers its
//! collectors, and asks it to gather when a scrape is due. Gathering runs
//! every collector in registration order and keeps going past invalid
//! samples and repeated series, which are returned as errors alongside the
//! families that could be built.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use prometheus::proto::{Gauge, LabelPair, Metric, MetricFamily};
use prometheus::{Encoder, TextEncoder};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::collector::Collector;
use crate::error::{CollectError, RegistryError};
use crate::metrics::{Desc, Sample, ValueType};

/// Collectors registered for scraping.
#[derive(Default)]
pub struct Registry {
    collectors: Vec<Arc<dyn Collector>>,
    descs: Vec<Arc<Desc>>,
}

/// Result of one gather pass.
#[derive(Debug, Default)]
pub struct Gathered {
    /// Families sorted by name, label pairs sorted by label name.
    pub families: Vec<MetricFamily>,
    /// Errors carried by invalid samples, in the order they were received.
    pub errors: Vec<CollectError>,
}

impl Gathered {
    /// Render the gathered families in the text exposition format.
    pub fn encode_text(&self) -> Result<String, RegistryError> {
        encode_text(&self.families)
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a collector.
    ///
    /// Rejects collectors whose descriptors repeat a name, either among
    /// themselves or against an already-registered collector.
    pub fn register(&mut self, collector: Arc<dyn Collector>) -> Result<(), RegistryError> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        collector.describe(&tx);
        drop(tx);

        let mut seen: HashSet<&str> = self.descs.iter().map(|d| d.fq_name()).collect();
        let mut fresh = Vec::new();
        while let Ok(desc) = rx.try_recv() {
            fresh.push(desc);
        }

        for desc in &fresh {
            if !seen.insert(desc.fq_name()) {
                return Err(RegistryError::DuplicateDescriptor {
                    fq_name: desc.fq_name().to_owned(),
                });
            }
        }

        debug!(descriptors = fresh.len(), "registered collector");
        self.descs.extend(fresh);
        self.collectors.push(collector);
        Ok(())
    }

    /// Run one scrape across all registered collectors.
    pub async fn gather(&self) -> Gathered {
        let mut families: BTreeMap<String, MetricFamily> = BTreeMap::new();
        let mut seen: HashSet<(String, Vec<(String, String)>)> = HashSet::new();
        let mut errors = Vec::new();

        for collector in &self.collectors {
            let (tx, mut rx) = mpsc::unbounded_channel();
            collector.collect(&tx).await;
            drop(tx);

            while let Some(sample) = rx.recv().await {
                if let Some(err) = sample.error() {
                    warn!(metric = sample.desc().fq_name(), error = %err, "invalid sample");
                    errors.push(err.clone());
                    continue;
                }

                let fq_name = sample.desc().fq_name().to_owned();
                let labels = sorted_labels(&sample);
                if !seen.insert((fq_name.clone(), labels.clone())) {
                    let err = CollectError::DuplicateSeries {
                        labels: render_labels(&labels),
                        fq_name,
                    };
                    warn!(error = %err, "dropping repeated series");
                    errors.push(err);
                    continue;
                }

                let Some(metric) = to_metric(&sample, labels) else {
                    continue;
                };

                families
                    .entry(fq_name)
                    .or_insert_with(|| new_family(&sample))
                    .mut_metric()
                    .push(metric);
            }
        }

        Gathered {
            families: families.into_values().collect(),
            errors,
        }
    }
}

/// Render metric families in the Prometheus text exposition format.
///
/// Label values have `\`, `"` and newlines escaped; nothing else changes.
pub fn encode_text(families: &[MetricFamily]) -> Result<String, RegistryError> {
    let mut buf = Vec::new();
    TextEncoder::new().encode(families, &mut buf)?;
    Ok(String::from_utf8(buf)?)
}

fn new_family(sample: &Sample) -> MetricFamily {
    let desc = sample.desc();
    let mut family = MetricFamily::default();
    family.set_name(desc.fq_name().to_owned());
    family.set_help(desc.help().to_owned());
    if let Some(value_type) = sample.value_type() {
        family.set_field_type(value_type.metric_type());
    }
    family
}

/// Label pairs sorted by label name.
fn sorted_labels(sample: &Sample) -> Vec<(String, String)> {
    let mut labels: Vec<(String, String)> = sample
        .labels()
        .map(|(name, value)| (name.to_owned(), value.to_owned()))
        .collect();
    labels.sort_unstable();
    labels
}

fn render_labels(labels: &[(String, String)]) -> String {
    labels
        .iter()
        .map(|(name, value)| format!("{name}={value:?}"))
        .collect::<Vec<_>>()
        .join(",")
}

fn to_metric(sample: &Sample, labels: Vec<(String, String)>) -> Option<Metric> {
    let value_type = sample.value_type()?;
    let value = sample.value()?;

    let mut metric = Metric::default();
    for (name, value) in labels {
        let mut pair = LabelPair::default();
        pair.set_name(name);
        pair.set_value(value);
        metric.mut_label().push(pair);
    }

    match value_type {
        ValueType::Gauge => {
            let mut gauge = Gauge::default();
            gauge.set_value(value);
            metric.set_gauge(gauge);
        }
    }

    Some(metric)
}
