//! Metric descriptors, samples, and the channels collectors push them into.
//!
//! A [`Desc`] is the immutable shape of a metric family: its fully-qualified
//! name, help text and ordered label names. A [`Sample`] is one data point
//! against a descriptor, or an invalid marker carrying the error that kept
//! the family from being computed this scrape.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

use crate::error::{CollectError, MetricError};

/// Namespace prefixed to every metric name unless configured otherwise.
pub const DEFAULT_NAMESPACE: &str = "unifi";

/// Receives descriptors during `describe`.
pub type DescSink = UnboundedSender<Arc<Desc>>;

/// Receives samples during `collect`.
pub type SampleSink = UnboundedSender<Sample>;

/// Join the non-empty parts of a metric name with `_`.
///
/// `build_fq_name("unifi", "alarms", "total")` is `unifi_alarms_total`;
/// `build_fq_name("unifi", "", "alarms")` is `unifi_alarms`.
pub fn build_fq_name(namespace: &str, subsystem: &str, name: &str) -> String {
    [namespace, subsystem, name]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// How a sample's value should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Gauge,
}

impl ValueType {
    pub(crate) fn metric_type(self) -> prometheus::proto::MetricType {
        match self {
            Self::Gauge => prometheus::proto::MetricType::GAUGE,
        }
    }
}

/// Immutable description of a metric family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Desc {
    fq_name: String,
    help: String,
    label_names: Vec<String>,
}

impl Desc {
    pub fn new(fq_name: impl Into<String>, help: impl Into<String>, label_names: &[&str]) -> Self {
        Self {
            fq_name: fq_name.into(),
            help: help.into(),
            label_names: label_names.iter().map(|&l| l.to_owned()).collect(),
        }
    }

    pub fn fq_name(&self) -> &str {
        &self.fq_name
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    /// Label names, in the order sample label values must follow.
    pub fn label_names(&self) -> &[String] {
        &self.label_names
    }
}

/// One data point produced during a scrape.
#[derive(Debug, Clone)]
pub struct Sample {
    desc: Arc<Desc>,
    payload: Payload,
}

#[derive(Debug, Clone)]
enum Payload {
    Value {
        value_type: ValueType,
        value: f64,
        label_values: Vec<String>,
    },
    Invalid(CollectError),
}

impl Sample {
    /// Build a constant sample, checking the label values line up with the
    /// descriptor's label names.
    pub fn new_const(
        desc: &Arc<Desc>,
        value_type: ValueType,
        value: f64,
        label_values: Vec<String>,
    ) -> Result<Self, MetricError> {
        if label_values.len() != desc.label_names.len() {
            return Err(MetricError::LabelCardinality {
                fq_name: desc.fq_name.clone(),
                expected: desc.label_names.len(),
                got: label_values.len(),
            });
        }

        Ok(Self {
            desc: Arc::clone(desc),
            payload: Payload::Value {
                value_type,
                value,
                label_values,
            },
        })
    }

    /// Mark `desc`'s family as not computable this scrape.
    pub fn invalid(desc: &Arc<Desc>, error: CollectError) -> Self {
        Self {
            desc: Arc::clone(desc),
            payload: Payload::Invalid(error),
        }
    }

    pub fn desc(&self) -> &Arc<Desc> {
        &self.desc
    }

    pub fn value(&self) -> Option<f64> {
        match &self.payload {
            Payload::Value { value, .. } => Some(*value),
            Payload::Invalid(_) => None,
        }
    }

    pub fn value_type(&self) -> Option<ValueType> {
        match &self.payload {
            Payload::Value { value_type, .. } => Some(*value_type),
            Payload::Invalid(_) => None,
        }
    }

    /// Label values positionally matching [`Desc::label_names`]. Empty for
    /// invalid samples.
    pub fn label_values(&self) -> &[String] {
        match &self.payload {
            Payload::Value { label_values, .. } => label_values,
            Payload::Invalid(_) => &[],
        }
    }

    pub fn error(&self) -> Option<&CollectError> {
        match &self.payload {
            Payload::Value { .. } => None,
            Payload::Invalid(err) => Some(err),
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self.payload, Payload::Invalid(_))
    }

    /// Label name/value pairs in descriptor order.
    pub fn labels(&self) -> impl Iterator<Item = (&str, &str)> {
        self.desc
            .label_names
            .iter()
            .zip(self.label_values())
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}
