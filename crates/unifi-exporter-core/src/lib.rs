// unifi-exporter-core: Prometheus collectors over the UniFi legacy API.
//
// Collectors push descriptors and samples into unbounded channels owned by
// the `Registry`, which groups them into metric families and renders the
// text exposition format.

pub mod alarms;
pub mod collector;
pub mod error;
pub mod metrics;
pub mod model;
pub mod registry;
pub mod source;

// ── Primary re-exports ──────────────────────────────────────────────
pub use alarms::AlarmCollector;
pub use collector::Collector;
pub use error::{CollectError, MetricError, RegistryError};
pub use metrics::{DEFAULT_NAMESPACE, Desc, DescSink, Sample, SampleSink, ValueType, build_fq_name};
pub use model::{AlarmEvent, MacAddress, Site};
pub use registry::{Gathered, Registry, encode_text};
pub use source::{AlarmSource, SourceError};
