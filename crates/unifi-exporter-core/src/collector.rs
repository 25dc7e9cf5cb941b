//! The capability every collector offers the registry.

use futures_util::future::BoxFuture;

use crate::metrics::{DescSink, SampleSink};

/// A source of metric families, called once per scrape.
///
/// Implementations hold only state fixed at construction, so `describe` and
/// `collect` may run concurrently from overlapping scrapes.
pub trait Collector: Send + Sync {
    /// Push every descriptor this collector can emit. Must not do I/O.
    fn describe(&self, sink: &DescSink);

    /// Push this scrape's samples. Failures are reported as invalid samples
    /// and logged, never returned.
    fn collect<'a>(&'a self, sink: &'a SampleSink) -> BoxFuture<'a, ()>;
}
