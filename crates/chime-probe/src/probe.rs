//! One probe cycle: fetch, emit, remember.

use std::io::Write;

use tracing::Level;

use crate::cache::MetricCache;
use crate::fetcher::MetricsSource;
use crate::metrics::encoders::MetricsEncoder;
use crate::metrics::MetricSet;

pub struct Probe<S: MetricsSource> {
    source: S,
    encoder: Box<dyn MetricsEncoder + Send + Sync>,
    prefix: String,
    cache: Option<MetricCache>,
}

impl<S: MetricsSource> Probe<S> {
    pub fn new(
        source: S,
        encoder: Box<dyn MetricsEncoder + Send + Sync>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            source,
            encoder,
            prefix: prefix.into(),
            cache: None,
        }
    }

    pub fn with_cache(mut self, cache: MetricCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Run a single cycle stamped with `timestamp` (unix seconds).
    ///
    /// A failed fetch is logged and yields `Ok(None)` with nothing written;
    /// only failures to write to `out` are returned as errors.
    pub fn run_once<W: Write>(
        &self,
        out: &mut W,
        timestamp: i64,
    ) -> std::io::Result<Option<MetricSet>> {
        let metrics = match self.source.fetch_metrics() {
            Ok(metrics) => metrics,
            Err(e) => {
                tracing::warn!("skipping metrics for this cycle: {e}");
                return Ok(None);
            }
        };

        out.write_all(
            self.encoder
                .encode_metric_set(&self.prefix, &metrics, timestamp)
                .as_bytes(),
        )?;
        out.flush()?;

        if let Some(cache) = &self.cache {
            self.remember(cache, &metrics, timestamp);
        }

        Ok(Some(metrics))
    }

    fn remember(&self, cache: &MetricCache, metrics: &MetricSet, timestamp: i64) {
        // The previous values only feed a debug line.
        if tracing::enabled!(Level::DEBUG) {
            match cache.load() {
                Ok(Some(previous)) => tracing::debug!(
                    elapsed_secs = timestamp - previous.last_time,
                    meetings_delta = metrics.total_meeting - previous.metrics.total_meeting,
                    "compared with previous cycle"
                ),
                Ok(None) => {}
                Err(e) => tracing::debug!("ignoring unreadable cache: {e}"),
            }
        }

        if let Err(e) = cache.store(metrics, timestamp) {
            tracing::warn!("failed to update cache: {e}");
        }
    }
}
