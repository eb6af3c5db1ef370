use super::prefix::group_key;
use super::MetricSet;

pub mod json;
pub mod plugin;

/// Trait for encoding metric values into different output formats
pub trait MetricsEncoder: Send + Sync {
    /// Encode one metric value under its full key
    fn encode_metric(&self, key: &str, value: f64, timestamp: i64) -> String;

    /// Encode every metric of a set under the group key for `prefix`
    /// (convenience method)
    ///
    /// Non-finite values are skipped, the agent rejects them.
    fn encode_metric_set(&self, prefix: &str, metrics: &MetricSet, timestamp: i64) -> String {
        let group = group_key(prefix);
        metrics
            .iter()
            .filter_map(|(name, value)| {
                if value.is_finite() {
                    Some(self.encode_metric(&format!("{group}.{name}"), value, timestamp))
                } else {
                    tracing::warn!(metric = name, value, "skipping non-finite metric value");
                    None
                }
            })
            .collect()
    }
}

/// Factory function to create encoders based on format string
pub fn create_encoder(format: &str) -> Box<dyn MetricsEncoder + Send + Sync> {
    match format.to_lowercase().as_str() {
        "json" => Box::new(json::JsonEncoder::new()),
        "plugin" | _ => Box::new(plugin::PluginEncoder::new()),
    }
}
