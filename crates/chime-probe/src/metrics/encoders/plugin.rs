use super::MetricsEncoder;

/// Agent plugin line encoder: `<key>\t<value>\t<unix seconds>`
pub struct PluginEncoder;

impl PluginEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl MetricsEncoder for PluginEncoder {
    fn encode_metric(&self, key: &str, value: f64, timestamp: i64) -> String {
        format!("{key}\t{value:.6}\t{timestamp}\n")
    }
}
