use serde_json::json;

use super::MetricsEncoder;

/// JSON encoder for metrics, one object per line
pub struct JsonEncoder;

impl JsonEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl MetricsEncoder for JsonEncoder {
    fn encode_metric(&self, key: &str, value: f64, timestamp: i64) -> String {
        let metric = json!({
            "key": key,
            "value": value,
            "ts": timestamp,
        });
        metric.to_string() + "\n"
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;

    #[test]
    fn test_encode_metric_basic() {
        let encoder = JsonEncoder::new();
        let result = encoder.encode_metric("chime.MeetingChimeMetrics.Total", 15.0, 1609459200);

        // Parse the JSON to verify structure
        let parsed: Value = serde_json::from_str(&result).expect("Should be valid JSON");

        assert_eq!(parsed["key"], "chime.MeetingChimeMetrics.Total");
        assert_eq!(parsed["value"], 15.0);
        assert_eq!(parsed["ts"], 1609459200);
        assert!(result.ends_with('\n'));
    }

    #[test]
    fn test_encode_metric_set_one_object_per_line() {
        let encoder = JsonEncoder::new();
        let metrics = crate::metrics::MetricSet {
            total: 3.0,
            total_active: 1.0,
            total_meeting: 1.0,
        };
        let result = encoder.encode_metric_set("chime", &metrics, 5);

        let keys: Vec<String> = result
            .lines()
            .map(|line| {
                let parsed: Value = serde_json::from_str(line).expect("Should be valid JSON");
                parsed["key"].as_str().unwrap().to_string()
            })
            .collect();
        assert_eq!(
            keys,
            vec![
                "chime.MeetingChimeMetrics.Total",
                "chime.MeetingChimeMetrics.Total_Active",
                "chime.MeetingChimeMetrics.Total_Meeting",
            ]
        );
    }
}
