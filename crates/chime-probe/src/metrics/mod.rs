//! Metric set produced by one probe cycle and the helpers that name and
//! describe it for the monitoring agent.

use api_types::SessionRecord;
use serde::Deserialize;
use serde::Serialize;

pub mod encoders;
pub mod graph;
pub mod prefix;

/// Name of the metric group all probe metrics belong to
pub const GROUP_NAME: &str = "MeetingChimeMetrics";

pub const TOTAL: &str = "Total";
pub const TOTAL_ACTIVE: &str = "Total_Active";
pub const TOTAL_MEETING: &str = "Total_Meeting";

/// Metric names in emission order
pub const METRIC_NAMES: [&str; 3] = [TOTAL, TOTAL_ACTIVE, TOTAL_MEETING];

/// Aggregated session metrics for a single fetch
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSet {
    /// Sum of `total` across all sessions
    #[serde(rename = "Total")]
    pub total: f64,
    /// Sum of `total_active` across all sessions
    #[serde(rename = "Total_Active")]
    pub total_active: f64,
    /// Number of sessions
    #[serde(rename = "Total_Meeting")]
    pub total_meeting: f64,
}

impl MetricSet {
    /// Iterate `(name, value)` pairs in emission order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        METRIC_NAMES.into_iter().map(move |name| {
            let value = match name {
                TOTAL => self.total,
                TOTAL_ACTIVE => self.total_active,
                _ => self.total_meeting,
            };
            (name, value)
        })
    }
}

/// Sum session counts into a [`MetricSet`].
///
/// `total_active` is not checked against `total`; upstream owns that relation.
pub fn aggregate(records: &[SessionRecord]) -> MetricSet {
    let (total, total_active) = records.iter().fold((0i64, 0i64), |(t, a), record| {
        (
            t.saturating_add(record.total),
            a.saturating_add(record.total_active),
        )
    });

    MetricSet {
        total: total as f64,
        total_active: total_active as f64,
        total_meeting: records.len() as f64,
    }
}
