//! Graph definition served to the monitoring agent on its metadata request.

use std::collections::BTreeMap;
use std::io::Write;

use serde::Serialize;

use super::prefix::group_key;
use super::prefix::title_case;
use super::METRIC_NAMES;

/// Header line the agent expects before the definition document
pub const META_HEADER: &str = "# mackerel-agent-plugin";

/// Environment variable the agent sets when it wants the definition
pub const META_ENV: &str = "MACKEREL_AGENT_PLUGIN_META";

pub const UNIT_FLOAT: &str = "float";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphDefinition {
    pub graphs: BTreeMap<String, Graph>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Graph {
    pub label: String,
    pub unit: &'static str,
    pub metrics: Vec<GraphMetric>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphMetric {
    pub name: &'static str,
    pub label: &'static str,
    pub stacked: bool,
}

/// Build the definition of the single probe metric group under `prefix`.
pub fn graph_definition(prefix: &str) -> GraphDefinition {
    let graph = Graph {
        label: title_case(prefix),
        unit: UNIT_FLOAT,
        metrics: METRIC_NAMES
            .into_iter()
            .map(|name| GraphMetric {
                name,
                label: name,
                stacked: false,
            })
            .collect(),
    };

    GraphDefinition {
        graphs: BTreeMap::from([(group_key(prefix), graph)]),
    }
}

/// Whether the agent asked for metadata instead of values.
pub fn meta_requested(env_value: Option<&str>) -> bool {
    env_value.is_some_and(|value| !value.is_empty())
}

/// Write the header line followed by the JSON definition.
pub fn write_definition<W: Write>(out: &mut W, definition: &GraphDefinition) -> std::io::Result<()> {
    writeln!(out, "{META_HEADER}")?;
    serde_json::to_writer(&mut *out, definition)?;
    writeln!(out)
}
