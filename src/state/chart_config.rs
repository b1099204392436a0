use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, ToolError};
use crate::state::dataset::Dataset;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<Value>>,
    #[serde(default)]
    pub datasets: Vec<Dataset>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A Chart.js configuration: `{type, data: {labels, datasets}, options}`.
/// Top-level keys Chart.js itself does not define (`maxDataPoints`, `aria`,
/// ...) are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub chart_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ChartData>,
    #[serde(default)]
    pub options: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChartConfig {
    pub fn new(
        chart_type: &str,
        labels: Option<Vec<String>>,
        datasets: Vec<Dataset>,
        options: Map<String, Value>,
    ) -> Self {
        Self {
            chart_type: Some(chart_type.to_string()),
            data: Some(ChartData {
                labels: labels.map(|l| l.into_iter().map(Value::from).collect()),
                datasets,
                extra: Map::new(),
            }),
            options,
            extra: Map::new(),
        }
    }

    /// Parse a config passed to a tool as a JSON string.
    pub fn parse(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(ToolError::MalformedConfig)
    }

    pub fn labels(&self) -> &[Value] {
        self.data
            .as_ref()
            .and_then(|d| d.labels.as_deref())
            .unwrap_or(&[])
    }

    pub fn datasets(&self) -> &[Dataset] {
        self.data
            .as_ref()
            .map(|d| d.datasets.as_slice())
            .unwrap_or(&[])
    }

    pub fn push_dataset(&mut self, dataset: Dataset) {
        self.data.get_or_insert_with(ChartData::default).datasets.push(dataset);
    }

    /// `options.plugins`, created (or replaced, if it is not an object) on demand.
    pub fn plugins_mut(&mut self) -> &mut Map<String, Value> {
        object_entry(&mut self.options, "plugins")
    }

    /// Text of `options.plugins.title`, if one is set.
    pub fn title_text(&self) -> Option<&str> {
        self.options
            .get("plugins")?
            .get("title")?
            .get("text")?
            .as_str()
    }

    pub fn set_extra(&mut self, key: &str, value: impl Into<Value>) {
        self.extra.insert(key.to_string(), value.into());
    }
}

/// Child object `key` of `map`, inserting an empty object if it is missing
/// or holds a non-object value.
pub fn object_entry<'a>(map: &'a mut Map<String, Value>, key: &str) -> &'a mut Map<String, Value> {
    let entry = map
        .entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !entry.is_object() {
        *entry = Value::Object(Map::new());
    }
    match entry {
        Value::Object(child) => child,
        _ => unreachable!("entry was just replaced with an object"),
    }
}

/// Unwrap a `json!` object literal into its map.
pub fn into_object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
