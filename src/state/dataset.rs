use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A Chart.js dataset. `label`, `type` and `data` are typed; every other
/// key (`backgroundColor`, `yAxisID`, `tension`, ...) passes through
/// unchanged in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub chart_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Dataset {
    pub fn new(label: Option<String>, data: Vec<Value>) -> Self {
        Self {
            label,
            chart_type: None,
            data: Some(data),
            extra: Map::new(),
        }
    }

    pub fn from_numbers(label: Option<String>, data: &[f64]) -> Self {
        Self::new(label, data.iter().map(|&v| Value::from(v)).collect())
    }

    /// Builder-style setter for a pass-through key.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.extra.insert(key.to_string(), value.into());
    }

    /// Set `key` only when the caller did not provide it.
    pub fn set_default(&mut self, key: &str, value: impl Into<Value>) {
        self.extra
            .entry(key.to_string())
            .or_insert_with(|| value.into());
    }

    pub fn data(&self) -> &[Value] {
        self.data.as_deref().unwrap_or(&[])
    }

    /// Numeric entries of `data`; points and other shapes are skipped.
    pub fn numeric_data(&self) -> Vec<f64> {
        self.data().iter().filter_map(Value::as_f64).collect()
    }
}
