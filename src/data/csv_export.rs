use csv::{Terminator, WriterBuilder};
use serde::Deserialize;
use serde_json::Value;

use crate::error::Result;
use crate::state::dataset::Dataset;

#[derive(Debug, Clone, Deserialize)]
pub struct CsvExportRequest {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Render a label/dataset table as CSV: a `Label` column followed by one
/// column per dataset, one row per label. Datasets shorter than the label
/// list leave their trailing cells empty.
pub fn export_csv(labels: &[String], datasets: &[Dataset]) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    let mut header = vec!["Label".to_string()];
    header.extend(datasets.iter().enumerate().map(|(i, ds)| {
        ds.label
            .clone()
            .unwrap_or_else(|| format!("Dataset {}", i + 1))
    }));
    writer.write_record(&header)?;

    for (i, label) in labels.iter().enumerate() {
        let mut row = vec![label.clone()];
        row.extend(datasets.iter().map(|ds| cell(ds.data().get(i))));
        writer.write_record(&row)?;
    }

    let bytes = writer.into_inner().map_err(|e| csv::Error::from(e.into_error()))?;
    let mut text = String::from_utf8_lossy(&bytes).into_owned();
    if text.ends_with('\n') {
        text.pop();
    }
    tracing::debug!(rows = labels.len(), columns = header.len(), "exported chart data as csv");
    Ok(text)
}
