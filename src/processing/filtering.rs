use serde::Serialize;
use serde_json::Value;

use crate::error::{Result, ToolError};
use crate::state::dataset::Dataset;

/// Comparison applied against a threshold when filtering chart data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterCondition {
    GreaterThan,
    LessThan,
    Equals,
    NotEquals,
}

impl FilterCondition {
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "greater_than" => Ok(FilterCondition::GreaterThan),
            "less_than" => Ok(FilterCondition::LessThan),
            "equals" => Ok(FilterCondition::Equals),
            "not_equals" => Ok(FilterCondition::NotEquals),
            other => Err(ToolError::InvalidParameter(format!(
                "unknown filter condition '{other}' (expected greater_than, less_than, equals or not_equals)"
            ))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FilterCondition::GreaterThan => "greater_than",
            FilterCondition::LessThan => "less_than",
            FilterCondition::Equals => "equals",
            FilterCondition::NotEquals => "not_equals",
        }
    }

    pub fn matches(&self, value: f64, threshold: f64) -> bool {
        match self {
            FilterCondition::GreaterThan => value > threshold,
            FilterCondition::LessThan => value < threshold,
            FilterCondition::Equals => value == threshold,
            FilterCondition::NotEquals => value != threshold,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterApplied {
    pub condition: &'static str,
    pub threshold: f64,
    pub original_count: usize,
    pub filtered_count: usize,
}

/// Labels and datasets that survived a filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilteredData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
    pub filter_applied: FilterApplied,
}

/// Keep the points whose value in the first dataset satisfies `condition`.
/// The same indices are kept in every other dataset, so the table stays
/// aligned. Non-numeric entries in the first dataset never match.
pub fn filter_data(
    labels: &[String],
    datasets: &[Dataset],
    condition: FilterCondition,
    threshold: f64,
) -> FilteredData {
    let matching: Vec<usize> = datasets
        .first()
        .map(|first| {
            first
                .data()
                .iter()
                .enumerate()
                .filter(|(_, v)| v.as_f64().is_some_and(|x| condition.matches(x, threshold)))
                .map(|(i, _)| i)
                .collect()
        })
        .unwrap_or_default();

    let filtered_labels: Vec<String> = matching
        .iter()
        .filter_map(|&i| labels.get(i).cloned())
        .collect();

    let filtered_datasets = datasets
        .iter()
        .map(|dataset| {
            let mut kept = dataset.clone();
            let data = dataset.data();
            let values: Vec<Value> = matching.iter().filter_map(|&i| data.get(i).cloned()).collect();
            kept.data = Some(values);
            kept
        })
        .collect();

    FilteredData {
        filter_applied: FilterApplied {
            condition: condition.name(),
            threshold,
            original_count: labels.len(),
            filtered_count: filtered_labels.len(),
        },
        labels: filtered_labels,
        datasets: filtered_datasets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sales() -> (Vec<String>, Vec<Dataset>) {
        let labels = ["Jan", "Feb", "Mar", "Apr"].map(String::from).to_vec();
        let datasets = vec![
            Dataset::from_numbers(Some("2023".into()), &[100.0, 150.0, 120.0, 90.0])
                .with("borderColor", "red"),
            Dataset::from_numbers(Some("2024".into()), &[110.0, 160.0]),
        ];
        (labels, datasets)
    }

    #[test]
    fn keeps_aligned_points_across_datasets() {
        let (labels, datasets) = sales();
        let result = filter_data(&labels, &datasets, FilterCondition::GreaterThan, 100.0);

        assert_eq!(result.labels, vec!["Feb", "Mar"]);
        assert_eq!(result.datasets[0].data(), &[json!(150.0), json!(120.0)]);
        assert_eq!(result.datasets[0].extra["borderColor"], "red");
        // Second dataset has no index 2.
        assert_eq!(result.datasets[1].data(), &[json!(160.0)]);
        assert_eq!(result.filter_applied.original_count, 4);
        assert_eq!(result.filter_applied.filtered_count, 2);
    }

    #[test]
    fn each_condition_compares_against_threshold() {
        let (labels, datasets) = sales();
        let count = |c| filter_data(&labels, &datasets, c, 120.0).labels.len();
        assert_eq!(count(FilterCondition::GreaterThan), 1);
        assert_eq!(count(FilterCondition::LessThan), 2);
        assert_eq!(count(FilterCondition::Equals), 1);
        assert_eq!(count(FilterCondition::NotEquals), 3);
    }

    #[test]
    fn no_datasets_yields_empty_result() {
        let labels = vec!["a".to_string()];
        let result = filter_data(&labels, &[], FilterCondition::Equals, 1.0);
        assert!(result.labels.is_empty());
        assert!(result.datasets.is_empty());
        assert_eq!(result.filter_applied.original_count, 1);
    }

    #[test]
    fn unknown_condition_is_rejected() {
        assert!(matches!(
            FilterCondition::parse("between"),
            Err(ToolError::InvalidParameter(_))
        ));
        assert_eq!(FilterCondition::parse("less_than").unwrap(), FilterCondition::LessThan);
    }
}
