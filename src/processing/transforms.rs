use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::{Result, ToolError};
use crate::processing::round2;

/// A series derived from an input series.
#[derive(Debug, Clone, PartialEq)]
pub enum DerivedSeries {
    Cumulative(Vec<f64>),
    MovingAverage { values: Vec<f64>, window_size: usize },
    PercentageChange(Vec<f64>),
}

impl DerivedSeries {
    pub fn values(&self) -> &[f64] {
        match self {
            DerivedSeries::Cumulative(v) => v,
            DerivedSeries::MovingAverage { values, .. } => values,
            DerivedSeries::PercentageChange(v) => v,
        }
    }

    /// Key the derived values are reported under.
    pub fn key(&self) -> &'static str {
        match self {
            DerivedSeries::Cumulative(_) => "cumulative",
            DerivedSeries::MovingAverage { .. } => "moving_average",
            DerivedSeries::PercentageChange(_) => "percentage_change",
        }
    }
}

/// Original series paired with its derived series.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformResult {
    pub original: Vec<f64>,
    pub derived: DerivedSeries,
}

impl Serialize for TransformResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let window = match &self.derived {
            DerivedSeries::MovingAverage { window_size, .. } => Some(*window_size),
            _ => None,
        };
        let mut map = serializer.serialize_map(Some(if window.is_some() { 3 } else { 2 }))?;
        map.serialize_entry("original", &self.original)?;
        map.serialize_entry(self.derived.key(), self.derived.values())?;
        if let Some(window_size) = window {
            map.serialize_entry("window_size", &window_size)?;
        }
        map.end()
    }
}

/// Running total: `result[i] = series[0] + ... + series[i]`.
pub fn cumulative_sum(series: &[f64]) -> Vec<f64> {
    series
        .iter()
        .scan(0.0, |total, &x| {
            *total += x;
            Some(*total)
        })
        .collect()
}

/// Trailing moving average. Windows near the start are shorter than
/// `window_size` rather than skipped, so the output has the input's length.
pub fn moving_average(series: &[f64], window_size: i64) -> Result<Vec<f64>> {
    if window_size <= 0 {
        return Err(ToolError::InvalidParameter(format!(
            "window_size must be a positive integer, got {window_size}"
        )));
    }
    let window = usize::try_from(window_size).unwrap_or(usize::MAX);

    Ok((0..series.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            let slice = &series[start..=i];
            round2(slice.iter().sum::<f64>() / slice.len() as f64)
        })
        .collect())
}

/// Percentage change from the previous value. The first element, and any
/// element whose predecessor is zero, is reported as 0.
pub fn percentage_change(series: &[f64]) -> Vec<f64> {
    if series.is_empty() {
        return Vec::new();
    }

    let mut result = Vec::with_capacity(series.len());
    result.push(0.0);
    result.extend(series.windows(2).map(|pair| {
        let (prev, cur) = (pair[0], pair[1]);
        if prev == 0.0 {
            0.0
        } else {
            round2((cur - prev) / prev * 100.0)
        }
    }));
    result
}

pub fn cumulative(series: Vec<f64>) -> TransformResult {
    let derived = DerivedSeries::Cumulative(cumulative_sum(&series));
    TransformResult {
        original: series,
        derived,
    }
}

pub fn moving_average_transform(series: Vec<f64>, window_size: i64) -> Result<TransformResult> {
    let values = moving_average(&series, window_size)?;
    Ok(TransformResult {
        original: series,
        derived: DerivedSeries::MovingAverage {
            values,
            window_size: window_size as usize,
        },
    })
}

pub fn percentage_change_transform(series: Vec<f64>) -> TransformResult {
    let derived = DerivedSeries::PercentageChange(percentage_change(&series));
    TransformResult {
        original: series,
        derived,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn cumulative_sum_runs_left_to_right() {
        assert_eq!(cumulative_sum(&[1.0, 2.0, 3.0, -4.0]), vec![1.0, 3.0, 6.0, 2.0]);
        assert!(cumulative_sum(&[]).is_empty());
    }

    #[test]
    fn moving_average_has_ragged_start() {
        let avg = moving_average(&[10.0, 20.0, 30.0, 40.0, 50.0], 3).unwrap();
        assert_eq!(avg, vec![10.0, 15.0, 20.0, 30.0, 40.0]);
    }

    #[test]
    fn moving_average_rounds_each_value() {
        let avg = moving_average(&[1.0, 2.0, 2.0], 3).unwrap();
        assert_eq!(avg, vec![1.0, 1.5, 1.67]);
    }

    #[test]
    fn half_cent_ties_round_to_even() {
        assert_eq!(moving_average(&[0.0, 0.25], 2).unwrap()[1], 0.12);
        assert_eq!(percentage_change(&[800.0, 801.0])[1], 0.12);
    }

    #[test]
    fn window_larger_than_series_averages_prefix() {
        let avg = moving_average(&[2.0, 4.0], 10).unwrap();
        assert_eq!(avg, vec![2.0, 3.0]);
        assert!(moving_average(&[], 3).unwrap().is_empty());
    }

    #[test]
    fn non_positive_window_is_rejected() {
        for window in [0, -1] {
            let err = moving_average(&[1.0, 2.0], window).unwrap_err();
            assert!(matches!(err, ToolError::InvalidParameter(_)));
        }
    }

    #[test]
    fn percentage_change_between_steps() {
        let pct = percentage_change(&[100.0, 150.0, 120.0]);
        assert_eq!(pct, vec![0.0, 50.0, -20.0]);
    }

    #[test]
    fn zero_baseline_reports_zero() {
        let pct = percentage_change(&[0.0, 50.0, 100.0]);
        assert_eq!(pct, vec![0.0, 0.0, 100.0]);
        assert!(percentage_change(&[]).is_empty());
        assert_eq!(percentage_change(&[7.0]), vec![0.0]);
    }

    #[test]
    fn transform_results_serialize_with_named_series() {
        let json = serde_json::to_string(&cumulative(vec![1.0, 2.0])).unwrap();
        assert_eq!(json, r#"{"original":[1.0,2.0],"cumulative":[1.0,3.0]}"#);

        let json = serde_json::to_string(&moving_average_transform(vec![1.0, 3.0], 2).unwrap()).unwrap();
        assert_eq!(
            json,
            r#"{"original":[1.0,3.0],"moving_average":[1.0,2.0],"window_size":2}"#
        );

        let json = serde_json::to_string(&percentage_change_transform(vec![4.0, 5.0])).unwrap();
        assert_eq!(json, r#"{"original":[4.0,5.0],"percentage_change":[0.0,25.0]}"#);
    }

    proptest! {
        #[test]
        fn last_running_total_is_the_sum(values in prop::collection::vec(-1.0e4..1.0e4_f64, 1..100)) {
            let totals = cumulative_sum(&values);
            prop_assert_eq!(totals.len(), values.len());
            let sum = values.iter().fold(0.0, |acc, v| acc + v);
            prop_assert_eq!(*totals.last().unwrap(), sum);
        }

        #[test]
        fn transforms_preserve_length(
            values in prop::collection::vec(-1.0e4..1.0e4_f64, 0..100),
            window in 1i64..20
        ) {
            prop_assert_eq!(moving_average(&values, window).unwrap().len(), values.len());
            prop_assert_eq!(percentage_change(&values).len(), values.len());
        }
    }
}
