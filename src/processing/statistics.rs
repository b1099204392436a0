use serde::Serialize;

use crate::error::{Result, ToolError};
use crate::processing::round2;

/// Raw descriptive statistics for a data series, at full precision.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesStats {
    pub count: usize,
    pub sum: f64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    pub mean: f64,
    pub median: f64,
    pub variance: f64,
    pub std_dev: f64,
}

impl SeriesStats {
    /// Compute statistics over `values`. Returns `None` for an empty series.
    pub fn compute(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let count = values.len();
        let sum = values.iter().fold(0.0, |acc, v| acc + v);
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = sum / count as f64;

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let median = if count % 2 == 0 {
            (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
        } else {
            sorted[count / 2]
        };

        // Population variance.
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;
        let std_dev = variance.sqrt();

        Some(SeriesStats {
            count,
            sum,
            min,
            max,
            range: max - min,
            mean,
            median,
            variance,
            std_dev,
        })
    }

    /// Coefficient of variation, or `None` when the mean is zero.
    pub fn coefficient_of_variation(&self) -> Option<f64> {
        if self.mean == 0.0 {
            None
        } else {
            Some(self.std_dev / self.mean)
        }
    }
}

/// Statistics as reported to callers: averages and deviations rounded
/// to two decimals, order statistics kept at input precision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsReport {
    pub count: usize,
    pub sum: f64,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    pub std_dev: f64,
    pub variance: f64,
}

impl From<&SeriesStats> for StatisticsReport {
    fn from(stats: &SeriesStats) -> Self {
        Self {
            count: stats.count,
            sum: stats.sum,
            mean: round2(stats.mean),
            median: stats.median,
            min: stats.min,
            max: stats.max,
            range: stats.range,
            std_dev: round2(stats.std_dev),
            variance: round2(stats.variance),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestedChart {
    Pie,
    Bar,
    Line,
    Area,
    Scatter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSuggestion {
    #[serde(rename = "type")]
    pub chart: SuggestedChart,
    pub reason: &'static str,
}

impl ChartSuggestion {
    fn new(chart: SuggestedChart, reason: &'static str) -> Self {
        Self { chart, reason }
    }
}

/// Series above this length reads as a sequence rather than a set of parts.
const SMALL_SERIES_MAX: usize = 10;
/// Coefficient of variation above which a scatter plot is suggested.
const HIGH_VARIABILITY_CV: f64 = 0.5;

/// Recommend chart types for a series, in priority order.
pub fn suggest_charts(stats: &SeriesStats) -> Vec<ChartSuggestion> {
    let mut suggestions = Vec::with_capacity(3);

    if stats.count <= SMALL_SERIES_MAX {
        suggestions.push(ChartSuggestion::new(
            SuggestedChart::Pie,
            "Small dataset works well with pie chart for proportions",
        ));
        suggestions.push(ChartSuggestion::new(
            SuggestedChart::Bar,
            "Bar chart for easy comparison of values",
        ));
    } else {
        suggestions.push(ChartSuggestion::new(
            SuggestedChart::Line,
            "Line chart for trends over time or sequence",
        ));
        suggestions.push(ChartSuggestion::new(
            SuggestedChart::Area,
            "Area chart to show cumulative trends",
        ));
    }

    // A zero mean has no meaningful coefficient of variation; skip.
    if let Some(cv) = stats.coefficient_of_variation() {
        if cv > HIGH_VARIABILITY_CV {
            suggestions.push(ChartSuggestion::new(
                SuggestedChart::Scatter,
                "High variability suggests scatter plot for distribution",
            ));
        }
    }

    suggestions
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataSummary {
    pub has_labels: bool,
    pub label_count: usize,
}

/// Full result of `analyze_data_for_chart`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub statistics: StatisticsReport,
    pub suggested_charts: Vec<ChartSuggestion>,
    pub data_summary: DataSummary,
}

/// Describe a series and suggest how to chart it.
pub fn analyze(series: &[f64], labels: Option<&[String]>) -> Result<Analysis> {
    let stats = SeriesStats::compute(series).ok_or(ToolError::EmptyInput)?;

    Ok(Analysis {
        statistics: StatisticsReport::from(&stats),
        suggested_charts: suggest_charts(&stats),
        data_summary: DataSummary {
            has_labels: labels.is_some(),
            label_count: labels.map_or(0, |l| l.len()),
        },
    })
}
