use serde::Deserialize;
use serde_json::{json, Value};

use crate::charts::{legend, title_plugin};
use crate::data::datetime::normalize_point_dates;
use crate::error::{Result, ToolError};
use crate::state::chart_config::{into_object, ChartConfig};
use crate::state::dataset::Dataset;
use crate::state::palette::{NEGATIVE, NEUTRAL, POSITIVE, WARNING};

use super::builders::SliceChartRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Millisecond,
    Second,
    Minute,
    Hour,
    #[default]
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl TimeUnit {
    pub fn name(&self) -> &'static str {
        match self {
            TimeUnit::Millisecond => "millisecond",
            TimeUnit::Second => "second",
            TimeUnit::Minute => "minute",
            TimeUnit::Hour => "hour",
            TimeUnit::Day => "day",
            TimeUnit::Week => "week",
            TimeUnit::Month => "month",
            TimeUnit::Quarter => "quarter",
            TimeUnit::Year => "year",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimeSeriesRequest {
    #[serde(default)]
    pub data_points: Vec<Value>,
    #[serde(default)]
    pub datasets: Vec<Dataset>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub time_unit: TimeUnit,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GaugeRequest {
    pub value: f64,
    pub max_value: f64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub thresholds: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GradientDatasetRequest {
    pub data: Vec<f64>,
    pub label: String,
    #[serde(default = "default_start_color")]
    pub start_color: String,
    #[serde(default = "default_end_color")]
    pub end_color: String,
}

fn default_start_color() -> String {
    NEGATIVE.to_string()
}

fn default_end_color() -> String {
    NEUTRAL.to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct HeatmapRequest {
    pub x_labels: Vec<String>,
    pub y_labels: Vec<String>,
    pub data_matrix: Vec<Vec<f64>>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Ohlc {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CandlestickRequest {
    pub labels: Vec<String>,
    pub data: Vec<Ohlc>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RealtimeRequest {
    pub initial_labels: Vec<String>,
    pub initial_data: Vec<f64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default = "default_max_points")]
    pub max_data_points: u32,
}

fn default_max_points() -> u32 {
    20
}

/// Line chart over a time x axis.
pub fn time_series_chart(req: TimeSeriesRequest) -> ChartConfig {
    let mut datasets = req.datasets;
    if datasets.is_empty() && !req.data_points.is_empty() {
        let mut points = req.data_points;
        normalize_point_dates(&mut points);
        datasets.push(Dataset::new(Some("Time Series".to_string()), points));
    }

    let options = json!({
        "responsive": true,
        "plugins": {
            "title": title_plugin(req.title.as_deref().unwrap_or("Time Series Chart")),
            "legend": legend("top")
        },
        "scales": {
            "x": {
                "type": "time",
                "time": {"unit": req.time_unit.name()},
                "title": {"display": true, "text": "Date"}
            },
            "y": {
                "beginAtZero": true,
                "title": {"display": true, "text": "Value"}
            }
        }
    });
    ChartConfig::new("line", None, datasets, into_object(options))
}

/// Half doughnut showing `value` out of `max_value`. Without thresholds the
/// fill is red below 50%, yellow below 80% and green above.
pub fn gauge_chart(req: GaugeRequest) -> Result<ChartConfig> {
    if req.max_value <= 0.0 {
        return Err(ToolError::InvalidParameter(format!(
            "max_value must be greater than zero, got {}",
            req.max_value
        )));
    }

    let ratio = req.value / req.max_value;
    let has_thresholds = req.thresholds.as_ref().is_some_and(|t| !t.is_empty());
    let color = if has_thresholds {
        NEUTRAL
    } else if ratio < 0.5 {
        NEGATIVE
    } else if ratio < 0.8 {
        WARNING
    } else {
        POSITIVE
    };

    let dataset = Dataset::from_numbers(None, &[req.value, req.max_value - req.value])
        .with("backgroundColor", json!([color, "rgba(200, 200, 200, 0.2)"]))
        .with("borderWidth", 0)
        .with("circumference", 180)
        .with("rotation", 270);

    let title = req.title.as_deref().unwrap_or("Gauge Chart");
    let options = json!({
        "responsive": true,
        "cutout": "75%",
        "plugins": {
            "title": title_plugin(&format!("{title}: {}/{}", req.value, req.max_value)),
            "legend": {"display": false},
            "tooltip": {"enabled": true}
        }
    });

    Ok(ChartConfig::new(
        "doughnut",
        Some(vec!["Value".to_string(), "Remaining".to_string()]),
        vec![dataset],
        into_object(options),
    ))
}

pub fn gradient_dataset(req: GradientDatasetRequest) -> Dataset {
    Dataset::from_numbers(Some(req.label), &req.data)
        .with(
            "backgroundColor",
            json!({"type": "gradient", "colors": [req.start_color, req.end_color]}),
        )
        .with("borderColor", req.start_color)
        .with("borderWidth", 2)
}

/// Stacked bars where an invisible base lifts each change to the running
/// total before it.
pub fn waterfall_chart(req: SliceChartRequest) -> ChartConfig {
    let bases: Vec<f64> = req
        .data
        .iter()
        .scan(0.0, |total, &change| {
            let base = *total;
            *total += change;
            Some(base)
        })
        .collect();
    let colors: Vec<&str> = req
        .data
        .iter()
        .map(|&change| if change >= 0.0 { POSITIVE } else { NEGATIVE })
        .collect();

    let datasets = vec![
        Dataset::from_numbers(Some("Base".to_string()), &bases)
            .with("backgroundColor", "rgba(0, 0, 0, 0)"),
        Dataset::from_numbers(Some("Change".to_string()), &req.data)
            .with("backgroundColor", colors),
    ];

    let options = json!({
        "responsive": true,
        "plugins": {
            "title": title_plugin(req.title.as_deref().unwrap_or("Waterfall Chart")),
            "legend": {"display": true}
        },
        "scales": {
            "x": {"stacked": true},
            "y": {"stacked": true, "beginAtZero": true}
        }
    });
    ChartConfig::new("bar", Some(req.labels), datasets, into_object(options))
}

const HEATMAP_MIN_RADIUS: f64 = 5.0;
const HEATMAP_RADIUS_SPAN: f64 = 20.0;

/// Matrix rendered as a bubble grid; bubble radius scales with the value.
pub fn heatmap_chart(req: HeatmapRequest) -> Result<ChartConfig> {
    let max = req
        .data_matrix
        .iter()
        .flatten()
        .copied()
        .reduce(f64::max)
        .ok_or(ToolError::EmptyInput)?;

    let cells: Vec<Value> = req
        .data_matrix
        .iter()
        .enumerate()
        .flat_map(|(y, row)| {
            row.iter().enumerate().map(move |(x, &value)| {
                let r = if max == 0.0 {
                    HEATMAP_MIN_RADIUS
                } else {
                    value / max * HEATMAP_RADIUS_SPAN + HEATMAP_MIN_RADIUS
                };
                json!({"x": x, "y": y, "r": r})
            })
        })
        .collect();

    let dataset = Dataset::new(Some("Heatmap".to_string()), cells)
        .with("backgroundColor", "rgba(255, 99, 132, 0.6)");

    let options = json!({
        "responsive": true,
        "plugins": {
            "title": title_plugin(req.title.as_deref().unwrap_or("Heatmap")),
            "tooltip": {
                "callbacks": {
                    "label": "function(context) { return 'Value: ' + context.raw.r; }"
                }
            }
        },
        "scales": {
            "x": {"type": "category", "labels": req.x_labels, "offset": true},
            "y": {"type": "category", "labels": req.y_labels, "offset": true}
        }
    });
    Ok(ChartConfig::new("bubble", None, vec![dataset], into_object(options)))
}

/// OHLC candles approximated by bars spanning low to high.
pub fn candlestick_chart(req: CandlestickRequest) -> ChartConfig {
    let spans: Vec<f64> = req.data.iter().map(|c| c.high - c.low).collect();
    let colors: Vec<&str> = req
        .data
        .iter()
        .map(|c| {
            if c.close >= c.open {
                "rgba(75, 192, 192, 0.6)"
            } else {
                "rgba(255, 99, 132, 0.6)"
            }
        })
        .collect();

    let dataset = Dataset::from_numbers(Some("Low-High".to_string()), &spans)
        .with("backgroundColor", colors);
    let options = json!({
        "responsive": true,
        "plugins": {
            "title": title_plugin(req.title.as_deref().unwrap_or("Candlestick Chart")),
            "tooltip": {"enabled": true}
        },
        "scales": {
            "y": {"beginAtZero": false}
        }
    });
    ChartConfig::new("bar", Some(req.labels), vec![dataset], into_object(options))
}

/// Filled line chart with short animations, for feeds that append points.
pub fn realtime_chart(req: RealtimeRequest) -> ChartConfig {
    let dataset = Dataset::from_numbers(Some("Real-time Data".to_string()), &req.initial_data)
        .with("borderColor", "rgb(75, 192, 192)")
        .with("backgroundColor", "rgba(75, 192, 192, 0.2)")
        .with("tension", 0.4)
        .with("fill", true);

    let options = json!({
        "responsive": true,
        "plugins": {
            "title": title_plugin(req.title.as_deref().unwrap_or("Real-time Chart")),
            "legend": {"display": true}
        },
        "scales": {
            "x": {"display": true, "title": {"display": true, "text": "Time"}},
            "y": {"display": true, "title": {"display": true, "text": "Value"}}
        },
        "animation": {"duration": 300}
    });

    let mut config = ChartConfig::new(
        "line",
        Some(req.initial_labels),
        vec![dataset],
        into_object(options),
    );
    config.set_extra("maxDataPoints", req.max_data_points);
    config
}
