use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::charts::{legend, title_plugin};
use crate::state::chart_config::{into_object, ChartConfig};
use crate::state::dataset::Dataset;
use crate::state::palette::Palette;

#[derive(Debug, Clone, Deserialize)]
pub struct ChartConfigRequest {
    pub chart_type: String,
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
    #[serde(default)]
    pub options: Option<Map<String, Value>>,
}

/// Labels with one value per slice; used by pie, polar area and funnel charts.
#[derive(Debug, Clone, Deserialize)]
pub struct SliceChartRequest {
    pub labels: Vec<String>,
    pub data: Vec<f64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub color_palette: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DoughnutChartRequest {
    #[serde(flatten)]
    pub slices: SliceChartRequest,
    #[serde(default = "default_cutout")]
    pub cutout_percentage: i64,
}

fn default_cutout() -> i64 {
    50
}

/// Labels plus caller-supplied datasets.
#[derive(Debug, Clone, Deserialize)]
pub struct SeriesChartRequest {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BarChartRequest {
    #[serde(flatten)]
    pub series: SeriesChartRequest,
    #[serde(default)]
    pub stacked: bool,
    #[serde(default)]
    pub horizontal: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LineChartRequest {
    #[serde(flatten)]
    pub series: SeriesChartRequest,
    #[serde(default = "default_true")]
    pub smooth: bool,
    #[serde(default)]
    pub fill: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AreaChartRequest {
    #[serde(flatten)]
    pub series: SeriesChartRequest,
    #[serde(default)]
    pub stacked: bool,
}

/// Datasets of `{x, y}` (or `{x, y, r}`) points; no category labels.
#[derive(Debug, Clone, Deserialize)]
pub struct PointChartRequest {
    pub datasets: Vec<Dataset>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ComparisonChartRequest {
    pub labels: Vec<String>,
    pub dataset1: Dataset,
    pub dataset2: Dataset,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub chart_type: Option<String>,
}

fn default_true() -> bool {
    true
}

fn title_or<'a>(title: &'a Option<String>, default: &'a str) -> &'a str {
    title.as_deref().unwrap_or(default)
}

/// A single dataset colored slice by slice from `palette`.
fn slice_dataset(data: &[f64], palette: Palette) -> Dataset {
    Dataset::from_numbers(None, data)
        .with("backgroundColor", palette.first(data.len()))
        .with("borderWidth", 2)
        .with("borderColor", "#fff")
}

pub fn chart_config(req: ChartConfigRequest) -> ChartConfig {
    ChartConfig::new(
        &req.chart_type,
        Some(req.labels),
        req.datasets,
        req.options.unwrap_or_default(),
    )
}

pub fn pie_chart(req: SliceChartRequest) -> ChartConfig {
    let palette = Palette::resolve(req.color_palette.as_deref(), Palette::Vibrant);
    let options = json!({
        "responsive": true,
        "plugins": {
            "title": title_plugin(title_or(&req.title, "Pie Chart")),
            "legend": {"position": "bottom"}
        }
    });
    ChartConfig::new(
        "pie",
        Some(req.labels),
        vec![slice_dataset(&req.data, palette)],
        into_object(options),
    )
}

pub fn doughnut_chart(req: DoughnutChartRequest) -> ChartConfig {
    let slices = req.slices;
    let palette = Palette::resolve(slices.color_palette.as_deref(), Palette::Vibrant);
    let options = json!({
        "responsive": true,
        "cutout": format!("{}%", req.cutout_percentage),
        "plugins": {
            "title": title_plugin(title_or(&slices.title, "Doughnut Chart")),
            "legend": {"position": "bottom"}
        }
    });
    ChartConfig::new(
        "doughnut",
        Some(slices.labels),
        vec![slice_dataset(&slices.data, palette)],
        into_object(options),
    )
}

pub fn polar_area_chart(req: SliceChartRequest) -> ChartConfig {
    let palette = Palette::resolve(req.color_palette.as_deref(), Palette::Vibrant);
    let dataset = Dataset::from_numbers(None, &req.data)
        .with("backgroundColor", palette.first(req.data.len()));
    let options = json!({
        "responsive": true,
        "plugins": {
            "title": title_plugin(title_or(&req.title, "Polar Area Chart")),
            "legend": {"position": "bottom"}
        }
    });
    ChartConfig::new("polarArea", Some(req.labels), vec![dataset], into_object(options))
}

/// Funnel stages drawn as horizontal bars.
pub fn funnel_chart(req: SliceChartRequest) -> ChartConfig {
    let palette = Palette::resolve(req.color_palette.as_deref(), Palette::Professional);
    let options = json!({
        "indexAxis": "y",
        "responsive": true,
        "plugins": {
            "title": title_plugin(title_or(&req.title, "Funnel Chart")),
            "legend": {"display": false}
        },
        "scales": {
            "x": {"beginAtZero": true}
        }
    });
    ChartConfig::new(
        "bar",
        Some(req.labels),
        vec![slice_dataset(&req.data, palette)],
        into_object(options),
    )
}

pub fn bar_chart(req: BarChartRequest) -> ChartConfig {
    let chart_type = if req.horizontal { "horizontalBar" } else { "bar" };
    let series = req.series;
    let options = json!({
        "responsive": true,
        "plugins": {
            "title": title_plugin(title_or(&series.title, "Bar Chart")),
            "legend": legend("top")
        },
        "scales": {
            "x": {"stacked": req.stacked},
            "y": {"stacked": req.stacked, "beginAtZero": true}
        }
    });
    ChartConfig::new(chart_type, Some(series.labels), series.datasets, into_object(options))
}

pub fn line_chart(req: LineChartRequest) -> ChartConfig {
    let series = req.series;
    let tension = if req.smooth { 0.4 } else { 0.0 };
    let datasets = series
        .datasets
        .into_iter()
        .map(|mut dataset| {
            dataset.set_default("tension", tension);
            dataset.set_default("fill", req.fill);
            dataset
        })
        .collect();
    let options = json!({
        "responsive": true,
        "plugins": {
            "title": title_plugin(title_or(&series.title, "Line Chart")),
            "legend": legend("top")
        },
        "scales": {
            "y": {"beginAtZero": true}
        }
    });
    ChartConfig::new("line", Some(series.labels), datasets, into_object(options))
}

/// Filled line chart.
pub fn area_chart(req: AreaChartRequest) -> ChartConfig {
    let series = req.series;
    let datasets = series
        .datasets
        .into_iter()
        .map(|mut dataset| {
            dataset.set_default("fill", true);
            dataset.set_default("tension", 0.4);
            dataset
        })
        .collect();
    let options = json!({
        "responsive": true,
        "plugins": {
            "title": title_plugin(title_or(&series.title, "Area Chart")),
            "legend": legend("top"),
            "filler": {"propagate": false}
        },
        "scales": {
            "x": {"stacked": req.stacked},
            "y": {"stacked": req.stacked, "beginAtZero": true}
        },
        "interaction": {"intersect": false}
    });
    ChartConfig::new("line", Some(series.labels), datasets, into_object(options))
}

pub fn radar_chart(req: SeriesChartRequest) -> ChartConfig {
    let options = json!({
        "responsive": true,
        "plugins": {
            "title": title_plugin(title_or(&req.title, "Radar Chart")),
            "legend": legend("top")
        },
        "scales": {
            "r": {"beginAtZero": true}
        }
    });
    ChartConfig::new("radar", Some(req.labels), req.datasets, into_object(options))
}

/// Bar base type; each dataset may override it with its own `type`.
pub fn mixed_chart(req: SeriesChartRequest) -> ChartConfig {
    let options = json!({
        "responsive": true,
        "plugins": {
            "title": title_plugin(title_or(&req.title, "Mixed Chart")),
            "legend": legend("top")
        },
        "scales": {
            "y": {"beginAtZero": true}
        }
    });
    ChartConfig::new("bar", Some(req.labels), req.datasets, into_object(options))
}

/// Line chart with a left `y` axis and a right `y1` axis; datasets pick
/// one through `yAxisID`.
pub fn multi_axis_chart(req: SeriesChartRequest) -> ChartConfig {
    let options = json!({
        "responsive": true,
        "plugins": {
            "title": title_plugin(title_or(&req.title, "Multi-Axis Chart")),
            "legend": legend("top")
        },
        "scales": {
            "y": {
                "type": "linear",
                "display": true,
                "position": "left",
                "beginAtZero": true
            },
            "y1": {
                "type": "linear",
                "display": true,
                "position": "right",
                "beginAtZero": true,
                "grid": {"drawOnChartArea": false}
            }
        }
    });
    ChartConfig::new("line", Some(req.labels), req.datasets, into_object(options))
}

fn point_chart(chart_type: &str, req: PointChartRequest, default_title: &str) -> ChartConfig {
    let options = json!({
        "responsive": true,
        "plugins": {
            "title": title_plugin(title_or(&req.title, default_title)),
            "legend": legend("top")
        },
        "scales": {
            "x": {"type": "linear", "position": "bottom"},
            "y": {"beginAtZero": true}
        }
    });
    ChartConfig::new(chart_type, None, req.datasets, into_object(options))
}

pub fn scatter_chart(req: PointChartRequest) -> ChartConfig {
    point_chart("scatter", req, "Scatter Chart")
}

pub fn bubble_chart(req: PointChartRequest) -> ChartConfig {
    point_chart("bubble", req, "Bubble Chart")
}

/// Two datasets side by side, colored from the professional palette
/// unless they bring their own colors.
pub fn comparison_chart(req: ComparisonChartRequest) -> ChartConfig {
    let chart_type = req.chart_type.as_deref().unwrap_or("bar").to_string();
    let mut datasets = [req.dataset1, req.dataset2];

    for (index, dataset) in datasets.iter_mut().enumerate() {
        let color = Palette::Professional.color_for_index(index);
        dataset.set_default("backgroundColor", color);
        if chart_type == "line" {
            dataset.set_default("borderColor", color);
            dataset.set("tension", 0.4);
        }
    }

    let scales = if chart_type == "radar" {
        json!({"r": {"beginAtZero": true}})
    } else {
        json!({"y": {"beginAtZero": true}})
    };
    let options = json!({
        "responsive": true,
        "plugins": {
            "title": title_plugin(title_or(&req.title, "Comparison Chart")),
            "legend": legend("top")
        },
        "scales": scales
    });
    ChartConfig::new(
        &chart_type,
        Some(req.labels),
        datasets.into(),
        into_object(options),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn series(datasets: Value) -> SeriesChartRequest {
        serde_json::from_value(json!({
            "labels": ["Q1", "Q2"],
            "datasets": datasets
        }))
        .unwrap()
    }

    fn to_json(config: &ChartConfig) -> Value {
        serde_json::to_value(config).unwrap()
    }

    #[test]
    fn generic_config_defaults_to_empty_options() {
        let req: ChartConfigRequest = serde_json::from_value(json!({
            "chart_type": "bar",
            "labels": ["Red", "Blue"],
            "datasets": [{"label": "Votes", "data": [12, 19]}]
        }))
        .unwrap();
        let json = to_json(&chart_config(req));
        assert_eq!(
            json,
            json!({
                "type": "bar",
                "data": {
                    "labels": ["Red", "Blue"],
                    "datasets": [{"label": "Votes", "data": [12, 19]}]
                },
                "options": {}
            })
        );
    }

    #[test]
    fn pie_slices_take_palette_prefix() {
        let req: SliceChartRequest = serde_json::from_value(json!({
            "labels": ["Chrome", "Firefox", "Safari"],
            "data": [60, 25, 15],
            "title": "Browser Share",
            "color_palette": "professional"
        }))
        .unwrap();
        let json = to_json(&pie_chart(req));
        let dataset = &json["data"]["datasets"][0];
        assert_eq!(json["type"], "pie");
        assert_eq!(dataset["backgroundColor"].as_array().unwrap().len(), 3);
        assert_eq!(dataset["backgroundColor"][0], Palette::Professional.colors()[0]);
        assert_eq!(dataset["borderColor"], "#fff");
        assert_eq!(json["options"]["plugins"]["title"]["text"], "Browser Share");
        assert_eq!(json["options"]["plugins"]["legend"]["position"], "bottom");
    }

    #[test]
    fn unknown_palette_falls_back_per_chart() {
        let req: SliceChartRequest = serde_json::from_value(json!({
            "labels": ["a"], "data": [1], "color_palette": "nope"
        }))
        .unwrap();
        let pie = to_json(&pie_chart(req.clone()));
        let funnel = to_json(&funnel_chart(req));
        assert_eq!(pie["data"]["datasets"][0]["backgroundColor"][0], Palette::Vibrant.colors()[0]);
        assert_eq!(
            funnel["data"]["datasets"][0]["backgroundColor"][0],
            Palette::Professional.colors()[0]
        );
        assert_eq!(funnel["options"]["indexAxis"], "y");
        assert_eq!(pie["options"]["plugins"]["title"]["text"], "Pie Chart");
    }

    #[test]
    fn doughnut_cutout_is_a_percentage() {
        let req: DoughnutChartRequest = serde_json::from_value(json!({
            "labels": ["a", "b"], "data": [1, 2], "cutout_percentage": 70
        }))
        .unwrap();
        assert_eq!(to_json(&doughnut_chart(req))["options"]["cutout"], "70%");

        let req: DoughnutChartRequest =
            serde_json::from_value(json!({"labels": [], "data": []})).unwrap();
        assert_eq!(to_json(&doughnut_chart(req))["options"]["cutout"], "50%");
    }

    #[test]
    fn horizontal_stacked_bars() {
        let req = BarChartRequest {
            series: series(json!([{"label": "A", "data": [1, 2]}])),
            stacked: true,
            horizontal: true,
        };
        let json = to_json(&bar_chart(req));
        assert_eq!(json["type"], "horizontalBar");
        assert_eq!(json["options"]["scales"]["x"]["stacked"], true);
        assert_eq!(json["options"]["scales"]["y"]["beginAtZero"], true);
    }

    #[test]
    fn line_defaults_do_not_override_dataset_keys() {
        let req = LineChartRequest {
            series: series(json!([
                {"label": "A", "data": [1, 2]},
                {"label": "B", "data": [3, 4], "tension": 0.1, "fill": true}
            ])),
            smooth: false,
            fill: false,
        };
        let json = to_json(&line_chart(req));
        let datasets = &json["data"]["datasets"];
        assert_eq!(datasets[0]["tension"], 0.0);
        assert_eq!(datasets[0]["fill"], false);
        assert_eq!(datasets[1]["tension"], 0.1);
        assert_eq!(datasets[1]["fill"], true);
    }

    #[test]
    fn line_request_defaults_to_smooth() {
        let req: LineChartRequest = serde_json::from_value(json!({
            "labels": ["a"], "datasets": [{"data": [1]}]
        }))
        .unwrap();
        assert!(req.smooth);
        assert!(!req.fill);
        let json = to_json(&line_chart(req));
        assert_eq!(json["data"]["datasets"][0]["tension"], 0.4);
    }

    #[test]
    fn area_chart_fills_by_default() {
        let req = AreaChartRequest {
            series: series(json!([{"data": [1, 2]}])),
            stacked: false,
        };
        let json = to_json(&area_chart(req));
        assert_eq!(json["type"], "line");
        assert_eq!(json["data"]["datasets"][0]["fill"], true);
        assert_eq!(json["options"]["plugins"]["filler"]["propagate"], false);
        assert_eq!(json["options"]["interaction"]["intersect"], false);
    }

    #[test]
    fn point_charts_have_no_labels() {
        let req: PointChartRequest = serde_json::from_value(json!({
            "datasets": [{"label": "P", "data": [{"x": 1, "y": 2, "r": 5}]}]
        }))
        .unwrap();
        let json = to_json(&bubble_chart(req));
        assert_eq!(json["type"], "bubble");
        assert!(json["data"].get("labels").is_none());
        assert_eq!(json["options"]["scales"]["x"]["type"], "linear");
        assert_eq!(json["options"]["plugins"]["title"]["text"], "Bubble Chart");
    }

    #[test]
    fn comparison_line_chart_colors_both_datasets() {
        let req: ComparisonChartRequest = serde_json::from_value(json!({
            "labels": ["x", "y"],
            "dataset1": {"label": "2023", "data": [1, 2]},
            "dataset2": {"label": "2024", "data": [3, 4], "backgroundColor": "black"},
            "chart_type": "line"
        }))
        .unwrap();
        let json = to_json(&comparison_chart(req));
        let datasets = &json["data"]["datasets"];
        assert_eq!(datasets[0]["backgroundColor"], Palette::Professional.colors()[0]);
        assert_eq!(datasets[0]["borderColor"], Palette::Professional.colors()[0]);
        assert_eq!(datasets[1]["backgroundColor"], "black");
        assert_eq!(datasets[1]["borderColor"], Palette::Professional.colors()[1]);
        assert_eq!(datasets[1]["tension"], 0.4);
        assert!(json["options"]["scales"].get("y").is_some());
    }

    #[test]
    fn comparison_radar_uses_radial_scale() {
        let req: ComparisonChartRequest = serde_json::from_value(json!({
            "labels": ["x"],
            "dataset1": {"data": [1]},
            "dataset2": {"data": [2]},
            "chart_type": "radar"
        }))
        .unwrap();
        let json = to_json(&comparison_chart(req));
        assert_eq!(json["options"]["scales"], json!({"r": {"beginAtZero": true}}));
        assert!(json["data"]["datasets"][0].get("tension").is_none());
    }

    #[test]
    fn multi_axis_has_two_y_axes() {
        let json = to_json(&multi_axis_chart(series(json!([]))));
        assert_eq!(json["options"]["scales"]["y1"]["position"], "right");
        assert_eq!(json["options"]["scales"]["y1"]["grid"]["drawOnChartArea"], false);
    }
}
