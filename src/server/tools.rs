use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::charts::{builders, decorators, html, specialized, templates};
use crate::data::csv_export::{self, CsvExportRequest};
use crate::error::{Result, ToolError};
use crate::processing::filtering::{self, FilterCondition};
use crate::processing::{statistics, transforms};
use crate::state::chart_config::ChartConfig;
use crate::state::dataset::Dataset;
use crate::state::palette;
use crate::state::theme::Theme;

/// A tool as advertised to clients.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// What a tool produced. JSON is pretty-printed; text (CSV, HTML) is sent as is.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    Json(Value),
    Text(String),
}

impl ToolOutput {
    fn json<T: Serialize>(value: &T) -> Result<Self> {
        serde_json::to_value(value)
            .map(ToolOutput::Json)
            .map_err(ToolError::Encode)
    }

    pub fn into_text(self) -> Result<String> {
        match self {
            ToolOutput::Json(value) => serde_json::to_string_pretty(&value).map_err(ToolError::Encode),
            ToolOutput::Text(text) => Ok(text),
        }
    }
}

// Schema helpers.

fn schema(properties: Value, required: &[&str]) -> Value {
    json!({"type": "object", "properties": properties, "required": required})
}

fn string(description: &str) -> Value {
    json!({"type": "string", "description": description})
}

fn number(description: &str) -> Value {
    json!({"type": "number", "description": description})
}

fn integer(description: &str) -> Value {
    json!({"type": "integer", "description": description})
}

fn boolean(description: &str) -> Value {
    json!({"type": "boolean", "description": description})
}

fn object(description: &str) -> Value {
    json!({"type": "object", "description": description})
}

fn array_of(item_type: &str, description: &str) -> Value {
    json!({"type": "array", "items": {"type": item_type}, "description": description})
}

fn with_default(mut property: Value, default: impl Into<Value>) -> Value {
    if let Some(map) = property.as_object_mut() {
        map.insert("default".into(), default.into());
    }
    property
}

fn with_enum(mut property: Value, values: &[&str]) -> Value {
    if let Some(map) = property.as_object_mut() {
        map.insert("enum".into(), json!(values));
    }
    property
}

fn labels() -> Value {
    array_of("string", "Labels for the data points")
}

fn datasets() -> Value {
    array_of("object", "Chart.js datasets, each with at least 'label' and 'data'")
}

fn values() -> Value {
    array_of("number", "Numeric values")
}

fn title(default: &str) -> Value {
    with_default(string("Chart title"), default)
}

fn palette_name(default: &str) -> Value {
    let names: Vec<&str> = palette::Palette::ALL.iter().map(|p| p.name()).collect();
    with_default(with_enum(string("Color palette"), &names), default)
}

fn chart_config() -> Value {
    string("Existing chart configuration as a JSON string")
}

fn slice_schema(title_default: &str, palette_default: &str) -> Value {
    schema(
        json!({
            "labels": labels(),
            "data": values(),
            "title": title(title_default),
            "color_palette": palette_name(palette_default)
        }),
        &["labels", "data"],
    )
}

fn series_schema(title_default: &str) -> Value {
    schema(
        json!({"labels": labels(), "datasets": datasets(), "title": title(title_default)}),
        &["labels", "datasets"],
    )
}

fn point_schema(title_default: &str) -> Value {
    schema(
        json!({"datasets": datasets(), "title": title(title_default)}),
        &["datasets"],
    )
}

fn tool(name: &'static str, description: &'static str, input_schema: Value) -> ToolDefinition {
    ToolDefinition {
        name,
        description,
        input_schema,
    }
}

/// Every tool the server offers, in catalogue order.
pub fn definitions() -> Vec<ToolDefinition> {
    vec![
        tool(
            "create_chart_config",
            "Create a Chart.js configuration object from a chart type, labels and datasets.",
            schema(
                json!({
                    "chart_type": string("Chart.js chart type (bar, line, pie, ...)"),
                    "labels": labels(),
                    "datasets": datasets(),
                    "options": object("Chart.js options")
                }),
                &["chart_type", "labels", "datasets"],
            ),
        ),
        tool(
            "create_pie_chart",
            "Create a pie chart with one slice per label.",
            slice_schema("Pie Chart", "vibrant"),
        ),
        tool(
            "create_doughnut_chart",
            "Create a doughnut chart with one slice per label.",
            {
                let mut s = slice_schema("Doughnut Chart", "vibrant");
                s["properties"]["cutout_percentage"] =
                    with_default(integer("Size of the center hole in percent"), 50);
                s
            },
        ),
        tool(
            "create_bar_chart",
            "Create a bar chart, optionally stacked or horizontal.",
            {
                let mut s = series_schema("Bar Chart");
                s["properties"]["stacked"] = with_default(boolean("Stack the datasets"), false);
                s["properties"]["horizontal"] = with_default(boolean("Draw bars horizontally"), false);
                s
            },
        ),
        tool(
            "create_line_chart",
            "Create a line chart, optionally smoothed or filled.",
            {
                let mut s = series_schema("Line Chart");
                s["properties"]["smooth"] = with_default(boolean("Use curved lines"), true);
                s["properties"]["fill"] = with_default(boolean("Fill the area under lines"), false);
                s
            },
        ),
        tool(
            "create_radar_chart",
            "Create a radar chart for comparing several variables.",
            series_schema("Radar Chart"),
        ),
        tool(
            "create_polar_area_chart",
            "Create a polar area chart with one segment per label.",
            slice_schema("Polar Area Chart", "vibrant"),
        ),
        tool(
            "create_scatter_chart",
            "Create a scatter chart from datasets of {x, y} points.",
            point_schema("Scatter Chart"),
        ),
        tool(
            "create_bubble_chart",
            "Create a bubble chart from datasets of {x, y, r} points.",
            point_schema("Bubble Chart"),
        ),
        tool(
            "create_mixed_chart",
            "Create a chart mixing types; each dataset may set its own 'type'.",
            series_schema("Mixed Chart"),
        ),
        tool(
            "create_area_chart",
            "Create a filled area chart, optionally stacked.",
            {
                let mut s = series_schema("Area Chart");
                s["properties"]["stacked"] = with_default(boolean("Stack the areas"), false);
                s
            },
        ),
        tool(
            "create_time_series_chart",
            "Create a line chart over a time axis.",
            schema(
                json!({
                    "data_points": array_of("object", "Points with 'x' (date or timestamp) and 'y'"),
                    "datasets": datasets(),
                    "title": title("Time Series Chart"),
                    "time_unit": with_default(
                        with_enum(
                            string("Time axis unit"),
                            &["millisecond", "second", "minute", "hour", "day", "week", "month", "quarter", "year"],
                        ),
                        "day",
                    )
                }),
                &["data_points", "datasets"],
            ),
        ),
        tool(
            "create_funnel_chart",
            "Create a funnel chart of stages as horizontal bars.",
            slice_schema("Funnel Chart", "professional"),
        ),
        tool(
            "create_gauge_chart",
            "Create a half-doughnut gauge showing a value against a maximum.",
            schema(
                json!({
                    "value": number("Current value"),
                    "max_value": number("Maximum value, greater than zero"),
                    "title": title("Gauge Chart"),
                    "thresholds": array_of("object", "Optional threshold markers")
                }),
                &["value", "max_value"],
            ),
        ),
        tool(
            "create_comparison_chart",
            "Create a chart comparing two datasets side by side.",
            schema(
                json!({
                    "labels": labels(),
                    "dataset1": object("First dataset with 'label' and 'data'"),
                    "dataset2": object("Second dataset with 'label' and 'data'"),
                    "title": title("Comparison Chart"),
                    "chart_type": with_default(string("Chart type (bar, line, radar)"), "bar")
                }),
                &["labels", "dataset1", "dataset2"],
            ),
        ),
        tool(
            "create_multi_axis_chart",
            "Create a line chart with left and right y axes; datasets choose one via 'yAxisID'.",
            series_schema("Multi-Axis Chart"),
        ),
        tool(
            "create_gradient_dataset",
            "Create a dataset whose background is a two-stop gradient.",
            schema(
                json!({
                    "data": values(),
                    "label": string("Dataset label"),
                    "start_color": with_default(string("Gradient start color"), "rgba(255, 99, 132, 0.8)"),
                    "end_color": with_default(string("Gradient end color"), "rgba(54, 162, 235, 0.8)")
                }),
                &["data", "label"],
            ),
        ),
        tool(
            "create_waterfall_chart",
            "Create a waterfall chart showing how changes accumulate.",
            slice_schema("Waterfall Chart", "professional"),
        ),
        tool(
            "create_heatmap_chart",
            "Create a heatmap rendered as a grid of bubbles.",
            schema(
                json!({
                    "x_labels": array_of("string", "Column labels"),
                    "y_labels": array_of("string", "Row labels"),
                    "data_matrix": {
                        "type": "array",
                        "items": {"type": "array", "items": {"type": "number"}},
                        "description": "Rows of values"
                    },
                    "title": title("Heatmap")
                }),
                &["x_labels", "y_labels", "data_matrix"],
            ),
        ),
        tool(
            "create_candlestick_chart",
            "Create a candlestick-style chart from OHLC data.",
            schema(
                json!({
                    "labels": labels(),
                    "data": array_of("object", "Entries with open, high, low and close"),
                    "title": title("Candlestick Chart")
                }),
                &["labels", "data"],
            ),
        ),
        tool(
            "create_realtime_chart_config",
            "Create a line chart configured for streaming updates.",
            schema(
                json!({
                    "initial_labels": labels(),
                    "initial_data": values(),
                    "title": title("Real-time Chart"),
                    "max_data_points": with_default(integer("Points kept before old ones scroll off"), 20)
                }),
                &["initial_labels", "initial_data"],
            ),
        ),
        tool(
            "add_chart_animations",
            "Add animation settings to an existing chart configuration.",
            schema(
                json!({
                    "chart_config": chart_config(),
                    "animation_duration": with_default(integer("Duration in milliseconds"), 1000),
                    "animation_easing": with_default(string("Easing function"), "easeInOutQuart")
                }),
                &["chart_config"],
            ),
        ),
        tool(
            "create_chart_with_annotations",
            "Add annotations (lines, boxes, labels) to an existing chart.",
            schema(
                json!({
                    "chart_config": chart_config(),
                    "annotations": array_of("object", "Annotation plugin objects")
                }),
                &["chart_config", "annotations"],
            ),
        ),
        tool(
            "add_responsive_breakpoints",
            "Attach responsive breakpoints to a chart configuration.",
            schema(
                json!({
                    "chart_config": chart_config(),
                    "breakpoints": object("Breakpoints keyed by name; defaults to mobile, tablet and desktop")
                }),
                &["chart_config"],
            ),
        ),
        tool(
            "add_accessibility_features",
            "Add keyboard navigation, screen reader and ARIA settings to a chart.",
            schema(
                json!({
                    "chart_config": chart_config(),
                    "enable_keyboard_nav": with_default(boolean("Enable keyboard navigation"), true),
                    "enable_screen_reader": with_default(boolean("Enable screen reader announcements"), true)
                }),
                &["chart_config"],
            ),
        ),
        tool(
            "add_interactive_tooltips",
            "Add styled interactive tooltips to a chart.",
            schema(
                json!({
                    "chart_config": chart_config(),
                    "tooltip_mode": with_default(string("Tooltip mode (index, dataset, point, nearest, x, y)"), "index"),
                    "show_percentages": with_default(boolean("Show percentages in tooltips"), false)
                }),
                &["chart_config"],
            ),
        ),
        tool(
            "add_zoom_pan_controls",
            "Add zoom and pan controls to a chart.",
            schema(
                json!({
                    "chart_config": chart_config(),
                    "enable_zoom": with_default(boolean("Enable zooming"), true),
                    "enable_pan": with_default(boolean("Enable panning"), true),
                    "zoom_mode": with_default(with_enum(string("Axes to zoom"), &["x", "y", "xy"]), "xy")
                }),
                &["chart_config"],
            ),
        ),
        tool(
            "add_statistical_overlay",
            "Add mean, median and standard deviation lines computed from the first dataset.",
            schema(
                json!({
                    "chart_config": chart_config(),
                    "show_mean": with_default(boolean("Draw the mean line"), true),
                    "show_median": with_default(boolean("Draw the median line"), true),
                    "show_std_dev": with_default(boolean("Draw mean ± one standard deviation"), false)
                }),
                &["chart_config"],
            ),
        ),
        tool(
            "merge_chart_datasets",
            "Merge the datasets of two chart configurations into one chart.",
            schema(
                json!({
                    "chart_config1": string("First chart configuration as a JSON string"),
                    "chart_config2": string("Second chart configuration as a JSON string"),
                    "title": title("Merged Chart")
                }),
                &["chart_config1", "chart_config2"],
            ),
        ),
        tool(
            "get_chart_templates",
            "Return sample data for common chart types.",
            schema(json!({}), &[]),
        ),
        tool(
            "get_color_palettes",
            "Return the available color palettes.",
            schema(json!({}), &[]),
        ),
        tool(
            "create_theme_preset",
            "Return colors for a chart theme.",
            schema(
                json!({
                    "theme_name": with_default(
                        with_enum(
                            string("Theme name"),
                            &Theme::ALL.map(|t| t.name()),
                        ),
                        "dark",
                    )
                }),
                &[],
            ),
        ),
        tool(
            "analyze_data_for_chart",
            "Compute descriptive statistics for a series and suggest chart types.",
            schema(
                json!({"data": values(), "labels": labels()}),
                &["data"],
            ),
        ),
        tool(
            "transform_data_cumulative",
            "Running total of a series.",
            schema(json!({"data": values()}), &["data"]),
        ),
        tool(
            "transform_data_moving_average",
            "Trailing moving average of a series.",
            schema(
                json!({
                    "data": values(),
                    "window_size": with_default(integer("Window length, at least 1"), 3)
                }),
                &["data"],
            ),
        ),
        tool(
            "transform_data_percentage_change",
            "Percentage change between consecutive values.",
            schema(json!({"data": values()}), &["data"]),
        ),
        tool(
            "filter_chart_data",
            "Keep the points whose first-dataset value passes a threshold test.",
            schema(
                json!({
                    "labels": labels(),
                    "datasets": datasets(),
                    "filter_condition": with_enum(
                        string("Comparison to apply"),
                        &["greater_than", "less_than", "equals", "not_equals"],
                    ),
                    "threshold": number("Value to compare against")
                }),
                &["labels", "datasets", "filter_condition", "threshold"],
            ),
        ),
        tool(
            "export_chart_data_csv",
            "Export labels and datasets as CSV text.",
            schema(
                json!({"labels": labels(), "datasets": datasets()}),
                &["labels", "datasets"],
            ),
        ),
        tool(
            "create_chart_html",
            "Generate a standalone HTML page that renders the chart with Chart.js.",
            schema(
                json!({
                    "chart_type": string("Chart.js chart type"),
                    "labels": labels(),
                    "datasets": datasets(),
                    "title": with_default(string("Page and chart title"), "My Chart"),
                    "options": object("Chart.js options; replaces the themed defaults"),
                    "width": with_default(string("CSS width of the chart container"), "800px"),
                    "height": with_default(string("CSS height of the chart container"), "500px"),
                    "theme": with_default(with_enum(string("Page theme"), &["light", "dark"]), "light")
                }),
                &["chart_type", "labels", "datasets"],
            ),
        ),
        tool(
            "export_chart_as_image_html",
            "Generate an HTML page with a button that downloads the chart as PNG.",
            schema(
                json!({
                    "chart_config": chart_config(),
                    "filename": with_default(string("Download file name"), "chart.png"),
                    "width": with_default(integer("Canvas width in pixels"), 800),
                    "height": with_default(integer("Canvas height in pixels"), 600)
                }),
                &["chart_config"],
            ),
        ),
    ]
}

#[derive(Debug, Deserialize)]
struct SeriesArgs {
    data: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct AnalyzeArgs {
    data: Vec<f64>,
    #[serde(default)]
    labels: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct MovingAverageArgs {
    data: Vec<f64>,
    #[serde(default = "default_window")]
    window_size: i64,
}

fn default_window() -> i64 {
    3
}

#[derive(Debug, Deserialize)]
struct FilterArgs {
    labels: Vec<String>,
    datasets: Vec<Dataset>,
    filter_condition: String,
    threshold: f64,
}

#[derive(Debug, Deserialize)]
struct ThemeArgs {
    #[serde(default)]
    theme_name: Option<String>,
}

fn parse_args<T: DeserializeOwned>(arguments: Value) -> Result<T> {
    serde_json::from_value(arguments).map_err(ToolError::InvalidArguments)
}

/// Run tool `name`. Missing arguments are treated as an empty object.
pub fn call_tool(name: &str, arguments: Value) -> Result<ToolOutput> {
    let arguments = match arguments {
        Value::Null => Value::Object(Map::new()),
        other => other,
    };

    match name {
        "create_chart_config" => ToolOutput::json(&builders::chart_config(parse_args(arguments)?)),
        "create_pie_chart" => ToolOutput::json(&builders::pie_chart(parse_args(arguments)?)),
        "create_doughnut_chart" => ToolOutput::json(&builders::doughnut_chart(parse_args(arguments)?)),
        "create_bar_chart" => ToolOutput::json(&builders::bar_chart(parse_args(arguments)?)),
        "create_line_chart" => ToolOutput::json(&builders::line_chart(parse_args(arguments)?)),
        "create_radar_chart" => ToolOutput::json(&builders::radar_chart(parse_args(arguments)?)),
        "create_polar_area_chart" => {
            ToolOutput::json(&builders::polar_area_chart(parse_args(arguments)?))
        }
        "create_scatter_chart" => ToolOutput::json(&builders::scatter_chart(parse_args(arguments)?)),
        "create_bubble_chart" => ToolOutput::json(&builders::bubble_chart(parse_args(arguments)?)),
        "create_mixed_chart" => ToolOutput::json(&builders::mixed_chart(parse_args(arguments)?)),
        "create_area_chart" => ToolOutput::json(&builders::area_chart(parse_args(arguments)?)),
        "create_time_series_chart" => {
            ToolOutput::json(&specialized::time_series_chart(parse_args(arguments)?))
        }
        "create_funnel_chart" => ToolOutput::json(&builders::funnel_chart(parse_args(arguments)?)),
        "create_gauge_chart" => ToolOutput::json(&specialized::gauge_chart(parse_args(arguments)?)?),
        "create_comparison_chart" => {
            ToolOutput::json(&builders::comparison_chart(parse_args(arguments)?))
        }
        "create_multi_axis_chart" => {
            ToolOutput::json(&builders::multi_axis_chart(parse_args(arguments)?))
        }
        "create_gradient_dataset" => {
            ToolOutput::json(&specialized::gradient_dataset(parse_args(arguments)?))
        }
        "create_waterfall_chart" => {
            ToolOutput::json(&specialized::waterfall_chart(parse_args(arguments)?))
        }
        "create_heatmap_chart" => {
            ToolOutput::json(&specialized::heatmap_chart(parse_args(arguments)?)?)
        }
        "create_candlestick_chart" => {
            ToolOutput::json(&specialized::candlestick_chart(parse_args(arguments)?))
        }
        "create_realtime_chart_config" => {
            ToolOutput::json(&specialized::realtime_chart(parse_args(arguments)?))
        }

        "add_chart_animations" => {
            let req: decorators::AnimationRequest = parse_args(arguments)?;
            let config = ChartConfig::parse(&req.chart_config)?;
            ToolOutput::json(&decorators::add_animations(
                config,
                req.animation_duration,
                &req.animation_easing,
            ))
        }
        "create_chart_with_annotations" => {
            let req: decorators::AnnotationRequest = parse_args(arguments)?;
            let config = ChartConfig::parse(&req.chart_config)?;
            ToolOutput::json(&decorators::add_annotations(config, req.annotations))
        }
        "add_responsive_breakpoints" => {
            let req: decorators::BreakpointRequest = parse_args(arguments)?;
            let config = ChartConfig::parse(&req.chart_config)?;
            ToolOutput::json(&decorators::add_breakpoints(config, req.breakpoints))
        }
        "add_accessibility_features" => {
            let req: decorators::AccessibilityRequest = parse_args(arguments)?;
            let config = ChartConfig::parse(&req.chart_config)?;
            ToolOutput::json(&decorators::add_accessibility(
                config,
                req.enable_keyboard_nav,
                req.enable_screen_reader,
            ))
        }
        "add_interactive_tooltips" => {
            let req: decorators::TooltipRequest = parse_args(arguments)?;
            let config = ChartConfig::parse(&req.chart_config)?;
            ToolOutput::json(&decorators::add_tooltips(
                config,
                &req.tooltip_mode,
                req.show_percentages,
            ))
        }
        "add_zoom_pan_controls" => {
            let req: decorators::ZoomPanRequest = parse_args(arguments)?;
            let config = ChartConfig::parse(&req.chart_config)?;
            ToolOutput::json(&decorators::add_zoom_pan(
                config,
                req.enable_zoom,
                req.enable_pan,
                &req.zoom_mode,
            ))
        }
        "add_statistical_overlay" => {
            let req: decorators::OverlayRequest = parse_args(arguments)?;
            let config = ChartConfig::parse(&req.chart_config)?;
            ToolOutput::json(&decorators::add_statistical_overlay(
                config,
                req.show_mean,
                req.show_median,
                req.show_std_dev,
            ))
        }
        "merge_chart_datasets" => {
            let req: decorators::MergeRequest = parse_args(arguments)?;
            let first = ChartConfig::parse(&req.chart_config1)?;
            let second = ChartConfig::parse(&req.chart_config2)?;
            ToolOutput::json(&decorators::merge_datasets(first, second, &req.title))
        }

        "get_chart_templates" => Ok(ToolOutput::Json(templates::chart_templates())),
        "get_color_palettes" => Ok(ToolOutput::Json(Value::Object(palette::palette_table()))),
        "create_theme_preset" => {
            let args: ThemeArgs = parse_args(arguments)?;
            let theme = match args.theme_name.as_deref() {
                None => Theme::default(),
                Some(name) => Theme::from_name(name).unwrap_or(Theme::Light),
            };
            ToolOutput::json(&theme.preset())
        }

        "analyze_data_for_chart" => {
            let args: AnalyzeArgs = parse_args(arguments)?;
            ToolOutput::json(&statistics::analyze(&args.data, args.labels.as_deref())?)
        }
        "transform_data_cumulative" => {
            let args: SeriesArgs = parse_args(arguments)?;
            ToolOutput::json(&transforms::cumulative(args.data))
        }
        "transform_data_moving_average" => {
            let args: MovingAverageArgs = parse_args(arguments)?;
            ToolOutput::json(&transforms::moving_average_transform(args.data, args.window_size)?)
        }
        "transform_data_percentage_change" => {
            let args: SeriesArgs = parse_args(arguments)?;
            ToolOutput::json(&transforms::percentage_change_transform(args.data))
        }
        "filter_chart_data" => {
            let args: FilterArgs = parse_args(arguments)?;
            let condition = FilterCondition::parse(&args.filter_condition)?;
            ToolOutput::json(&filtering::filter_data(
                &args.labels,
                &args.datasets,
                condition,
                args.threshold,
            ))
        }

        "export_chart_data_csv" => {
            let req: CsvExportRequest = parse_args(arguments)?;
            csv_export::export_csv(&req.labels, &req.datasets).map(ToolOutput::Text)
        }
        "create_chart_html" => html::chart_html(parse_args(arguments)?).map(ToolOutput::Text),
        "export_chart_as_image_html" => {
            html::image_export_html(parse_args(arguments)?).map(ToolOutput::Text)
        }

        other => Err(ToolError::UnknownTool(other.to_string())),
    }
}
