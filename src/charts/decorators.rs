use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::charts::title_plugin;
use crate::processing::statistics::SeriesStats;
use crate::state::chart_config::{ChartConfig, ChartData};
use crate::state::dataset::Dataset;

#[derive(Debug, Clone, Deserialize)]
pub struct AnimationRequest {
    pub chart_config: String,
    #[serde(default = "default_duration")]
    pub animation_duration: i64,
    #[serde(default = "default_easing")]
    pub animation_easing: String,
}

fn default_duration() -> i64 {
    1000
}

fn default_easing() -> String {
    "easeInOutQuart".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnnotationRequest {
    pub chart_config: String,
    pub annotations: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BreakpointRequest {
    pub chart_config: String,
    #[serde(default)]
    pub breakpoints: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccessibilityRequest {
    pub chart_config: String,
    #[serde(default = "enabled")]
    pub enable_keyboard_nav: bool,
    #[serde(default = "enabled")]
    pub enable_screen_reader: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TooltipRequest {
    pub chart_config: String,
    #[serde(default = "default_tooltip_mode")]
    pub tooltip_mode: String,
    #[serde(default)]
    pub show_percentages: bool,
}

fn default_tooltip_mode() -> String {
    "index".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ZoomPanRequest {
    pub chart_config: String,
    #[serde(default = "enabled")]
    pub enable_zoom: bool,
    #[serde(default = "enabled")]
    pub enable_pan: bool,
    #[serde(default = "default_zoom_mode")]
    pub zoom_mode: String,
}

fn default_zoom_mode() -> String {
    "xy".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct OverlayRequest {
    pub chart_config: String,
    #[serde(default = "enabled")]
    pub show_mean: bool,
    #[serde(default = "enabled")]
    pub show_median: bool,
    #[serde(default)]
    pub show_std_dev: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MergeRequest {
    pub chart_config1: String,
    pub chart_config2: String,
    #[serde(default = "default_merge_title")]
    pub title: String,
}

fn default_merge_title() -> String {
    "Merged Chart".to_string()
}

fn enabled() -> bool {
    true
}

pub fn add_animations(mut config: ChartConfig, duration: i64, easing: &str) -> ChartConfig {
    config.options.insert(
        "animation".into(),
        json!({
            "duration": duration,
            "easing": easing,
            "onComplete": null,
            "delay": 0
        }),
    );
    config.options.insert(
        "animations".into(),
        json!({
            "tension": {
                "duration": duration,
                "easing": easing,
                "from": 1,
                "to": 0,
                "loop": false
            }
        }),
    );
    config
}

/// Replaces any existing annotation set; keys are `annotation0`, `annotation1`, ...
pub fn add_annotations(mut config: ChartConfig, annotations: Vec<Value>) -> ChartConfig {
    let keyed: Map<String, Value> = annotations
        .into_iter()
        .enumerate()
        .map(|(i, annotation)| (format!("annotation{i}"), annotation))
        .collect();
    config
        .plugins_mut()
        .insert("annotation".into(), json!({"annotations": keyed}));
    config
}

pub fn default_breakpoints() -> Value {
    let breakpoint = |bound: &str, width: u32, position: &str, font_size: u32| {
        json!({
            bound: width,
            "options": {
                "plugins": {
                    "legend": {"position": position},
                    "title": {"font": {"size": font_size}}
                }
            }
        })
    };
    json!({
        "mobile": breakpoint("maxWidth", 480, "bottom", 14),
        "tablet": breakpoint("maxWidth", 768, "top", 16),
        "desktop": breakpoint("minWidth", 769, "right", 18)
    })
}

/// An empty or missing breakpoint table falls back to the mobile/tablet/desktop defaults.
pub fn add_breakpoints(mut config: ChartConfig, breakpoints: Option<Map<String, Value>>) -> ChartConfig {
    let table = match breakpoints {
        Some(custom) if !custom.is_empty() => Value::Object(custom),
        _ => default_breakpoints(),
    };
    config.set_extra("responsive_breakpoints", table);
    config
}

pub fn add_accessibility(mut config: ChartConfig, keyboard_nav: bool, screen_reader: bool) -> ChartConfig {
    config.plugins_mut().insert(
        "a11y".into(),
        json!({
            "enabled": true,
            "keyboardNavigation": keyboard_nav,
            "screenReaderAnnouncements": screen_reader
        }),
    );
    let label = config.title_text().unwrap_or("Chart").to_string();
    config.set_extra(
        "aria",
        json!({"label": label, "describedBy": "chart-description"}),
    );
    config
}

const TOOLTIP_LABEL: &str =
    "function(context) { return context.dataset.label + ': ' + context.parsed.y; }";
const TOOLTIP_PERCENT: &str =
    "function(context) { return '(' + Math.round(context.parsed.y / total * 100) + '%)'; }";

pub fn add_tooltips(mut config: ChartConfig, mode: &str, show_percentages: bool) -> ChartConfig {
    let mut callbacks = Map::new();
    callbacks.insert("label".into(), TOOLTIP_LABEL.into());
    if show_percentages {
        callbacks.insert("afterLabel".into(), TOOLTIP_PERCENT.into());
    }
    config.plugins_mut().insert(
        "tooltip".into(),
        json!({
            "enabled": true,
            "mode": mode,
            "intersect": false,
            "backgroundColor": "rgba(0, 0, 0, 0.8)",
            "titleColor": "#fff",
            "bodyColor": "#fff",
            "borderColor": "rgba(255, 255, 255, 0.3)",
            "borderWidth": 1,
            "padding": 12,
            "displayColors": true,
            "callbacks": callbacks
        }),
    );
    config
}

pub fn add_zoom_pan(mut config: ChartConfig, zoom: bool, pan: bool, mode: &str) -> ChartConfig {
    config.plugins_mut().insert(
        "zoom".into(),
        json!({
            "zoom": {"enabled": zoom, "mode": mode, "speed": 0.1},
            "pan": {"enabled": pan, "mode": mode},
            "limits": {
                "x": {"min": "original", "max": "original"},
                "y": {"min": "original", "max": "original"}
            }
        }),
    );
    config
}

fn overlay_line(label: &str, value: f64, points: usize, color: &str, dash: [u32; 2]) -> Dataset {
    let mut line = Dataset::from_numbers(Some(label.to_string()), &vec![value; points])
        .with("borderColor", color)
        .with("borderWidth", 2)
        .with("borderDash", json!(dash))
        .with("fill", false)
        .with("pointRadius", 0);
    line.chart_type = Some("line".to_string());
    line
}

/// Append constant reference lines computed from the first dataset. Configs
/// with no datasets or no numeric data in the first one come back unchanged.
pub fn add_statistical_overlay(
    mut config: ChartConfig,
    show_mean: bool,
    show_median: bool,
    show_std_dev: bool,
) -> ChartConfig {
    let series = config
        .datasets()
        .first()
        .map(Dataset::numeric_data)
        .unwrap_or_default();
    let Some(stats) = SeriesStats::compute(&series) else {
        return config;
    };
    let points = config.labels().len();

    let mut lines = Vec::new();
    if show_mean {
        lines.push(overlay_line("Mean", stats.mean, points, "rgba(255, 206, 86, 1)", [5, 5]));
    }
    if show_median {
        lines.push(overlay_line("Median", stats.median, points, "rgba(153, 102, 255, 1)", [10, 5]));
    }
    if show_std_dev {
        let band = "rgba(201, 203, 207, 1)";
        lines.push(overlay_line("Mean + 1σ", stats.mean + stats.std_dev, points, band, [2, 2]));
        lines.push(overlay_line("Mean − 1σ", stats.mean - stats.std_dev, points, band, [2, 2]));
    }

    for line in lines {
        config.push_dataset(line);
    }
    config
}

/// Type, labels and options of `first` with the datasets of both.
pub fn merge_datasets(first: ChartConfig, second: ChartConfig, title: &str) -> ChartConfig {
    let (labels, mut datasets) = match first.data {
        Some(data) => (data.labels.unwrap_or_default(), data.datasets),
        None => (Vec::new(), Vec::new()),
    };
    if let Some(data) = second.data {
        datasets.extend(data.datasets);
    }

    let mut merged = ChartConfig {
        chart_type: Some(first.chart_type.unwrap_or_else(|| "bar".to_string())),
        data: Some(ChartData {
            labels: Some(labels),
            datasets,
            extra: Map::new(),
        }),
        options: first.options,
        extra: Map::new(),
    };
    merged.plugins_mut().insert("title".into(), title_plugin(title));
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::chart_config::into_object;

    fn bar_config() -> ChartConfig {
        serde_json::from_value(json!({
            "type": "bar",
            "data": {
                "labels": ["Q1", "Q2", "Q3", "Q4"],
                "datasets": [{"label": "Sales", "data": [10, 20, 30, 60]}]
            },
            "options": {"plugins": {"title": {"display": true, "text": "Quarterly"}}}
        }))
        .unwrap()
    }

    fn to_json(config: &ChartConfig) -> Value {
        serde_json::to_value(config).unwrap()
    }

    #[test]
    fn animations_use_duration_and_easing() {
        let json = to_json(&add_animations(bar_config(), 500, "linear"));
        assert_eq!(json["options"]["animation"]["duration"], 500);
        assert_eq!(json["options"]["animation"]["onComplete"], Value::Null);
        assert_eq!(json["options"]["animations"]["tension"]["easing"], "linear");
        assert_eq!(json["options"]["plugins"]["title"]["text"], "Quarterly");
    }

    #[test]
    fn annotations_are_keyed_by_position() {
        let config = add_annotations(
            ChartConfig::default(),
            vec![json!({"type": "line", "value": 5}), json!({"type": "box"})],
        );
        let json = to_json(&config);
        let annotations = &json["options"]["plugins"]["annotation"]["annotations"];
        assert_eq!(annotations["annotation0"]["value"], 5);
        assert_eq!(annotations["annotation1"]["type"], "box");
    }

    #[test]
    fn breakpoints_default_when_absent_or_empty() {
        let json = to_json(&add_breakpoints(ChartConfig::default(), None));
        assert_eq!(json["responsive_breakpoints"]["mobile"]["maxWidth"], 480);
        assert_eq!(json["responsive_breakpoints"]["desktop"]["minWidth"], 769);
        assert_eq!(
            json["responsive_breakpoints"]["desktop"]["options"]["plugins"]["legend"]["position"],
            "right"
        );

        let json = to_json(&add_breakpoints(ChartConfig::default(), Some(Map::new())));
        assert_eq!(json["responsive_breakpoints"]["tablet"]["maxWidth"], 768);

        let custom = into_object(json!({"wide": {"minWidth": 1200}}));
        let json = to_json(&add_breakpoints(ChartConfig::default(), Some(custom)));
        assert_eq!(json["responsive_breakpoints"], json!({"wide": {"minWidth": 1200}}));
    }

    #[test]
    fn accessibility_labels_from_title() {
        let json = to_json(&add_accessibility(bar_config(), false, true));
        assert_eq!(json["aria"]["label"], "Quarterly");
        assert_eq!(json["options"]["plugins"]["a11y"]["keyboardNavigation"], false);

        let json = to_json(&add_accessibility(ChartConfig::default(), true, true));
        assert_eq!(json["aria"]["label"], "Chart");
        assert_eq!(json["aria"]["describedBy"], "chart-description");
    }

    #[test]
    fn percentages_add_after_label() {
        let plain = to_json(&add_tooltips(bar_config(), "index", false));
        assert!(plain["options"]["plugins"]["tooltip"]["callbacks"]
            .get("afterLabel")
            .is_none());

        let json = to_json(&add_tooltips(bar_config(), "nearest", true));
        let tooltip = &json["options"]["plugins"]["tooltip"];
        assert_eq!(tooltip["mode"], "nearest");
        assert_eq!(tooltip["callbacks"]["afterLabel"], TOOLTIP_PERCENT);
    }

    #[test]
    fn zoom_pan_share_mode() {
        let json = to_json(&add_zoom_pan(bar_config(), true, false, "x"));
        let zoom = &json["options"]["plugins"]["zoom"];
        assert_eq!(zoom["zoom"]["mode"], "x");
        assert_eq!(zoom["pan"]["enabled"], false);
        assert_eq!(zoom["limits"]["y"]["min"], "original");
    }

    #[test]
    fn overlay_appends_mean_and_median_lines() {
        let json = to_json(&add_statistical_overlay(bar_config(), true, true, false));
        let datasets = json["data"]["datasets"].as_array().unwrap();
        assert_eq!(datasets.len(), 3);
        assert_eq!(datasets[1]["label"], "Mean");
        assert_eq!(datasets[1]["type"], "line");
        assert_eq!(datasets[1]["data"], json!([30.0, 30.0, 30.0, 30.0]));
        assert_eq!(datasets[1]["borderDash"], json!([5, 5]));
        assert_eq!(datasets[2]["label"], "Median");
        assert_eq!(datasets[2]["data"][0], 25.0);
    }

    #[test]
    fn overlay_std_dev_bands() {
        let config: ChartConfig = serde_json::from_value(json!({
            "data": {"labels": ["a", "b"], "datasets": [{"data": [2, 4, 4, 4, 5, 5, 7, 9]}]}
        }))
        .unwrap();
        let json = to_json(&add_statistical_overlay(config, false, false, true));
        let datasets = json["data"]["datasets"].as_array().unwrap();
        assert_eq!(datasets.len(), 3);
        assert_eq!(datasets[1]["data"], json!([7.0, 7.0]));
        assert_eq!(datasets[2]["data"], json!([3.0, 3.0]));
    }

    #[test]
    fn overlay_skips_configs_without_data() {
        let config = add_statistical_overlay(ChartConfig::default(), true, true, true);
        assert!(config.datasets().is_empty());

        let empty: ChartConfig =
            serde_json::from_value(json!({"data": {"datasets": [{"data": []}]}})).unwrap();
        assert_eq!(add_statistical_overlay(empty, true, true, true).datasets().len(), 1);
    }

    #[test]
    fn merge_keeps_first_layout() {
        let second: ChartConfig = serde_json::from_value(json!({
            "type": "line",
            "data": {"labels": ["x"], "datasets": [{"label": "Costs", "data": [5]}]}
        }))
        .unwrap();
        let json = to_json(&merge_datasets(bar_config(), second, "Both"));
        assert_eq!(json["type"], "bar");
        assert_eq!(json["data"]["labels"], json!(["Q1", "Q2", "Q3", "Q4"]));
        assert_eq!(json["data"]["datasets"][1]["label"], "Costs");
        assert_eq!(json["options"]["plugins"]["title"]["text"], "Both");
    }

    #[test]
    fn merge_defaults_to_bar() {
        let json = to_json(&merge_datasets(
            ChartConfig::default(),
            ChartConfig::default(),
            "Merged Chart",
        ));
        assert_eq!(json["type"], "bar");
        assert_eq!(json["data"]["labels"], json!([]));
    }
}
