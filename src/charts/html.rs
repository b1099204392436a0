use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::error::{Result, ToolError};
use crate::state::chart_config::{into_object, ChartConfig};
use crate::state::dataset::Dataset;
use crate::state::theme::Theme;

const CHART_JS_CDN: &str = "https://cdn.jsdelivr.net/npm/chart.js";

#[derive(Debug, Clone, Deserialize)]
pub struct ChartHtmlRequest {
    pub chart_type: String,
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
    #[serde(default = "default_page_title")]
    pub title: String,
    #[serde(default)]
    pub options: Option<Map<String, Value>>,
    #[serde(default = "default_width")]
    pub width: String,
    #[serde(default = "default_height")]
    pub height: String,
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_page_title() -> String {
    "My Chart".to_string()
}

fn default_width() -> String {
    "800px".to_string()
}

fn default_height() -> String {
    "500px".to_string()
}

fn default_theme() -> String {
    "light".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageExportRequest {
    pub chart_config: String,
    #[serde(default = "default_filename")]
    pub filename: String,
    #[serde(default = "default_image_width")]
    pub width: u32,
    #[serde(default = "default_image_height")]
    pub height: u32,
}

fn default_filename() -> String {
    "chart.png".to_string()
}

fn default_image_width() -> u32 {
    800
}

fn default_image_height() -> u32 {
    600
}

/// Escape text for use inside element content or a double-quoted attribute.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Pretty JSON that cannot close the surrounding `<script>` element.
fn script_json<T: serde::Serialize>(value: &T) -> Result<String> {
    let json = serde_json::to_string_pretty(value).map_err(ToolError::Encode)?;
    Ok(json.replace("</", "<\\/"))
}

fn page_options(title: &str, theme: Theme) -> Map<String, Value> {
    into_object(json!({
        "responsive": true,
        "maintainAspectRatio": false,
        "plugins": {
            "title": {
                "display": true,
                "text": title,
                "color": theme.text_color(),
                "font": {"size": 20}
            },
            "legend": {
                "labels": {"color": theme.text_color()}
            }
        }
    }))
}

/// Full page for a chart. Caller options replace the themed defaults
/// entirely; an empty options object counts as absent.
pub fn chart_html(req: ChartHtmlRequest) -> Result<String> {
    let theme = Theme::for_page(&req.theme);
    let options = match req.options {
        Some(options) if !options.is_empty() => options,
        _ => page_options(&req.title, theme),
    };
    let config = ChartConfig::new(&req.chart_type, Some(req.labels), req.datasets, options);
    let config_json = script_json(&config)?;

    let title = escape_html(&req.title);
    let width = escape_html(&req.width);
    let height = escape_html(&req.height);
    let background = theme.background();
    let text_color = theme.text_color();

    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>{title}</title>
    <script src="{CHART_JS_CDN}"></script>
    <style>
        body {{
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            background-color: {background};
            color: {text_color};
            padding: 20px;
            margin: 0;
        }}
        .chart-container {{
            position: relative;
            margin: auto;
            height: {height};
            width: {width};
            background: {background};
            padding: 20px;
            border-radius: 8px;
            box-shadow: 0 4px 6px rgba(0, 0, 0, 0.1);
        }}
    </style>
</head>
<body>
    <div class="chart-container">
        <canvas id="myChart"></canvas>
    </div>
    <script>
        const ctx = document.getElementById('myChart').getContext('2d');
        const myChart = new Chart(ctx, {config_json});
    </script>
</body>
</html>"#
    ))
}

/// Page with a fixed-size canvas and a button that downloads it as PNG.
/// The config must be a JSON object.
pub fn image_export_html(req: ImageExportRequest) -> Result<String> {
    let config = ChartConfig::parse(&req.chart_config)?;
    let config_json = script_json(&config)?;
    let filename = script_json(&req.filename)?;
    let width = req.width;
    let height = req.height;

    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Chart Export</title>
    <script src="{CHART_JS_CDN}"></script>
</head>
<body>
    <canvas id="myChart" width="{width}" height="{height}"></canvas>
    <button onclick="downloadChart()">Download Chart</button>

    <script>
        const ctx = document.getElementById('myChart').getContext('2d');
        const config = {config_json};
        const myChart = new Chart(ctx, config);

        function downloadChart() {{
            const url = myChart.toBase64Image();
            const link = document.createElement('a');
            link.download = {filename};
            link.href = url;
            link.click();
        }}
    </script>
</body>
</html>"#
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_request(theme: &str) -> ChartHtmlRequest {
        serde_json::from_value(json!({
            "chart_type": "bar",
            "labels": ["A", "B"],
            "datasets": [{"label": "Votes", "data": [3, 4]}],
            "theme": theme
        }))
        .unwrap()
    }

    #[test]
    fn light_page_uses_light_colors() {
        let html = chart_html(page_request("light")).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>My Chart</title>"));
        assert!(html.contains("background-color: #ffffff;"));
        assert!(html.contains("\"color\": \"#333333\""));
        assert!(html.contains(CHART_JS_CDN));
        assert!(html.contains("width: 800px;"));
    }

    #[test]
    fn other_themes_render_dark() {
        let html = chart_html(page_request("ocean")).unwrap();
        assert!(html.contains("background-color: #1a1a1a;"));
        assert!(html.contains("color: #e0e0e0;"));
    }

    #[test]
    fn caller_options_replace_defaults() {
        let mut req = page_request("light");
        req.options = Some(into_object(json!({"indexAxis": "y"})));
        let html = chart_html(req).unwrap();
        assert!(html.contains("\"indexAxis\": \"y\""));
        assert!(!html.contains("maintainAspectRatio"));

        let mut req = page_request("light");
        req.options = Some(Map::new());
        assert!(chart_html(req).unwrap().contains("maintainAspectRatio"));
    }

    #[test]
    fn markup_in_text_is_neutralised() {
        let mut req = page_request("light");
        req.title = "<b>Sales</b>".into();
        req.datasets[0].label = Some("</script><script>alert(1)".into());
        let html = chart_html(req).unwrap();
        assert!(html.contains("<title>&lt;b&gt;Sales&lt;/b&gt;</title>"));
        assert!(!html.contains("</script><script>alert"));
        assert!(html.contains("<\\/script>"));
    }

    #[test]
    fn image_export_embeds_parsed_config() {
        let req = ImageExportRequest {
            chart_config: r#"{"type": "line", "data": {"labels": [], "datasets": []}}"#.into(),
            filename: "sales.png".into(),
            width: 1024,
            height: 768,
        };
        let html = image_export_html(req).unwrap();
        assert!(html.contains(r#"<canvas id="myChart" width="1024" height="768"></canvas>"#));
        assert!(html.contains("link.download = \"sales.png\";"));
        assert!(html.contains("\"type\": \"line\""));
    }

    #[test]
    fn image_export_rejects_bad_config() {
        let req: ImageExportRequest =
            serde_json::from_value(json!({"chart_config": "{not json"})).unwrap();
        assert_eq!(req.width, 800);
        assert_eq!(req.filename, "chart.png");
        assert!(matches!(
            image_export_html(req),
            Err(ToolError::MalformedConfig(_))
        ));
    }
}
