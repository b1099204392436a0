use serde_json::{json, Value};

use crate::state::palette::Palette;

/// Sample data for the common chart kinds, keyed by chart type.
pub fn chart_templates() -> Value {
    json!({
        "bar": {
            "labels": ["Red", "Blue", "Yellow", "Green", "Purple", "Orange"],
            "datasets": [{
                "label": "# of Votes",
                "data": [12, 19, 3, 5, 2, 3],
                "backgroundColor": Palette::Vibrant.colors()
            }]
        },
        "line": {
            "labels": ["Jan", "Feb", "Mar", "Apr", "May", "Jun"],
            "datasets": [{
                "label": "Monthly Sales",
                "data": [65, 59, 80, 81, 56, 55],
                "borderColor": "rgb(75, 192, 192)",
                "tension": 0.4
            }]
        },
        "pie": {
            "labels": ["Chrome", "Firefox", "Safari", "Edge", "Other"],
            "datasets": [{
                "data": [60, 20, 10, 5, 5],
                "backgroundColor": Palette::Professional.colors()
            }]
        },
        "radar": {
            "labels": ["Speed", "Reliability", "Comfort", "Safety", "Efficiency"],
            "datasets": [{
                "label": "Product A",
                "data": [80, 90, 70, 85, 75],
                "backgroundColor": "rgba(54, 162, 235, 0.2)",
                "borderColor": "rgb(54, 162, 235)"
            }]
        }
    })
}
