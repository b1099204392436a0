pub mod builders;
pub mod decorators;
pub mod html;
pub mod specialized;
pub mod templates;

use serde_json::{json, Value};

/// The title plugin every builder attaches.
pub fn title_plugin(title: &str) -> Value {
    json!({
        "display": true,
        "text": title,
        "font": {"size": 18}
    })
}

/// A visible legend at `position`.
pub fn legend(position: &str) -> Value {
    json!({"display": true, "position": position})
}
