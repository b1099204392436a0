use serde::Serialize;

use crate::state::palette::Palette;

const OCEAN: [&str; 4] = [
    "rgba(54, 162, 235, 0.8)",
    "rgba(26, 188, 156, 0.8)",
    "rgba(52, 152, 219, 0.8)",
    "rgba(22, 160, 133, 0.8)",
];

const SUNSET: [&str; 4] = [
    "rgba(255, 99, 132, 0.8)",
    "rgba(255, 159, 64, 0.8)",
    "rgba(255, 206, 86, 0.8)",
    "rgba(255, 179, 186, 0.8)",
];

const FOREST: [&str; 4] = [
    "rgba(75, 192, 192, 0.8)",
    "rgba(22, 160, 133, 0.8)",
    "rgba(46, 125, 50, 0.8)",
    "rgba(76, 175, 80, 0.8)",
];

const NEON: [&str; 4] = [
    "rgba(0, 255, 0, 0.8)",
    "rgba(255, 0, 255, 0.8)",
    "rgba(0, 255, 255, 0.8)",
    "rgba(255, 255, 0, 0.8)",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
    Ocean,
    Sunset,
    Forest,
    Neon,
}

impl Theme {
    pub const ALL: [Theme; 6] = [
        Theme::Dark,
        Theme::Light,
        Theme::Ocean,
        Theme::Sunset,
        Theme::Forest,
        Theme::Neon,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    /// Theme for a standalone page: `light` is light, anything else is dark.
    pub fn for_page(name: &str) -> Self {
        if name == "light" {
            Theme::Light
        } else {
            Theme::Dark
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
            Theme::Ocean => "ocean",
            Theme::Sunset => "sunset",
            Theme::Forest => "forest",
            Theme::Neon => "neon",
        }
    }

    pub fn background(&self) -> &'static str {
        match self {
            Theme::Dark => "#1a1a1a",
            Theme::Light => "#ffffff",
            Theme::Ocean => "#0a1929",
            Theme::Sunset => "#2d1b2e",
            Theme::Forest => "#1a2f1a",
            Theme::Neon => "#000000",
        }
    }

    pub fn text_color(&self) -> &'static str {
        match self {
            Theme::Dark => "#e0e0e0",
            Theme::Light => "#333333",
            Theme::Ocean => "#b2d8ff",
            Theme::Sunset => "#ffcccb",
            Theme::Forest => "#c8e6c9",
            Theme::Neon => "#00ff00",
        }
    }

    pub fn grid_color(&self) -> &'static str {
        match self {
            Theme::Dark => "rgba(255, 255, 255, 0.1)",
            Theme::Light => "rgba(0, 0, 0, 0.1)",
            Theme::Ocean => "rgba(178, 216, 255, 0.1)",
            Theme::Sunset => "rgba(255, 204, 203, 0.1)",
            Theme::Forest => "rgba(200, 230, 201, 0.1)",
            Theme::Neon => "rgba(0, 255, 0, 0.2)",
        }
    }

    pub fn palette(&self) -> &'static [&'static str] {
        match self {
            Theme::Dark => Palette::Vibrant.colors(),
            Theme::Light => Palette::Professional.colors(),
            Theme::Ocean => &OCEAN,
            Theme::Sunset => &SUNSET,
            Theme::Forest => &FOREST,
            Theme::Neon => &NEON,
        }
    }

    pub fn preset(&self) -> ThemePreset {
        ThemePreset {
            background_color: self.background(),
            text_color: self.text_color(),
            grid_color: self.grid_color(),
            palette: self.palette(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Dark
    }
}

/// Serialized form of a theme, as returned by `create_theme_preset`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemePreset {
    pub background_color: &'static str,
    pub text_color: &'static str,
    pub grid_color: &'static str,
    pub palette: &'static [&'static str],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_uses_camel_case_keys() {
        let json = serde_json::to_value(Theme::Ocean.preset()).unwrap();
        assert_eq!(json["backgroundColor"], "#0a1929");
        assert_eq!(json["textColor"], "#b2d8ff");
        assert_eq!(json["gridColor"], "rgba(178, 216, 255, 0.1)");
        assert_eq!(json["palette"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn page_theme_is_light_or_dark() {
        assert_eq!(Theme::for_page("light"), Theme::Light);
        assert_eq!(Theme::for_page("dark"), Theme::Dark);
        assert_eq!(Theme::for_page("ocean"), Theme::Dark);
    }

    #[test]
    fn names_round_trip() {
        for theme in Theme::ALL {
            assert_eq!(Theme::from_name(theme.name()), Some(theme));
        }
        assert_eq!(Theme::from_name("solarized"), None);
    }
}
