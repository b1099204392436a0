use serde_json::{Map, Value};

const VIBRANT: [&str; 9] = [
    "rgba(255, 99, 132, 0.8)",  // Rose
    "rgba(54, 162, 235, 0.8)",  // Sky blue
    "rgba(255, 206, 86, 0.8)",  // Yellow
    "rgba(75, 192, 192, 0.8)",  // Teal
    "rgba(153, 102, 255, 0.8)", // Violet
    "rgba(255, 159, 64, 0.8)",  // Orange
    "rgba(199, 199, 199, 0.8)", // Grey
    "rgba(83, 102, 255, 0.8)",  // Indigo
    "rgba(255, 99, 255, 0.8)",  // Pink
];

const PASTEL: [&str; 6] = [
    "rgba(255, 179, 186, 0.8)",
    "rgba(186, 225, 255, 0.8)",
    "rgba(255, 223, 186, 0.8)",
    "rgba(186, 255, 201, 0.8)",
    "rgba(220, 186, 255, 0.8)",
    "rgba(255, 218, 193, 0.8)",
];

const PROFESSIONAL: [&str; 6] = [
    "rgba(41, 128, 185, 0.8)",
    "rgba(52, 152, 219, 0.8)",
    "rgba(155, 89, 182, 0.8)",
    "rgba(142, 68, 173, 0.8)",
    "rgba(22, 160, 133, 0.8)",
    "rgba(26, 188, 156, 0.8)",
];

const EARTH: [&str; 6] = [
    "rgba(139, 69, 19, 0.8)",
    "rgba(160, 82, 45, 0.8)",
    "rgba(205, 133, 63, 0.8)",
    "rgba(210, 180, 140, 0.8)",
    "rgba(188, 143, 143, 0.8)",
    "rgba(165, 42, 42, 0.8)",
];

/// Fixed accent colors used outside the named palettes.
pub const POSITIVE: &str = "rgba(75, 192, 192, 0.8)";
pub const NEGATIVE: &str = "rgba(255, 99, 132, 0.8)";
pub const WARNING: &str = "rgba(255, 206, 86, 0.8)";
pub const NEUTRAL: &str = "rgba(54, 162, 235, 0.8)";

/// Named color palettes for slice and bar colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    Vibrant,
    Pastel,
    Professional,
    Earth,
}

impl Palette {
    pub const ALL: [Palette; 4] = [
        Palette::Vibrant,
        Palette::Pastel,
        Palette::Professional,
        Palette::Earth,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Look up `name`, falling back to `default` when it is absent or unknown.
    pub fn resolve(name: Option<&str>, default: Palette) -> Self {
        name.and_then(Self::from_name).unwrap_or(default)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Palette::Vibrant => "vibrant",
            Palette::Pastel => "pastel",
            Palette::Professional => "professional",
            Palette::Earth => "earth",
        }
    }

    pub fn colors(&self) -> &'static [&'static str] {
        match self {
            Palette::Vibrant => &VIBRANT,
            Palette::Pastel => &PASTEL,
            Palette::Professional => &PROFESSIONAL,
            Palette::Earth => &EARTH,
        }
    }

    /// Color for the `index`-th series, wrapping around the palette.
    pub fn color_for_index(&self, index: usize) -> &'static str {
        let colors = self.colors();
        colors[index % colors.len()]
    }

    /// The first `n` colors. Shorter than `n` when the palette runs out.
    pub fn first(&self, n: usize) -> Vec<&'static str> {
        self.colors().iter().copied().take(n).collect()
    }
}

/// All palettes keyed by name, in declaration order.
pub fn palette_table() -> Map<String, Value> {
    Palette::ALL
        .into_iter()
        .map(|p| (p.name().to_string(), Value::from(p.colors().to_vec())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_names_fall_back() {
        assert_eq!(Palette::resolve(Some("pastel"), Palette::Vibrant), Palette::Pastel);
        assert_eq!(Palette::resolve(Some("neon"), Palette::Vibrant), Palette::Vibrant);
        assert_eq!(Palette::resolve(None, Palette::Professional), Palette::Professional);
    }

    #[test]
    fn first_truncates_without_wrapping() {
        assert_eq!(Palette::Earth.first(2).len(), 2);
        assert_eq!(Palette::Earth.first(20).len(), 6);
        assert_eq!(Palette::Pastel.color_for_index(6), PASTEL[0]);
    }

    #[test]
    fn table_keeps_declaration_order() {
        let keys: Vec<String> = palette_table().keys().cloned().collect();
        assert_eq!(keys, ["vibrant", "pastel", "professional", "earth"]);
    }
}
