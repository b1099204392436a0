pub mod chart_config;
pub mod dataset;
pub mod palette;
pub mod theme;
