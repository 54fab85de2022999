// Analyzer module: locality resolution, yearly aggregation and chart shaping.

pub mod aggregation;
pub mod chart;
pub mod locality;

pub use aggregation::aggregate;
pub use chart::build_chart;
pub use locality::extract_localities;
