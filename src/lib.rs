//! Locality price-trend service.
//!
//! A query such as "How is Wakad doing?" is resolved against the localities of a
//! loaded dataset, the matching rows are averaged per year, and the service
//! answers with a narrative summary, chart series and the raw rows.

pub mod analyzer;
pub mod api;
pub mod config;
pub mod dataset;
pub mod generator;
pub mod model;
pub mod summary;
pub mod utils;
