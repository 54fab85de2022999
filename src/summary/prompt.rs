use crate::model::YearlyAggregate;
use crate::utils::format_decimal;

const INSTRUCTIONS: &str = "You are a senior real-estate data analyst. \
Write a concise, professional summary (3–5 sentences) based only on the structured data \
below. Explain price trends over time, mention demand only if present, and compare the \
localities if more than one is provided.";

/// One line per (locality, year) with a known mean price, e.g.
/// `Wakad in 2021: average price 5000.0, average demand 10.0`.
pub fn stats_text(aggregates: &[YearlyAggregate]) -> String {
    aggregates
        .iter()
        .filter_map(|agg| {
            let price = agg.price?;
            let mut line = format!(
                "{} in {}: average price {}",
                agg.locality,
                agg.year,
                format_decimal(price)
            );
            if let Some(demand) = agg.demand {
                line.push_str(&format!(", average demand {}", format_decimal(demand)));
            }
            Some(line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_prompt(query: &str, stats: &str) -> String {
    format!("{INSTRUCTIONS}\n\nUser query: {query}\n\nData:\n{stats}")
}
