use crate::model::{Record, Trend};
use crate::utils::{format_decimal, mean, round2};

/// Whole-period figures for one locality.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalityStats {
    pub avg_price: f64,
    pub first_year: i64,
    pub last_year: i64,
    /// Percentage change of the mean price between the first and last year,
    /// rounded to two decimals. `None` when the first-year price is zero or
    /// unknown.
    pub growth: Option<f64>,
    pub avg_demand: Option<f64>,
}

impl LocalityStats {
    /// `None` when the rows carry no price or no year at all.
    pub fn from_rows(rows: &[&Record]) -> Option<Self> {
        let avg_price = mean(rows.iter().filter_map(|r| r.price))?;
        let first_year = rows.iter().filter_map(|r| r.year).min()?;
        let last_year = rows.iter().filter_map(|r| r.year).max()?;

        let year_price = |year: i64| {
            mean(
                rows.iter()
                    .filter(|r| r.year == Some(year))
                    .filter_map(|r| r.price),
            )
        };
        let growth = match (year_price(first_year), year_price(last_year)) {
            (Some(first), Some(last)) if first != 0.0 => {
                Some(round2((last - first) / first * 100.0))
            }
            _ => None,
        };

        Some(Self {
            avg_price,
            first_year,
            last_year,
            growth,
            avg_demand: mean(rows.iter().filter_map(|r| r.demand)),
        })
    }

    pub fn trend(&self) -> Trend {
        Trend::from_growth(self.growth.unwrap_or(0.0))
    }
}

pub fn limited_data_sentence(area: &str) -> String {
    format!("Data for {area} is limited in the dataset.")
}

/// Deterministic one-sentence description of a locality's price history.
pub fn rule_summary(area: &str, rows: &[&Record]) -> String {
    let Some(stats) = LocalityStats::from_rows(rows) else {
        return limited_data_sentence(area);
    };
    let growth = stats.growth.map_or_else(|| "0".to_string(), format_decimal);
    let avg_demand = stats.avg_demand.map_or_else(|| "0".to_string(), format_decimal);

    format!(
        "{area} shows a {trend} price trend from {first} to {last} \
         with an average price of {price} and approximate growth of {growth} percent. \
         Average demand in this period is {avg_demand}.",
        trend = stats.trend(),
        first = stats.first_year,
        last = stats.last_year,
        price = format_decimal(stats.avg_price),
    )
}

/// Rule-based summaries for every area, joined by a single space.
pub fn rule_summaries(areas: &[String], rows: &[&Record]) -> String {
    areas
        .iter()
        .map(|area| {
            let area_rows: Vec<&Record> = rows
                .iter()
                .copied()
                .filter(|r| r.locality.as_deref() == Some(area.as_str()))
                .collect();
            rule_summary(area, &area_rows)
        })
        .collect::<Vec<_>>()
        .join(" ")
}
