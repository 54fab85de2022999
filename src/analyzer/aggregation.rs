use crate::dataset::Dataset;
use crate::model::{PipelineError, Record, YearlyAggregate};
use crate::utils::mean;
use std::collections::BTreeMap;

#[derive(Default)]
struct YearBucket {
    prices: Vec<f64>,
    demands: Vec<f64>,
}

/// Per-year mean price and demand for every selected locality.
///
/// Output is ordered by `areas`, then by year ascending. Rows without a year are
/// skipped. Fails when the dataset lacks the locality, year or price column.
pub fn aggregate(
    dataset: &Dataset,
    areas: &[String],
) -> Result<Vec<YearlyAggregate>, PipelineError> {
    dataset.require_columns()?;
    let rows = dataset.filter_localities(areas);
    Ok(areas
        .iter()
        .flat_map(|area| aggregate_locality(area, &rows))
        .collect())
}

/// Groups the rows of one locality by year.
pub fn aggregate_locality(area: &str, rows: &[&Record]) -> Vec<YearlyAggregate> {
    let mut buckets: BTreeMap<i64, YearBucket> = BTreeMap::new();
    for row in rows.iter().filter(|r| r.locality.as_deref() == Some(area)) {
        let Some(year) = row.year else { continue };
        let bucket = buckets.entry(year).or_default();
        bucket.prices.extend(row.price);
        bucket.demands.extend(row.demand);
    }

    buckets
        .into_iter()
        .map(|(year, bucket)| YearlyAggregate {
            locality: area.to_string(),
            year,
            price: mean(bucket.prices),
            demand: mean(bucket.demands),
        })
        .collect()
}
