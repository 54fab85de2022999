use crate::model::{ChartPoint, ChartSeries, YearlyAggregate};

/// Reshapes yearly aggregates into one chart series per locality, in `areas`
/// order. Localities without any aggregate are left out.
pub fn build_chart(aggregates: &[YearlyAggregate], areas: &[String]) -> Vec<ChartSeries> {
    areas
        .iter()
        .filter_map(|area| {
            let points: Vec<ChartPoint> = aggregates
                .iter()
                .filter(|agg| agg.locality == *area)
                .map(|agg| ChartPoint {
                    year: Some(agg.year),
                    price: agg.price,
                    demand: agg.demand,
                })
                .collect();
            (!points.is_empty()).then(|| ChartSeries {
                name: area.clone(),
                points,
            })
        })
        .collect()
}
