// Utility functions

/// Rounds to two decimal places, ties to even. Used for display only.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Arithmetic mean of the finite values, or `None` if there are none.
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        return None;
    }
    Some(sum / count as f64).filter(|m| m.is_finite())
}

/// Renders a number rounded to two decimals, always with a fractional part
/// (`5250.0`, `11.25`).
pub fn format_decimal(value: f64) -> String {
    let rounded = round2(value);
    if rounded.fract() == 0.0 && rounded.abs() < 1e15 {
        format!("{:.1}", rounded)
    } else {
        rounded.to_string()
    }
}
