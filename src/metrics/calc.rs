//! Metric arithmetic shared by the parsers and the aggregator.
//!
//! TSL is only ever computed here, both per row and after aggregation.

/// Time spent listening: `tlh / cume` rounded to 2 decimals.
///
/// Returns 0 when `cume` is zero or either input is not a finite number.
pub fn compute_tsl(tlh: f64, cume: f64) -> f64 {
    if !tlh.is_finite() || !cume.is_finite() || cume == 0.0 {
        return 0.0;
    }
    round_to(tlh / cume, 2)
}

/// Average CUME over the strictly positive values, rounded to a whole listener.
///
/// Zero, negative and non-finite values are excluded from both the sum and
/// the count, so a bucket with a few empty rows is not dragged toward zero.
pub fn compute_average_cume(values: &[f64]) -> f64 {
    let (sum, count) = values
        .iter()
        .filter(|v| v.is_finite() && **v > 0.0)
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        return 0.0;
    }
    (sum / count as f64).round()
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
