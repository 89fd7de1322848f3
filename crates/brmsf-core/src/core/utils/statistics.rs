/// Percentile of an ascending-sorted slice with linear interpolation.
///
/// `q` is in percent (`0.0..=100.0`). The fractional rank is
/// `q / 100 * (n - 1)`; the result interpolates linearly between the two
/// neighbouring order statistics. Returns `None` for an empty slice or a `q`
/// outside the valid range.
pub fn percentile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=100.0).contains(&q) {
        return None;
    }
    let rank = q / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Sorts `values` ascending. NaN compares equal to everything.
pub fn sort_ascending(values: &mut [f64]) {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
}
