//! Statistics helpers
//!
//! Every helper is total: empty input, zero denominators and zero variance
//! yield 0.0 instead of NaN or a panic.

/// Replace NaN/±inf with 0.0
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Arithmetic mean; 0.0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    finite_or_zero(values.iter().sum::<f64>() / values.len() as f64)
}

/// `numerator / denominator`, or 0.0 when the denominator is not positive
pub fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        finite_or_zero(numerator / denominator)
    } else {
        0.0
    }
}

/// Max minus min; 0.0 for no values
pub fn spread<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    match min_max(values) {
        Some((min, max)) => finite_or_zero(max - min),
        None => 0.0,
    }
}

/// Min divided by max; 0.0 for no values or a non-positive max
pub fn min_max_ratio<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    match min_max(values) {
        Some((min, max)) => ratio_or_zero(min, max),
        None => 0.0,
    }
}

fn min_max<I>(values: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = f64>,
{
    values.into_iter().fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((min, max)) => Some((min.min(v), max.max(v))),
    })
}

/// Pearson correlation coefficient of two parallel sequences
///
/// Returns 0.0 when the sequences differ in length, hold fewer than two
/// points, or either has zero variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    if xs.len() != ys.len() || xs.len() < 2 {
        return 0.0;
    }

    let mean_x = mean(xs);
    let mean_y = mean(ys);

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x <= 0.0 || var_y <= 0.0 {
        return 0.0;
    }

    finite_or_zero(cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0)
}
