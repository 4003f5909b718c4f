use statrs::statistics::Statistics;

/// Arithmetic mean; an empty slice averages to 0
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance (divides by n, not n - 1)
pub fn population_variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    values.iter().population_variance()
}

/// Population standard deviation
pub fn population_std_dev(values: &[f64]) -> f64 {
    population_variance(values).sqrt()
}

/// Median of an ascending-sorted slice
pub fn median(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    match n {
        0 => 0.0,
        _ if n % 2 == 1 => sorted[n / 2],
        _ => (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0,
    }
}

/// Quantile of an ascending-sorted slice by linear interpolation between
/// closest ranks, `h = (n - 1) * p`.
pub fn quantile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }

    let p = p.clamp(0.0, 1.0);
    let h = (sorted.len() - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;

    sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
}

/// First, second and third quartile of an ascending-sorted slice
pub fn quartiles(sorted: &[f64]) -> [f64; 3] {
    [
        quantile(sorted, 0.25),
        quantile(sorted, 0.5),
        quantile(sorted, 0.75),
    ]
}

/// Inclusive Tukey fences `(Q1 - k*IQR, Q3 + k*IQR)`
pub fn tukey_fences(q1: f64, q3: f64, k: f64) -> (f64, f64) {
    let iqr = q3 - q1;
    (q1 - k * iqr, q3 + k * iqr)
}
