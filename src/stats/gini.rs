/// Gini coefficient of a volume distribution
///
/// Uses the discrete form over ascending, 1-indexed values:
/// `G = 2 * sum(i * x_i) / (n * sum(x)) - (n + 1) / n`
///
/// 0 means every client carries the same volume; a single client holding
/// everything out of `n` gives `(n - 1) / n`. Empty input or zero total
/// volume yields 0.
pub fn gini_coefficient(values: &[f64]) -> f64 {
    let n = values.len();
    if n == 0 {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let total: f64 = sorted.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }

    let weighted: f64 = sorted
        .iter()
        .enumerate()
        .map(|(i, x)| (i + 1) as f64 * x)
        .sum();

    let n = n as f64;
    let gini = 2.0 * weighted / (n * total) - (n + 1.0) / n;

    // Float noise can push an equal distribution a hair below zero
    gini.max(0.0)
}
