//! Small numeric helpers shared by the platform model, trend fit, and
//! moving-average columns: nothing here needs more than a handful of
//! points, so it's all hand-rolled rather than pulled in from a linear
//! algebra crate.

/// Average of the last `n` values in `data` (fewer if `data` is shorter).
/// Empty input averages to `0.0`.
pub fn average_last_n(data: &[f64], n: usize) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let take = n.min(data.len());
    let start = data.len() - take;
    data[start..].iter().sum::<f64>() / take as f64
}

/// Sample standard deviation of `data` (0.0 for fewer than 2 points).
pub fn stdev(data: &[f64]) -> f64 {
    if data.len() < 2 {
        return 0.0;
    }
    let mean = data.iter().sum::<f64>() / data.len() as f64;
    let var = data.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (data.len() - 1) as f64;
    var.sqrt()
}

/// Ordinary least squares fit of `y = intercept + slope * x`.
/// Returns `(intercept, slope)`. Panics-free: degenerate input (all `x`
/// equal) yields slope `0.0` and intercept equal to the mean of `y`.
pub fn fit_line(points: &[(f64, f64)]) -> (f64, f64) {
    let n = points.len() as f64;
    if points.is_empty() {
        return (0.0, 0.0);
    }
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;
    let mut cov = 0.0;
    let mut var_x = 0.0;
    for (x, y) in points {
        cov += (x - mean_x) * (y - mean_y);
        var_x += (x - mean_x).powi(2);
    }
    if var_x == 0.0 {
        return (mean_y, 0.0);
    }
    let slope = cov / var_x;
    let intercept = mean_y - slope * mean_x;
    (intercept, slope)
}

/// Pearson correlation coefficient of `(x, y)` pairs. `0.0` for fewer than
/// 2 points or zero variance in either axis.
pub fn correlation(points: &[(f64, f64)]) -> f64 {
    let n = points.len() as f64;
    if points.len() < 2 {
        return 0.0;
    }
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;
    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in points {
        cov += (x - mean_x) * (y - mean_y);
        var_x += (x - mean_x).powi(2);
        var_y += (y - mean_y).powi(2);
    }
    if var_x == 0.0 || var_y == 0.0 {
        return 0.0;
    }
    cov / (var_x.sqrt() * var_y.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_last_n_caps_at_available_length() {
        assert_eq!(average_last_n(&[1.0, 2.0, 3.0], 10), 2.0);
        assert_eq!(average_last_n(&[1.0, 2.0, 3.0, 4.0], 2), 3.5);
        assert_eq!(average_last_n(&[], 5), 0.0);
    }

    #[test]
    fn fit_line_recovers_an_exact_line() {
        let points: Vec<(f64, f64)> = (0..10).map(|i| (i as f64, 3.0 + 2.0 * i as f64)).collect();
        let (intercept, slope) = fit_line(&points);
        assert!((intercept - 3.0).abs() < 1e-9);
        assert!((slope - 2.0).abs() < 1e-9);
    }

    #[test]
    fn fit_line_degenerate_x_falls_back_to_mean() {
        let points = vec![(5.0, 1.0), (5.0, 3.0), (5.0, 5.0)];
        let (intercept, slope) = fit_line(&points);
        assert_eq!(slope, 0.0);
        assert!((intercept - 3.0).abs() < 1e-9);
    }

    #[test]
    fn correlation_of_perfect_line_is_one() {
        let points: Vec<(f64, f64)> = (0..10).map(|i| (i as f64, 2.0 * i as f64)).collect();
        assert!((correlation(&points) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn stdev_of_constant_data_is_zero() {
        assert_eq!(stdev(&[4.0, 4.0, 4.0]), 0.0);
    }
}
