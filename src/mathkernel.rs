/*!
# Scalar math kernel

Move-weight curve, neighbor imbalance, and simple descriptive statistics used
by the batch kernel and the zone assigner.
*/

/// Move-weight curve: `1 / (1 + (log2(1 + 0.4 * (val - opt)))^2)`.
///
/// Callers always pass `val >= 0`; keeping `1 + 0.4 * (val - opt)` positive
/// is the caller's responsibility (contract, not checked here).
pub fn mweight(val: f64, opt: f64) -> f64 {
    let inner = 1.0 + 0.4 * (val - opt);
    let l = inner.log2();
    1.0 / (1.0 + l * l)
}

/// Neighbor imbalance: `(sqrt(r) - sqrt(l)) / (sqrt(r) + sqrt(l))`, defined
/// as `0` when both counts are zero.
pub fn imbalance(l: f64, r: f64) -> f64 {
    if l == 0.0 && r == 0.0 {
        return 0.0;
    }
    (r.sqrt() - l.sqrt()) / (r.sqrt() + l.sqrt())
}

/// Maximum of a finite array; `0.0` for empty input.
pub fn data_max(data: &[f64]) -> f64 {
    data.iter().cloned().fold(None, |acc: Option<f64>, x| {
        Some(acc.map_or(x, |m| m.max(x)))
    }).unwrap_or(0.0)
}

/// Sum of a finite array; `0.0` for empty input.
pub fn data_sum(data: &[f64]) -> f64 {
    data.iter().sum()
}

/// Arithmetic mean of a finite array; `0.0` for empty input.
pub fn data_mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        0.0
    } else {
        data_sum(data) / data.len() as f64
    }
}

/// Population standard deviation: `sqrt(sum((x - mean)^2) / n)`.
pub fn data_stddev(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let mean = data_mean(data);
    let variance = data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / data.len() as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_imbalance_zero_case() {
        assert_eq!(imbalance(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_imbalance_symmetric() {
        // Swapping l and r flips the sign.
        let a = imbalance(2.0, 8.0);
        let b = imbalance(8.0, 2.0);
        assert!((a + b).abs() < 1e-12);
    }

    #[test]
    fn test_imbalance_equal_counts_is_zero() {
        assert!(imbalance(5.0, 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_data_max_empty_is_zero() {
        assert_eq!(data_max(&[]), 0.0);
    }

    #[test]
    fn test_data_max() {
        assert_eq!(data_max(&[1.0, 5.0, -3.0, 2.0]), 5.0);
    }

    #[test]
    fn test_data_mean_empty_is_zero() {
        assert_eq!(data_mean(&[]), 0.0);
    }

    #[test]
    fn test_data_mean() {
        assert_eq!(data_mean(&[1.0, 2.0, 3.0, 4.0]), 2.5);
    }

    #[test]
    fn test_data_stddev_population() {
        // Population stddev of [2, 4, 4, 4, 5, 5, 7, 9] is 2.0.
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((data_stddev(&data) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_mweight_at_optimum_is_one() {
        // At val == opt, the log term is log2(1) == 0, so mweight == 1.
        assert!((mweight(1.75, 1.75) - 1.0).abs() < 1e-12);
    }
}
