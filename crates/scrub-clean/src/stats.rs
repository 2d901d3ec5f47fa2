//! Descriptive statistics used by the outlier and imputation stages.
//!
//! The quantile helpers expect an ascending slice (see [`sorted_finite`]).

use std::collections::BTreeMap;

/// Quantile by linear interpolation between closest ranks
/// (`pos = q * (n - 1)`). Expects `sorted` in ascending order.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}

pub fn median(sorted: &[f64]) -> Option<f64> {
    quantile(sorted, 0.5)
}

/// Median of ascending integers, flooring the midpoint of an even count.
///
/// Computed without going through `f64`, so nanosecond timestamps keep
/// their precision.
pub fn median_i64(sorted: &[i64]) -> Option<i64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    let mid = n / 2;
    if n % 2 == 1 {
        return Some(sorted[mid]);
    }
    let sum = i128::from(sorted[mid - 1]) + i128::from(sorted[mid]);
    i64::try_from(sum.div_euclid(2)).ok()
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Adjusted Fisher-Pearson sample skewness (G1).
///
/// Fewer than three values or zero variance count as symmetric (0.0).
pub fn skewness(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 3 {
        return 0.0;
    }
    let Some(mu) = mean(values) else {
        return 0.0;
    };
    let nf = n as f64;
    let m2 = values.iter().map(|v| (v - mu).powi(2)).sum::<f64>() / nf;
    if m2 <= f64::EPSILON * mu.abs().max(1.0) {
        return 0.0;
    }
    let m3 = values.iter().map(|v| (v - mu).powi(3)).sum::<f64>() / nf;
    let g1 = m3 / m2.powf(1.5);
    g1 * (nf * (nf - 1.0)).sqrt() / (nf - 2.0)
}

/// Most frequent value; ties go to the smallest value.
pub fn mode<T, I>(values: I) -> Option<T>
where
    T: Ord,
    I: IntoIterator<Item = T>,
{
    let mut counts: BTreeMap<T, usize> = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }
    let mut best: Option<(T, usize)> = None;
    for (value, count) in counts {
        match &best {
            Some((_, best_count)) if *best_count >= count => {}
            _ => best = Some((value, count)),
        }
    }
    best.map(|(value, _)| value)
}

/// Tukey fences around the interquartile range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IqrFences {
    pub lower: f64,
    pub upper: f64,
}

impl IqrFences {
    /// Fences at `Q1 - k*IQR` and `Q3 + k*IQR`.
    ///
    /// Returns `None` for empty input or a zero IQR.
    pub fn from_sorted(sorted: &[f64], multiplier: f64) -> Option<Self> {
        let q1 = quantile(sorted, 0.25)?;
        let q3 = quantile(sorted, 0.75)?;
        let iqr = q3 - q1;
        if iqr <= 0.0 {
            return None;
        }
        Some(Self {
            lower: q1 - multiplier * iqr,
            upper: q3 + multiplier * iqr,
        })
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.lower, self.upper)
    }
}

/// Sort finite values ascending, dropping NaN.
pub fn sorted_finite(values: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    sorted.sort_by(f64::total_cmp);
    sorted
}
