//! Largest-Triangle-Three-Buckets downsampling and plain decimation.
//!
//! Both return a subsequence of their input: no interpolated or synthesized
//! points ever appear in the output.

use crate::sample::Sample;

/// Result of a downsampling pass together with its diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct Downsampled {
    pub points: Vec<Sample>,
    /// Samples discarded before selection because their value was not finite.
    pub dropped: usize,
}

/// Reduces `series` to at most `threshold` visually representative points.
pub fn downsample(series: &[Sample], threshold: usize) -> Vec<Sample> {
    downsample_with_report(series, threshold).points
}

/// Same as [`downsample`], also reporting how many malformed samples were dropped.
///
/// Short circuits, evaluated on the cleaned sequence of length `n`:
/// `threshold <= 2`, `n <= 2` or `threshold >= n` return the cleaned input
/// unchanged.
///
/// Otherwise exactly `threshold` samples: both endpoints plus one pick per
/// interior bucket.
pub fn downsample_with_report(series: &[Sample], threshold: usize) -> Downsampled {
    if series.is_empty() {
        return Downsampled {
            points: Vec::new(),
            dropped: 0,
        };
    }

    let clean: Vec<&Sample> = series.iter().filter(|s| s.is_plottable()).collect();
    let dropped = series.len() - clean.len();
    if dropped > 0 {
        log::debug!("downsample dropped {dropped} non-finite samples");
    }

    let n = clean.len();
    let points = if threshold <= 2 || n <= 2 || threshold >= n {
        clean.into_iter().cloned().collect()
    } else {
        lttb_indices(&clean, threshold)
            .into_iter()
            .map(|idx| clean[idx].clone())
            .collect()
    };

    Downsampled { points, dropped }
}

fn x(sample: &Sample) -> f64 {
    sample.timestamp as f64
}

/// Index range `[start, end)` of interior bucket `i` out of `interior` buckets,
/// clamped to `[1, n - 1)`. Boundaries are `floor(i * (n - 2) / interior) + 1`,
/// computed in integers so neighbouring buckets share their boundary exactly.
fn bucket_range(i: usize, interior: usize, n: usize) -> (usize, usize) {
    let boundary = |k: usize| k * (n - 2) / interior + 1;
    let start = boundary(i).clamp(1, n - 1);
    let end = boundary(i + 1).clamp(start, n - 1);
    (start, end)
}

/// Requires `n > threshold > 2`.
fn lttb_indices(data: &[&Sample], threshold: usize) -> Vec<usize> {
    let n = data.len();
    let interior = threshold - 2;
    let last = data[n - 1];

    let mut selected = Vec::with_capacity(threshold);
    selected.push(0);
    let mut a = 0;

    for i in 0..interior {
        let (avg_start, avg_end) = bucket_range(i + 1, interior, n);
        let (avg_x, avg_y) = if avg_end > avg_start {
            let members = &data[avg_start..avg_end];
            let count = members.len() as f64;
            let sum_x: f64 = members.iter().map(|s| x(s)).sum();
            let sum_y: f64 = members.iter().map(|s| s.value).sum();
            (sum_x / count, sum_y / count)
        } else {
            (x(last), last.value)
        };

        let (start, end) = bucket_range(i, interior, n);
        let (ax, ay) = (x(data[a]), data[a].value);

        let mut max_area = -1.0;
        let mut max_idx = start;
        for (j, candidate) in data.iter().enumerate().take(end).skip(start) {
            let area = 0.5
                * ((ax - avg_x) * (candidate.value - ay) - (ax - x(candidate)) * (avg_y - ay)).abs();
            if area > max_area {
                max_area = area;
                max_idx = j;
            }
        }

        selected.push(max_idx);
        a = max_idx;
    }

    selected.push(n - 1);
    selected
}

/// Keeps every `factor`-th sample and always the last one. `factor <= 1` copies.
pub fn decimate(series: &[Sample], factor: usize) -> Vec<Sample> {
    if factor <= 1 || series.is_empty() {
        return series.to_vec();
    }
    let mut result: Vec<Sample> = series.iter().step_by(factor).cloned().collect();
    if (series.len() - 1) % factor != 0 {
        if let Some(last) = series.last() {
            result.push(last.clone());
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interior_buckets_partition_without_gaps() {
        for (n, threshold) in [(10, 3), (11, 5), (1000, 600), (601, 600), (5000, 7)] {
            let interior = threshold - 2;
            let mut expected_start = 1;
            for i in 0..interior {
                let (start, end) = bucket_range(i, interior, n);
                assert_eq!(start, expected_start, "n={n} t={threshold} i={i}");
                assert!(end > start, "empty bucket n={n} t={threshold} i={i}");
                expected_start = end;
            }
            assert_eq!(expected_start, n - 1, "n={n} t={threshold}");
        }
    }

    #[test]
    fn next_bucket_past_the_end_is_empty() {
        let (start, end) = bucket_range(3, 3, 10);
        assert_eq!(start, end);
    }
}
