//! Percentile bootstrap on the paired accuracy difference

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::metrics::ConfidenceInterval;

const LOWER_QUANTILE: f64 = 0.025;
const UPPER_QUANTILE: f64 = 0.975;

/// 95% interval for `accuracy(primary) - accuracy(baseline)`.
///
/// Each of the `samples` resamples draws `n` indices uniformly with
/// replacement from a generator seeded with `seed`, so identical inputs and
/// seed give identical bounds. Only the common prefix of the two slices is
/// resampled. Returns `None` for no examples or no samples.
pub fn bootstrap_ci_diff(
    primary: &[bool],
    baseline: &[bool],
    samples: usize,
    seed: u64,
) -> Option<ConfidenceInterval> {
    let n = primary.len().min(baseline.len());
    if n == 0 || samples == 0 {
        return None;
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut diffs: Vec<f64> = (0..samples)
        .map(|_| {
            let (mut hits_primary, mut hits_baseline) = (0usize, 0usize);
            for _ in 0..n {
                let i = rng.gen_range(0..n);
                hits_primary += usize::from(primary[i]);
                hits_baseline += usize::from(baseline[i]);
            }
            hits_primary as f64 / n as f64 - hits_baseline as f64 / n as f64
        })
        .collect();
    diffs.sort_by(f64::total_cmp);

    let low = diffs[(LOWER_QUANTILE * samples as f64) as usize];
    let high = diffs[(UPPER_QUANTILE * samples as f64) as usize];
    Some(ConfidenceInterval { low, high })
}
