//! Exact McNemar test on discordant pairs, without continuity correction

/// Counts of examples where the two runs disagree on correctness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DiscordantPairs {
    /// Primary wrong, baseline right
    pub n01: usize,
    /// Primary right, baseline wrong
    pub n10: usize,
}

impl DiscordantPairs {
    pub fn count(primary: &[bool], baseline: &[bool]) -> Self {
        primary
            .iter()
            .zip(baseline)
            .fold(Self::default(), |mut acc, (&p, &b)| {
                match (p, b) {
                    (false, true) => acc.n01 += 1,
                    (true, false) => acc.n10 += 1,
                    _ => {}
                }
                acc
            })
    }

    pub fn total(&self) -> usize {
        self.n01 + self.n10
    }
}

/// Two-sided exact binomial p-value, `None` when there are no discordant pairs.
///
/// `p = min(1, 2 * sum_{i=0..=k} C(n, i) / 2^n)` with `n = n01 + n10` and
/// `k = min(n01, n10)`. Terms are accumulated in log space so large `n`
/// neither overflows `C(n, i)` nor underflows `2^-n` prematurely.
pub fn mcnemar_exact(pairs: DiscordantPairs) -> Option<f64> {
    let n = pairs.total();
    if n == 0 {
        return None;
    }
    let k = pairs.n01.min(pairs.n10);

    let log_half_n = n as f64 * std::f64::consts::LN_2;
    let mut log_choose = 0.0_f64;
    let mut tail = 0.0_f64;
    for i in 0..=k {
        if i > 0 {
            log_choose += ((n - i + 1) as f64).ln() - (i as f64).ln();
        }
        tail += (log_choose - log_half_n).exp();
    }
    Some((2.0 * tail).min(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(n01: usize, n10: usize) -> DiscordantPairs {
        DiscordantPairs { n01, n10 }
    }

    #[test]
    fn test_count() {
        let p = [true, true, false, false, true];
        let b = [true, false, true, false, false];
        assert_eq!(DiscordantPairs::count(&p, &b), pairs(1, 2));
    }

    #[test]
    fn test_no_discordant_pairs_is_undefined() {
        assert_eq!(mcnemar_exact(pairs(0, 0)), None);
    }

    #[test]
    fn test_symmetric_case_is_one() {
        for k in [1, 2, 5, 40, 600] {
            assert_eq!(mcnemar_exact(pairs(k, k)), Some(1.0));
        }
    }

    #[test]
    fn test_known_values() {
        // n=10, k=0: 2 / 1024
        let p = mcnemar_exact(pairs(0, 10)).unwrap();
        assert!((p - 2.0 / 1024.0).abs() < 1e-12);

        // n=10, k=2: 2 * (1 + 10 + 45) / 1024
        let p = mcnemar_exact(pairs(8, 2)).unwrap();
        assert!((p - 112.0 / 1024.0).abs() < 1e-12);

        // n=1: 2 * 0.5
        let p = mcnemar_exact(pairs(1, 0)).unwrap();
        assert!((p - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_large_n_stays_finite() {
        let p = mcnemar_exact(pairs(900, 1300)).unwrap();
        assert!(p.is_finite());
        assert!(p > 0.0 && p < 1e-10);

        let p = mcnemar_exact(pairs(2000, 2010)).unwrap();
        assert!(p > 0.8 && p <= 1.0);
    }
}
