//! Paired comparison of two runs
//!
//! Per-example correctness comes from the matcher; the bootstrap interval
//! and the exact test only ever see the two boolean sequences.

mod bootstrap;
mod comparator;
mod exact_test;

pub use bootstrap::bootstrap_ci_diff;
pub use comparator::PairedComparator;
pub use exact_test::{DiscordantPairs, mcnemar_exact};
