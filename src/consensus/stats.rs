use rand::Rng;
use statrs::statistics::{Data, OrderStatistics};

use crate::models::session::VoteRecord;

/// Scores at or above this value count as agreement on the 1-9 scale.
pub const AGREE_THRESHOLD: f64 = 7.0;
/// Scores at or below this value count as disagreement on the 1-9 scale.
pub const DISAGREE_THRESHOLD: f64 = 3.0;

const BOOTSTRAP_RESAMPLES: usize = 1000;

/// Numeric votes only. Categorical labels (Yes/No, GRADE judgements) are
/// excluded from both numerator and denominator of every statistic.
fn numeric_votes(votes: &[VoteRecord]) -> Vec<f64> {
    votes.iter().filter_map(|v| v.value.score()).collect()
}

/// Fraction of numeric votes at or above the agreement threshold.
///
/// Returns 0.0 when there are no numeric votes; "no data" is deliberately not
/// distinguished from "zero agreement".
pub fn agreement_fraction(votes: &[VoteRecord]) -> f64 {
    let numeric = numeric_votes(votes);
    if numeric.is_empty() {
        return 0.0;
    }
    let agreeing = numeric.iter().filter(|&&v| v >= AGREE_THRESHOLD).count();
    agreeing as f64 / numeric.len() as f64
}

/// Fraction of numeric votes at or below the disagreement threshold.
/// Same empty-input sentinel as [`agreement_fraction`].
pub fn disagreement_fraction(votes: &[VoteRecord]) -> f64 {
    let numeric = numeric_votes(votes);
    if numeric.is_empty() {
        return 0.0;
    }
    let disagreeing = numeric.iter().filter(|&&v| v <= DISAGREE_THRESHOLD).count();
    disagreeing as f64 / numeric.len() as f64
}

/// Sample median of the numeric votes with a bootstrap 95% confidence
/// interval: 1000 resamples with replacement, median of each, and the
/// 2.5th/97.5th percentiles of the resampled-median distribution.
///
/// Vote counts are small and votes are ordinal, so a normal-approximation
/// interval would be unreliable here. Returns (0, 0, 0) when there are no
/// numeric votes; with a single numeric vote the interval collapses to the
/// point estimate, since resampling n < 2 is degenerate.
pub fn median_with_interval(votes: &[VoteRecord]) -> (f64, f64, f64) {
    median_with_interval_using(votes, &mut rand::rng())
}

/// [`median_with_interval`] with a caller-supplied RNG.
pub fn median_with_interval_using<R: Rng + ?Sized>(
    votes: &[VoteRecord],
    rng: &mut R,
) -> (f64, f64, f64) {
    let numeric = numeric_votes(votes);
    if numeric.is_empty() {
        return (0.0, 0.0, 0.0);
    }
    let median = Data::new(numeric.clone()).median();
    if numeric.len() < 2 {
        return (median, median, median);
    }

    let mut medians = Vec::with_capacity(BOOTSTRAP_RESAMPLES);
    for _ in 0..BOOTSTRAP_RESAMPLES {
        let resample: Vec<f64> = (0..numeric.len())
            .map(|_| numeric[rng.random_range(0..numeric.len())])
            .collect();
        medians.push(Data::new(resample).median());
    }
    let mut distribution = Data::new(medians);
    let lo = distribution.quantile(0.025);
    let hi = distribution.quantile(0.975);
    (median, lo, hi)
}
