use serde::{Deserialize, Serialize};

use crate::consensus::stats;
use crate::models::session::Round;

/// Agreement fraction at or above which a recommendation is approved.
pub const APPROVE_FRACTION: f64 = 0.80;
/// Agreement fraction at or below which the median+CI rejection rule applies.
pub const REJECT_FRACTION: f64 = 0.20;
/// Share of low votes at or above which the percentage rejection rule applies.
pub const REJECT_LOW_SHARE: f64 = 0.80;

/// Categorical consensus verdict, in rule-priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    QuorumPending,
    ApprovedByMedianCi,
    ApprovedByPercentage,
    RejectedByMedianCi,
    RejectedByPercentage,
    Inconclusive,
}

impl Verdict {
    pub fn is_approved(&self) -> bool {
        matches!(self, Verdict::ApprovedByMedianCi | Verdict::ApprovedByPercentage)
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Verdict::RejectedByMedianCi | Verdict::RejectedByPercentage)
    }

    /// Status line shown on the dashboard and in reports.
    pub fn banner(&self) -> &'static str {
        match self {
            Verdict::QuorumPending => "Quorum not reached",
            Verdict::ApprovedByMedianCi => "CONSENSUS REACHED (median + 95% CI)",
            Verdict::ApprovedByPercentage => "CONSENSUS REACHED (% of votes)",
            Verdict::RejectedByMedianCi => "NOT APPROVED (median + 95% CI)",
            Verdict::RejectedByPercentage => "NOT APPROVED (% of votes)",
            Verdict::Inconclusive => "No consensus reached — an additional round is recommended",
        }
    }
}

/// Everything the dashboard and the exports need about one round's votes.
#[derive(Debug, Clone, Serialize)]
pub struct ConsensusSummary {
    pub votes_received: usize,
    pub expected_participants: usize,
    pub quorum: usize,
    pub agreement: f64,
    pub median: f64,
    pub ci_low: f64,
    pub ci_high: f64,
    pub verdict: Verdict,
}

/// Apply the threshold rules in fixed priority order; the first matching rule
/// wins. The rules are not mutually exclusive, so the order is load-bearing:
/// a round can be approved by percentage while its interval straddles outside
/// [7, 9] — deliberate permissiveness, not an oversight.
pub fn classify(
    votes_received: usize,
    quorum: usize,
    agreement: f64,
    median_ci: (f64, f64, f64),
    low_share: f64,
) -> Verdict {
    let (median, lo, hi) = median_ci;
    let within = |x: f64, a: f64, b: f64| x >= a && x <= b;

    if votes_received < quorum {
        return Verdict::QuorumPending;
    }
    if agreement >= APPROVE_FRACTION
        && [median, lo, hi].iter().all(|&x| within(x, 7.0, 9.0))
    {
        return Verdict::ApprovedByMedianCi;
    }
    if agreement >= APPROVE_FRACTION {
        return Verdict::ApprovedByPercentage;
    }
    if agreement <= REJECT_FRACTION
        && [median, lo, hi].iter().all(|&x| within(x, 1.0, 3.0))
    {
        return Verdict::RejectedByMedianCi;
    }
    if low_share >= REJECT_LOW_SHARE {
        return Verdict::RejectedByPercentage;
    }
    Verdict::Inconclusive
}

/// Compute the full consensus summary for one round.
pub fn summarize(round: &Round) -> ConsensusSummary {
    let votes_received = round.votes.len();
    let quorum = round.quorum();
    let agreement = stats::agreement_fraction(&round.votes);
    let median_ci = stats::median_with_interval(&round.votes);
    let low_share = stats::disagreement_fraction(&round.votes);
    let verdict = classify(votes_received, quorum, agreement, median_ci, low_share);
    ConsensusSummary {
        votes_received,
        expected_participants: round.expected_participants,
        quorum,
        agreement,
        median: median_ci.0,
        ci_low: median_ci.1,
        ci_high: median_ci.2,
        verdict,
    }
}
