//! Tests for the consensus statistics and the verdict cascade.

mod common;

use common::*;
use consenso::consensus::stats::median_with_interval_using;
use consenso::consensus::{
    agreement_fraction, classify, disagreement_fraction, median_with_interval, summarize, Verdict,
};
use consenso::models::session::{Round, Scale};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn round_with_scores(scores: &[u8], expected: usize) -> Round {
    Round {
        recommendation_text: "Test recommendation".to_string(),
        scale: Scale::Likert,
        round_number: 1,
        created_at: "2025-01-01 10:00:00".to_string(),
        expected_participants: expected,
        votes: score_votes(scores),
    }
}

// --- agreement fraction ---

#[test]
fn agreement_is_zero_for_no_votes() {
    assert_eq!(agreement_fraction(&[]), 0.0);
}

#[test]
fn agreement_excludes_categorical_votes() {
    // Yes/No votes never enter the percentage; an all-categorical ledger
    // behaves like an empty one.
    assert_eq!(agreement_fraction(&label_votes(&["Yes", "Yes", "No"])), 0.0);
}

#[test]
fn agreement_counts_scores_of_seven_and_up() {
    let votes = score_votes(&[9, 8, 7, 6, 1]);
    let fraction = agreement_fraction(&votes);
    assert!((fraction - 0.6).abs() < 1e-12);
}

#[test]
fn agreement_stays_within_unit_interval() {
    for scores in [&[1u8, 1, 1][..], &[9, 9, 9], &[1, 5, 9], &[7]] {
        let fraction = agreement_fraction(&score_votes(scores));
        assert!((0.0..=1.0).contains(&fraction), "fraction {fraction} out of range");
    }
}

#[test]
fn disagreement_counts_scores_of_three_and_down() {
    let votes = score_votes(&[1, 2, 3, 4, 9]);
    let fraction = disagreement_fraction(&votes);
    assert!((fraction - 0.6).abs() < 1e-12);
}

// --- median with bootstrap interval ---

#[test]
fn median_sentinel_for_empty_input() {
    assert_eq!(median_with_interval(&[]), (0.0, 0.0, 0.0));
}

#[test]
fn median_interval_collapses_for_single_vote() {
    assert_eq!(median_with_interval(&score_votes(&[5])), (5.0, 5.0, 5.0));
}

#[test]
fn median_interval_collapses_for_identical_votes() {
    // Every resample of an all-8 ledger has median 8.
    let (median, lo, hi) = median_with_interval(&score_votes(&[8, 8, 8, 8, 8]));
    assert_eq!((median, lo, hi), (8.0, 8.0, 8.0));
}

#[test]
fn median_interval_brackets_the_estimate() {
    let votes = score_votes(&[2, 4, 5, 6, 7, 8, 8, 9]);
    let mut rng = StdRng::seed_from_u64(7);
    let (median, lo, hi) = median_with_interval_using(&votes, &mut rng);
    assert!(lo <= median && median <= hi);
    assert!(lo >= 2.0 && hi <= 9.0);
}

// --- verdict cascade ---

#[test]
fn quorum_takes_precedence_over_unanimous_approval() {
    // 10 expected participants -> quorum 6; 5 unanimous nines stay pending.
    let round = round_with_scores(&[9, 9, 9, 9, 9], 10);
    let summary = summarize(&round);
    assert_eq!(summary.quorum, 6);
    assert_eq!(summary.verdict, Verdict::QuorumPending);
}

#[test]
fn approval_by_percentage() {
    let round = round_with_scores(&[8, 8, 8, 8, 8, 8, 8, 8, 8, 2], 10);
    let summary = summarize(&round);
    assert!((summary.agreement - 0.9).abs() < 1e-12);
    // The stronger median+CI rule may or may not also hold depending on the
    // resampled interval; any approval flavor is acceptable here.
    assert!(summary.verdict.is_approved(), "got {:?}", summary.verdict);
}

#[test]
fn rejection_by_percentage() {
    let round = round_with_scores(&[2, 2, 2, 2, 2, 2, 2, 2, 2, 8], 10);
    let summary = summarize(&round);
    assert!(summary.verdict.is_rejected(), "got {:?}", summary.verdict);
}

#[test]
fn classify_orders_rules_by_priority() {
    // Below quorum nothing else matters.
    assert_eq!(
        classify(5, 6, 1.0, (9.0, 9.0, 9.0), 0.0),
        Verdict::QuorumPending
    );
    // High agreement with the interval inside [7, 9].
    assert_eq!(
        classify(10, 6, 0.85, (8.0, 7.0, 9.0), 0.0),
        Verdict::ApprovedByMedianCi
    );
    // High agreement while the interval straddles outside [7, 9]: the
    // percentage rule still approves. Deliberate permissiveness.
    assert_eq!(
        classify(10, 6, 0.85, (6.0, 5.0, 8.0), 0.0),
        Verdict::ApprovedByPercentage
    );
    // Low agreement with the interval inside [1, 3].
    assert_eq!(
        classify(10, 6, 0.1, (2.0, 1.0, 3.0), 0.9),
        Verdict::RejectedByMedianCi
    );
    // Interval too wide for the CI rule, but 85% of votes are low.
    assert_eq!(
        classify(10, 6, 0.15, (2.0, 1.0, 4.0), 0.85),
        Verdict::RejectedByPercentage
    );
    // Nothing matches.
    assert_eq!(
        classify(10, 6, 0.5, (5.0, 4.0, 6.0), 0.2),
        Verdict::Inconclusive
    );
}

#[test]
fn boundary_agreement_of_exactly_eighty_percent_approves() {
    assert!(classify(10, 6, 0.80, (5.0, 4.0, 6.0), 0.0).is_approved());
}

#[test]
fn boundary_quorum_is_met_at_exactly_quorum_votes() {
    assert_ne!(
        classify(6, 6, 0.5, (5.0, 4.0, 6.0), 0.2),
        Verdict::QuorumPending
    );
}
