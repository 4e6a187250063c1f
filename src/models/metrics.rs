use serde::Serialize;

use crate::consensus::{self, Verdict};
use crate::models::session::{Scale, SessionKind, VoteRecord, VoteValue};
use crate::store::SessionState;

/// One frozen round in the trend table.
#[derive(Debug, Clone, Serialize)]
pub struct RoundTrendPoint {
    pub round_number: u32,
    pub created_at: String,
    pub votes_received: usize,
    pub agreement_pct: f64,
    pub median: f64,
}

/// A participant's comment as shown on the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct CommentEntry {
    pub display_name: String,
    pub participant_id: String,
    pub value: String,
    pub comment: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptionCount {
    pub option: String,
    pub count: usize,
}

/// Tally of one GRADE domain.
#[derive(Debug, Clone, Serialize)]
pub struct DomainTally {
    pub key: String,
    pub question: String,
    pub counts: Vec<OptionCount>,
}

/// Live metrics payload polled by the dashboard page.
#[derive(Debug, Clone, Serialize)]
pub struct SessionMetrics {
    pub code: String,
    pub description: String,
    pub kind: &'static str,
    pub active: bool,
    pub created_at: String,
    pub round_number: Option<u32>,
    pub votes_received: usize,
    pub expected_participants: usize,
    pub quorum: usize,
    pub agreement_pct: f64,
    pub median: f64,
    pub ci_low: f64,
    pub ci_high: f64,
    pub verdict: Option<Verdict>,
    pub verdict_banner: Option<&'static str>,
    /// Vote counts for scores 1 through 9.
    pub distribution: Vec<usize>,
    /// Vote counts per categorical label (Yes/No sessions).
    pub label_counts: Vec<OptionCount>,
    pub comments: Vec<CommentEntry>,
    pub history: Vec<RoundTrendPoint>,
    pub domains: Vec<DomainTally>,
}

fn score_distribution(votes: &[VoteRecord]) -> Vec<usize> {
    let mut counts = vec![0usize; 9];
    for vote in votes {
        if let Some(score) = vote.value.score() {
            let idx = score as usize;
            if (1..=9).contains(&idx) {
                counts[idx - 1] += 1;
            }
        }
    }
    counts
}

fn label_counts(votes: &[VoteRecord], options: &[&str]) -> Vec<OptionCount> {
    options
        .iter()
        .map(|&option| OptionCount {
            option: option.to_string(),
            count: votes
                .iter()
                .filter(|v| matches!(&v.value, VoteValue::Label(l) if l == option))
                .count(),
        })
        .collect()
}

fn comment_entries(votes: &[VoteRecord]) -> Vec<CommentEntry> {
    votes
        .iter()
        .filter(|v| !v.comment.trim().is_empty())
        .map(|v| CommentEntry {
            display_name: v.display_name.clone(),
            participant_id: v.participant_id.clone(),
            value: v.value.to_string(),
            comment: v.comment.clone(),
        })
        .collect()
}

impl SessionMetrics {
    pub fn from_state(state: &SessionState) -> SessionMetrics {
        let session = &state.session;
        match &session.kind {
            SessionKind::Standard { round } => {
                let summary = consensus::summarize(round);
                let history = state
                    .history
                    .iter()
                    .map(|past| RoundTrendPoint {
                        round_number: past.round_number,
                        created_at: past.created_at.clone(),
                        votes_received: past.votes.len(),
                        agreement_pct: consensus::agreement_fraction(&past.votes) * 100.0,
                        median: consensus::median_with_interval(&past.votes).0,
                    })
                    .collect();
                SessionMetrics {
                    code: session.code.clone(),
                    description: session.description().to_string(),
                    kind: "standard",
                    active: session.active,
                    created_at: session.created_at.clone(),
                    round_number: Some(round.round_number),
                    votes_received: summary.votes_received,
                    expected_participants: summary.expected_participants,
                    quorum: summary.quorum,
                    agreement_pct: summary.agreement * 100.0,
                    median: summary.median,
                    ci_low: summary.ci_low,
                    ci_high: summary.ci_high,
                    verdict: Some(summary.verdict),
                    verdict_banner: Some(summary.verdict.banner()),
                    distribution: score_distribution(&round.votes),
                    label_counts: match round.scale {
                        Scale::YesNo => label_counts(&round.votes, &["Yes", "No"]),
                        Scale::Likert => Vec::new(),
                    },
                    comments: comment_entries(&round.votes),
                    history,
                    domains: Vec::new(),
                }
            }
            SessionKind::GradePackage {
                expected_participants,
                domains,
                ..
            } => {
                let votes_received = session.votes_received();
                SessionMetrics {
                    code: session.code.clone(),
                    description: session.description().to_string(),
                    kind: "grade_package",
                    active: session.active,
                    created_at: session.created_at.clone(),
                    round_number: None,
                    votes_received,
                    expected_participants: *expected_participants,
                    quorum: expected_participants / 2 + 1,
                    agreement_pct: 0.0,
                    median: 0.0,
                    ci_low: 0.0,
                    ci_high: 0.0,
                    verdict: None,
                    verdict_banner: None,
                    distribution: Vec::new(),
                    label_counts: Vec::new(),
                    comments: Vec::new(),
                    history: Vec::new(),
                    domains: domains
                        .iter()
                        .map(|d| DomainTally {
                            key: d.key.clone(),
                            question: d.question.clone(),
                            counts: d
                                .options
                                .iter()
                                .map(|option| OptionCount {
                                    option: option.clone(),
                                    count: d
                                        .votes
                                        .iter()
                                        .filter(|v| {
                                            matches!(&v.value, VoteValue::Label(l) if l == option)
                                        })
                                        .count(),
                                })
                                .collect(),
                        })
                        .collect(),
                }
            }
        }
    }
}
