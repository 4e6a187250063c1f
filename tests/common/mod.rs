#![allow(dead_code)]

use consenso::models::session::{participant_id, VoteRecord, VoteValue};

/// Numeric vote records from a list of Likert scores, one synthetic voter
/// per score.
pub fn score_votes(scores: &[u8]) -> Vec<VoteRecord> {
    scores
        .iter()
        .enumerate()
        .map(|(i, &score)| VoteRecord {
            participant_id: participant_id(&format!("voter-{i}")),
            display_name: format!("voter-{i}"),
            value: VoteValue::Score(score),
            comment: String::new(),
        })
        .collect()
}

/// Categorical vote records from a list of labels.
pub fn label_votes(labels: &[&str]) -> Vec<VoteRecord> {
    labels
        .iter()
        .enumerate()
        .map(|(i, &label)| VoteRecord {
            participant_id: participant_id(&format!("voter-{i}")),
            display_name: format!("voter-{i}"),
            value: VoteValue::Label(label.to_string()),
            comment: String::new(),
        })
        .collect()
}
