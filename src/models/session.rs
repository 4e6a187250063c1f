use std::fmt;

use serde::{Deserialize, Serialize};

/// Voting scale for a standard recommendation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scale {
    Likert,
    YesNo,
}

impl Scale {
    /// Parse the form value submitted by the creation page.
    pub fn from_form_value(value: &str) -> Option<Scale> {
        match value {
            "likert" => Some(Scale::Likert),
            "yes_no" => Some(Scale::YesNo),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Scale::Likert => "Likert 1-9",
            Scale::YesNo => "Yes/No",
        }
    }
}

/// A single vote: a score on the 1-9 Likert scale or a categorical label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VoteValue {
    Score(u8),
    Label(String),
}

impl VoteValue {
    /// Numeric value for the consensus statistics. Categorical labels are
    /// excluded from every numeric computation.
    pub fn score(&self) -> Option<f64> {
        match self {
            VoteValue::Score(v) => Some(f64::from(*v)),
            VoteValue::Label(_) => None,
        }
    }
}

impl fmt::Display for VoteValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoteValue::Score(v) => write!(f, "{v}"),
            VoteValue::Label(l) => write!(f, "{l}"),
        }
    }
}

/// One participant's submission within a round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteRecord {
    pub participant_id: String,
    pub display_name: String,
    pub value: VoteValue,
    pub comment: String,
}

/// Pseudonymous participant id: first 8 hex chars of SHA-256 of the display
/// name. Stable across resubmissions but trivially guessable for short
/// names — this is pseudonymization for exports, not an anonymity guarantee.
pub fn participant_id(display_name: &str) -> String {
    sha256::digest(display_name)[..8].to_string()
}

/// Insert or overwrite the record for `display_name`, keeping at most one
/// record per name. An overwrite keeps the original list position.
/// Returns the participant id.
pub fn upsert_vote(
    votes: &mut Vec<VoteRecord>,
    display_name: &str,
    value: VoteValue,
    comment: &str,
) -> String {
    let pid = participant_id(display_name);
    if let Some(existing) = votes.iter_mut().find(|v| v.display_name == display_name) {
        existing.value = value;
        existing.comment = comment.to_string();
    } else {
        votes.push(VoteRecord {
            participant_id: pid.clone(),
            display_name: display_name.to_string(),
            value,
            comment: comment.to_string(),
        });
    }
    pid
}

/// One voting instance for a single recommendation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    pub recommendation_text: String,
    pub scale: Scale,
    pub round_number: u32,
    pub created_at: String,
    pub expected_participants: usize,
    pub votes: Vec<VoteRecord>,
}

impl Round {
    /// Minimum number of submissions before a verdict may be issued.
    pub fn quorum(&self) -> usize {
        self.expected_participants / 2 + 1
    }

    /// Whether `value` is admissible on this round's scale.
    pub fn accepts(&self, value: &VoteValue) -> bool {
        match (self.scale, value) {
            (Scale::Likert, VoteValue::Score(v)) => (1..=9).contains(v),
            (Scale::YesNo, VoteValue::Label(l)) => l == "Yes" || l == "No",
            _ => false,
        }
    }
}

/// One GRADE evidence-to-decision domain: a fixed question, its categorical
/// option list, and its own vote ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainBallot {
    pub key: String,
    pub question: String,
    pub options: Vec<String>,
    pub votes: Vec<VoteRecord>,
}

impl DomainBallot {
    fn new(key: &str, question: &str, options: &[&str]) -> DomainBallot {
        DomainBallot {
            key: key.to_string(),
            question: question.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            votes: Vec::new(),
        }
    }
}

/// The nine GRADE evidence-to-decision domains, in presentation order.
pub fn grade_domains() -> Vec<DomainBallot> {
    const JUDGEMENT: &[&str] = &["No", "Probably no", "Probably yes", "Yes", "Varies", "Don't know"];
    const MAGNITUDE: &[&str] = &["Trivial", "Small", "Moderate", "Large", "Varies", "Don't know"];
    vec![
        DomainBallot::new("problem_priority", "Is the problem a priority?", JUDGEMENT),
        DomainBallot::new(
            "desirable_effects",
            "How substantial are the desirable anticipated effects?",
            MAGNITUDE,
        ),
        DomainBallot::new(
            "undesirable_effects",
            "How substantial are the undesirable anticipated effects?",
            MAGNITUDE,
        ),
        DomainBallot::new(
            "certainty_of_evidence",
            "What is the overall certainty of the evidence of effects?",
            &["Very low", "Low", "Moderate", "High", "No included studies"],
        ),
        DomainBallot::new(
            "balance_of_effects",
            "Does the balance between desirable and undesirable effects favor the intervention or the comparison?",
            &[
                "Favors the comparison",
                "Probably favors the comparison",
                "Does not favor either",
                "Probably favors the intervention",
                "Favors the intervention",
                "Varies",
                "Don't know",
            ],
        ),
        DomainBallot::new(
            "required_resources",
            "How large are the resource requirements (costs)?",
            &[
                "Large costs",
                "Moderate costs",
                "Negligible costs and savings",
                "Moderate savings",
                "Large savings",
                "Varies",
                "Don't know",
            ],
        ),
        DomainBallot::new(
            "acceptability",
            "Is the intervention acceptable to key stakeholders?",
            JUDGEMENT,
        ),
        DomainBallot::new(
            "feasibility",
            "Is the intervention feasible to implement?",
            JUDGEMENT,
        ),
        DomainBallot::new(
            "equity",
            "What would be the impact on health equity?",
            &[
                "Reduced",
                "Probably reduced",
                "Probably no impact",
                "Probably increased",
                "Increased",
                "Varies",
                "Don't know",
            ],
        ),
    ]
}

/// What a session is voting on.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionKind {
    /// One recommendation, one live round at a time.
    Standard { round: Round },
    /// A bundle of finalized recommendations evaluated across the nine GRADE
    /// domains, each domain on its own categorical scale.
    GradePackage {
        name: String,
        recommendation_codes: Vec<String>,
        expected_participants: usize,
        domains: Vec<DomainBallot>,
    },
}

/// A voting session, identified by a short random code that is generated once
/// and never reused.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub code: String,
    pub created_at: String,
    pub active: bool,
    pub private: bool,
    pub authorized_emails: Vec<String>,
    pub kind: SessionKind,
}

impl Session {
    /// Human-facing description: the recommendation text, or the package name.
    pub fn description(&self) -> &str {
        match &self.kind {
            SessionKind::Standard { round } => &round.recommendation_text,
            SessionKind::GradePackage { name, .. } => name,
        }
    }

    pub fn expected_participants(&self) -> usize {
        match &self.kind {
            SessionKind::Standard { round } => round.expected_participants,
            SessionKind::GradePackage { expected_participants, .. } => *expected_participants,
        }
    }

    /// Number of submissions received. For GRADE packages every domain shares
    /// one roster, so the first domain's ledger is authoritative.
    pub fn votes_received(&self) -> usize {
        match &self.kind {
            SessionKind::Standard { round } => round.votes.len(),
            SessionKind::GradePackage { domains, .. } => {
                domains.first().map_or(0, |d| d.votes.len())
            }
        }
    }

    /// Allowlist check. Public sessions authorize everyone; private sessions
    /// require an email that matches the allowlist case-insensitively.
    pub fn authorizes(&self, email: Option<&str>) -> bool {
        if !self.private {
            return true;
        }
        let Some(email) = email else { return false };
        let email = email.trim().to_lowercase();
        !email.is_empty()
            && self
                .authorized_emails
                .iter()
                .any(|allowed| allowed.trim().to_lowercase() == email)
    }
}

/// Timestamp format used everywhere a creation date is shown or exported.
pub fn timestamp_now() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
