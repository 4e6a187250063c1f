use serde::Deserialize;

/// Form input for creating a standard recommendation session.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSessionForm {
    #[serde(default)]
    pub round_label: String,
    pub recommendation_text: String,
    pub scale: String,
    pub expected_participants: usize,
    #[serde(default)]
    pub private: Option<String>,
    #[serde(default)]
    pub authorized_emails: String,
}

/// Form input for a standard-session vote.
#[derive(Debug, Clone, Deserialize)]
pub struct VoteForm {
    pub display_name: String,
    #[serde(default)]
    pub email: String,
    pub vote: String,
    #[serde(default)]
    pub comment: String,
}

/// Form input for starting a new round on a session.
#[derive(Debug, Clone, Deserialize)]
pub struct NewRoundForm {
    #[serde(default)]
    pub revised_text: String,
}

/// Form input for importing a previously exported state blob.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportStateForm {
    pub state: String,
}

/// Confidentiality agreement form.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfidentialityForm {
    pub name: String,
    #[serde(default)]
    pub accept_confidentiality: Option<String>,
    #[serde(default)]
    pub accept_no_authorship: Option<String>,
}

/// Split a comma- or newline-separated allowlist into trimmed entries.
pub fn parse_email_list(raw: &str) -> Vec<String> {
    raw.replace('\n', ",")
        .split(',')
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_string)
        .collect()
}
