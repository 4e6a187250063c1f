use askama::Template;

/// One row in the session tables on the admin home and dashboard index.
pub struct SessionListItem {
    pub code: String,
    pub description: String,
    pub kind_label: String,
    pub votes_received: usize,
    pub expected_participants: usize,
    pub active: bool,
}

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub sessions: Vec<SessionListItem>,
}

#[derive(Template)]
#[template(path = "session_new.html")]
pub struct SessionNewTemplate {
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "session_created.html")]
pub struct SessionCreatedTemplate {
    pub code: String,
    pub description: String,
    pub join_url: String,
}

/// One eligible recommendation on the GRADE package creation page.
pub struct EligibleItem {
    pub code: String,
    pub description: String,
    pub votes_received: usize,
    /// Preformatted percentage, e.g. "83.3".
    pub agreement_pct: String,
}

#[derive(Template)]
#[template(path = "grade_new.html")]
pub struct GradeNewTemplate {
    pub eligible: Vec<EligibleItem>,
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "ballot_standard.html")]
pub struct BallotStandardTemplate {
    pub code: String,
    pub description: String,
    pub round_number: u32,
    pub likert: bool,
    pub private: bool,
}

/// One recommendation listed at the top of a GRADE ballot.
pub struct RecommendationLine {
    pub code: String,
    pub description: String,
}

/// One GRADE domain as rendered on the ballot.
pub struct DomainView {
    pub key: String,
    pub question: String,
    pub options: Vec<String>,
}

#[derive(Template)]
#[template(path = "ballot_grade.html")]
pub struct BallotGradeTemplate {
    pub code: String,
    pub name: String,
    pub recommendations: Vec<RecommendationLine>,
    pub domains: Vec<DomainView>,
    pub private: bool,
}

#[derive(Template)]
#[template(path = "vote_thanks.html")]
pub struct VoteThanksTemplate {
    pub participant_id: String,
}

/// Generic notice page: vote failures, already-voted notices, import results.
#[derive(Template)]
#[template(path = "message.html")]
pub struct MessageTemplate {
    pub title: String,
    pub message: String,
}

#[derive(Template)]
#[template(path = "dashboard_index.html")]
pub struct DashboardIndexTemplate {
    pub sessions: Vec<SessionListItem>,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub code: String,
    pub description: String,
}

#[derive(Template)]
#[template(path = "state.html")]
pub struct StateTemplate {
    pub message: Option<String>,
}

#[derive(Template)]
#[template(path = "register_links.html")]
pub struct RegisterLinksTemplate {
    pub conflict_url: String,
    pub confidentiality_url: String,
    pub conflict_count: usize,
    pub agreement_count: usize,
}

#[derive(Template)]
#[template(path = "register_conflict.html")]
pub struct RegisterConflictTemplate {
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "register_confidentiality.html")]
pub struct RegisterConfidentialityTemplate {
    pub errors: Vec<String>,
}
