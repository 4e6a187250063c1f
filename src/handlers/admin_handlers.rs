use actix_web::{web, HttpResponse};

use crate::config::AppConfig;
use crate::consensus;
use crate::errors::{render, AppError};
use crate::handlers::{form_value, form_values};
use crate::models::forms::{parse_email_list, CreateSessionForm, NewRoundForm};
use crate::models::session::{Scale, SessionKind};
use crate::store::{SessionState, SessionStore, GRADE_MIN_VOTES};
use crate::templates_structs::{
    EligibleItem, GradeNewTemplate, HomeTemplate, SessionCreatedTemplate, SessionListItem,
    SessionNewTemplate,
};

pub async fn root() -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header(("Location", "/admin"))
        .finish()
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let head: String = text.chars().take(max).collect();
        format!("{head}…")
    }
}

pub(crate) fn list_item(state: &SessionState) -> SessionListItem {
    let session = &state.session;
    let kind_label = match &session.kind {
        SessionKind::Standard { round } => format!("Round {}", round.round_number),
        SessionKind::GradePackage { .. } => "GRADE package".to_string(),
    };
    SessionListItem {
        code: session.code.clone(),
        description: truncate(session.description(), 60),
        kind_label,
        votes_received: session.votes_received(),
        expected_participants: session.expected_participants(),
        active: session.active,
    }
}

/// GET /admin — session overview and entry points to every admin action.
pub async fn home(store: web::Data<SessionStore>) -> Result<HttpResponse, AppError> {
    let sessions = store.all().iter().map(list_item).collect();
    render(HomeTemplate { sessions })
}

/// GET /sessions/new
pub async fn new_session_form() -> Result<HttpResponse, AppError> {
    render(SessionNewTemplate { errors: vec![] })
}

/// POST /sessions — create a standard recommendation session.
pub async fn create_session(
    store: web::Data<SessionStore>,
    config: web::Data<AppConfig>,
    form: web::Form<CreateSessionForm>,
) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();
    let mut errors = vec![];

    let text = form.recommendation_text.trim();
    if text.is_empty() {
        errors.push("The recommendation text is required".to_string());
    }
    let scale = match Scale::from_form_value(&form.scale) {
        Some(scale) => scale,
        None => {
            errors.push("Unknown voting scale".to_string());
            Scale::Likert
        }
    };
    if form.expected_participants < 1 {
        errors.push("The expected participant count must be at least 1".to_string());
    }
    let private = form.private.is_some();
    let emails = parse_email_list(&form.authorized_emails);
    if private && emails.is_empty() {
        errors.push("A private session needs at least one authorized email".to_string());
    }
    if !errors.is_empty() {
        return render(SessionNewTemplate { errors });
    }

    let round_label = form.round_label.trim();
    let description = if round_label.is_empty() {
        text.to_string()
    } else {
        format!("{text} ({round_label})")
    };
    let code = store.create_standard(
        description.clone(),
        scale,
        form.expected_participants,
        private,
        if private { emails } else { Vec::new() },
    );
    log::info!("created session {code}");

    render(SessionCreatedTemplate {
        join_url: config.join_url(&code),
        code,
        description,
    })
}

/// POST /sessions/{code}/finalize — mark the session inactive and freeze a
/// final snapshot into history.
pub async fn finalize(
    store: web::Data<SessionStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let code = path.into_inner();
    store.finalize(&code).ok_or(AppError::NotFound)?;
    log::info!("finalized session {code}");
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", "/admin"))
        .finish())
}

/// POST /sessions/{code}/round — freeze the live round and start the next.
pub async fn new_round(
    store: web::Data<SessionStore>,
    path: web::Path<String>,
    form: web::Form<NewRoundForm>,
) -> Result<HttpResponse, AppError> {
    let code = path.into_inner();
    let revised = form.revised_text.trim();
    let revised = (!revised.is_empty()).then_some(revised);
    let round = store
        .freeze_and_advance(&code, revised)
        .ok_or(AppError::NotFound)?;
    log::info!("session {code} advanced to round {round}");
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", format!("/dashboard/{code}")))
        .finish())
}

fn eligible_items(store: &SessionStore) -> Vec<EligibleItem> {
    store
        .grade_eligible()
        .iter()
        .map(|state| {
            let votes = match &state.session.kind {
                SessionKind::Standard { round } => round.votes.as_slice(),
                SessionKind::GradePackage { .. } => &[],
            };
            EligibleItem {
                code: state.session.code.clone(),
                description: truncate(state.session.description(), 60),
                votes_received: votes.len(),
                agreement_pct: format!("{:.1}", consensus::agreement_fraction(votes) * 100.0),
            }
        })
        .collect()
}

/// GET /grade/new — pick finalized recommendations for a GRADE package.
pub async fn new_grade_form(store: web::Data<SessionStore>) -> Result<HttpResponse, AppError> {
    render(GradeNewTemplate {
        eligible: eligible_items(&store),
        errors: vec![],
    })
}

/// POST /grade — create a GRADE package from selected recommendations.
/// The codes arrive as repeated checkbox fields, so the body is taken as raw
/// key/value pairs.
pub async fn create_grade(
    store: web::Data<SessionStore>,
    config: web::Data<AppConfig>,
    form: web::Form<Vec<(String, String)>>,
) -> Result<HttpResponse, AppError> {
    let pairs = form.into_inner();
    let mut errors = vec![];

    let codes: Vec<String> = form_values(&pairs, "codes")
        .into_iter()
        .map(str::to_string)
        .collect();
    if codes.is_empty() {
        errors.push("Select at least one recommendation".to_string());
    }
    let eligible = store.grade_eligible();
    for code in &codes {
        if !eligible.iter().any(|s| &s.session.code == code) {
            errors.push(format!("Recommendation {code} is not eligible"));
        }
    }
    let expected: usize = form_value(&pairs, "expected_participants").parse().unwrap_or(0);
    if expected < GRADE_MIN_VOTES {
        errors.push(format!(
            "A GRADE evaluation needs at least {GRADE_MIN_VOTES} evaluators"
        ));
    }
    if !errors.is_empty() {
        return render(GradeNewTemplate {
            eligible: eligible_items(&store),
            errors,
        });
    }

    let name = match form_value(&pairs, "name") {
        "" => "GRADE package".to_string(),
        name => name.to_string(),
    };
    let code = store.create_grade_package(name.clone(), codes, expected);
    log::info!("created GRADE package {code}");

    render(SessionCreatedTemplate {
        join_url: config.join_url(&code),
        code,
        description: name,
    })
}
