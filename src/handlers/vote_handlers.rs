use std::collections::HashMap;

use actix_web::{web, HttpResponse};

use crate::errors::{render, AppError};
use crate::handlers::form_value;
use crate::models::forms::VoteForm;
use crate::models::session::{Scale, SessionKind, VoteValue};
use crate::store::SessionStore;
use crate::templates_structs::{
    BallotGradeTemplate, BallotStandardTemplate, DomainView, MessageTemplate,
    RecommendationLine, VoteThanksTemplate,
};

fn refused() -> Result<HttpResponse, AppError> {
    // Unknown code, failed allowlist check, and bad values all land here:
    // the sentinel is deliberately shared so the response does not reveal
    // which check failed.
    render(MessageTemplate {
        title: "Vote not recorded".to_string(),
        message: "The vote could not be recorded.".to_string(),
    })
}

/// GET /vote/{code} — the ballot page for either session kind.
pub async fn ballot(
    store: web::Data<SessionStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let code = path.into_inner();
    let state = store.get(&code).ok_or(AppError::NotFound)?;
    let session = state.session;

    match session.kind {
        SessionKind::Standard { round } => render(BallotStandardTemplate {
            code: session.code,
            description: round.recommendation_text.clone(),
            round_number: round.round_number,
            likert: round.scale == Scale::Likert,
            private: session.private,
        }),
        SessionKind::GradePackage {
            name,
            recommendation_codes,
            domains,
            ..
        } => {
            let recommendations = recommendation_codes
                .iter()
                .filter_map(|rec_code| {
                    store.get(rec_code).map(|rec| RecommendationLine {
                        code: rec_code.clone(),
                        description: rec.session.description().to_string(),
                    })
                })
                .collect();
            render(BallotGradeTemplate {
                code: session.code,
                name,
                recommendations,
                domains: domains
                    .into_iter()
                    .map(|d| DomainView {
                        key: d.key,
                        question: d.question,
                        options: d.options,
                    })
                    .collect(),
                private: session.private,
            })
        }
    }
}

/// POST /vote/{code} — record a standard-session vote. Resubmitting under the
/// same name updates the earlier vote instead of adding a second one.
pub async fn submit(
    store: web::Data<SessionStore>,
    path: web::Path<String>,
    form: web::Form<VoteForm>,
) -> Result<HttpResponse, AppError> {
    let code = path.into_inner();
    let form = form.into_inner();

    let display_name = form.display_name.trim();
    if display_name.is_empty() {
        return render(MessageTemplate {
            title: "Name required".to_string(),
            message: "Enter your name to continue.".to_string(),
        });
    }

    // The value is parsed against the session's declared scale.
    let Some(state) = store.get(&code) else {
        return refused();
    };
    let SessionKind::Standard { round } = &state.session.kind else {
        return refused();
    };
    let value = match round.scale {
        Scale::Likert => match form.vote.trim().parse::<u8>() {
            Ok(score) => VoteValue::Score(score),
            Err(_) => return refused(),
        },
        Scale::YesNo => VoteValue::Label(form.vote.trim().to_string()),
    };

    let email = form.email.trim();
    let email = (!email.is_empty()).then_some(email);
    match store.record_vote(&code, display_name, value, form.comment.trim(), email) {
        Some(participant_id) => render(VoteThanksTemplate { participant_id }),
        None => refused(),
    }
}

/// POST /vote/{code}/grade — record a full GRADE submission, one value and
/// optional comment per domain. One submission per display name.
pub async fn submit_grade(
    store: web::Data<SessionStore>,
    path: web::Path<String>,
    form: web::Form<Vec<(String, String)>>,
) -> Result<HttpResponse, AppError> {
    let code = path.into_inner();
    let pairs = form.into_inner();

    let display_name = form_value(&pairs, "display_name").to_string();
    if display_name.is_empty() {
        return render(MessageTemplate {
            title: "Name required".to_string(),
            message: "Enter your name to continue.".to_string(),
        });
    }

    let Some(state) = store.get(&code) else {
        return refused();
    };
    let SessionKind::GradePackage { domains, .. } = &state.session.kind else {
        return refused();
    };

    if domains
        .first()
        .is_some_and(|d| d.votes.iter().any(|v| v.display_name == display_name))
    {
        return render(MessageTemplate {
            title: "Already registered".to_string(),
            message: "Your participation has already been registered.".to_string(),
        });
    }

    let mut entries = HashMap::new();
    for domain in domains {
        let value = form_value(&pairs, &format!("vote_{}", domain.key));
        if value.is_empty() {
            return render(MessageTemplate {
                title: "Incomplete submission".to_string(),
                message: "Answer every domain before submitting.".to_string(),
            });
        }
        let comment = form_value(&pairs, &format!("comment_{}", domain.key));
        entries.insert(
            domain.key.clone(),
            (VoteValue::Label(value.to_string()), comment.to_string()),
        );
    }

    let email = form_value(&pairs, "email");
    let email = (!email.is_empty()).then_some(email);
    match store.record_grade_votes(&code, &display_name, &entries, email) {
        Some(participant_id) => render(VoteThanksTemplate { participant_id }),
        None => refused(),
    }
}
