use actix_web::{web, HttpResponse};

use crate::consensus;
use crate::errors::AppError;
use crate::models::session::{timestamp_now, DomainBallot, Round, Session, SessionKind};
use crate::store::{SessionState, SessionStore};

fn csv_bytes(wtr: csv::Writer<Vec<u8>>) -> Result<Vec<u8>, AppError> {
    wtr.into_inner().map_err(|e| AppError::Io(e.into_error()))
}

fn standard_csv(round: &Round) -> Result<Vec<u8>, AppError> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record([
        "Anonymous ID",
        "Name",
        "Recommendation",
        "Round",
        "Vote",
        "Comment",
        "Created",
    ])?;
    for vote in &round.votes {
        wtr.write_record(&[
            vote.participant_id.clone(),
            vote.display_name.clone(),
            round.recommendation_text.clone(),
            round.round_number.to_string(),
            vote.value.to_string(),
            vote.comment.clone(),
            round.created_at.clone(),
        ])?;
    }
    csv_bytes(wtr)
}

/// One row per participant, one vote column and one comment column per
/// domain. Every domain shares one roster, so rows are aligned by index.
fn grade_csv(session: &Session, domains: &[DomainBallot]) -> Result<Vec<u8>, AppError> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    let mut header = vec!["ID".to_string(), "Name".to_string(), "Date".to_string()];
    for domain in domains {
        header.push(domain.key.clone());
        header.push(format!("{}_comment", domain.key));
    }
    wtr.write_record(&header)?;

    if let Some(first) = domains.first() {
        for (i, anchor) in first.votes.iter().enumerate() {
            let mut row = vec![
                anchor.participant_id.clone(),
                anchor.display_name.clone(),
                session.created_at.clone(),
            ];
            for domain in domains {
                match domain.votes.get(i) {
                    Some(vote) => {
                        row.push(vote.value.to_string());
                        row.push(vote.comment.clone());
                    }
                    None => {
                        row.push(String::new());
                        row.push(String::new());
                    }
                }
            }
            wtr.write_record(&row)?;
        }
    }
    csv_bytes(wtr)
}

/// GET /sessions/{code}/export.csv
pub async fn session_csv(
    store: web::Data<SessionStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let code = path.into_inner();
    let state = store.get(&code).ok_or(AppError::NotFound)?;
    let bytes = match &state.session.kind {
        SessionKind::Standard { round } => standard_csv(round)?,
        SessionKind::GradePackage { domains, .. } => grade_csv(&state.session, domains)?,
    };
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"consensus_{code}.csv\""),
        ))
        .body(bytes))
}

fn standard_report(state: &SessionState, round: &Round) -> String {
    let summary = consensus::summarize(round);
    let mut lines = vec![
        format!("CONSENSUS REPORT — Session {}", state.session.code),
        format!("Generated: {}", timestamp_now()),
        String::new(),
        format!("Recommendation: {}", round.recommendation_text),
        format!("Current round: {}", round.round_number),
        format!(
            "Total votes: {}/{}",
            summary.votes_received, summary.expected_participants
        ),
        format!("Quorum: {}", summary.quorum),
        format!("Agreement: {:.1}%", summary.agreement * 100.0),
        format!(
            "Median (95% CI): {:.1} [{:.1}, {:.1}]",
            summary.median, summary.ci_low, summary.ci_high
        ),
        format!("Status: {}", summary.verdict.banner()),
        String::new(),
        "Comments:".to_string(),
    ];
    for vote in &round.votes {
        if !vote.comment.trim().is_empty() {
            lines.push(format!(
                "- {} (ID {}): \"{}\"",
                vote.display_name, vote.participant_id, vote.comment
            ));
        }
    }
    if !state.history.is_empty() {
        lines.push(String::new());
        lines.push("Previous rounds:".to_string());
        for past in &state.history {
            let agreement = consensus::agreement_fraction(&past.votes) * 100.0;
            let (median, _, _) = consensus::median_with_interval(&past.votes);
            lines.push(format!(
                "  * Round {} [{}]: agreement={agreement:.1}%, median={median:.1}",
                past.round_number, past.created_at
            ));
        }
    }
    lines.join("\n")
}

fn grade_report(state: &SessionState, domains: &[DomainBallot]) -> String {
    let session = &state.session;
    let mut lines = vec![
        format!("GRADE EVALUATION REPORT — Session {}", session.code),
        format!("Generated: {}", timestamp_now()),
        String::new(),
        format!("Package: {}", session.description()),
        format!(
            "Submissions: {}/{}",
            session.votes_received(),
            session.expected_participants()
        ),
        String::new(),
    ];
    for domain in domains {
        lines.push(domain.question.clone());
        for option in &domain.options {
            let count = domain
                .votes
                .iter()
                .filter(|v| v.value.to_string() == *option)
                .count();
            if count > 0 {
                lines.push(format!("  {option}: {count}"));
            }
        }
        lines.push(String::new());
    }
    lines.join("\n")
}

/// GET /sessions/{code}/report.txt — plain-text executive report.
pub async fn session_report(
    store: web::Data<SessionStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let code = path.into_inner();
    let state = store.get(&code).ok_or(AppError::NotFound)?;
    let report = match &state.session.kind {
        SessionKind::Standard { round } => standard_report(&state, round),
        SessionKind::GradePackage { domains, .. } => grade_report(&state, domains),
    };
    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"report_{code}.txt\""),
        ))
        .body(report))
}

fn consolidated_section(state: &SessionState) -> String {
    let session = &state.session;
    match &session.kind {
        SessionKind::Standard { round } => {
            let summary = consensus::summarize(round);
            format!(
                r#"<section class="recommendation">
    <h1>Recommendation {code}</h1>
    <p><strong>Description:</strong> {desc}</p>
    <p><strong>Created:</strong> {created}</p>
    <table>
        <tr><th>Total votes</th><th>Agreement</th><th>Median</th><th>95% CI</th></tr>
        <tr><td>{votes}</td><td>{pct:.1}%</td><td>{median:.1}</td><td>[{lo:.1}, {hi:.1}]</td></tr>
    </table>
    <p><strong>Consensus status:</strong> {status}</p>
</section>"#,
                code = session.code,
                desc = session.description(),
                created = session.created_at,
                votes = summary.votes_received,
                pct = summary.agreement * 100.0,
                median = summary.median,
                lo = summary.ci_low,
                hi = summary.ci_high,
                status = summary.verdict.banner(),
            )
        }
        SessionKind::GradePackage { recommendation_codes, .. } => format!(
            r#"<section class="recommendation">
    <h1>GRADE package {code}</h1>
    <p><strong>Name:</strong> {desc}</p>
    <p><strong>Created:</strong> {created}</p>
    <p><strong>Recommendations included:</strong> {recs}</p>
    <p><strong>Submissions:</strong> {votes}/{expected}</p>
</section>"#,
            code = session.code,
            desc = session.description(),
            created = session.created_at,
            recs = recommendation_codes.join(", "),
            votes = session.votes_received(),
            expected = session.expected_participants(),
        ),
    }
}

/// GET /reports/consolidated — print-friendly HTML document covering every
/// session, one page-break-separated block per recommendation.
pub async fn consolidated_report(
    store: web::Data<SessionStore>,
) -> Result<HttpResponse, AppError> {
    let sections = store
        .all()
        .iter()
        .map(consolidated_section)
        .collect::<Vec<_>>()
        .join("\n");

    let html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Consolidated consensus report</title>
    <style>
        body {{
            font-family: -apple-system, system-ui, 'Segoe UI', Roboto, sans-serif;
            line-height: 1.6;
            color: #333;
            background: #fff;
            max-width: 900px;
            margin: 0 auto;
            padding: 2rem;
        }}
        h1 {{ color: #662D91; border-bottom: 2px solid #F1592A; padding-bottom: 4px; }}
        table {{ border-collapse: collapse; margin: 1rem 0; }}
        th, td {{ border: 1px solid #999; padding: 6px 14px; text-align: center; }}
        th {{ background: #662D91; color: #fff; }}
        section.recommendation {{ page-break-after: always; }}
        @media print {{ body {{ padding: 0; }} }}
    </style>
</head>
<body>
<header>
    <p><strong>Expert consensus — consolidated report</strong> · generated {generated}</p>
</header>
{sections}
</body>
</html>"#,
        generated = timestamp_now(),
    );

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html))
}
