use actix_web::{web, HttpResponse};

use crate::config::AppConfig;
use crate::errors::{render, AppError};
use crate::handlers::{form_value, form_values};
use crate::models::forms::ConfidentialityForm;
use crate::registry::PreRegistry;
use crate::templates_structs::{
    MessageTemplate, RegisterConfidentialityTemplate, RegisterConflictTemplate,
    RegisterLinksTemplate,
};

/// GET /register — links and QR targets to hand to participants before the
/// consensus exercise starts, plus the collected record counts.
pub async fn links(
    registry: web::Data<PreRegistry>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, AppError> {
    render(RegisterLinksTemplate {
        conflict_url: config.register_url("conflict"),
        confidentiality_url: config.register_url("confidentiality"),
        conflict_count: registry.conflicts().len(),
        agreement_count: registry.agreements().len(),
    })
}

/// GET /register/conflict
pub async fn conflict_form() -> Result<HttpResponse, AppError> {
    render(RegisterConflictTemplate { errors: vec![] })
}

/// POST /register/conflict — the activities arrive as repeated checkbox
/// fields, so the body is taken as raw key/value pairs.
pub async fn conflict_submit(
    registry: web::Data<PreRegistry>,
    form: web::Form<Vec<(String, String)>>,
) -> Result<HttpResponse, AppError> {
    let pairs = form.into_inner();
    let mut errors = vec![];

    let name = form_value(&pairs, "name");
    if name.is_empty() {
        errors.push("Your full name is required".to_string());
    }
    if form_value(&pairs, "confirm").is_empty() {
        errors.push("You must confirm that the information is accurate".to_string());
    }
    let has_conflict = form_value(&pairs, "has_conflict") == "yes";
    let detail = form_value(&pairs, "conflict_detail");
    if has_conflict && detail.is_empty() {
        errors.push("Describe the conflict briefly".to_string());
    }
    if !errors.is_empty() {
        return render(RegisterConflictTemplate { errors });
    }

    let activities = form_values(&pairs, "activities").join("; ");
    registry.add_conflict(
        name,
        form_value(&pairs, "institution"),
        form_value(&pairs, "role"),
        &activities,
        has_conflict,
        if has_conflict { detail } else { "" },
    );
    render(MessageTemplate {
        title: "Registration received".to_string(),
        message: "Your declaration was recorded. You can close this window.".to_string(),
    })
}

/// GET /register/confidentiality
pub async fn confidentiality_form() -> Result<HttpResponse, AppError> {
    render(RegisterConfidentialityTemplate { errors: vec![] })
}

/// POST /register/confidentiality
pub async fn confidentiality_submit(
    registry: web::Data<PreRegistry>,
    form: web::Form<ConfidentialityForm>,
) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();
    let mut errors = vec![];

    let name = form.name.trim();
    if name.is_empty() {
        errors.push("Your full name is required".to_string());
    }
    if form.accept_confidentiality.is_none() || form.accept_no_authorship.is_none() {
        errors.push("You must accept both conditions".to_string());
    }
    if !errors.is_empty() {
        return render(RegisterConfidentialityTemplate { errors });
    }

    registry.add_agreement(name);
    render(MessageTemplate {
        title: "Registration received".to_string(),
        message: "Your agreement was recorded. You can close this window.".to_string(),
    })
}

fn csv_attachment(bytes: Vec<u8>, filename: &str) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{filename}\""),
        ))
        .body(bytes)
}

/// GET /register/conflicts.csv
pub async fn conflicts_csv(registry: web::Data<PreRegistry>) -> Result<HttpResponse, AppError> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record([
        "ID",
        "Name",
        "Institution",
        "Role",
        "Activities",
        "Conflict",
        "Detail",
        "Submitted",
    ])?;
    for record in registry.conflicts() {
        wtr.write_record(&[
            record.id,
            record.name,
            record.institution,
            record.role,
            record.activities,
            if record.has_conflict { "Yes" } else { "No" }.to_string(),
            record.conflict_detail,
            record.submitted_at,
        ])?;
    }
    let bytes = wtr.into_inner().map_err(|e| AppError::Io(e.into_error()))?;
    Ok(csv_attachment(bytes, "conflicts.csv"))
}

/// GET /register/agreements.csv
pub async fn agreements_csv(registry: web::Data<PreRegistry>) -> Result<HttpResponse, AppError> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(["ID", "Name", "Accepted", "Submitted"])?;
    for record in registry.agreements() {
        wtr.write_record(&[
            record.id,
            record.name,
            if record.accepted { "Yes" } else { "No" }.to_string(),
            record.submitted_at,
        ])?;
    }
    let bytes = wtr.into_inner().map_err(|e| AppError::Io(e.into_error()))?;
    Ok(csv_attachment(bytes, "confidentiality.csv"))
}

/// POST /register/clear — drop every pre-registration record.
pub async fn clear(registry: web::Data<PreRegistry>) -> Result<HttpResponse, AppError> {
    registry.clear();
    log::info!("pre-registration records cleared");
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", "/register"))
        .finish())
}
