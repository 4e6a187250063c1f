use actix_web::{web, HttpResponse};

use crate::errors::{render, AppError};
use crate::models::forms::ImportStateForm;
use crate::store::SessionStore;
use crate::templates_structs::StateTemplate;

/// GET /state — manual export/import page.
pub async fn page() -> Result<HttpResponse, AppError> {
    render(StateTemplate { message: None })
}

/// GET /state/export — the whole store as a JSON blob. Best-effort
/// persistence only; there is no schema version.
pub async fn export(store: web::Data<SessionStore>) -> Result<HttpResponse, AppError> {
    let blob = store.export_state()?;
    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .insert_header((
            "Content-Disposition",
            "attachment; filename=\"consensus_state.json\"",
        ))
        .body(blob))
}

/// POST /state/import — replace the store contents from a pasted blob.
/// A malformed blob is reported to the administrator, never silently dropped.
pub async fn import(
    store: web::Data<SessionStore>,
    form: web::Form<ImportStateForm>,
) -> Result<HttpResponse, AppError> {
    match store.import_state(&form.state) {
        Ok(count) => render(StateTemplate {
            message: Some(format!("State restored: {count} sessions")),
        }),
        Err(e) => {
            log::warn!("state import rejected: {e}");
            render(StateTemplate {
                message: Some("The state blob could not be parsed".to_string()),
            })
        }
    }
}
