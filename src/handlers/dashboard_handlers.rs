use actix_web::{web, HttpResponse};

use crate::errors::{render, AppError};
use crate::handlers::admin_handlers::list_item;
use crate::models::metrics::SessionMetrics;
use crate::store::SessionStore;
use crate::templates_structs::{DashboardIndexTemplate, DashboardTemplate};

/// GET /dashboard — pick one of the active sessions.
pub async fn index(store: web::Data<SessionStore>) -> Result<HttpResponse, AppError> {
    let sessions = store
        .all()
        .iter()
        .filter(|s| s.session.active)
        .map(list_item)
        .collect();
    render(DashboardIndexTemplate { sessions })
}

/// GET /dashboard/{code} — the live dashboard page. The page itself is
/// static; a small script polls the metrics endpoint every 5 seconds.
pub async fn session(
    store: web::Data<SessionStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let code = path.into_inner();
    let state = store.get(&code).ok_or(AppError::NotFound)?;
    render(DashboardTemplate {
        code: state.session.code.clone(),
        description: state.session.description().to_string(),
    })
}

/// GET /dashboard/{code}/metrics — the live metrics payload.
pub async fn metrics(
    store: web::Data<SessionStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let code = path.into_inner();
    let state = store.get(&code).ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(SessionMetrics::from_state(&state)))
}
