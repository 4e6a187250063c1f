pub mod admin_handlers;
pub mod dashboard_handlers;
pub mod export_handlers;
pub mod qr_handlers;
pub mod register_handlers;
pub mod state_handlers;
pub mod vote_handlers;

use actix_web::web;

/// First value submitted under `name`, trimmed. Empty string when absent.
pub(crate) fn form_value<'a>(pairs: &'a [(String, String)], name: &str) -> &'a str {
    pairs
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.trim())
        .unwrap_or("")
}

/// Every value submitted under `name` (repeated checkbox fields).
pub(crate) fn form_values<'a>(pairs: &'a [(String, String)], name: &str) -> Vec<&'a str> {
    pairs
        .iter()
        .filter(|(k, _)| k == name)
        .map(|(_, v)| v.trim())
        .collect()
}

/// Route table, shared by the server binary and the integration tests.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(admin_handlers::root))
        .route("/admin", web::get().to(admin_handlers::home))
        // Session lifecycle
        .route("/sessions/new", web::get().to(admin_handlers::new_session_form))
        .route("/sessions", web::post().to(admin_handlers::create_session))
        .route("/sessions/{code}/finalize", web::post().to(admin_handlers::finalize))
        .route("/sessions/{code}/round", web::post().to(admin_handlers::new_round))
        // Per-session exports
        .route("/sessions/{code}/export.csv", web::get().to(export_handlers::session_csv))
        .route("/sessions/{code}/report.txt", web::get().to(export_handlers::session_report))
        .route("/sessions/{code}/qr.svg", web::get().to(qr_handlers::session_qr))
        // GRADE packages
        .route("/grade/new", web::get().to(admin_handlers::new_grade_form))
        .route("/grade", web::post().to(admin_handlers::create_grade))
        // Participant ballots
        .route("/vote/{code}", web::get().to(vote_handlers::ballot))
        .route("/vote/{code}", web::post().to(vote_handlers::submit))
        .route("/vote/{code}/grade", web::post().to(vote_handlers::submit_grade))
        // Live dashboard
        .route("/dashboard", web::get().to(dashboard_handlers::index))
        .route("/dashboard/{code}", web::get().to(dashboard_handlers::session))
        .route("/dashboard/{code}/metrics", web::get().to(dashboard_handlers::metrics))
        // Consolidated report
        .route("/reports/consolidated", web::get().to(export_handlers::consolidated_report))
        // Manual state export / import
        .route("/state", web::get().to(state_handlers::page))
        .route("/state/export", web::get().to(state_handlers::export))
        .route("/state/import", web::post().to(state_handlers::import))
        // Pre-registration
        .route("/register", web::get().to(register_handlers::links))
        .route("/register/conflict", web::get().to(register_handlers::conflict_form))
        .route("/register/conflict", web::post().to(register_handlers::conflict_submit))
        .route(
            "/register/confidentiality",
            web::get().to(register_handlers::confidentiality_form),
        )
        .route(
            "/register/confidentiality",
            web::post().to(register_handlers::confidentiality_submit),
        )
        .route("/register/conflicts.csv", web::get().to(register_handlers::conflicts_csv))
        .route("/register/agreements.csv", web::get().to(register_handlers::agreements_csv))
        .route("/register/clear", web::post().to(register_handlers::clear));
}
