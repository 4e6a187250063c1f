use actix_web::{web, HttpResponse};
use qrcode::render::svg;
use qrcode::{EcLevel, QrCode};

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::store::SessionStore;

/// GET /sessions/{code}/qr.svg — QR code for the session's join URL.
/// High error correction, same as a printed handout would want.
pub async fn session_qr(
    store: web::Data<SessionStore>,
    config: web::Data<AppConfig>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let code = path.into_inner();
    if store.get(&code).is_none() {
        return Err(AppError::NotFound);
    }
    let url = config.join_url(&code);
    let qr = QrCode::with_error_correction_level(url.as_bytes(), EcLevel::H)?;
    let image = qr
        .render::<svg::Color>()
        .min_dimensions(200, 200)
        .dark_color(svg::Color("#000000"))
        .light_color(svg::Color("#ffffff"))
        .build();
    Ok(HttpResponse::Ok()
        .content_type("image/svg+xml")
        .body(image))
}
