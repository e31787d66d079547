use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::json;

use super::domain::{VendorId, VendorProfile};
use super::service::VerificationService;

/// Router builder exposing verification runs and the latest published result.
pub fn verification_router(service: Arc<VerificationService>) -> Router {
    Router::new()
        .route(
            "/api/v1/vendors/:vendor_id/verification",
            get(latest_handler).post(verify_handler),
        )
        .with_state(service)
}

pub(crate) async fn verify_handler(
    State(service): State<Arc<VerificationService>>,
    Path(vendor_id): Path<String>,
    axum::Json(profile): axum::Json<VendorProfile>,
) -> Response {
    let receipt = service.verify(VendorId(vendor_id), profile).await;
    (StatusCode::OK, axum::Json(receipt)).into_response()
}

pub(crate) async fn latest_handler(
    State(service): State<Arc<VerificationService>>,
    Path(vendor_id): Path<String>,
) -> Response {
    let id = VendorId(vendor_id);
    match service.latest(&id) {
        Some(verification) => (StatusCode::OK, axum::Json(verification)).into_response(),
        None => {
            let payload = json!({
                "error": format!("no verification published for vendor {}", id.0),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
    }
}
