pub mod movies;
pub mod showtimes;
pub mod sessions;

use axum::{extract::rejection::JsonRejection, http::StatusCode, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use validator::ValidationErrors;

use crate::movie_client::CatalogError;
use crate::services::checkout::{CheckoutError, Rejection};
use crate::services::session::SessionError;

pub fn routes() -> Router<Arc<crate::AppState>> {
    Router::new()
        .merge(movies::routes())
        .merge(showtimes::routes())
        .merge(sessions::routes())
}

// --- Ответ с ошибкой ---
#[derive(Debug, Serialize)]
pub struct ApiError {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<Rejection>,
}

pub type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

pub fn to_api_error(status: StatusCode, message: &str) -> (StatusCode, Json<ApiError>) {
    (status, Json(ApiError { success: false, message: message.to_string(), reason: None }))
}

pub fn validation_error(errors: ValidationErrors) -> (StatusCode, Json<ApiError>) {
    to_api_error(StatusCode::BAD_REQUEST, &errors.to_string())
}

// Ошибки разбора тела запроса отдаём в том же формате, что и остальные.
pub fn json_rejection(rejection: JsonRejection) -> (StatusCode, Json<ApiError>) {
    to_api_error(rejection.status(), &rejection.body_text())
}

pub fn catalog_error(err: CatalogError) -> (StatusCode, Json<ApiError>) {
    tracing::error!("Movie service error: {:?}", err);
    match err {
        CatalogError::Status(404) => to_api_error(StatusCode::NOT_FOUND, "Movie not found"),
        _ => to_api_error(StatusCode::BAD_GATEWAY, "Movie service is unavailable, try again later"),
    }
}

pub fn session_error(err: SessionError) -> (StatusCode, Json<ApiError>) {
    match err {
        SessionError::NotFound => to_api_error(StatusCode::NOT_FOUND, &err.to_string()),
        SessionError::UnknownShowtime { .. } => to_api_error(StatusCode::BAD_REQUEST, &err.to_string()),
        SessionError::AlreadyFinalized
        | SessionError::NotFinalized
        | SessionError::PaymentInProgress => {
            to_api_error(StatusCode::CONFLICT, &err.to_string())
        }
        SessionError::Checkout(CheckoutError::Rejected(reason)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiError { success: false, message: reason.to_string(), reason: Some(reason) }),
        ),
        SessionError::Configuration(_)
        | SessionError::Pricing(_)
        | SessionError::Checkout(CheckoutError::Pricing(_)) => {
            tracing::error!("Booking session failure: {}", err);
            to_api_error(StatusCode::INTERNAL_SERVER_ERROR, "Seat map is misconfigured")
        }
    }
}
