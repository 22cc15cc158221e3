use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use super::{json_rejection, session_error, to_api_error, validation_error, ApiResult};
use crate::{
    models::{SeatId, Showtime},
    services::session::SessionError,
    AppState,
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sessions", post(open_session))
        .route("/sessions/{session_id}", get(get_session).delete(abandon_session))
        .route("/sessions/{session_id}/showtime", patch(change_showtime))
        .route("/sessions/{session_id}/refresh", post(refresh_seats))
        .route("/sessions/{session_id}/seats/toggle", patch(toggle_seat))
        .route("/sessions/{session_id}/checkout", post(checkout))
        .route("/sessions/{session_id}/pay", post(pay))
}

/* ---------- helpers ---------- */

fn resolve_showtime(state: &AppState, date: &str, time: &str) -> Result<Showtime, SessionError> {
    state
        .schedule
        .showtime(date, time)
        .ok_or_else(|| SessionError::UnknownShowtime {
            date: date.to_string(),
            time: time.to_string(),
        })
}

/* ---------- SESSIONS ---------- */

// POST /api/sessions
#[derive(Debug, Deserialize, Validate)]
struct OpenSessionRequest {
    #[validate(range(min = 1))]
    movie_id: u64,
    #[validate(length(min = 1, max = 32))]
    date: String,
    #[validate(length(min = 1, max = 16))]
    time: String,
}

async fn open_session(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<OpenSessionRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = payload.map_err(json_rejection)?;
    req.validate().map_err(validation_error)?;

    let showtime = resolve_showtime(&state, &req.date, &req.time).map_err(session_error)?;
    let view = state
        .sessions
        .open(req.movie_id, showtime)
        .await
        .map_err(session_error)?;

    Ok((StatusCode::CREATED, Json(view)))
}

// GET /api/sessions/{session_id}
async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let view = state.sessions.get(session_id).await.map_err(session_error)?;
    Ok((StatusCode::OK, Json(view)))
}

// DELETE /api/sessions/{session_id}
async fn abandon_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    if state.sessions.remove(session_id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(session_error(SessionError::NotFound))
    }
}

// PATCH /api/sessions/{session_id}/showtime
#[derive(Debug, Deserialize, Validate)]
struct ChangeShowtimeRequest {
    #[validate(length(min = 1, max = 32))]
    date: String,
    #[validate(length(min = 1, max = 16))]
    time: String,
}

async fn change_showtime(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    payload: Result<Json<ChangeShowtimeRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = payload.map_err(json_rejection)?;
    req.validate().map_err(validation_error)?;

    let showtime = resolve_showtime(&state, &req.date, &req.time).map_err(session_error)?;
    let view = state
        .sessions
        .change_showtime(session_id, showtime)
        .await
        .map_err(session_error)?;

    Ok((StatusCode::OK, Json(view)))
}

// POST /api/sessions/{session_id}/refresh
async fn refresh_seats(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let view = state.sessions.refresh(session_id).await.map_err(session_error)?;
    Ok((StatusCode::OK, Json(view)))
}

// PATCH /api/sessions/{session_id}/seats/toggle
#[derive(Debug, Deserialize)]
struct ToggleSeatRequest {
    seat_id: SeatId,
}

async fn toggle_seat(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    payload: Result<Json<ToggleSeatRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = payload.map_err(json_rejection)?;
    let (outcome, view) = state
        .sessions
        .toggle(session_id, req.seat_id)
        .await
        .map_err(session_error)?;

    Ok((StatusCode::OK, Json(json!({
        "outcome": outcome,
        "session": view,
    }))))
}

// POST /api/sessions/{session_id}/checkout
async fn checkout(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let order = state.sessions.checkout(session_id).await.map_err(session_error)?;
    Ok((StatusCode::OK, Json(json!({
        "success": true,
        "order": order,
    }))))
}

// POST /api/sessions/{session_id}/pay
async fn pay(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    // Заказ помечается как оплачиваемый, повторный /pay получит 409
    let order = state.sessions.begin_payment(session_id).await.map_err(session_error)?;

    // Блокировку хранилища на время оплаты не держим
    let outcome = state.payment.submit(&order).await;
    state.sessions.finish_payment(session_id, outcome.is_success()).await;

    if outcome.is_success() {
        tracing::info!("Order {} paid, session {} closed", order.order_id(), session_id);
        Ok((StatusCode::OK, Json(json!({
            "success": true,
            "order_id": order.order_id(),
            "payment": outcome,
        }))))
    } else {
        tracing::warn!("Payment for order {} failed: {:?}", order.order_id(), outcome);
        Err(to_api_error(StatusCode::PAYMENT_REQUIRED, "Payment failed, please try again"))
    }
}
