use axum::{extract::State, routing::get, Json, Router};
use serde_json::json;
use std::sync::Arc;

use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/showtimes", get(list_showtimes))
}

// GET /api/showtimes
async fn list_showtimes(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let slots: Vec<serde_json::Value> = state
        .schedule
        .slots()
        .iter()
        .map(|slot| {
            json!({
                "time": slot.time,
                "hall": slot.hall,
                "from_price": slot.from_price,
                "bonus_points": slot.bonus_points(),
            })
        })
        .collect();

    Json(json!({
        "success": true,
        "dates": state.schedule.dates(),
        "slots": slots,
        "prices": state.config.pricing.price_table(),
    }))
}
