use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::{seat::Seat, showtime::Showtime};

/// Снимок подтверждённого выбора мест, передаётся в оплату.
/// После создания не изменяется, поэтому поля закрыты и доступны только на чтение.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutOrder {
    order_id: Uuid,
    movie_id: u64,
    showtime: Showtime,
    seats: Vec<Seat>,
    total_price: u32,
    created_at: DateTime<Utc>,
}

impl CheckoutOrder {
    pub(crate) fn new(movie_id: u64, showtime: Showtime, seats: Vec<Seat>, total_price: u32) -> Self {
        Self {
            order_id: Uuid::new_v4(),
            movie_id,
            showtime,
            seats,
            total_price,
            created_at: Utc::now(),
        }
    }

    pub fn order_id(&self) -> Uuid {
        self.order_id
    }

    pub fn movie_id(&self) -> u64 {
        self.movie_id
    }

    pub fn showtime(&self) -> &Showtime {
        &self.showtime
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn total_price(&self) -> u32 {
        self.total_price
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
