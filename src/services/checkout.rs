use serde::Serialize;
use thiserror::Error;

use crate::models::{CheckoutOrder, PriceTable, Showtime};
use crate::services::pricing::{sum_seats, PricingError};
use crate::services::selection::SelectionState;

/// Ожидаемые отказы при оформлении. Пользователь может их исправить.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    #[error("select at least one seat before checkout")]
    EmptySelection,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("checkout rejected: {0}")]
    Rejected(Rejection),
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Упаковывает выбор в неизменяемый заказ для оплаты.
/// С платёжной системой не общается.
pub fn finalize(
    movie_id: u64,
    showtime: &Showtime,
    selection: &SelectionState,
    prices: &PriceTable,
) -> Result<CheckoutOrder, CheckoutError> {
    if selection.is_empty() {
        return Err(CheckoutError::Rejected(Rejection::EmptySelection));
    }

    let seats = selection.seats();
    let total = sum_seats(&seats, prices)?;

    let order = CheckoutOrder::new(movie_id, showtime.clone(), seats, total);
    tracing::info!(
        "Checkout order {} created: movie={}, seats={}, total={}",
        order.order_id(),
        movie_id,
        order.seats().len(),
        total
    );
    Ok(order)
}
