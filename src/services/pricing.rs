use thiserror::Error;

use crate::models::{PriceTable, Seat, SeatClass};
use crate::services::selection::SelectionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PricingError {
    #[error("no unit price configured for seat class '{0}'")]
    UnknownSeatClass(SeatClass),
    #[error("total price does not fit into u32")]
    Overflow,
}

/// Сумма цен по категориям для набора мест.
pub fn sum_seats<'a>(
    seats: impl IntoIterator<Item = &'a Seat>,
    prices: &PriceTable,
) -> Result<u32, PricingError> {
    seats.into_iter().try_fold(0u32, |total, seat| {
        let price = prices
            .unit_price(seat.class)
            .ok_or(PricingError::UnknownSeatClass(seat.class))?;
        total.checked_add(price).ok_or(PricingError::Overflow)
    })
}

/// Итоговая стоимость текущего выбора. Пересчитывается на каждое изменение.
pub fn total_price(
    selection: &SelectionState,
    prices: &PriceTable,
) -> Result<u32, PricingError> {
    sum_seats(&selection.seats(), prices)
}
