use serde::Serialize;
use thiserror::Error;
use tokio::time::Instant;

use crate::models::{CheckoutOrder, Seat, SeatId, Showtime};
use crate::services::{
    catalog::{ConfigurationError, SeatCatalog},
    checkout::{self, CheckoutError},
    pricing::{self, PricingError},
    selection::{SelectionState, ToggleOutcome},
};

/// Фаза сеанса выбора мест.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Empty,
    Selecting,
    Ready,
    Finalized,
    Paying,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("booking session not found")]
    NotFound,
    #[error("booking session is already finalized")]
    AlreadyFinalized,
    #[error("booking session has no checkout order yet")]
    NotFinalized,
    #[error("payment for this booking session is already in progress")]
    PaymentInProgress,
    #[error("unknown showtime {date} {time}")]
    UnknownShowtime { date: String, time: String },
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Checkout(#[from] CheckoutError),
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Один просмотр сеанса: фильм, выбранный сеанс, схема зала и выбор мест.
/// Владеет выбором эксклюзивно.
#[derive(Debug, Clone)]
pub struct BookingSession {
    movie_id: u64,
    showtime: Showtime,
    selection: SelectionState,
    touched: bool,
    order: Option<CheckoutOrder>,
    paying: bool,
    refreshes: u64,
    last_active: Instant,
}

impl BookingSession {
    pub fn open(movie_id: u64, showtime: Showtime, catalog: SeatCatalog) -> Self {
        Self {
            movie_id,
            showtime,
            selection: SelectionState::new(catalog),
            touched: false,
            order: None,
            paying: false,
            refreshes: 0,
            last_active: Instant::now(),
        }
    }

    pub fn movie_id(&self) -> u64 {
        self.movie_id
    }

    pub fn showtime(&self) -> &Showtime {
        &self.showtime
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn order(&self) -> Option<&CheckoutOrder> {
        self.order.as_ref()
    }

    /// Сколько раз доступность перегенерировалась для текущего сеанса.
    pub fn refreshes(&self) -> u64 {
        self.refreshes
    }

    pub fn last_active(&self) -> Instant {
        self.last_active
    }

    pub fn is_paying(&self) -> bool {
        self.paying
    }

    fn touch(&mut self) {
        self.last_active = Instant::now();
    }

    pub fn phase(&self) -> SessionPhase {
        if self.paying {
            SessionPhase::Paying
        } else if self.order.is_some() {
            SessionPhase::Finalized
        } else if !self.selection.is_empty() {
            SessionPhase::Ready
        } else if self.touched {
            SessionPhase::Selecting
        } else {
            SessionPhase::Empty
        }
    }

    pub fn ensure_open(&self) -> Result<(), SessionError> {
        if self.order.is_some() {
            return Err(SessionError::AlreadyFinalized);
        }
        Ok(())
    }

    /// Смена даты/времени/зала. Выбор всегда сбрасывается: доступность
    /// и цены привязаны к сеансу.
    pub fn change_showtime(
        &mut self,
        showtime: Showtime,
        catalog: SeatCatalog,
    ) -> Result<(), SessionError> {
        self.ensure_open()?;
        self.showtime = showtime;
        self.selection = SelectionState::new(catalog);
        self.touched = false;
        self.refreshes = 0;
        self.touch();
        Ok(())
    }

    pub fn toggle(&mut self, seat_id: SeatId) -> Result<ToggleOutcome, SessionError> {
        self.ensure_open()?;
        self.touched = true;
        self.touch();
        Ok(self.selection.toggle(seat_id))
    }

    pub fn refresh_catalog(&mut self, catalog: SeatCatalog) -> Result<(), SessionError> {
        self.ensure_open()?;
        self.selection.refresh_catalog(catalog);
        self.refreshes += 1;
        self.touch();
        Ok(())
    }

    pub fn total_price(&self) -> Result<u32, PricingError> {
        pricing::total_price(&self.selection, &self.showtime.price_per_class)
    }

    /// Оформление заказа, один раз за сессию.
    pub fn checkout(&mut self) -> Result<CheckoutOrder, SessionError> {
        self.ensure_open()?;
        let order = checkout::finalize(
            self.movie_id,
            &self.showtime,
            &self.selection,
            &self.showtime.price_per_class,
        )?;
        self.order = Some(order.clone());
        self.touch();
        Ok(order)
    }

    /// Забирает заказ на оплату. Пока оплата идёт, второй вызов получает
    /// `PaymentInProgress`.
    pub fn begin_payment(&mut self) -> Result<CheckoutOrder, SessionError> {
        let order = self.order.clone().ok_or(SessionError::NotFinalized)?;
        if self.paying {
            return Err(SessionError::PaymentInProgress);
        }
        self.paying = true;
        self.touch();
        Ok(order)
    }

    /// Оплата отклонена: заказ снова доступен для повторной попытки.
    pub fn payment_declined(&mut self) {
        self.paying = false;
        self.touch();
    }

    pub fn selected_seats(&self) -> Vec<Seat> {
        self.selection.seats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PriceTable;
    use crate::services::catalog::{generate, AllAvailable, SeatLayout};
    use crate::services::checkout::Rejection;

    fn session() -> BookingSession {
        let catalog = generate(&SeatLayout::reference(), &mut AllAvailable).unwrap();
        BookingSession::open(
            42,
            Showtime::new("5 Mar", "12:30", "Cinetech + Hall 1", PriceTable::default()),
            catalog,
        )
    }

    #[test]
    fn phases_follow_selection() {
        let mut s = session();
        assert_eq!(s.phase(), SessionPhase::Empty);

        s.toggle(SeatId::new(2, 2)).unwrap();
        assert_eq!(s.phase(), SessionPhase::Ready);

        s.toggle(SeatId::new(2, 2)).unwrap();
        assert_eq!(s.phase(), SessionPhase::Selecting);

        s.toggle(SeatId::new(5, 5)).unwrap();
        s.checkout().unwrap();
        assert_eq!(s.phase(), SessionPhase::Finalized);
    }

    #[test]
    fn showtime_change_clears_selection() {
        let mut s = session();
        s.toggle(SeatId::new(1, 1)).unwrap();
        s.toggle(SeatId::new(7, 3)).unwrap();

        let next = Showtime::new("6 Mar", "12:30", "Cinetech + Hall 1", PriceTable::default());
        let catalog = generate(&SeatLayout::reference(), &mut AllAvailable).unwrap();
        s.change_showtime(next.clone(), catalog).unwrap();

        assert!(s.selection().is_empty());
        assert_eq!(s.phase(), SessionPhase::Empty);
        assert_eq!(s.showtime(), &next);
        assert_eq!(s.total_price().unwrap(), 0);
    }

    #[test]
    fn empty_checkout_is_rejected_and_session_stays_open() {
        let mut s = session();
        let err = s.checkout().unwrap_err();
        assert!(matches!(
            err,
            SessionError::Checkout(CheckoutError::Rejected(Rejection::EmptySelection))
        ));
        assert!(s.toggle(SeatId::new(1, 1)).is_ok());
    }

    #[test]
    fn finalized_session_is_terminal() {
        let mut s = session();
        s.toggle(SeatId::new(1, 1)).unwrap();
        let order = s.checkout().unwrap();
        assert_eq!(order.total_price(), 150);

        assert!(matches!(s.toggle(SeatId::new(1, 2)), Err(SessionError::AlreadyFinalized)));
        assert!(matches!(s.checkout(), Err(SessionError::AlreadyFinalized)));
        assert_eq!(s.order().map(|o| o.order_id()), Some(order.order_id()));
    }

    #[test]
    fn second_payment_waits_for_the_first() {
        let mut s = session();
        assert!(matches!(s.begin_payment(), Err(SessionError::NotFinalized)));

        s.toggle(SeatId::new(3, 3)).unwrap();
        let order = s.checkout().unwrap();

        assert_eq!(s.begin_payment().unwrap(), order);
        assert_eq!(s.phase(), SessionPhase::Paying);
        assert!(matches!(s.begin_payment(), Err(SessionError::PaymentInProgress)));
        assert!(matches!(s.toggle(SeatId::new(3, 4)), Err(SessionError::AlreadyFinalized)));

        s.payment_declined();
        assert_eq!(s.phase(), SessionPhase::Finalized);
        assert_eq!(s.begin_payment().unwrap(), order);
    }

    #[test]
    fn refresh_counter_restarts_on_showtime_change() {
        let mut s = session();
        let layout = SeatLayout::reference();
        s.refresh_catalog(generate(&layout, &mut AllAvailable).unwrap()).unwrap();
        s.refresh_catalog(generate(&layout, &mut AllAvailable).unwrap()).unwrap();
        assert_eq!(s.refreshes(), 2);

        let next = Showtime::new("7 Mar", "15:00", "Cinetech + Hall 2", PriceTable::default());
        s.change_showtime(next, generate(&layout, &mut AllAvailable).unwrap()).unwrap();
        assert_eq!(s.refreshes(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn mutations_mark_session_active() {
        let mut s = session();
        let opened = s.last_active();

        tokio::time::advance(std::time::Duration::from_secs(30)).await;
        s.toggle(SeatId::new(1, 1)).unwrap();
        assert_eq!(s.last_active() - opened, std::time::Duration::from_secs(30));
    }
}
