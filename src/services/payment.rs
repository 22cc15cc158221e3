//! payment.rs
//!
//! Платёжный шаг бронирования.
//!
//! Ключевые компоненты:
//! 1.  **PaymentCollaborator**: абстракция платёжной системы. Получает готовый
//!     `CheckoutOrder` и возвращает успех или отказ. Логика выбора мест и цен
//!     от неё не зависит, поэтому настоящий шлюз можно подставить без изменений ядра.
//! 2.  **MockPaymentGateway**: имитация оплаты. Ждёт заданную задержку
//!     (по умолчанию 2 секунды) и возвращает заранее настроенный результат.
//!     Никаких транзакций, списаний и идемпотентности.

use async_trait::async_trait;
use serde::Serialize;
use tokio::time::Duration;
use tracing::{info, warn};

use crate::{config::PaymentConfig, models::CheckoutOrder};

/// Результат оплаты. Частичного успеха нет.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PaymentOutcome {
    Succeeded,
    Failed { reason: String },
}

impl PaymentOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PaymentOutcome::Succeeded)
    }
}

#[async_trait]
pub trait PaymentCollaborator: Send + Sync {
    async fn submit(&self, order: &CheckoutOrder) -> PaymentOutcome;
}

/// Имитация платёжного шлюза.
#[derive(Debug, Clone)]
pub struct MockPaymentGateway {
    /// Сколько "обрабатывается" платёж.
    processing_delay: Duration,
    /// Возвращать отказ вместо успеха.
    simulate_failure: bool,
}

impl MockPaymentGateway {
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(2000);

    pub fn new(processing_delay: Duration, simulate_failure: bool) -> Self {
        Self {
            processing_delay,
            simulate_failure,
        }
    }

    pub fn from_config(config: &PaymentConfig) -> Self {
        Self::new(
            Duration::from_millis(config.processing_delay_ms),
            config.simulate_failure,
        )
    }
}

impl Default for MockPaymentGateway {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY, false)
    }
}

#[async_trait]
impl PaymentCollaborator for MockPaymentGateway {
    async fn submit(&self, order: &CheckoutOrder) -> PaymentOutcome {
        info!(
            "Processing mock payment for order {}: amount={}, seats={}",
            order.order_id(),
            order.total_price(),
            order.seats().len()
        );

        tokio::time::sleep(self.processing_delay).await;

        if self.simulate_failure {
            warn!("Mock payment for order {} declined", order.order_id());
            PaymentOutcome::Failed {
                reason: "payment declined by mock gateway".to_string(),
            }
        } else {
            info!("Mock payment for order {} succeeded", order.order_id());
            PaymentOutcome::Succeeded
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PriceTable, Seat, SeatClass, Showtime};
    use tokio::time::Instant;

    fn order() -> CheckoutOrder {
        CheckoutOrder::new(
            10,
            Showtime::new("6 Mar", "15:00", "Cinetech + Hall 2", PriceTable::default()),
            vec![Seat::new(4, 1, SeatClass::Regular, true)],
            50,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn mock_gateway_waits_two_seconds_then_succeeds() {
        let gateway = MockPaymentGateway::default();
        let started = Instant::now();

        let outcome = gateway.submit(&order()).await;

        assert_eq!(outcome, PaymentOutcome::Succeeded);
        assert!(started.elapsed() >= Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn mock_gateway_can_decline() {
        let gateway = MockPaymentGateway::new(Duration::from_millis(10), true);
        let outcome = gateway.submit(&order()).await;
        assert!(!outcome.is_success());
    }
}
