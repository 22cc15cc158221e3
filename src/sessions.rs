use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::SeatingConfig;
use crate::models::{CheckoutOrder, Seat, SeatId, Showtime};
use crate::services::{
    catalog::{self, AllAvailable, ConfigurationError, RandomAvailability, SeatCatalog, SeatLayout},
    selection::ToggleOutcome,
    session::{BookingSession, SessionError, SessionPhase},
};

/// Откуда берётся доступность мест для нового сеанса.
#[derive(Debug, Clone, PartialEq)]
pub enum AvailabilityPolicy {
    /// Все места свободны.
    AllAvailable,
    /// Псевдослучайно. С `seed` схема сеанса воспроизводима для пары
    /// (сеанс, номер обновления), в том числе между версиями компилятора.
    Random { ratio: f64, seed: Option<u64> },
}

/// Снимок сессии для ответа клиенту.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub movie_id: u64,
    pub showtime: Showtime,
    pub phase: SessionPhase,
    pub seats: Vec<Seat>,
    pub selected: Vec<Seat>,
    pub total_price: u32,
}

/// Хранилище сессий выбора мест в памяти процесса.
/// Каждая сессия владеет своим выбором, общих данных между сессиями нет.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, BookingSession>>>,
    layout: SeatLayout,
    availability: AvailabilityPolicy,
}

impl SessionStore {
    pub fn new(layout: SeatLayout, availability: AvailabilityPolicy) -> Result<Self, ConfigurationError> {
        // Ошибки раскладки должны всплыть до показа первого места.
        layout.validate()?;
        if let AvailabilityPolicy::Random { ratio, .. } = &availability {
            if !(0.0..=1.0).contains(ratio) {
                return Err(ConfigurationError::InvalidAvailabilityRatio(*ratio));
            }
        }
        Ok(Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            layout,
            availability,
        })
    }

    pub fn from_config(config: &SeatingConfig) -> Result<Self, ConfigurationError> {
        Self::new(
            config.layout(),
            AvailabilityPolicy::Random {
                ratio: config.availability_ratio,
                seed: config.availability_seed,
            },
        )
    }

    /// Схема зала для сеанса. `generation` - номер обновления доступности,
    /// 0 для только что открытого сеанса.
    pub fn catalog_for(
        &self,
        showtime: &Showtime,
        generation: u64,
    ) -> Result<SeatCatalog, ConfigurationError> {
        match &self.availability {
            AvailabilityPolicy::AllAvailable => catalog::generate(&self.layout, &mut AllAvailable),
            AvailabilityPolicy::Random { ratio, seed: Some(seed) } => {
                let seed = showtime_seed(*seed, showtime, generation);
                let mut source = RandomAvailability::seeded(seed, *ratio)?;
                catalog::generate(&self.layout, &mut source)
            }
            AvailabilityPolicy::Random { ratio, seed: None } => {
                let mut source = RandomAvailability::from_entropy(*ratio)?;
                catalog::generate(&self.layout, &mut source)
            }
        }
    }

    pub async fn open(&self, movie_id: u64, showtime: Showtime) -> Result<SessionView, SessionError> {
        let catalog = self.catalog_for(&showtime, 0)?;
        let session = BookingSession::open(movie_id, showtime, catalog);
        let session_id = Uuid::new_v4();
        let view = view_of(session_id, &session)?;

        self.sessions.write().await.insert(session_id, session);
        info!("Booking session {} opened for movie {}", session_id, movie_id);
        Ok(view)
    }

    pub async fn get(&self, session_id: Uuid) -> Result<SessionView, SessionError> {
        let sessions = self.sessions.read().await;
        let session = sessions.get(&session_id).ok_or(SessionError::NotFound)?;
        view_of(session_id, session)
    }

    pub async fn change_showtime(
        &self,
        session_id: Uuid,
        showtime: Showtime,
    ) -> Result<SessionView, SessionError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&session_id).ok_or(SessionError::NotFound)?;

        if session.showtime().same_screening(&showtime) {
            return view_of(session_id, session);
        }

        let catalog = self.catalog_for(&showtime, 0)?;
        session.change_showtime(showtime, catalog)?;
        debug!("Session {} switched showtime, selection cleared", session_id);
        view_of(session_id, session)
    }

    /// Перегенерирует доступность для текущего сеанса, выбор сохраняется.
    pub async fn refresh(&self, session_id: Uuid) -> Result<SessionView, SessionError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&session_id).ok_or(SessionError::NotFound)?;
        session.ensure_open()?;
        let catalog = self.catalog_for(session.showtime(), session.refreshes() + 1)?;
        session.refresh_catalog(catalog)?;
        view_of(session_id, session)
    }

    pub async fn toggle(
        &self,
        session_id: Uuid,
        seat_id: SeatId,
    ) -> Result<(ToggleOutcome, SessionView), SessionError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&session_id).ok_or(SessionError::NotFound)?;
        let outcome = session.toggle(seat_id)?;
        debug!("Session {} toggle {}: {:?}", session_id, seat_id, outcome);
        Ok((outcome, view_of(session_id, session)?))
    }

    pub async fn checkout(&self, session_id: Uuid) -> Result<CheckoutOrder, SessionError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&session_id).ok_or(SessionError::NotFound)?;
        session.checkout()
    }

    /// Забирает заказ на оплату под блокировкой записи, так что один заказ
    /// уходит в платёжную систему не более одного раза одновременно.
    pub async fn begin_payment(&self, session_id: Uuid) -> Result<CheckoutOrder, SessionError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&session_id).ok_or(SessionError::NotFound)?;
        session.begin_payment()
    }

    /// Итог оплаты: успех удаляет сессию, отказ возвращает заказ для повтора.
    pub async fn finish_payment(&self, session_id: Uuid, succeeded: bool) {
        let mut sessions = self.sessions.write().await;
        if succeeded {
            sessions.remove(&session_id);
            debug!("Booking session {} paid and discarded", session_id);
        } else if let Some(session) = sessions.get_mut(&session_id) {
            session.payment_declined();
        }
    }

    /// Удаляет сессии, не менявшиеся дольше `ttl`. Сессии с идущей оплатой не трогает.
    pub async fn evict_expired(&self, ttl: Duration) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| {
            session.is_paying() || now.saturating_duration_since(session.last_active()) < ttl
        });
        let evicted = before - sessions.len();
        if evicted > 0 {
            info!("Evicted {} abandoned booking sessions", evicted);
        }
        evicted
    }

    /// Удаляет сессию после оплаты или ухода пользователя.
    pub async fn remove(&self, session_id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&session_id).is_some();
        if removed {
            debug!("Booking session {} discarded", session_id);
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

fn view_of(session_id: Uuid, session: &BookingSession) -> Result<SessionView, SessionError> {
    Ok(SessionView {
        session_id,
        movie_id: session.movie_id(),
        showtime: session.showtime().clone(),
        phase: session.phase(),
        seats: session.selection().catalog().seats().to_vec(),
        selected: session.selected_seats(),
        total_price: session.total_price()?,
    })
}

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

fn fnv1a(hash: u64, bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .fold(hash, |hash, &byte| (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME))
}

// Отдельное зерно на каждый сеанс и каждое обновление. FNV-1a, а не
// DefaultHasher: алгоритм последнего не зафиксирован между версиями std.
fn showtime_seed(seed: u64, showtime: &Showtime, generation: u64) -> u64 {
    let mut hash = fnv1a(FNV_OFFSET_BASIS, &seed.to_le_bytes());
    hash = fnv1a(hash, &generation.to_le_bytes());
    for label in [&showtime.date, &showtime.time, &showtime.hall] {
        hash = fnv1a(hash, label.as_bytes());
        hash = fnv1a(hash, &[0xff]);
    }
    hash
}
