//! catalog.rs
//!
//! Генерация схемы зала для сеанса.
//!
//! Раскладка (число рядов, мест в ряду, граница VIP-рядов) задаётся `SeatLayout`,
//! а доступность каждого места берётся из внедряемого `AvailabilitySource`.
//! Случайный источник нужен только для демо-режима; в тестах используются
//! детерминированные источники.

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

use crate::models::{Seat, SeatClass, SeatId};

/// Ошибки конфигурации схемы зала. Фатальны для построения каталога.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("seat layout must have at least one row")]
    NoRows,
    #[error("row {row} must have at least one seat")]
    EmptyRow { row: u16 },
    #[error("availability ratio must be within 0.0..=1.0, got {0}")]
    InvalidAvailabilityRatio(f64),
}

/// Правило "сколько мест в ряду" по номеру ряда.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SeatsPerRow {
    Uniform { seats: u16 },
    /// Первые `wide_rows` рядов широкие, остальные узкие.
    Tiered { wide_rows: u16, wide: u16, narrow: u16 },
}

impl SeatsPerRow {
    pub fn seats_in_row(&self, row: u16) -> u16 {
        match *self {
            SeatsPerRow::Uniform { seats } => seats,
            SeatsPerRow::Tiered { wide_rows, wide, narrow } => {
                if row <= wide_rows {
                    wide
                } else {
                    narrow
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeatLayout {
    pub rows: u16,
    pub seats_per_row: SeatsPerRow,
    /// Ряды `1..=vip_rows` считаются VIP.
    pub vip_rows: u16,
}

impl SeatLayout {
    /// 14 рядов: 1-10 по 8 мест, 11-14 по 6, первые три ряда VIP.
    pub fn reference() -> Self {
        SeatLayout {
            rows: 14,
            seats_per_row: SeatsPerRow::Tiered {
                wide_rows: 10,
                wide: 8,
                narrow: 6,
            },
            vip_rows: 3,
        }
    }

    pub fn class_for_row(&self, row: u16) -> SeatClass {
        if row <= self.vip_rows {
            SeatClass::Vip
        } else {
            SeatClass::Regular
        }
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.rows == 0 {
            return Err(ConfigurationError::NoRows);
        }
        for row in 1..=self.rows {
            if self.seats_per_row.seats_in_row(row) == 0 {
                return Err(ConfigurationError::EmptyRow { row });
            }
        }
        Ok(())
    }
}

/// Источник доступности мест для сеанса.
pub trait AvailabilitySource {
    fn is_available(&mut self, seat: SeatId) -> bool;
}

impl<F> AvailabilitySource for F
where
    F: FnMut(SeatId) -> bool,
{
    fn is_available(&mut self, seat: SeatId) -> bool {
        self(seat)
    }
}

/// Все места свободны.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllAvailable;

impl AvailabilitySource for AllAvailable {
    fn is_available(&mut self, _seat: SeatId) -> bool {
        true
    }
}

/// Явный список занятых мест, остальные свободны.
#[derive(Debug, Clone, Default)]
pub struct UnavailableSeats(HashSet<SeatId>);

impl UnavailableSeats {
    pub fn new(taken: impl IntoIterator<Item = SeatId>) -> Self {
        UnavailableSeats(taken.into_iter().collect())
    }
}

impl AvailabilitySource for UnavailableSeats {
    fn is_available(&mut self, seat: SeatId) -> bool {
        !self.0.contains(&seat)
    }
}

/// Псевдослучайная доступность (около 70% свободных мест по умолчанию).
/// Только для локального запуска и демо.
#[derive(Debug, Clone)]
pub struct RandomAvailability {
    rng: StdRng,
    ratio: f64,
}

impl RandomAvailability {
    pub const DEFAULT_RATIO: f64 = 0.7;

    pub fn seeded(seed: u64, ratio: f64) -> Result<Self, ConfigurationError> {
        Self::with_rng(StdRng::seed_from_u64(seed), ratio)
    }

    pub fn from_entropy(ratio: f64) -> Result<Self, ConfigurationError> {
        Self::with_rng(StdRng::from_entropy(), ratio)
    }

    fn with_rng(rng: StdRng, ratio: f64) -> Result<Self, ConfigurationError> {
        if !(0.0..=1.0).contains(&ratio) {
            return Err(ConfigurationError::InvalidAvailabilityRatio(ratio));
        }
        Ok(RandomAvailability { rng, ratio })
    }
}

impl AvailabilitySource for RandomAvailability {
    fn is_available(&mut self, _seat: SeatId) -> bool {
        self.rng.gen_bool(self.ratio)
    }
}

/// Снимок мест сеанса. Только для чтения.
#[derive(Debug, Clone, PartialEq)]
pub struct SeatCatalog {
    seats: Vec<Seat>,
    index: HashMap<SeatId, usize>,
}

impl SeatCatalog {
    /// Места в порядке: ряд, затем номер по возрастанию.
    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn get(&self, id: SeatId) -> Option<&Seat> {
        self.index.get(&id).map(|&i| &self.seats[i])
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn available_count(&self) -> usize {
        self.seats.iter().filter(|s| s.available).count()
    }
}

/// Строит полный каталог мест по раскладке.
pub fn generate(
    layout: &SeatLayout,
    availability: &mut impl AvailabilitySource,
) -> Result<SeatCatalog, ConfigurationError> {
    layout.validate()?;

    let mut seats = Vec::new();
    let mut index = HashMap::new();
    for row in 1..=layout.rows {
        let class = layout.class_for_row(row);
        for number in 1..=layout.seats_per_row.seats_in_row(row) {
            let id = SeatId::new(row, number);
            let available = availability.is_available(id);
            index.insert(id, seats.len());
            seats.push(Seat::new(row, number, class, available));
        }
    }

    tracing::debug!(
        "Generated seat catalog: {} seats, {} available",
        seats.len(),
        seats.iter().filter(|s| s.available).count()
    );

    Ok(SeatCatalog { seats, index })
}
