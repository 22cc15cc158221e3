use serde::Serialize;

use crate::models::{PriceTable, Showtime};

/// Слот показа в расписании.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeSlot {
    pub time: String,
    pub hall: String,
    /// Цена "от", только для отображения на карточке слота.
    pub from_price: u32,
}

impl TimeSlot {
    pub fn new(time: &str, hall: &str, from_price: u32) -> Self {
        Self {
            time: time.to_string(),
            hall: hall.to_string(),
            from_price,
        }
    }

    /// Альтернативная цена в бонусах.
    pub fn bonus_points(&self) -> u32 {
        self.from_price * 50
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Schedule {
    dates: Vec<String>,
    slots: Vec<TimeSlot>,
    prices: PriceTable,
}

impl Schedule {
    pub fn new(dates: Vec<String>, slots: Vec<TimeSlot>, prices: PriceTable) -> Self {
        Self { dates, slots, prices }
    }

    pub fn reference(prices: PriceTable) -> Self {
        let dates = ["5 Mar", "6 Mar", "7 Mar", "8 Mar", "9 Mar"]
            .iter()
            .map(|d| d.to_string())
            .collect();
        let slots = vec![
            TimeSlot::new("12:30", "Cinetech + Hall 1", 50),
            TimeSlot::new("13:30", "Cinetech + Hall 1", 75),
            TimeSlot::new("15:00", "Cinetech + Hall 2", 60),
        ];
        Self::new(dates, slots, prices)
    }

    pub fn dates(&self) -> &[String] {
        &self.dates
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    /// Сеанс по дате и времени; зал берётся из слота.
    pub fn showtime(&self, date: &str, time: &str) -> Option<Showtime> {
        if !self.dates.iter().any(|d| d == date) {
            return None;
        }
        let slot = self.slots.iter().find(|s| s.time == time)?;
        Some(Showtime::new(date, time, slot.hall.clone(), self.prices.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn showtime_resolves_hall_from_slot() {
        let schedule = Schedule::reference(PriceTable::default());
        let show = schedule.showtime("7 Mar", "15:00").unwrap();
        assert_eq!(show.hall, "Cinetech + Hall 2");
        assert_eq!(show.price_per_class, PriceTable::default());
    }

    #[test]
    fn unknown_date_or_time_has_no_showtime() {
        let schedule = Schedule::reference(PriceTable::default());
        assert!(schedule.showtime("10 Mar", "12:30").is_none());
        assert!(schedule.showtime("5 Mar", "18:00").is_none());
    }

    #[test]
    fn bonus_points_are_fifty_per_price_unit() {
        assert_eq!(TimeSlot::new("13:30", "Hall", 75).bonus_points(), 3750);
    }
}
