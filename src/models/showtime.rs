use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::seat::SeatClass;

/// Цена за место по категориям, в условных единицах.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceTable(BTreeMap<SeatClass, u32>);

impl PriceTable {
    pub fn new(regular: u32, vip: u32) -> Self {
        let mut prices = BTreeMap::new();
        prices.insert(SeatClass::Regular, regular);
        prices.insert(SeatClass::Vip, vip);
        PriceTable(prices)
    }

    pub fn empty() -> Self {
        PriceTable(BTreeMap::new())
    }

    pub fn with_price(mut self, class: SeatClass, price: u32) -> Self {
        self.0.insert(class, price);
        self
    }

    pub fn unit_price(&self, class: SeatClass) -> Option<u32> {
        self.0.get(&class).copied()
    }
}

impl Default for PriceTable {
    fn default() -> Self {
        PriceTable::new(50, 150)
    }
}

/// Конкретный сеанс: дата, время и зал, плюс цены по категориям.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Showtime {
    pub date: String,
    pub time: String,
    pub hall: String,
    pub price_per_class: PriceTable,
}

impl Showtime {
    pub fn new(
        date: impl Into<String>,
        time: impl Into<String>,
        hall: impl Into<String>,
        price_per_class: PriceTable,
    ) -> Self {
        Self {
            date: date.into(),
            time: time.into(),
            hall: hall.into(),
            price_per_class,
        }
    }

    /// Один и тот же сеанс, если совпадают дата, время и зал.
    pub fn same_screening(&self, other: &Showtime) -> bool {
        self.date == other.date && self.time == other.time && self.hall == other.hall
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_prices_match_reference_values() {
        let prices = PriceTable::default();
        assert_eq!(prices.unit_price(SeatClass::Regular), Some(50));
        assert_eq!(prices.unit_price(SeatClass::Vip), Some(150));
    }

    #[test]
    fn same_screening_ignores_prices() {
        let a = Showtime::new("5 Mar", "12:30", "Hall 1", PriceTable::default());
        let b = Showtime::new("5 Mar", "12:30", "Hall 1", PriceTable::new(10, 20));
        let c = Showtime::new("5 Mar", "13:30", "Hall 1", PriceTable::default());
        assert!(a.same_screening(&b));
        assert!(!a.same_screening(&c));
    }

    #[test]
    fn price_table_serializes_as_class_map() {
        let json = serde_json::to_value(PriceTable::default()).unwrap();
        assert_eq!(json, serde_json::json!({"regular": 50, "vip": 150}));
    }
}
