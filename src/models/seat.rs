use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Идентификатор места, однозначно выводится из пары (ряд, номер).
/// В JSON передаётся строкой вида `"4-2"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SeatId {
    pub row: u16,
    pub number: u16,
}

impl SeatId {
    pub fn new(row: u16, number: u16) -> Self {
        Self { row, number }
    }
}

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.row, self.number)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid seat id '{0}', expected '<row>-<number>'")]
pub struct ParseSeatIdError(pub String);

impl FromStr for SeatId {
    type Err = ParseSeatIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (row, number) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| ParseSeatIdError(s.to_string()))?;
        let row = row.parse().map_err(|_| ParseSeatIdError(s.to_string()))?;
        let number = number.parse().map_err(|_| ParseSeatIdError(s.to_string()))?;
        Ok(SeatId { row, number })
    }
}

impl TryFrom<String> for SeatId {
    type Error = ParseSeatIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SeatId> for String {
    fn from(id: SeatId) -> Self {
        id.to_string()
    }
}

/// Ценовая категория места.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatClass {
    Regular,
    Vip,
}

impl fmt::Display for SeatClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeatClass::Regular => f.write_str("regular"),
            SeatClass::Vip => f.write_str("vip"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub id: SeatId,
    pub row: u16,
    pub number: u16,
    pub class: SeatClass,
    pub available: bool,
}

impl Seat {
    pub fn new(row: u16, number: u16, class: SeatClass, available: bool) -> Self {
        Self {
            id: SeatId::new(row, number),
            row,
            number,
            class,
            available,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seat_id_parses_row_and_number() {
        assert_eq!("4-2".parse::<SeatId>().unwrap(), SeatId::new(4, 2));
        assert_eq!(" 12-6 ".parse::<SeatId>().unwrap(), SeatId::new(12, 6));
    }

    #[test]
    fn seat_id_rejects_garbage() {
        assert!("42".parse::<SeatId>().is_err());
        assert!("a-1".parse::<SeatId>().is_err());
        assert!("1-".parse::<SeatId>().is_err());
    }

    #[test]
    fn seat_serializes_id_as_string() {
        let seat = Seat::new(1, 3, SeatClass::Vip, true);
        let json = serde_json::to_value(seat).unwrap();
        assert_eq!(json["id"], "1-3");
        assert_eq!(json["class"], "vip");

        let back: Seat = serde_json::from_value(json).unwrap();
        assert_eq!(back, seat);
    }
}
