use serde::Serialize;

use crate::models::{Seat, SeatId};
use crate::services::catalog::SeatCatalog;

/// Результат переключения места.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleOutcome {
    Selected,
    Deselected,
    /// Место занято или не существует: выбор не меняется.
    Ignored,
}

/// Выбор мест пользователя в пределах одного сеанса.
///
/// Порядок выбора сохраняется, чтобы сводка при оплате совпадала с тем,
/// как пользователь выбирал места.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionState {
    catalog: SeatCatalog,
    picked: Vec<SeatId>,
}

impl SelectionState {
    pub fn new(catalog: SeatCatalog) -> Self {
        SelectionState {
            catalog,
            picked: Vec::new(),
        }
    }

    pub fn catalog(&self) -> &SeatCatalog {
        &self.catalog
    }

    pub fn toggle(&mut self, seat_id: SeatId) -> ToggleOutcome {
        if let Some(pos) = self.picked.iter().position(|id| *id == seat_id) {
            self.picked.remove(pos);
            return ToggleOutcome::Deselected;
        }

        match self.catalog.get(seat_id) {
            Some(seat) if seat.available => {
                self.picked.push(seat_id);
                ToggleOutcome::Selected
            }
            _ => ToggleOutcome::Ignored,
        }
    }

    pub fn clear(&mut self) {
        self.picked.clear();
    }

    /// Подменяет снимок каталога (например, после обновления доступности).
    /// Уже выбранные места остаются выбранными, пропадают только те,
    /// которых нет в новом каталоге.
    pub fn refresh_catalog(&mut self, catalog: SeatCatalog) {
        self.picked.retain(|id| catalog.get(*id).is_some());
        self.catalog = catalog;
    }

    /// Выбранные места в порядке выбора.
    pub fn seats(&self) -> Vec<Seat> {
        self.picked
            .iter()
            .filter_map(|id| self.catalog.get(*id).copied())
            .collect()
    }

    pub fn selected_ids(&self) -> &[SeatId] {
        &self.picked
    }

    pub fn contains(&self, seat_id: SeatId) -> bool {
        self.picked.contains(&seat_id)
    }

    pub fn len(&self) -> usize {
        self.picked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.picked.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::catalog::{generate, AllAvailable, SeatLayout, UnavailableSeats};
    use proptest::prelude::*;

    fn catalog_with_taken(taken: &[SeatId]) -> SeatCatalog {
        let mut source = UnavailableSeats::new(taken.iter().copied());
        generate(&SeatLayout::reference(), &mut source).unwrap()
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut selection = SelectionState::new(catalog_with_taken(&[]));
        let seat = SeatId::new(2, 4);

        assert_eq!(selection.toggle(seat), ToggleOutcome::Selected);
        assert!(selection.contains(seat));
        assert_eq!(selection.toggle(seat), ToggleOutcome::Deselected);
        assert!(selection.is_empty());
    }

    #[test]
    fn unavailable_seat_is_ignored() {
        let taken = SeatId::new(1, 1);
        let mut selection = SelectionState::new(catalog_with_taken(&[taken]));

        assert_eq!(selection.toggle(taken), ToggleOutcome::Ignored);
        assert!(selection.is_empty());
    }

    #[test]
    fn unknown_seat_is_ignored() {
        let mut selection = SelectionState::new(catalog_with_taken(&[]));
        assert_eq!(selection.toggle(SeatId::new(99, 1)), ToggleOutcome::Ignored);
        assert_eq!(selection.toggle(SeatId::new(12, 7)), ToggleOutcome::Ignored);
        assert!(selection.is_empty());
    }

    #[test]
    fn seats_keep_picking_order() {
        let mut selection = SelectionState::new(catalog_with_taken(&[]));
        for id in [SeatId::new(5, 1), SeatId::new(1, 8), SeatId::new(3, 3)] {
            selection.toggle(id);
        }
        let order: Vec<SeatId> = selection.seats().iter().map(|s| s.id).collect();
        assert_eq!(order, vec![SeatId::new(5, 1), SeatId::new(1, 8), SeatId::new(3, 3)]);
    }

    #[test]
    fn clear_empties_selection() {
        let mut selection = SelectionState::new(catalog_with_taken(&[]));
        selection.toggle(SeatId::new(1, 1));
        selection.toggle(SeatId::new(1, 2));
        selection.clear();
        assert!(selection.is_empty());
        assert!(selection.seats().is_empty());
    }

    #[test]
    fn refresh_keeps_selected_seat_that_became_unavailable() {
        let seat = SeatId::new(1, 1);
        let mut selection = SelectionState::new(catalog_with_taken(&[]));
        selection.toggle(seat);

        selection.refresh_catalog(catalog_with_taken(&[seat, SeatId::new(1, 2)]));

        // Повторно выбрать уже занятое место нельзя, текущий выбор не трогаем.
        assert_eq!(selection.toggle(SeatId::new(1, 2)), ToggleOutcome::Ignored);
        assert_eq!(selection.selected_ids(), &[seat]);
    }

    #[test]
    fn refresh_drops_seats_missing_from_new_catalog() {
        let mut selection = SelectionState::new(catalog_with_taken(&[]));
        selection.toggle(SeatId::new(14, 6));
        selection.toggle(SeatId::new(1, 1));

        let small = SeatLayout {
            rows: 2,
            ..SeatLayout::reference()
        };
        selection.refresh_catalog(generate(&small, &mut AllAvailable).unwrap());
        assert_eq!(selection.selected_ids(), &[SeatId::new(1, 1)]);
    }

    fn seat_ids() -> impl Strategy<Value = SeatId> {
        (1u16..=16, 1u16..=9).prop_map(|(row, number)| SeatId::new(row, number))
    }

    proptest! {
        #[test]
        fn double_toggle_is_identity(
            taken in proptest::collection::vec(seat_ids(), 0..30),
            history in proptest::collection::vec(seat_ids(), 0..20),
            probe in seat_ids(),
        ) {
            let mut selection = SelectionState::new(catalog_with_taken(&taken));
            for id in history {
                selection.toggle(id);
            }
            let before: Vec<SeatId> = {
                let mut ids = selection.selected_ids().to_vec();
                ids.sort();
                ids
            };

            selection.toggle(probe);
            selection.toggle(probe);

            let mut after = selection.selected_ids().to_vec();
            after.sort();
            prop_assert_eq!(before, after);
        }

        #[test]
        fn selection_stays_within_available_seats(
            taken in proptest::collection::vec(seat_ids(), 0..40),
            history in proptest::collection::vec(seat_ids(), 0..60),
        ) {
            let mut selection = SelectionState::new(catalog_with_taken(&taken));
            for id in history {
                let before = selection.selected_ids().to_vec();
                let outcome = selection.toggle(id);
                if taken.contains(&id) {
                    prop_assert_eq!(outcome, ToggleOutcome::Ignored);
                    prop_assert_eq!(selection.selected_ids(), &before[..]);
                }
            }
            for seat in selection.seats() {
                prop_assert!(seat.available);
            }
        }
    }
}
