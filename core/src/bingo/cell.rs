use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    /// Not drawn yet.
    #[default]
    Invalid,
    Valid,
    Free,
}

/// One square of a bingo card.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    position: Coord2,
    state: CellState,
    number: Option<i32>,
}

impl Cell {
    pub const fn state(&self) -> CellState {
        self.state
    }

    /// The printed number. The free cell and an unnumbered card have none.
    pub const fn number(&self) -> Option<i32> {
        self.number
    }

    pub const fn is_marked(&self) -> bool {
        !matches!(self.state, CellState::Invalid)
    }

    pub(crate) fn assign(&mut self, number: i32) {
        self.number = Some(number);
        self.state = CellState::Invalid;
    }

    pub(crate) fn set_free(&mut self) {
        self.number = None;
        self.state = CellState::Free;
    }

    /// Marks the cell if it still waits for `number`.
    pub(crate) fn punch(&mut self, number: i32) -> bool {
        if self.state == CellState::Invalid && self.number == Some(number) {
            self.state = CellState::Valid;
            true
        } else {
            false
        }
    }
}

impl GridCell for Cell {
    fn at(position: Coord2) -> Self {
        Self {
            position,
            state: CellState::Invalid,
            number: None,
        }
    }

    fn position(&self) -> Coord2 {
        self.position
    }

    fn reset(&mut self) {
        self.state = CellState::Invalid;
        self.number = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn punch_only_matches_waiting_number() {
        let mut cell = Cell::at((1, 2));
        cell.assign(17);

        assert!(!cell.punch(18));
        assert!(cell.punch(17));
        assert!(!cell.punch(17));
        assert_eq!(cell.state(), CellState::Valid);
    }

    #[test]
    fn free_cell_is_marked_and_unpunchable() {
        let mut cell = Cell::at((2, 2));
        cell.set_free();

        assert!(cell.is_marked());
        assert_eq!(cell.number(), None);
        assert!(!cell.punch(0));
    }

    #[test]
    fn reset_keeps_position() {
        let mut cell = Cell::at((4, 0));
        cell.assign(3);
        cell.punch(3);
        cell.reset();

        assert_eq!(cell, Cell::at((4, 0)));
    }
}
