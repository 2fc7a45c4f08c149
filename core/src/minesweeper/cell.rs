use serde::{Deserialize, Serialize};

use crate::*;

/// Number of adjacent mines, or the mine itself.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    None,
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Mine,
}

impl CellState {
    const COUNTS: [Self; 9] = [
        Self::None,
        Self::One,
        Self::Two,
        Self::Three,
        Self::Four,
        Self::Five,
        Self::Six,
        Self::Seven,
        Self::Eight,
    ];

    /// Counts above eight saturate.
    pub const fn from_count(count: u8) -> Self {
        if count as usize >= Self::COUNTS.len() {
            Self::Eight
        } else {
            Self::COUNTS[count as usize]
        }
    }

    pub const fn count(self) -> Option<u8> {
        match self {
            Self::Mine => None,
            other => Some(other as u8),
        }
    }

    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    position: Coord2,
    state: CellState,
    opened: bool,
    flagged: bool,
    mine_certain: bool,
}

impl Cell {
    pub const fn state(&self) -> CellState {
        self.state
    }

    pub const fn is_mine(&self) -> bool {
        self.state.is_mine()
    }

    pub const fn is_opened(&self) -> bool {
        self.opened
    }

    pub const fn is_flagged(&self) -> bool {
        self.flagged
    }

    /// A certain flag marks a proven mine and can no longer be removed.
    pub const fn is_mine_certain(&self) -> bool {
        self.mine_certain
    }

    pub(crate) fn bury(&mut self) {
        self.state = CellState::Mine;
    }

    pub(crate) fn set_count(&mut self, mines: u8) {
        if !self.is_mine() {
            self.state = CellState::from_count(mines);
        }
    }

    pub(crate) fn open(&mut self) {
        self.flagged = false;
        self.opened = true;
    }

    pub(crate) fn toggle_flag(&mut self) -> bool {
        if self.flagged && self.mine_certain {
            return false;
        }
        self.flagged = !self.flagged;
        true
    }

    pub(crate) fn flag_certain(&mut self) {
        self.flagged = true;
        self.mine_certain = true;
    }
}

impl GridCell for Cell {
    fn at(position: Coord2) -> Self {
        Self {
            position,
            state: CellState::None,
            opened: false,
            flagged: false,
            mine_certain: false,
        }
    }

    fn position(&self) -> Coord2 {
        self.position
    }

    fn reset(&mut self) {
        *self = Self::at(self.position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_map_both_ways() {
        for count in 0..=8 {
            assert_eq!(CellState::from_count(count).count(), Some(count));
        }
        assert_eq!(CellState::from_count(9), CellState::Eight);
        assert_eq!(CellState::Mine.count(), None);
    }

    #[test]
    fn opening_removes_flag() {
        let mut cell = Cell::at((0, 0));
        cell.toggle_flag();
        cell.open();

        assert!(cell.is_opened());
        assert!(!cell.is_flagged());
    }

    #[test]
    fn certain_flag_stays() {
        let mut cell = Cell::at((0, 0));
        cell.flag_certain();

        assert!(!cell.toggle_flag());
        assert!(cell.is_flagged());
    }

    #[test]
    fn mine_keeps_state_on_recount() {
        let mut cell = Cell::at((1, 1));
        cell.bury();
        cell.set_count(3);

        assert!(cell.is_mine());
    }
}
