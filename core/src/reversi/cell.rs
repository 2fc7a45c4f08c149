use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stone {
    #[default]
    Empty,
    Black,
    White,
}

impl Stone {
    pub const fn opposite(self) -> Self {
        match self {
            Self::Empty => Self::Empty,
            Self::Black => Self::White,
            Self::White => Self::Black,
        }
    }

    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    position: Coord2,
    state: Stone,
    flippable: CellCount,
}

impl Cell {
    pub const fn state(&self) -> Stone {
        self.state
    }

    /// Stones this move would turn, counting the placed one, or zero when the current player
    /// cannot place here. Refreshed on every turn switch.
    pub const fn flippable(&self) -> CellCount {
        self.flippable
    }

    pub const fn is_placeable(&self) -> bool {
        self.flippable > 0
    }

    pub(crate) fn put(&mut self, stone: Stone) {
        self.state = stone;
    }

    pub(crate) fn turn_over(&mut self) {
        self.state = self.state.opposite();
    }

    pub(crate) fn set_flippable(&mut self, count: CellCount) {
        self.flippable = count;
    }
}

impl GridCell for Cell {
    fn at(position: Coord2) -> Self {
        Self {
            position,
            state: Stone::Empty,
            flippable: 0,
        }
    }

    fn position(&self) -> Coord2 {
        self.position
    }

    fn reset(&mut self) {
        self.state = Stone::Empty;
        self.flippable = 0;
    }
}
