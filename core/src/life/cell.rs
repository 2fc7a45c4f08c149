use serde::{Deserialize, Serialize};

use crate::*;

/// What happened to a cell on the last step.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    None,
    Birth,
    Survival,
    Underpopulation,
    Overpopulation,
}

impl CellState {
    /// Alive-ness after this transition, `None` when the cell keeps what it had.
    pub const fn alive_after(self) -> Option<bool> {
        match self {
            Self::None => None,
            Self::Birth | Self::Survival => Some(true),
            Self::Underpopulation | Self::Overpopulation => Some(false),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    position: Coord2,
    state: CellState,
    alive: bool,
}

impl Cell {
    pub const fn state(&self) -> CellState {
        self.state
    }

    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    pub(crate) fn set_alive(&mut self, alive: bool) {
        self.alive = alive;
    }

    pub(crate) fn set_state(&mut self, state: CellState) {
        self.state = state;
    }

    pub(crate) fn apply_state(&mut self) {
        if let Some(alive) = self.state.alive_after() {
            self.alive = alive;
        }
    }
}

impl GridCell for Cell {
    fn at(position: Coord2) -> Self {
        Self {
            position,
            state: CellState::None,
            alive: false,
        }
    }

    fn position(&self) -> Coord2 {
        self.position
    }

    fn reset(&mut self) {
        self.state = CellState::None;
        self.alive = false;
    }
}
