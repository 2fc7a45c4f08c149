use serde::{Deserialize, Serialize};

use super::Stone;

/// Who is to move.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    #[default]
    Human,
    Opponent,
}

impl Side {
    pub const fn other(self) -> Self {
        match self {
            Self::Human => Self::Opponent,
            Self::Opponent => Self::Human,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub color: Stone,
    /// Whether this player placed a stone on its last turn instead of passing.
    pub placed_last_turn: bool,
}

impl Player {
    pub const fn new(color: Stone) -> Self {
        Self {
            color,
            placed_last_turn: false,
        }
    }
}
