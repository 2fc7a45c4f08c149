use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Invalid range, minimum {min} is above maximum {max}")]
    InvalidRange { min: i32, max: i32 },
    #[error("Not enough candidates, requested {requested} but only {available} available")]
    InsufficientCandidates { requested: usize, available: usize },
    #[error("Too many marked cells, requested {requested} but only {capacity} fit")]
    TooManyMarked { requested: usize, capacity: usize },
    #[error("Grid storage has not been allocated yet")]
    GridNotAllocated,
    #[error("Only allowed before the game starts")]
    NotReady,
    #[error("A player needs a stone color")]
    InvalidColor,
}

pub type Result<T> = core::result::Result<T, GameError>;
