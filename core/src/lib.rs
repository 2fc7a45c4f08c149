//! Rule engines for a family of grid minigames: Bingo, Game of Life, Minesweeper and Reversi.
//!
//! The shared pieces (grid storage, bounded session variables, random placement, tick-driven
//! timers and the session state machine) are re-exported at the crate root. Each game lives in its
//! own module and is driven through the [`Game`] trait.

#![no_std]

extern crate alloc;

pub use error::*;
pub use grid::*;
pub use random::*;
pub use state::*;
pub use timer::*;
pub use types::*;
pub use variable::*;

pub mod bingo;
pub mod life;
pub mod minesweeper;
pub mod reversi;

mod error;
mod grid;
mod random;
mod state;
mod timer;
mod types;
mod variable;
