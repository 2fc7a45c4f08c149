use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::time::Duration;
use serde::{Deserialize, Serialize};

/// Session lifecycle shared by every game.
///
/// Games only use the subset they need: Life never leaves `Ready`/`Play`, Bingo never loses.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    #[default]
    Ready,
    Play,
    Clear,
    GameOver,
}

impl GameState {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Play)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Clear | Self::GameOver)
    }

    /// Transitions the games perform themselves. Anything else is still allowed.
    pub const fn is_usual_transition(self, next: Self) -> bool {
        use GameState::*;
        matches!(
            (self, next),
            (Ready, Play) | (Play, Clear) | (Play, GameOver) | (_, Ready)
        )
    }
}

/// Logs a transition, noting the ones no game performs on its own.
pub(crate) fn log_transition(game: &str, from: GameState, to: GameState) {
    if from.is_usual_transition(to) {
        log::debug!("{game}: {from:?} -> {to:?}");
    } else {
        log::debug!("{game}: unusual transition {from:?} -> {to:?}");
    }
}

/// FIFO of notifications for the display layer.
#[derive(Clone, Debug, PartialEq)]
pub struct EventQueue<E> {
    events: VecDeque<E>,
}

impl<E> EventQueue<E> {
    pub const fn new() -> Self {
        Self {
            events: VecDeque::new(),
        }
    }

    pub fn push(&mut self, event: E) {
        self.events.push_back(event);
    }

    pub fn drain(&mut self) -> Vec<E> {
        self.events.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// One running session of a grid game.
///
/// Setting the state runs the entry handler of the new state immediately, there is no deferred
/// transition. Time only moves through [`Game::tick`].
pub trait Game {
    type Settings;
    type Event;

    fn settings(&self) -> &Self::Settings;

    fn state(&self) -> GameState;

    fn set_state(&mut self, state: GameState);

    fn tick(&mut self, delta: Duration);

    fn drain_events(&mut self) -> Vec<Self::Event>;

    fn start(&mut self) {
        self.set_state(GameState::Play);
    }

    fn restart(&mut self) {
        self.set_state(GameState::Ready);
    }
}
