//! Minesweeper with lives, coins and a countdown.

use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::time::Duration;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::*;

pub use cell::*;
pub use message::*;

mod cell;
mod message;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub columns: Coord,
    pub rows: Coord,
    pub mine_count: usize,
    /// Coins paid for every safe cell, cascade opens included.
    pub safe_open_reward: i32,
    /// Extra coins per safe open made since the last mine hit.
    pub consecutive_bonus: i32,
    pub coin_bonus_multiplier: i32,
    pub time_bonus_multiplier: f32,
    /// Countdown in seconds.
    pub time_limit: VariableSpec<f32>,
    pub lives: VariableSpec<i32>,
    pub coins: VariableSpec<i32>,
    pub detector_cost: VariableSpec<i32>,
    pub extra_life_cost: VariableSpec<i32>,
    pub message_secs: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            columns: 9,
            rows: 9,
            mine_count: 5,
            safe_open_reward: 100,
            consecutive_bonus: 10,
            coin_bonus_multiplier: 2,
            time_bonus_multiplier: 0.5,
            time_limit: VariableSpec::at_least(120.0, 0.0),
            lives: VariableSpec::at_least(3, 0),
            coins: VariableSpec::at_least(0, 0),
            detector_cost: VariableSpec::unbounded(300),
            extra_life_cost: VariableSpec::unbounded(500),
            message_secs: 3.0,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Event {
    StateEntered(GameState),
    Opened { position: Coord2, state: CellState },
    FlagChanged { position: Coord2, flagged: bool },
    MoodChanged(Mood),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OpenOutcome {
    NoChange,
    Opened,
    HitMine,
    Won,
}

impl OpenOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Changed)
    }
}

/// Session values shown to the player.
#[derive(Debug)]
pub struct Wallet {
    pub coins: GameVariable<i32>,
    pub lives: GameVariable<i32>,
    pub detector_cost: GameVariable<i32>,
    pub extra_life_cost: GameVariable<i32>,
    pub remaining_time: GameVariable<f32>,
    pub coin_bonus: GameVariable<i32>,
    pub time_bonus: GameVariable<i32>,
    pub score: GameVariable<i32>,
}

impl Wallet {
    fn new(settings: &Settings) -> Self {
        let zero = VariableSpec::unbounded(0);
        Self {
            coins: GameVariable::new("coins", settings.coins),
            lives: GameVariable::new("lives", settings.lives),
            detector_cost: GameVariable::new("detector_cost", settings.detector_cost),
            extra_life_cost: GameVariable::new("extra_life_cost", settings.extra_life_cost),
            remaining_time: GameVariable::new("remaining_time", settings.time_limit),
            coin_bonus: GameVariable::new("coin_bonus", zero),
            time_bonus: GameVariable::new("time_bonus", zero),
            score: GameVariable::new("score", zero),
        }
    }

    fn integers_mut(&mut self) -> [&mut GameVariable<i32>; 7] {
        [
            &mut self.coins,
            &mut self.lives,
            &mut self.detector_cost,
            &mut self.extra_life_cost,
            &mut self.coin_bonus,
            &mut self.time_bonus,
            &mut self.score,
        ]
    }

    fn init(&mut self) {
        for variable in self.integers_mut() {
            variable.init();
        }
        self.remaining_time.init();
    }
}

#[derive(Debug)]
pub struct Minesweeper {
    settings: Settings,
    state: GameState,
    grid: Grid<Cell>,
    wallet: Wallet,
    consecutive_opens: i32,
    message: Message,
    rng: SmallRng,
    events: EventQueue<Event>,
    setup_error: Option<GameError>,
}

impl Minesweeper {
    /// Creates a session and enters `Ready`.
    pub fn new(settings: Settings, seed: u64) -> Self {
        let mut game = Self {
            grid: Grid::new(settings.columns, settings.rows),
            wallet: Wallet::new(&settings),
            consecutive_opens: 0,
            message: Message::new(seconds(settings.message_secs)),
            settings,
            state: GameState::Ready,
            rng: SmallRng::seed_from_u64(seed),
            events: EventQueue::new(),
            setup_error: None,
        };
        game.set_state(GameState::Ready);
        game
    }

    pub fn grid(&self) -> &Grid<Cell> {
        &self.grid
    }

    pub fn cell(&self, coords: Coord2) -> Option<&Cell> {
        self.grid.get(coords)
    }

    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    pub fn mood(&self) -> Mood {
        self.message.mood()
    }

    pub fn consecutive_opens(&self) -> i32 {
        self.consecutive_opens
    }

    pub fn mine_count(&self) -> usize {
        self.grid.count(Cell::is_mine)
    }

    pub fn setup_error(&self) -> Option<GameError> {
        self.setup_error
    }

    /// Registers `handler` on every integer session value.
    pub fn on_variable_set(&mut self, handler: impl FnMut(&'static str, i32) + Clone + 'static) {
        for variable in self.wallet.integers_mut() {
            variable.on_set(handler.clone());
        }
    }

    pub fn on_time_set(&mut self, handler: impl FnMut(&'static str, f32) + 'static) {
        self.wallet.remaining_time.on_set(handler);
    }

    pub fn accepts_click(&self) -> bool {
        self.state.is_playing()
    }

    /// Replaces the random layout with mines at exactly `mines`. Only allowed while `Ready`.
    pub fn bury_at(&mut self, mines: &[Coord2]) -> Result<()> {
        for &coords in mines {
            self.grid.validate_coords(coords)?;
        }
        if !self.state.is_ready() {
            return Err(GameError::NotReady);
        }

        self.grid.init();
        for &coords in mines {
            self.grid[coords].bury();
        }
        self.count_adjacent_mines();
        Ok(())
    }

    /// Left click.
    pub fn open(&mut self, coords: Coord2) -> OpenOutcome {
        if !self.accepts_click() {
            return OpenOutcome::NoChange;
        }
        let Some(cell) = self.grid.get(coords) else {
            return OpenOutcome::NoChange;
        };
        if cell.is_flagged() || cell.is_opened() {
            return OpenOutcome::NoChange;
        }

        if !cell.is_mine() {
            self.set_mood(Mood::Obtaining);
        }
        self.reveal_from(coords)
    }

    /// Right click.
    pub fn toggle_flag(&mut self, coords: Coord2) -> MarkOutcome {
        if !self.accepts_click() {
            return MarkOutcome::NoChange;
        }
        let Some(cell) = self.grid.get_mut(coords) else {
            return MarkOutcome::NoChange;
        };
        if cell.is_opened() || !cell.toggle_flag() {
            return MarkOutcome::NoChange;
        }

        let flagged = cell.is_flagged();
        self.events.push(Event::FlagChanged {
            position: coords,
            flagged,
        });
        MarkOutcome::Changed
    }

    pub fn can_afford_detector(&self) -> bool {
        self.can_afford(self.wallet.detector_cost.get())
    }

    pub fn can_afford_extra_life(&self) -> bool {
        self.can_afford(self.wallet.extra_life_cost.get())
    }

    /// Flags one hidden, unflagged mine as certain. Nothing is charged when there is none.
    pub fn detect_mine(&mut self) -> Option<Coord2> {
        if !self.can_afford_detector() {
            return None;
        }

        let candidates: Vec<Coord2> = self
            .grid
            .iter()
            .filter(|cell| cell.is_mine() && !cell.is_opened() && !cell.is_flagged())
            .map(|cell| cell.position())
            .collect();
        if candidates.is_empty() {
            return None;
        }

        let target = candidates[self.rng.random_range(0..candidates.len())];
        self.flag_certain(target);
        let cost = self.wallet.detector_cost.get();
        self.wallet.coins.update(|coins| coins - cost);
        log::debug!("Minesweeper: detector found mine at {target:?}");
        Some(target)
    }

    pub fn buy_life(&mut self) -> bool {
        if !self.can_afford_extra_life() {
            return false;
        }

        self.wallet.lives.update(|lives| lives + 1);
        let cost = self.wallet.extra_life_cost.get();
        self.wallet.coins.update(|coins| coins - cost);
        true
    }

    fn can_afford(&self, cost: i32) -> bool {
        self.state.is_playing() && self.wallet.coins.get() >= cost
    }

    /// Opens `origin` and cascades through mine-free neighborhoods.
    fn reveal_from(&mut self, origin: Coord2) -> OpenOutcome {
        let mut frontier = VecDeque::from([origin]);
        let mut outcome = OpenOutcome::NoChange;

        while let Some(coords) = frontier.pop_front() {
            let cell = &mut self.grid[coords];
            if cell.is_opened() {
                continue;
            }
            cell.open();
            let state = cell.state();
            self.events.push(Event::Opened {
                position: coords,
                state,
            });

            if state.is_mine() {
                return self.hit_mine(coords);
            }

            self.pay_safe_open();
            if self.all_safe_cells_opened() {
                self.set_state(GameState::Clear);
                return OpenOutcome::Won;
            }
            outcome = OpenOutcome::Opened;

            match state {
                CellState::None => {
                    for pos in self.grid.neighbor_positions(coords) {
                        let neighbor = &self.grid[pos];
                        if !neighbor.is_opened() && !neighbor.is_mine() {
                            log::trace!("Minesweeper: cascade to {pos:?}");
                            frontier.push_back(pos);
                        }
                    }
                }
                CellState::Eight => {
                    for pos in self.grid.neighbor_positions(coords) {
                        self.flag_certain(pos);
                    }
                }
                _ => {}
            }
        }

        outcome
    }

    fn pay_safe_open(&mut self) {
        let reward =
            self.settings.safe_open_reward + self.settings.consecutive_bonus * self.consecutive_opens;
        self.wallet.coins.update(|coins| coins + reward);
        self.consecutive_opens += 1;
    }

    fn hit_mine(&mut self, coords: Coord2) -> OpenOutcome {
        log::debug!("Minesweeper: mine hit at {coords:?}");
        self.set_mood(Mood::Damage);
        let lives = self.wallet.lives.update(|lives| lives - 1);
        self.consecutive_opens = 0;
        if lives <= 0 {
            self.set_state(GameState::GameOver);
        }
        OpenOutcome::HitMine
    }

    /// Opened cells are never flagged.
    fn flag_certain(&mut self, coords: Coord2) {
        if let Some(cell) = self.grid.get_mut(coords).filter(|cell| !cell.is_opened()) {
            cell.flag_certain();
            self.events.push(Event::FlagChanged {
                position: coords,
                flagged: true,
            });
        }
    }

    fn set_mood(&mut self, mood: Mood) {
        self.message.show(mood);
        self.events.push(Event::MoodChanged(mood));
    }

    fn all_safe_cells_opened(&self) -> bool {
        self.grid.iter().all(|cell| cell.is_opened() || cell.is_mine())
    }

    fn on_ready(&mut self) {
        self.setup_error = None;
        self.grid.init();
        if let Err(error) = self.bury_mines() {
            log::error!("Minesweeper: cannot bury mines: {error}");
            self.setup_error = Some(error);
        }
        self.count_adjacent_mines();
        self.wallet.init();
        self.consecutive_opens = 0;
        self.message.reset();
    }

    /// At least one cell has to stay safe.
    fn bury_mines(&mut self) -> Result<()> {
        let total = usize::from(self.grid.total_cells());
        let requested = self.settings.mine_count;
        if requested >= total {
            return Err(GameError::TooManyMarked {
                requested,
                capacity: total.saturating_sub(1),
            });
        }

        let mask = random_bool_mask(&mut self.rng, total, requested)?;
        for (cell, is_mine) in self.grid.iter_mut().zip(mask) {
            if is_mine {
                cell.bury();
            }
        }
        Ok(())
    }

    fn count_adjacent_mines(&mut self) {
        for coords in self.grid.positions() {
            let mines = self
                .grid
                .neighbors(coords)
                .iter()
                .filter(|cell| cell.is_mine())
                .count();
            self.grid[coords].set_count(mines as u8);
        }
    }

    fn open_all_silently(&mut self) {
        self.grid.iter_mut().for_each(Cell::open);
    }

    fn settle_score(&mut self) {
        let coin_bonus = self.wallet.coins.get() * self.settings.coin_bonus_multiplier;
        // remaining time never goes below zero, so truncation floors
        let time_bonus =
            (self.wallet.remaining_time.get() * self.settings.time_bonus_multiplier) as i32;

        self.wallet.coin_bonus.set(coin_bonus);
        self.wallet.time_bonus.set(time_bonus);
        let score = self.wallet.score.set(coin_bonus + time_bonus);
        log::debug!("Minesweeper: cleared with score {score}");
    }
}

impl Game for Minesweeper {
    type Settings = Settings;
    type Event = Event;

    fn settings(&self) -> &Settings {
        &self.settings
    }

    fn state(&self) -> GameState {
        self.state
    }

    fn set_state(&mut self, state: GameState) {
        log_transition("Minesweeper", self.state, state);
        self.state = state;
        self.events.push(Event::StateEntered(state));
        match state {
            GameState::Ready => self.on_ready(),
            GameState::Play => {}
            GameState::Clear => {
                self.open_all_silently();
                self.settle_score();
            }
            GameState::GameOver => self.open_all_silently(),
        }
    }

    fn tick(&mut self, delta: Duration) {
        if !self.state.is_playing() {
            return;
        }

        if self.message.tick(delta) {
            self.events.push(Event::MoodChanged(Mood::Normal));
        }
        let remaining = self
            .wallet
            .remaining_time
            .update(|time| time - delta.as_secs_f32());
        if remaining <= 0.0 {
            log::debug!("Minesweeper: time is up");
            self.set_state(GameState::GameOver);
        }
    }

    fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain()
    }
}
