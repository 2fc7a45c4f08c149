//! Game of Life with configurable thresholds.

use alloc::vec::Vec;
use core::time::Duration;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::*;

pub use cell::*;

mod cell;

/// Neighbor-count thresholds for one generation.
///
/// A live cell dies with at most `underpopulation` or at least `overpopulation` live neighbors and
/// survives in between. A dead cell comes alive with exactly `birth` live neighbors.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub birth: u8,
    pub underpopulation: u8,
    pub overpopulation: u8,
}

impl Rules {
    pub const fn next_state(&self, alive: bool, neighbors: u8) -> CellState {
        if alive {
            if neighbors <= self.underpopulation {
                CellState::Underpopulation
            } else if neighbors >= self.overpopulation {
                CellState::Overpopulation
            } else {
                CellState::Survival
            }
        } else if neighbors == self.birth {
            CellState::Birth
        } else {
            CellState::None
        }
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            birth: 3,
            underpopulation: 1,
            overpopulation: 4,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub columns: Coord,
    pub rows: Coord,
    pub initial_living_cells: usize,
    pub step_interval_secs: f32,
    pub rules: Rules,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            columns: 20,
            rows: 20,
            initial_living_cells: 60,
            step_interval_secs: 0.2,
            rules: Rules::default(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Event {
    StateEntered(GameState),
    Toggled { position: Coord2, alive: bool },
    Stepped { steps: i32 },
}

/// Per-generation statistics, recounted from the whole board after every step.
#[derive(Debug)]
pub struct Counters {
    pub steps: GameVariable<i32>,
    pub dead: GameVariable<i32>,
    pub living: GameVariable<i32>,
    pub born: GameVariable<i32>,
    pub survived: GameVariable<i32>,
    pub underpopulated: GameVariable<i32>,
    pub overpopulated: GameVariable<i32>,
}

impl Counters {
    fn new() -> Self {
        let counter = |name| GameVariable::new(name, VariableSpec::at_least(0, 0));
        Self {
            steps: counter("steps"),
            dead: counter("dead"),
            living: counter("living"),
            born: counter("born"),
            survived: counter("survived"),
            underpopulated: counter("underpopulated"),
            overpopulated: counter("overpopulated"),
        }
    }

    fn all_mut(&mut self) -> [&mut GameVariable<i32>; 7] {
        [
            &mut self.steps,
            &mut self.dead,
            &mut self.living,
            &mut self.born,
            &mut self.survived,
            &mut self.underpopulated,
            &mut self.overpopulated,
        ]
    }
}

#[derive(Debug)]
pub struct Life {
    settings: Settings,
    state: GameState,
    grid: Grid<Cell>,
    counters: Counters,
    interval: Interval,
    rng: SmallRng,
    events: EventQueue<Event>,
    setup_error: Option<GameError>,
}

impl Life {
    /// Creates a session and enters `Ready`.
    pub fn new(settings: Settings, seed: u64) -> Self {
        let mut game = Self {
            grid: Grid::new(settings.columns, settings.rows),
            counters: Counters::new(),
            interval: Interval::new(seconds(settings.step_interval_secs)),
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

    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    pub fn setup_error(&self) -> Option<GameError> {
        self.setup_error
    }

    /// Registers `handler` on every counter.
    pub fn on_variable_set(&mut self, handler: impl FnMut(&'static str, i32) + Clone + 'static) {
        for counter in self.counters.all_mut() {
            counter.on_set(handler.clone());
        }
    }

    /// Cells only take clicks while the board is being prepared.
    pub fn accepts_click(&self) -> bool {
        self.state.is_ready()
    }

    /// Flips a cell between alive and dead. Returns the new alive flag.
    pub fn toggle(&mut self, coords: Coord2) -> Option<bool> {
        if !self.accepts_click() {
            return None;
        }

        let cell = self.grid.get_mut(coords)?;
        let alive = !cell.is_alive();
        cell.set_alive(alive);
        self.events.push(Event::Toggled {
            position: coords,
            alive,
        });
        self.recount_population();
        Some(alive)
    }

    /// Advances one generation.
    ///
    /// Every next state is computed from the current generation before any cell changes.
    pub fn step(&mut self) {
        if !self.grid.is_allocated() {
            return;
        }

        let rules = self.settings.rules;
        let next: Vec<CellState> = self
            .grid
            .iter()
            .map(|cell| {
                let neighbors = self.grid.neighbors(cell.position());
                let alive_neighbors = neighbors.iter().filter(|n| n.is_alive()).count() as u8;
                rules.next_state(cell.is_alive(), alive_neighbors)
            })
            .collect();

        for (cell, state) in self.grid.iter_mut().zip(next) {
            cell.set_state(state);
        }
        self.grid.iter_mut().for_each(Cell::apply_state);

        let steps = self.counters.steps.update(|steps| steps + 1);
        self.recount_population();
        self.recount_transitions();
        log::trace!("Life: step {steps}, {} living", self.counters.living.get());
        self.events.push(Event::Stepped { steps });
    }

    fn on_ready(&mut self) {
        self.setup_error = None;
        self.grid.init();
        for counter in self.counters.all_mut() {
            counter.init();
        }
        self.interval.reset();

        if let Err(error) = self.seed_living_cells() {
            log::error!("Life: cannot seed living cells: {error}");
            self.setup_error = Some(error);
        }
        self.recount_population();
    }

    fn seed_living_cells(&mut self) -> Result<()> {
        let total = usize::from(self.grid.total_cells());
        let mask = random_bool_mask(&mut self.rng, total, self.settings.initial_living_cells)?;
        for (cell, alive) in self.grid.iter_mut().zip(mask) {
            cell.set_alive(alive);
        }
        Ok(())
    }

    fn recount_population(&mut self) {
        let living = self.grid.count(Cell::is_alive);
        let dead = self.grid.iter().count() - living;
        self.counters.living.set(living as i32);
        self.counters.dead.set(dead as i32);
    }

    fn recount_transitions(&mut self) {
        let count = |state: CellState| self.grid.count(|cell| cell.state() == state) as i32;
        let born = count(CellState::Birth);
        let survived = count(CellState::Survival);
        let underpopulated = count(CellState::Underpopulation);
        let overpopulated = count(CellState::Overpopulation);

        self.counters.born.set(born);
        self.counters.survived.set(survived);
        self.counters.underpopulated.set(underpopulated);
        self.counters.overpopulated.set(overpopulated);
    }
}

impl Game for Life {
    type Settings = Settings;
    type Event = Event;

    fn settings(&self) -> &Settings {
        &self.settings
    }

    fn state(&self) -> GameState {
        self.state
    }

    fn set_state(&mut self, state: GameState) {
        log_transition("Life", self.state, state);
        self.state = state;
        self.events.push(Event::StateEntered(state));
        if state.is_ready() {
            self.on_ready();
        }
    }

    fn tick(&mut self, delta: Duration) {
        if self.state.is_playing() && self.interval.tick(delta) {
            self.step();
        }
    }

    fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty(columns: Coord, rows: Coord, rules: Rules) -> Life {
        Life::new(
            Settings {
                columns,
                rows,
                initial_living_cells: 0,
                step_interval_secs: 0.2,
                rules,
            },
            3,
        )
    }

    fn living(game: &Life) -> Vec<Coord2> {
        game.grid()
            .iter()
            .filter(|cell| cell.is_alive())
            .map(|cell| cell.position())
            .collect()
    }

    #[test]
    fn default_rules_are_not_conway() {
        let rules = Rules::default();

        assert_eq!(rules.next_state(true, 1), CellState::Underpopulation);
        assert_eq!(rules.next_state(true, 2), CellState::Survival);
        assert_eq!(rules.next_state(true, 3), CellState::Survival);
        assert_eq!(rules.next_state(true, 4), CellState::Overpopulation);
        assert_eq!(rules.next_state(false, 3), CellState::Birth);
        assert_eq!(rules.next_state(false, 2), CellState::None);
    }

    #[test]
    fn seeding_places_exact_population() {
        let game = Life::new(Settings::default(), 11);

        assert_eq!(game.grid().count(Cell::is_alive), 60);
        assert_eq!(game.counters().living.get(), 60);
        assert_eq!(game.counters().dead.get(), 340);
        assert_eq!(game.counters().steps.get(), 0);
    }

    #[test]
    fn lone_cell_dies_of_underpopulation() {
        let mut game = empty(5, 5, Rules::default());
        game.toggle((2, 2));

        game.step();

        assert!(living(&game).is_empty());
        assert_eq!(
            game.cell((2, 2)).map(Cell::state),
            Some(CellState::Underpopulation)
        );
        assert_eq!(game.counters().underpopulated.get(), 1);
        assert_eq!(game.counters().steps.get(), 1);
    }

    #[test]
    fn three_in_a_row_turns_under_default_rules() {
        let mut game = empty(5, 5, Rules::default());
        for coords in [(1, 2), (2, 2), (3, 2)] {
            game.toggle(coords);
        }

        game.step();

        assert_eq!(living(&game), [(2, 1), (2, 2), (2, 3)]);
        assert_eq!(game.counters().born.get(), 2);
        assert_eq!(game.counters().survived.get(), 1);
        assert_eq!(game.counters().underpopulated.get(), 2);
        assert_eq!(game.counters().overpopulated.get(), 0);
    }

    #[test]
    fn three_in_a_row_grows_under_custom_rules() {
        let rules = Rules {
            birth: 2,
            underpopulation: 0,
            overpopulation: 3,
        };
        let mut game = empty(5, 5, rules);
        for coords in [(1, 2), (2, 2), (3, 2)] {
            game.toggle(coords);
        }

        game.step();

        assert_eq!(game.counters().living.get(), 7);
        assert_eq!(game.counters().born.get(), 4);
        assert_eq!(game.counters().survived.get(), 3);
    }

    #[test]
    fn toggle_only_while_ready() {
        let mut game = empty(3, 3, Rules::default());

        assert_eq!(game.toggle((0, 0)), Some(true));
        assert_eq!(game.toggle((3, 0)), None);
        game.start();
        assert_eq!(game.toggle((1, 1)), None);
        assert_eq!(living(&game), [(0, 0)]);
    }

    #[test]
    fn ticks_step_on_the_interval() {
        let mut game = empty(4, 4, Rules::default());
        game.tick(Duration::from_secs(1));
        assert_eq!(game.counters().steps.get(), 0);

        game.start();
        for _ in 0..5 {
            game.tick(Duration::from_millis(100));
        }

        assert_eq!(game.counters().steps.get(), 1);
    }

    #[test]
    fn overfull_seed_is_rejected() {
        let settings = Settings {
            columns: 2,
            rows: 2,
            initial_living_cells: 5,
            ..Settings::default()
        };
        let game = Life::new(settings, 0);

        assert_eq!(
            game.setup_error(),
            Some(GameError::TooManyMarked {
                requested: 5,
                capacity: 4
            })
        );
        assert_eq!(game.counters().living.get(), 0);
    }

    #[test]
    fn restart_clears_counters() {
        let mut game = Life::new(Settings::default(), 5);
        game.start();
        game.step();
        game.step();

        game.restart();

        assert_eq!(game.counters().steps.get(), 0);
        assert_eq!(game.counters().born.get(), 0);
        assert_eq!(game.counters().living.get(), 60);
    }
}
