//! Reversi against a greedy opponent, with stone flips paced by the tick driver.

use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::time::Duration;
use serde::{Deserialize, Serialize};

use crate::*;

pub use cell::*;
pub use player::*;

mod cell;
mod player;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub columns: Coord,
    pub rows: Coord,
    /// The human always moves first, with this color.
    pub human_color: Stone,
    pub black_stones: Vec<Coord2>,
    pub white_stones: Vec<Coord2>,
    /// Pause after placing a stone and after every flip.
    pub stone_delay_secs: f32,
    /// Pause before the opponent places its stone.
    pub opponent_delay_secs: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            columns: 8,
            rows: 8,
            human_color: Stone::Black,
            black_stones: alloc::vec![(3, 4), (4, 3)],
            white_stones: alloc::vec![(3, 3), (4, 4)],
            stone_delay_secs: 0.2,
            opponent_delay_secs: 0.5,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Ready,
    PlayersTurn,
    OpponentsTurn,
    Clear,
    GameOver,
}

/// Final result from the human's point of view.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Lose,
    /// Equal counts. The session still ends in `GameOver`.
    Draw,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Event {
    StateEntered(GameState),
    StatusChanged(Status),
    Placed { position: Coord2, stone: Stone },
    Flipped { position: Coord2, stone: Stone },
    Passed(Side),
    Finished(Outcome),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlaceOutcome {
    Ignored,
    Placed,
}

impl PlaceOutcome {
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Placed)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Step {
    /// Flip the next sandwiched stone, or finish the placement when none is left.
    Advance,
    OpponentMove(Coord2),
}

#[derive(Debug)]
pub struct Reversi {
    settings: Settings,
    state: GameState,
    grid: Grid<Cell>,
    human: Player,
    opponent: Player,
    turn: Side,
    black_stones: GameVariable<i32>,
    white_stones: GameVariable<i32>,
    status: Status,
    outcome: Option<Outcome>,
    scheduler: Scheduler<Step>,
    pending_flips: VecDeque<Coord2>,
    placing: bool,
    events: EventQueue<Event>,
    setup_error: Option<GameError>,
}

impl Reversi {
    /// Creates a session and enters `Ready`.
    pub fn new(settings: Settings) -> Self {
        let human_color = settings.human_color;
        let mut game = Self {
            grid: Grid::new(settings.columns, settings.rows),
            human: Player::new(human_color),
            opponent: Player::new(human_color.opposite()),
            turn: Side::Human,
            black_stones: GameVariable::new("black_stones", VariableSpec::at_least(0, 0)),
            white_stones: GameVariable::new("white_stones", VariableSpec::at_least(0, 0)),
            status: Status::Ready,
            outcome: None,
            scheduler: Scheduler::new(),
            pending_flips: VecDeque::new(),
            placing: false,
            events: EventQueue::new(),
            setup_error: None,
            settings,
            state: GameState::Ready,
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

    pub fn turn(&self) -> Side {
        self.turn
    }

    pub fn player(&self, side: Side) -> &Player {
        match side {
            Side::Human => &self.human,
            Side::Opponent => &self.opponent,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn stones(&self, stone: Stone) -> i32 {
        match stone {
            Stone::Black => self.black_stones.get(),
            Stone::White => self.white_stones.get(),
            Stone::Empty => self.grid.count(|cell| cell.state().is_empty()) as i32,
        }
    }

    pub fn setup_error(&self) -> Option<GameError> {
        self.setup_error
    }

    pub fn on_variable_set(&mut self, handler: impl FnMut(&'static str, i32) + Clone + 'static) {
        self.black_stones.on_set(handler.clone());
        self.white_stones.on_set(handler);
    }

    /// Whether a placement or an opponent move is still in flight.
    pub fn is_busy(&self) -> bool {
        self.placing || !self.scheduler.is_idle()
    }

    pub fn accepts_click(&self) -> bool {
        self.state.is_playing() && self.turn == Side::Human && !self.placing
    }

    /// Human move. Dropped silently unless it is the human's turn and nothing is animating.
    pub fn click(&mut self, coords: Coord2) -> PlaceOutcome {
        if !self.accepts_click() {
            return PlaceOutcome::Ignored;
        }
        self.place(coords)
    }

    fn turn_color(&self) -> Stone {
        self.player(self.turn).color
    }

    /// Sandwich test for the player to move.
    pub fn can_place(&self, coords: Coord2) -> bool {
        let color = self.turn_color();
        self.is_empty_at(coords)
            && DIRECTIONS
                .iter()
                .any(|&direction| self.sandwiched_run(coords, direction, color).is_some())
    }

    /// One for the placed stone plus every stone it would turn, zero when placing is illegal.
    pub fn flippable_count(&self, coords: Coord2) -> CellCount {
        let color = self.turn_color();
        if !self.is_empty_at(coords) {
            return 0;
        }

        let flips: CellCount = DIRECTIONS
            .iter()
            .filter_map(|&direction| self.sandwiched_run(coords, direction, color))
            .sum();
        if flips == 0 { 0 } else { flips + 1 }
    }

    fn is_empty_at(&self, coords: Coord2) -> bool {
        self.grid
            .get(coords)
            .is_some_and(|cell| cell.state().is_empty())
    }

    /// Length of the opposing run next to `origin` along `direction`, if a `color` stone closes it.
    fn sandwiched_run(&self, origin: Coord2, direction: Delta, color: Stone) -> Option<CellCount> {
        let opposing = color.opposite();
        let mut run = 0;
        let mut cursor = self.grid.step(origin, direction)?;
        loop {
            let stone = self.grid.get(cursor)?.state();
            if stone == opposing {
                run += 1;
                cursor = self.grid.step(cursor, direction)?;
            } else if stone == color && run > 0 {
                return Some(run);
            } else {
                return None;
            }
        }
    }

    fn sandwiched_positions(&self, origin: Coord2, color: Stone) -> VecDeque<Coord2> {
        let mut flips = VecDeque::new();
        for direction in DIRECTIONS {
            let Some(run) = self.sandwiched_run(origin, direction, color) else {
                continue;
            };
            let mut cursor = origin;
            for _ in 0..run {
                match self.grid.step(cursor, direction) {
                    Some(next) => {
                        flips.push_back(next);
                        cursor = next;
                    }
                    None => break,
                }
            }
        }
        flips
    }

    fn place(&mut self, coords: Coord2) -> PlaceOutcome {
        if self.placing || !self.can_place(coords) {
            log::debug!("Reversi: cannot place at {coords:?}");
            return PlaceOutcome::Ignored;
        }

        let stone = self.turn_color();
        self.placing = true;
        self.pending_flips = self.sandwiched_positions(coords, stone);
        self.grid[coords].put(stone);
        self.events.push(Event::Placed {
            position: coords,
            stone,
        });
        log::debug!(
            "Reversi: {stone:?} placed at {coords:?}, {} to flip",
            self.pending_flips.len()
        );
        self.scheduler.schedule(self.stone_delay(), Step::Advance);
        PlaceOutcome::Placed
    }

    fn stone_delay(&self) -> Duration {
        seconds(self.settings.stone_delay_secs)
    }

    fn run_step(&mut self, step: Step) {
        match step {
            Step::Advance => match self.pending_flips.pop_front() {
                Some(coords) => {
                    let cell = &mut self.grid[coords];
                    cell.turn_over();
                    let stone = cell.state();
                    log::trace!("Reversi: flipped {coords:?} to {stone:?}");
                    self.events.push(Event::Flipped {
                        position: coords,
                        stone,
                    });
                    self.scheduler.schedule(self.stone_delay(), Step::Advance);
                }
                None => self.finish_placement(),
            },
            Step::OpponentMove(coords) => {
                if self.state.is_playing() && self.turn == Side::Opponent {
                    self.place(coords);
                }
            }
        }
    }

    fn finish_placement(&mut self) {
        self.update_stone_counts();
        self.current_player_mut().placed_last_turn = true;
        self.placing = false;
        self.switch_turn();
    }

    fn current_player_mut(&mut self) -> &mut Player {
        match self.turn {
            Side::Human => &mut self.human,
            Side::Opponent => &mut self.opponent,
        }
    }

    /// Hands the move to the other side, passing or ending the game when nobody can place.
    fn switch_turn(&mut self) {
        loop {
            self.turn = self.turn.other();
            self.set_status(match self.turn {
                Side::Human => Status::PlayersTurn,
                Side::Opponent => Status::OpponentsTurn,
            });
            self.update_cells();

            if let Some(choice) = self.choose_cell() {
                if self.turn == Side::Opponent {
                    let delay = seconds(self.settings.opponent_delay_secs);
                    self.scheduler.schedule(delay, Step::OpponentMove(choice));
                }
                return;
            }

            if !self.player(self.turn.other()).placed_last_turn {
                self.finish_game();
                return;
            }

            log::debug!("Reversi: {:?} passes", self.turn);
            self.events.push(Event::Passed(self.turn));
            self.current_player_mut().placed_last_turn = false;
        }
    }

    /// First cell in scan order with the highest flippable count.
    fn choose_cell(&self) -> Option<Coord2> {
        let mut best: Option<&Cell> = None;
        for cell in self.grid.iter().filter(|cell| cell.is_placeable()) {
            if best.is_none_or(|b| cell.flippable() > b.flippable()) {
                best = Some(cell);
            }
        }
        best.map(GridCell::position)
    }

    fn finish_game(&mut self) {
        let human = self.stones(self.human.color);
        let opponent = self.stones(self.opponent.color);
        let outcome = if human > opponent {
            Outcome::Win
        } else if human == opponent {
            Outcome::Draw
        } else {
            Outcome::Lose
        };

        log::debug!("Reversi: finished {human} to {opponent}, {outcome:?}");
        self.outcome = Some(outcome);
        self.events.push(Event::Finished(outcome));
        self.set_state(if outcome == Outcome::Win {
            GameState::Clear
        } else {
            GameState::GameOver
        });
    }

    fn update_cells(&mut self) {
        for coords in self.grid.positions() {
            let count = self.flippable_count(coords);
            self.grid[coords].set_flippable(count);
        }
    }

    fn update_stone_counts(&mut self) {
        let black = self.grid.count(|cell| cell.state() == Stone::Black);
        let white = self.grid.count(|cell| cell.state() == Stone::White);
        self.black_stones.set(black as i32);
        self.white_stones.set(white as i32);
    }

    fn set_status(&mut self, status: Status) {
        self.status = status;
        self.events.push(Event::StatusChanged(status));
    }

    fn on_ready(&mut self) {
        self.scheduler.cancel_all();
        self.pending_flips.clear();
        self.placing = false;
        self.setup_error = None;
        self.outcome = None;

        self.grid.init();
        if let Err(error) = self.put_initial_stones() {
            log::error!("Reversi: cannot set up the board: {error}");
            self.setup_error = Some(error);
        }

        self.human = Player::new(self.settings.human_color);
        self.opponent = Player::new(self.settings.human_color.opposite());
        self.turn = Side::Human;
        self.black_stones.init();
        self.white_stones.init();
        self.update_cells();
        self.update_stone_counts();
        self.set_status(Status::Ready);
    }

    fn put_initial_stones(&mut self) -> Result<()> {
        let settings = &self.settings;
        if settings.human_color.is_empty() {
            return Err(GameError::InvalidColor);
        }

        let stones = settings
            .black_stones
            .iter()
            .map(|&pos| (pos, Stone::Black))
            .chain(settings.white_stones.iter().map(|&pos| (pos, Stone::White)));

        let mut placed = Vec::new();
        for (coords, stone) in stones {
            placed.push((self.grid.validate_coords(coords)?, stone));
        }
        for (coords, stone) in placed {
            self.grid[coords].put(stone);
        }
        Ok(())
    }
}

impl Game for Reversi {
    type Settings = Settings;
    type Event = Event;

    fn settings(&self) -> &Settings {
        &self.settings
    }

    fn state(&self) -> GameState {
        self.state
    }

    fn set_state(&mut self, state: GameState) {
        log_transition("Reversi", self.state, state);
        self.state = state;
        self.events.push(Event::StateEntered(state));
        match state {
            GameState::Ready => self.on_ready(),
            GameState::Play => self.set_status(Status::PlayersTurn),
            GameState::Clear => self.set_status(Status::Clear),
            GameState::GameOver => self.set_status(Status::GameOver),
        }
    }

    fn tick(&mut self, delta: Duration) {
        for step in self.scheduler.advance(delta) {
            self.run_step(step);
        }
    }

    fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain()
    }
}
