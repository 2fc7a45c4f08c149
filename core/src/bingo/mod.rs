//! Bingo card with a roulette lottery.

use alloc::vec::Vec;
use core::time::Duration;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::*;

pub use cell::*;
pub use lottery::*;

mod cell;
mod lottery;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub columns: Coord,
    pub rows: Coord,
    /// Lowest number of the first column.
    pub start_number: i32,
    /// Highest number of the first column. Later columns continue in blocks of the same span.
    pub end_number: i32,
    pub free_cell: Option<Coord2>,
    pub lottery: LotterySettings,
}

impl Settings {
    pub const fn span(&self) -> i32 {
        self.end_number - self.start_number + 1
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            columns: 5,
            rows: 5,
            start_number: 1,
            end_number: 15,
            free_cell: Some((2, 2)),
            lottery: LotterySettings::default(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Event {
    StateEntered(GameState),
    /// The roulette cursor moved onto a number.
    Rolling(i32),
    Drawn(i32),
    Punched(Coord2),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PunchOutcome {
    NoChange,
    Punched(Coord2),
    Bingo(Coord2),
}

impl PunchOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

#[derive(Debug)]
pub struct Bingo {
    settings: Settings,
    state: GameState,
    grid: Grid<Cell>,
    lottery: Lottery,
    numbers_left: GameVariable<i32>,
    rng: SmallRng,
    events: EventQueue<Event>,
    setup_error: Option<GameError>,
}

impl Bingo {
    /// Creates a session and enters `Ready`.
    pub fn new(settings: Settings, seed: u64) -> Self {
        let pool_size = settings.lottery.pool_size();
        let mut game = Self {
            grid: Grid::new(settings.columns, settings.rows),
            lottery: Lottery::new(settings.lottery),
            numbers_left: GameVariable::new("numbers_left", VariableSpec::at_least(pool_size, 0)),
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

    pub fn lottery(&self) -> &Lottery {
        &self.lottery
    }

    pub fn numbers_left(&self) -> i32 {
        self.numbers_left.get()
    }

    pub fn on_variable_set(&mut self, handler: impl FnMut(&'static str, i32) + 'static) {
        self.numbers_left.on_set(handler);
    }

    /// The configuration problem found while entering `Ready`, if any.
    pub fn setup_error(&self) -> Option<GameError> {
        self.setup_error
    }

    pub fn can_restart_lottery(&self) -> bool {
        self.state.is_playing()
    }

    /// The lottery button, live only while playing. A drawn number is punched right away.
    pub fn press_lottery(&mut self) -> LotteryOutcome {
        if !self.state.is_playing() {
            return LotteryOutcome::Ignored;
        }

        let outcome = self.lottery.press(self.can_restart_lottery());
        if let LotteryOutcome::Stopped(number) = outcome {
            self.numbers_left.update(|left| left - 1);
            self.events.push(Event::Drawn(number));
            self.punch(number);
        }
        outcome
    }

    /// Marks the card cell that waits for `number`, ending the game on a completed line.
    pub fn punch(&mut self, number: i32) -> PunchOutcome {
        if !self.state.is_playing() {
            return PunchOutcome::NoChange;
        }

        let punched = self
            .grid
            .iter_mut()
            .find_map(|cell| cell.punch(number).then_some(cell.position()));
        let Some(position) = punched else {
            return PunchOutcome::NoChange;
        };
        self.events.push(Event::Punched(position));
        log::debug!("Bingo: punched {number} at {position:?}");

        if self.is_bingo() {
            self.set_state(GameState::Clear);
            PunchOutcome::Bingo(position)
        } else {
            PunchOutcome::Punched(position)
        }
    }

    /// Whether any row, column or full diagonal has no unmarked cell left.
    pub fn is_bingo(&self) -> bool {
        let (columns, rows) = self.grid.size();
        if !self.grid.is_allocated() || columns == 0 || rows == 0 {
            return false;
        }

        (0..rows).any(|y| self.grid.row(y).all(Cell::is_marked))
            || (0..columns).any(|x| self.grid.column(x).all(Cell::is_marked))
            || self.grid.line((0, 0), (1, 1)).all(Cell::is_marked)
            || self.grid.line((0, rows - 1), (1, -1)).all(Cell::is_marked)
    }

    fn on_ready(&mut self) {
        self.setup_error = None;
        self.grid.init();
        if let Err(error) = self.number_card() {
            log::error!("Bingo: cannot number the card: {error}");
            self.setup_error = Some(error);
        }
        if let Err(error) = self.lottery.init(&mut self.rng) {
            log::error!("Bingo: cannot fill the lottery: {error}");
            self.setup_error.get_or_insert(error);
        }
        self.numbers_left.init();
    }

    /// Column `i` draws from its own block of `span` numbers, without repeats.
    fn number_card(&mut self) -> Result<()> {
        let (columns, rows) = self.grid.size();
        let span = self.settings.span();

        let mut numbers = Vec::with_capacity(usize::from(columns));
        for x in 0..columns {
            let min = self.settings.start_number + i32::from(x) * span;
            let column =
                sample_without_replacement(&mut self.rng, min, min + span - 1, usize::from(rows))?;
            numbers.push(column);
        }

        for (x, column) in numbers.into_iter().enumerate() {
            for (y, number) in column.into_iter().enumerate() {
                self.grid[(x as Coord, y as Coord)].assign(number);
            }
        }
        if let Some(cell) = self.settings.free_cell.and_then(|pos| self.grid.get_mut(pos)) {
            cell.set_free();
        }
        Ok(())
    }
}

impl Game for Bingo {
    type Settings = Settings;
    type Event = Event;

    fn settings(&self) -> &Settings {
        &self.settings
    }

    fn state(&self) -> GameState {
        self.state
    }

    fn set_state(&mut self, state: GameState) {
        log_transition("Bingo", self.state, state);
        self.state = state;
        self.events.push(Event::StateEntered(state));
        match state {
            GameState::Ready => self.on_ready(),
            GameState::Play => self.lottery.run(),
            GameState::Clear | GameState::GameOver => self.lottery.halt(),
        }
    }

    fn tick(&mut self, delta: Duration) {
        if let Some(number) = self.lottery.tick(delta) {
            self.events.push(Event::Rolling(number));
        }
    }

    fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game() -> Bingo {
        Bingo::new(Settings::default(), 42)
    }

    fn number_at(game: &Bingo, coords: Coord2) -> i32 {
        game.cell(coords).and_then(Cell::number).unwrap()
    }

    fn punch_all(game: &mut Bingo, positions: &[Coord2]) {
        for &coords in positions {
            if let Some(number) = game.cell(coords).and_then(Cell::number) {
                game.punch(number);
            }
        }
    }

    #[test]
    fn columns_use_their_own_number_block() {
        let game = game();

        for x in 0..5u8 {
            let mut column: Vec<i32> = game.grid().column(x).filter_map(Cell::number).collect();
            let low = 1 + 15 * i32::from(x);
            assert!(column.iter().all(|n| (low..low + 15).contains(n)));
            column.sort_unstable();
            column.dedup();
            let expected = if x == 2 { 4 } else { 5 };
            assert_eq!(column.len(), expected);
        }
        assert_eq!(game.cell((2, 2)).map(Cell::state), Some(CellState::Free));
        assert_eq!(game.setup_error(), None);
    }

    #[test]
    fn fully_marked_card_is_bingo() {
        let mut game = game();
        game.start();
        let positions: Vec<Coord2> = game.grid().positions().collect();

        for coords in positions {
            if game.state() == GameState::Clear {
                break;
            }
            if let Some(number) = game.cell(coords).and_then(Cell::number) {
                game.punch(number);
            }
        }

        assert!(game.is_bingo());
        assert_eq!(game.state(), GameState::Clear);
    }

    #[test]
    fn fresh_card_is_not_bingo() {
        assert!(!game().is_bingo());
    }

    #[test]
    fn down_right_diagonal_wins() {
        let mut game = game();
        game.start();

        punch_all(&mut game, &[(0, 0), (1, 1), (3, 3)]);
        assert!(!game.is_bingo());
        assert!(game.state().is_playing());

        let last = number_at(&game, (4, 4));
        assert_eq!(game.punch(last), PunchOutcome::Bingo((4, 4)));
        assert_eq!(game.state(), GameState::Clear);
    }

    #[test]
    fn up_right_diagonal_wins() {
        let mut game = game();
        game.start();

        punch_all(&mut game, &[(0, 4), (1, 3), (3, 1), (4, 0)]);

        assert!(game.is_bingo());
    }

    #[test]
    fn diagonal_with_one_gap_is_not_bingo() {
        let mut game = game();
        game.start();

        punch_all(&mut game, &[(0, 4), (1, 3), (3, 1)]);

        assert!(!game.is_bingo());
    }

    #[test]
    fn row_and_column_win() {
        let mut game = game();
        game.start();
        punch_all(&mut game, &[(0, 1), (1, 1), (2, 1), (3, 1), (4, 1)]);
        assert_eq!(game.state(), GameState::Clear);

        game.restart();
        game.start();
        punch_all(&mut game, &[(3, 0), (3, 1), (3, 2), (3, 3), (3, 4)]);
        assert_eq!(game.state(), GameState::Clear);
    }

    #[test]
    fn punch_ignores_unknown_and_repeated_numbers() {
        let mut game = game();
        let number = number_at(&game, (0, 0));

        assert_eq!(game.punch(number), PunchOutcome::NoChange);
        game.start();
        assert_eq!(game.punch(1000), PunchOutcome::NoChange);
        assert_eq!(game.punch(number), PunchOutcome::Punched((0, 0)));
        assert_eq!(game.punch(number), PunchOutcome::NoChange);
    }

    #[test]
    fn lottery_draw_counts_down_and_punches() {
        let mut game = game();
        game.start();
        game.tick(Duration::from_millis(100));
        game.tick(Duration::from_millis(100));
        game.drain_events();

        let LotteryOutcome::Stopped(number) = game.press_lottery() else {
            panic!("lottery should be running after start");
        };

        assert_eq!(game.numbers_left(), 74);
        assert!(!game.lottery().contains(number));
        let events = game.drain_events();
        assert_eq!(events[0], Event::Drawn(number));
        let on_card = game.grid().iter().any(|cell| cell.number() == Some(number));
        assert_eq!(events.len() == 2, on_card);
    }

    #[test]
    fn cleared_game_cannot_restart_lottery() {
        let mut game = game();
        game.start();
        game.set_state(GameState::Clear);

        assert!(!game.lottery().is_running());
        assert_eq!(game.press_lottery(), LotteryOutcome::Ignored);
    }

    #[test]
    fn lottery_is_locked_until_play() {
        let mut game = game();

        assert!(!game.can_restart_lottery());
        for _ in 0..3 {
            assert_eq!(game.press_lottery(), LotteryOutcome::Ignored);
        }
        assert!(!game.lottery().is_running());
        assert_eq!(game.numbers_left(), 75);
        assert_eq!(game.lottery().remaining(), 75);

        game.start();
        assert!(game.can_restart_lottery());
        assert!(matches!(game.press_lottery(), LotteryOutcome::Stopped(_)));
        assert_eq!(game.numbers_left(), 74);
    }

    #[test]
    fn restart_resets_card_and_lottery() {
        let mut game = game();
        game.start();
        game.press_lottery();
        punch_all(&mut game, &[(0, 0)]);

        game.restart();

        assert_eq!(game.numbers_left(), 75);
        assert_eq!(game.lottery().remaining(), 75);
        assert_eq!(game.grid().count(|cell| cell.state() == CellState::Valid), 0);
    }

    #[test]
    fn empty_column_block_leaves_card_unnumbered() {
        let settings = Settings {
            start_number: 10,
            end_number: 5,
            ..Settings::default()
        };
        let game = Bingo::new(settings, 1);

        assert_eq!(
            game.setup_error(),
            Some(GameError::InvalidRange { min: 10, max: 5 })
        );
        assert!(game.grid().iter().all(|cell| cell.number().is_none()));
        assert!(!game.is_bingo());
    }
}
