use std::fmt::Debug;
use std::time::Duration;

use gridgames_core::bingo::{self, Bingo, LotteryOutcome};
use gridgames_core::life::{self, Life};
use gridgames_core::minesweeper::{self, Minesweeper};
use gridgames_core::reversi::{self, Reversi, Stone};
use gridgames_core::{Game, GameError, Grid, GridCell};

/// Sixty ticks per simulated second.
pub const FRAME: Duration = Duration::from_nanos(16_666_667);

const FRAMES_PER_SECOND: u64 = 60;

#[derive(Copy, Clone, Debug)]
pub struct Limit {
    frames: u64,
}

impl Limit {
    pub fn from_seconds(seconds: u32) -> Self {
        Self {
            frames: u64::from(seconds) * FRAMES_PER_SECOND,
        }
    }
}

/// Ticks `game` until `frame` returns `false` or the limit runs out. Returns the frames played.
fn drive<G>(game: &mut G, limit: Limit, mut frame: impl FnMut(&mut G, u64) -> bool) -> u64
where
    G: Game,
    G::Event: Debug,
{
    for n in 0..limit.frames {
        game.tick(FRAME);
        for event in game.drain_events() {
            log::debug!("{event:?}");
        }
        if !frame(game, n) {
            return n + 1;
        }
    }
    log::warn!("Stopped after {} frames", limit.frames);
    limit.frames
}

fn watch(name: &'static str, value: i32) {
    log::trace!("{name} = {value}");
}

fn report_setup(error: Option<GameError>) {
    if let Some(error) = error {
        log::warn!("Playing a misconfigured board: {error}");
    }
}

fn elapsed(frames: u64) -> f64 {
    frames as f64 / FRAMES_PER_SECOND as f64
}

fn render<C>(grid: &Grid<C>, glyph: impl Fn(&C) -> String) -> String {
    (0..grid.rows())
        .map(|y| {
            let line: Vec<String> = grid.row(y).map(&glyph).collect();
            line.join(" ") + "\n"
        })
        .collect()
}

pub fn bingo(settings: bingo::Settings, seed: u64, limit: Limit) -> String {
    let mut game = Bingo::new(settings, seed);
    game.on_variable_set(watch);
    report_setup(game.setup_error());
    game.start();

    let mut draws = 0;
    let frames = drive(&mut game, limit, |game, frame| {
        if frame % 20 == 19 {
            match game.press_lottery() {
                LotteryOutcome::Stopped(number) => {
                    draws += 1;
                    log::info!("Drew {number}");
                    game.press_lottery();
                }
                LotteryOutcome::Resumed => {}
                LotteryOutcome::Ignored => return false,
            }
        }
        game.state().is_playing()
    });

    let card = render(game.grid(), |cell| match (cell.state(), cell.number()) {
        (bingo::CellState::Free, _) => " FR".to_owned(),
        (bingo::CellState::Valid, Some(number)) => format!("*{number:>2}"),
        (_, Some(number)) => format!(" {number:>2}"),
        (_, None) => "  -".to_owned(),
    });
    format!(
        "Bingo: {:?} after {draws} draws in {:.1}s, {} numbers left\n{card}",
        game.state(),
        elapsed(frames),
        game.numbers_left()
    )
}

pub fn life(settings: life::Settings, seed: u64, steps: i32, limit: Limit) -> String {
    let mut game = Life::new(settings, seed);
    game.on_variable_set(watch);
    report_setup(game.setup_error());
    game.start();

    drive(&mut game, limit, |game, _| {
        game.counters().steps.get() < steps
    });

    let counters = game.counters();
    let board = render(game.grid(), |cell| {
        if cell.is_alive() { "#" } else { "." }.to_owned()
    });
    format!(
        "Life: {} steps, {} living, {} dead (born {}, survived {}, underpopulated {}, overpopulated {})\n{board}",
        counters.steps.get(),
        counters.living.get(),
        counters.dead.get(),
        counters.born.get(),
        counters.survived.get(),
        counters.underpopulated.get(),
        counters.overpopulated.get(),
    )
}

/// One action every quarter second: keep a spare life, use the detector when affordable,
/// otherwise open the first hidden cell.
fn minesweeper_turn(game: &mut Minesweeper) {
    if game.wallet().lives.get() == 1 && game.buy_life() {
        log::info!("Bought a life");
        return;
    }
    if let Some(coords) = game.detect_mine() {
        log::info!("Detector marked {coords:?}");
        return;
    }

    let next = game
        .grid()
        .iter()
        .find(|cell| !cell.is_opened() && !cell.is_flagged())
        .map(GridCell::position);
    if let Some(coords) = next {
        let outcome = game.open(coords);
        log::info!("Opened {coords:?}: {outcome:?}");
    }
}

pub fn minesweeper(settings: minesweeper::Settings, seed: u64, limit: Limit) -> String {
    let mut game = Minesweeper::new(settings, seed);
    game.on_variable_set(watch);
    game.on_time_set(|name, value| log::trace!("{name} = {value:.2}"));
    report_setup(game.setup_error());
    game.start();

    let frames = drive(&mut game, limit, |game, frame| {
        if frame % 15 == 14 {
            minesweeper_turn(game);
        }
        game.state().is_playing()
    });

    let board = render(game.grid(), |cell| {
        if cell.is_flagged() {
            "F".to_owned()
        } else if !cell.is_opened() {
            "#".to_owned()
        } else {
            match cell.state().count() {
                None => "*".to_owned(),
                Some(0) => ".".to_owned(),
                Some(count) => count.to_string(),
            }
        }
    });
    let wallet = game.wallet();
    format!(
        "Minesweeper: {:?} after {:.1}s, {} coins, {} lives, {:.1}s left, score {}\n{board}",
        game.state(),
        elapsed(frames),
        wallet.coins.get(),
        wallet.lives.get(),
        wallet.remaining_time.get(),
        wallet.score.get(),
    )
}

pub fn reversi(settings: reversi::Settings, limit: Limit) -> String {
    let mut game = Reversi::new(settings);
    game.on_variable_set(watch);
    report_setup(game.setup_error());
    game.start();

    let frames = drive(&mut game, limit, |game, _| {
        if game.accepts_click() {
            let mut best = None;
            for cell in game.grid().iter().filter(|cell| cell.is_placeable()) {
                if best.is_none_or(|(_, flips)| cell.flippable() > flips) {
                    best = Some((cell.position(), cell.flippable()));
                }
            }
            if let Some((coords, _)) = best {
                game.click(coords);
            }
        }
        !game.state().is_finished()
    });

    let board = render(game.grid(), |cell| {
        match cell.state() {
            Stone::Empty => ".",
            Stone::Black => "B",
            Stone::White => "W",
        }
        .to_owned()
    });
    format!(
        "Reversi: {:?} ({:?}) after {:.1}s, black {} white {}\n{board}",
        game.state(),
        game.outcome(),
        elapsed(frames),
        game.stones(Stone::Black),
        game.stones(Stone::White),
    )
}
