//! Whole sessions driven only through the [`Game`] trait and fixed ticks.

use std::time::Duration;

use gridgames_core::bingo::{self, Bingo, LotteryOutcome};
use gridgames_core::life::{self, Life};
use gridgames_core::minesweeper::{self, Minesweeper, OpenOutcome};
use gridgames_core::reversi::{self, Reversi};
use gridgames_core::{Game, GameState, GridCell};

const FRAME: Duration = Duration::from_millis(16);

fn run_frames<G: Game>(game: &mut G, frames: usize) {
    for _ in 0..frames {
        game.tick(FRAME);
    }
}

#[test]
fn life_steps_while_playing_and_stops_when_reset() {
    let mut game = Life::new(life::Settings::default(), 1);
    game.start();

    // a 0.2 s interval fires every 14 frames
    run_frames(&mut game, 130);
    let steps = game.counters().steps.get();
    assert!((8..=10).contains(&steps), "unexpected step count {steps}");

    game.restart();
    run_frames(&mut game, 130);
    assert_eq!(game.counters().steps.get(), 0);

    let events = game.drain_events();
    assert_eq!(
        events.first(),
        Some(&life::Event::StateEntered(GameState::Ready))
    );
}

#[test]
fn bingo_lottery_ends_the_game_before_the_pool_runs_dry() {
    let mut game = Bingo::new(bingo::Settings::default(), 2024);
    game.start();

    let mut draws = 0;
    while game.state() == GameState::Play {
        run_frames(&mut game, 7);
        match game.press_lottery() {
            LotteryOutcome::Stopped(_) => {
                draws += 1;
                game.press_lottery();
            }
            LotteryOutcome::Resumed => {}
            LotteryOutcome::Ignored => break,
        }
    }

    assert_eq!(game.state(), GameState::Clear);
    assert!(game.is_bingo());
    assert!((4..=75).contains(&draws));
    assert_eq!(game.numbers_left(), 75 - draws);
    assert_eq!(game.press_lottery(), LotteryOutcome::Ignored);
}

#[test]
fn minesweeper_safe_sweep_clears_with_score() {
    let mut game = Minesweeper::new(minesweeper::Settings::default(), 77);
    game.start();

    let safe: Vec<_> = game
        .grid()
        .iter()
        .filter(|cell| !cell.is_mine())
        .map(|cell| cell.position())
        .collect();
    let mut last = OpenOutcome::NoChange;
    for coords in safe {
        run_frames(&mut game, 1);
        let outcome = game.open(coords);
        if outcome != OpenOutcome::NoChange {
            last = outcome;
        }
    }

    assert_eq!(last, OpenOutcome::Won);
    assert_eq!(game.state(), GameState::Clear);
    assert_eq!(game.wallet().lives.get(), 3);
    let wallet = game.wallet();
    assert_eq!(
        wallet.score.get(),
        wallet.coin_bonus.get() + wallet.time_bonus.get()
    );
    assert!(wallet.time_bonus.get() < 60);
}

#[test]
fn minesweeper_countdown_forces_game_over() {
    let mut game = Minesweeper::new(minesweeper::Settings::default(), 3);
    game.start();

    run_frames(&mut game, 7600);

    assert_eq!(game.state(), GameState::GameOver);
    assert!(game.grid().iter().all(|cell| cell.is_opened()));
}

#[test]
fn reversi_plays_to_the_end_against_itself() {
    let mut game = Reversi::new(reversi::Settings::default());
    game.start();

    for _ in 0..100_000 {
        if game.state().is_finished() {
            break;
        }
        if game.accepts_click() {
            let choice = game
                .grid()
                .iter()
                .find(|cell| cell.is_placeable())
                .map(|cell| cell.position());
            if let Some(coords) = choice {
                game.click(coords);
            }
        }
        game.tick(FRAME);
    }

    assert!(game.state().is_finished());
    let black = game.stones(reversi::Stone::Black);
    let white = game.stones(reversi::Stone::White);
    let expected = match black.cmp(&white) {
        std::cmp::Ordering::Greater => reversi::Outcome::Win,
        std::cmp::Ordering::Equal => reversi::Outcome::Draw,
        std::cmp::Ordering::Less => reversi::Outcome::Lose,
    };
    assert_eq!(game.outcome(), Some(expected));
    assert!(black + white <= 64);
}

#[test]
fn settings_load_from_partial_json() {
    let settings: minesweeper::Settings =
        serde_json::from_str(r#"{ "columns": 16, "rows": 16, "mine_count": 40 }"#).unwrap();

    assert_eq!(settings.columns, 16);
    assert_eq!(settings.mine_count, 40);
    assert_eq!(settings.lives.initial, 3);

    let rules: life::Rules = serde_json::from_str(r#"{ "birth": 2 }"#).unwrap();
    assert_eq!(rules.overpopulation, 4);
}
