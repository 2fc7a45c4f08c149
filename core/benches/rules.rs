use criterion::{Criterion, criterion_group, criterion_main};
use gridgames_core::life::{self, Life};
use gridgames_core::reversi::{self, Reversi};
use gridgames_core::{Game, GameState};
use std::hint::black_box;
use std::time::Duration;

fn bench_life_step(c: &mut Criterion) {
    let settings = life::Settings {
        columns: 64,
        rows: 64,
        initial_living_cells: 1200,
        ..life::Settings::default()
    };
    let mut game = Life::new(settings, 0xbeef);
    game.set_state(GameState::Play);

    c.bench_function("life_step_64x64", |b| {
        b.iter(|| {
            game.step();
            black_box(game.counters().living.get());
        })
    });
}

fn bench_reversi_turn(c: &mut Criterion) {
    c.bench_function("reversi_opening_exchange", |b| {
        b.iter(|| {
            let mut game = Reversi::new(reversi::Settings::default());
            game.start();
            game.click(black_box((2, 3)));
            while game.is_busy() {
                game.tick(Duration::from_millis(250));
            }
            black_box(game.stones(reversi::Stone::White))
        })
    });
}

fn bench_reversi_flippable(c: &mut Criterion) {
    let game = Reversi::new(reversi::Settings::default());
    let positions: Vec<_> = game.grid().positions().collect();

    c.bench_function("reversi_flippable_scan", |b| {
        b.iter(|| {
            positions
                .iter()
                .map(|&coords| game.flippable_count(black_box(coords)))
                .sum::<u16>()
        })
    });
}

criterion_group!(
    benches,
    bench_life_step,
    bench_reversi_turn,
    bench_reversi_flippable
);
criterion_main!(benches);
