use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tui_2048::core::{is_game_over, legal_moves, move_grid, process_line, Game, Grid};
use tui_2048::types::Direction;

fn busy_grid() -> Grid {
    Grid::from_values([
        [2, 2, 4, 8],
        [0, 4, 4, 16],
        [32, 0, 32, 2],
        [2, 2, 2, 2],
    ])
    .unwrap_or_else(|_| Grid::empty())
}

fn bench_process_line(c: &mut Criterion) {
    c.bench_function("process_line_merge", |b| {
        b.iter(|| process_line(black_box([Some(2), Some(2), None, Some(4)])))
    });
}

fn bench_move_grid(c: &mut Criterion) {
    let grid = busy_grid();
    for dir in Direction::ALL {
        c.bench_function(&format!("move_grid_{}", dir.as_str()), |b| {
            b.iter(|| move_grid(black_box(&grid), dir))
        });
    }
}

fn bench_terminal_checks(c: &mut Criterion) {
    let full = Grid::from_values([
        [2, 4, 2, 4],
        [4, 2, 4, 2],
        [2, 4, 2, 4],
        [4, 2, 4, 2],
    ])
    .unwrap_or_else(|_| Grid::empty());

    c.bench_function("is_game_over_full", |b| b.iter(|| is_game_over(black_box(&full))));
    c.bench_function("legal_moves", |b| b.iter(|| legal_moves(black_box(&busy_grid()))));
}

fn bench_full_game(c: &mut Criterion) {
    c.bench_function("seeded_game_to_end", |b| {
        b.iter(|| {
            let mut game = Game::new(black_box(12345));
            let mut i = 0usize;
            while !game.game_over() && i < 10_000 {
                game.move_in(Direction::ALL[i % 4]);
                i += 1;
            }
            game.score()
        })
    });
}

criterion_group!(
    benches,
    bench_process_line,
    bench_move_grid,
    bench_terminal_checks,
    bench_full_game
);
criterion_main!(benches);
