use std::mem;
use crate::grid::Grid;

fn next_state(alive: bool, neighbors: usize) -> bool {
    matches!((alive, neighbors), (true, 2) | (true, 3) | (false, 3))
}

// シングルスレッド版: 毎世代すべてのセルを新しいバッファへ書き出す
pub fn life_step(a: &mut Grid, b: &mut Grid, steps: usize) {
    let (width, height) = (a.width(), a.height());

    for _ in 0..steps {
        for y in 0..height {
            for x in 0..width {
                b.set(x, y, next_state(a.get(x, y), a.neighbors(x, y)));
            }
        }
        mem::swap(a, b);
    }
}

/// `grid` から `steps` 世代進めた盤面を返す
pub fn evolve(grid: &Grid, steps: usize) -> Grid {
    let mut a = grid.clone();
    let mut b = grid.clone();
    life_step(&mut a, &mut b, steps);
    a
}
