use rayon::prelude::*;
use crate::grid::Grid;

// 書き込み先を行ごとに分割することで、ロック不要の並列化を実現する
pub fn life_step(current: &Grid) -> Grid {
    let width = current.width();
    let mut cells = vec![false; width * current.height()];

    // 各スレッドは異なる行（dst_row）にだけ書き込む
    cells.par_chunks_mut(width).enumerate().for_each(|(y, dst_row)| {
        for (x, cell) in dst_row.iter_mut().enumerate() {
            let alive = current.get(x, y);
            *cell = match current.neighbors(x, y) {
                3 => true,
                2 => alive,
                _ => false,
            };
        }
    });

    Grid::from_cells(width, current.height(), cells).with_edge_policy(current.edge_policy())
}

pub fn evolve(grid: &Grid, steps: usize) -> Grid {
    let mut current = grid.clone();
    for _ in 0..steps {
        current = life_step(&current);
    }
    current
}
