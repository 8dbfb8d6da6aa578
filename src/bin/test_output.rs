use gameoflife_rust::grid::Grid;
use gameoflife_rust::implementations::rayon_parallel;
use gameoflife_rust::implementations::single;
use gameoflife_rust::implementations::worker::PollStrategy;
use gameoflife_rust::Engine;

// Rスペントミノ: 長く変化し続けるので実装間の比較に向いている
const R_PENTOMINO: [(usize, usize); 5] = [(31, 30), (32, 30), (30, 31), (31, 31), (31, 32)];

fn main() {
    let test_steps = 100; // テスト用のステップ数
    let initial = Grid::with_live_cells(64, 64, &R_PENTOMINO);

    println!("=== Rust実装の結果出力テスト ===");
    println!("ステップ数: {}", test_steps);
    println!();

    let tests: [(&str, fn(&Grid, usize) -> Grid); 5] = [
        ("single", run_single),
        ("rayon", run_rayon),
        ("engine_1", |g, s| run_engine(g, s, 1, PollStrategy::Block)),
        ("engine_4", |g, s| run_engine(g, s, 4, PollStrategy::Block)),
        ("engine_4_spin", |g, s| run_engine(g, s, 4, PollStrategy::Spin)),
    ];

    let expected = run_single(&initial, test_steps);

    for (name, test_fn) in tests {
        let result = test_fn(&initial, test_steps);
        let filename = format!("rust_{}.cells", name);

        result.save_to_file(&filename).expect("Failed to save file");
        println!("✓ {} -> {}", name, filename);
        println!("  生存セル数 = {}", result.live_count());
        println!("  シングル版と一致: {}", result == expected);
        println!();
    }

    println!("全ての結果ファイルを出力しました。");
}

fn run_single(grid: &Grid, steps: usize) -> Grid {
    single::evolve(grid, steps)
}

fn run_rayon(grid: &Grid, steps: usize) -> Grid {
    rayon_parallel::evolve(grid, steps)
}

fn run_engine(grid: &Grid, steps: usize, threads: usize, poll: PollStrategy) -> Grid {
    let mut engine = Engine::new(grid.clone(), threads, poll).expect("Failed to start engine");
    engine.run_generations(steps);
    engine.current().clone()
}
