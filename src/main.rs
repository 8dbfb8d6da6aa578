use gameoflife_rust::benchmark::append_result;
use gameoflife_rust::config::RunConfig;
use gameoflife_rust::implementations::scheduler::run_config;
use gameoflife_rust::LifeError;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = try_main() {
        eprintln!("エラー: {}", e);
        std::process::exit(1);
    }
}

fn try_main() -> Result<(), LifeError> {
    let config = RunConfig::from_args(std::env::args().skip(1))?;

    println!("=== ライフゲーム 並列ベンチマーク ===");
    println!(
        "入力: {}, 世代数: {}, スレッド数: {}\n",
        config.input_path.display(),
        config.generations,
        config.threads
    );

    let (grid, stats) = run_config(&config)?;

    if config.print_final {
        grid.print();
        println!();
    }

    println!("  1世代あたりの平均時間:   {:.4}ms", stats.avg_time_per_generation);
    println!("  1ジョブあたりの平均時間: {:.4}ms", stats.avg_time_per_unit);
    println!("  世代/秒:                 {:.2}", stats.generations_per_second);
    println!("  ジョブ/秒:               {:.2}", stats.units_per_second);
    println!("  総実行時間:              {:.4}ms", stats.total_execution_time);

    append_result(&config.results_path, &stats)?;
    println!("\n結果を {} に追記しました。", config.results_path.display());
    Ok(())
}
