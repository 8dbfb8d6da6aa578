use std::fs::OpenOptions;
use std::path::Path;

use tracing::debug;

use crate::error::LifeError;
use crate::timing::BenchmarkStats;

pub const HEADER: [&str; 6] = [
    "number of threads",
    "avg. time per generation",
    "avg. time per cell",
    "gen per second",
    "cell per second",
    "total execution time",
];

/// 集計結果をCSVに1行追記する。ファイルがまだ無いときだけヘッダーを書く。
pub fn append_result<P: AsRef<Path>>(path: P, stats: &BenchmarkStats) -> Result<(), LifeError> {
    let path = path.as_ref();
    let exists = path.exists();

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LifeError::Io { path: path.to_path_buf(), source })?;

    let mut writer = csv::Writer::from_writer(file);
    if !exists {
        writer.write_record(HEADER)?;
    }
    writer.write_record(&[
        stats.threads.to_string(),
        stats.avg_time_per_generation.to_string(),
        stats.avg_time_per_unit.to_string(),
        stats.generations_per_second.to_string(),
        stats.units_per_second.to_string(),
        stats.total_execution_time.to_string(),
    ])?;
    writer.flush().map_err(|source| LifeError::Io { path: path.to_path_buf(), source })?;

    debug!(path = %path.display(), header = !exists, "benchmark result appended");
    Ok(())
}
