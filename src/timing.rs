use std::sync::Mutex;
use std::time::Duration;

/// 1回の実行の集計結果（時間はすべてミリ秒）
#[derive(Clone, Debug, PartialEq)]
pub struct BenchmarkStats {
    pub threads: usize,
    pub avg_time_per_generation: f64,
    pub avg_time_per_unit: f64,
    pub generations_per_second: f64,
    pub units_per_second: f64,
    pub total_execution_time: f64,
}

/// 世代ごと・ジョブごとの経過時間。ワーカーが並行して追記するので別々のMutexで守る。
#[derive(Debug, Default)]
pub struct TimingCollector {
    per_generation: Mutex<Vec<f64>>,
    per_unit: Mutex<Vec<f64>>,
}

fn as_millis(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

fn average(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

impl TimingCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_generation(&self, elapsed: Duration) {
        self.per_generation.lock().unwrap().push(as_millis(elapsed));
    }

    pub fn record_unit(&self, elapsed: Duration) {
        self.per_unit.lock().unwrap().push(as_millis(elapsed));
    }

    pub fn summarize(&self, threads: usize, total: Duration) -> BenchmarkStats {
        let generations = self.per_generation.lock().unwrap();
        let units = self.per_unit.lock().unwrap();
        let secs = total.as_secs_f64();
        let per_second = |n: usize| if secs > 0.0 { n as f64 / secs } else { 0.0 };

        BenchmarkStats {
            threads,
            avg_time_per_generation: average(&generations),
            avg_time_per_unit: average(&units),
            generations_per_second: per_second(generations.len()),
            units_per_second: per_second(units.len()),
            total_execution_time: as_millis(total),
        }
    }
}
