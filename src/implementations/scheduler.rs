use std::ops::RangeInclusive;
use std::path::Path;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::job_queue::Job;
use super::worker::{self, PollStrategy, Shared};
use crate::config::RunConfig;
use crate::error::LifeError;
use crate::grid::Grid;
use crate::timing::BenchmarkStats;

/// `[0, height)` を `ceil(height / threads)` 行ずつのジョブに分割する。
/// 最後のジョブは残りの行だけを受け持つので、隙間も重なりもない。
pub fn partition_rows(height: usize, requested_threads: usize) -> Vec<RangeInclusive<usize>> {
    assert!(requested_threads > 0, "スレッド数は1以上である必要があります");
    let step = height.div_ceil(requested_threads);

    let mut ranges = Vec::with_capacity(requested_threads.min(height));
    let mut remaining = height;
    let mut start = 0;

    while remaining > 0 {
        let size = step.min(remaining);
        ranges.push(start..=start + size - 1);
        start += size;
        remaining -= size;
    }
    ranges
}

/*
  世代ごとの並列計算エンジン

  INIT → (PARTITION → DISPATCH → BARRIER_WAIT → SWAP) × 世代数 → FINALIZE

  1. PARTITION: current を丸ごとコピーして next を作り、行範囲ごとにジョブを作る
  2. DISPATCH: 各ジョブについて increment してからキューへ push
  3. BARRIER_WAIT: セマフォが0になるまで待つ（世代の同期点はここだけ）
  4. SWAP: next を新しい current にする
*/
pub struct Engine {
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
    requested_threads: usize,
    current: Arc<Grid>,
    generation: usize,
}

impl Engine {
    pub fn new(grid: Grid, threads: usize, poll: PollStrategy) -> Result<Self, LifeError> {
        if threads == 0 {
            return Err(LifeError::InvalidArgument("スレッド数は1以上である必要があります".into()));
        }
        if grid.width() == 0 || grid.height() == 0 {
            return Err(LifeError::EmptyGrid);
        }

        let actual_threads = grid.height().min(threads);
        let shared = Arc::new(Shared::default());

        let mut engine = Engine {
            shared,
            workers: Vec::with_capacity(actual_threads),
            requested_threads: threads,
            current: Arc::new(grid),
            generation: 0,
        };

        for id in 0..actual_threads {
            let handle = worker::spawn(id, Arc::clone(&engine.shared), poll).map_err(LifeError::Spawn)?;
            engine.workers.push(handle);
        }

        info!(
            width = engine.current.width(),
            height = engine.current.height(),
            requested_threads = threads,
            actual_threads,
            "engine started"
        );
        Ok(engine)
    }

    pub fn current(&self) -> &Grid {
        &self.current
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// 1世代進める
    pub fn step(&mut self) {
        let started = Instant::now();

        // 変化しないセルはそのまま残す必要があるので丸ごとコピー
        let next = Arc::new((*self.current).clone());

        let ranges = partition_rows(self.current.height(), self.requested_threads);
        let jobs = ranges.len();
        for rows in ranges {
            let job = Job {
                current: Arc::clone(&self.current),
                next: Arc::clone(&next),
                start: *rows.start(),
                end: *rows.end(),
            };
            // pushより先にincrement
            self.shared.semaphore.increment();
            self.shared.queue.push(job);
        }

        self.shared.semaphore.wait();

        self.current = next;
        self.generation += 1;

        let elapsed = started.elapsed();
        self.shared.timing.record_generation(elapsed);
        debug!(generation = self.generation, jobs, ?elapsed, "generation done");
    }

    pub fn run_generations(&mut self, generations: usize) {
        for _ in 0..generations {
            self.step();
        }
    }

    fn shutdown(&mut self) {
        self.shared.queue.close();
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                warn!("worker thread panicked");
            }
        }
    }

    /// ワーカーを停止・joinしてから最終グリッドと集計結果を返す
    pub fn finish(mut self, total: Duration) -> (Grid, BenchmarkStats) {
        self.shutdown();
        let stats = self.shared.timing.summarize(self.requested_threads, total);
        ((*self.current).clone(), stats)
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// 設定に従ってグリッドを読み込み、指定世代数だけ計算する
pub fn run_config(config: &RunConfig) -> Result<(Grid, BenchmarkStats), LifeError> {
    config.validate()?;
    let started = Instant::now();

    let grid = Grid::load_from_file(&config.input_path)?.with_edge_policy(config.edge);
    let mut engine = Engine::new(grid, config.threads, config.poll)?;
    engine.run_generations(config.generations);

    let (grid, stats) = engine.finish(started.elapsed());
    info!(
        generations = config.generations,
        threads = stats.threads,
        total_ms = stats.total_execution_time,
        "run finished"
    );
    Ok((grid, stats))
}

/// 入力ファイルを `generations` 世代ぶん `threads` スレッドで計算し、集計結果を返す
pub fn run<P: AsRef<Path>>(generations: usize, input_path: P, threads: usize) -> Result<BenchmarkStats, LifeError> {
    let config = RunConfig::new(input_path.as_ref(), generations, threads);
    run_config(&config).map(|(_, stats)| stats)
}
