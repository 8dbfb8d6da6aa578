use std::sync::Arc;
use std::thread;
use std::time::Instant;

use tracing::{debug, trace};

use super::job_queue::{Job, JobQueue};
use super::semaphore::Semaphore;
use crate::grid::Grid;
use crate::timing::TimingCollector;

/// ワーカーがキューからジョブを取り出す方法
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PollStrategy {
    /// Condvarでブロックして待つ
    #[default]
    Block,
    /// try_pop_or_closedでビジーウェイトする（CPUを使い切るが応答は速い）
    Spin,
}

/// スケジューラとワーカーが共有する状態
#[derive(Debug, Default)]
pub struct Shared {
    pub queue: JobQueue,
    pub semaphore: Semaphore,
    pub timing: TimingCollector,
}

/// 担当行にライフゲームの規則を適用する。
/// `next` は `current` のコピーなので、状態が変わるセルだけ書けばよい。
pub fn apply_rules(current: &Grid, next: &Grid, rows: std::ops::RangeInclusive<usize>) {
    let width = current.width();

    for y in rows {
        for x in 0..width {
            let alive = current.get(x, y);
            let neighbors = current.neighbors(x, y);

            match (alive, neighbors) {
                (true, n) if n < 2 => next.set(x, y, false), // 過疎
                (true, n) if n > 3 => next.set(x, y, false), // 過密
                (false, 3) => next.set(x, y, true),          // 誕生
                _ => {}
            }
        }
    }
}

fn process(shared: &Shared, job: Job) {
    let start = Instant::now();
    apply_rules(&job.current, &job.next, job.rows());

    shared.semaphore.decrement();
    shared.timing.record_unit(start.elapsed());
    trace!(start = job.start, end = job.end, "job done");
}

fn next_job(queue: &JobQueue, poll: PollStrategy) -> Option<Job> {
    match poll {
        PollStrategy::Block => queue.pop(),
        PollStrategy::Spin => loop {
            match queue.try_pop_or_closed() {
                (Some(job), _) => return Some(job),
                (None, true) => return None,
                (None, false) => std::hint::spin_loop(),
            }
        },
    }
}

/// キューが閉じられるまでジョブを処理し続けるワーカースレッドを起動する
pub fn spawn(id: usize, shared: Arc<Shared>, poll: PollStrategy) -> std::io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name(format!("life-worker-{}", id))
        .spawn(move || {
            debug!(worker = id, ?poll, "worker started");
            let mut processed = 0usize;
            while let Some(job) = next_job(&shared.queue, poll) {
                process(&shared, job);
                processed += 1;
            }
            debug!(worker = id, processed, "worker stopped");
        })
}
