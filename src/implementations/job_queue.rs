use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex};

use crate::grid::Grid;

/// 1ワーカーが1世代ぶん担当する行範囲 `[start, end]`（両端を含む）
#[derive(Debug)]
pub struct Job {
    pub current: Arc<Grid>,
    pub next: Arc<Grid>,
    pub start: usize,
    pub end: usize,
}

impl Job {
    pub fn rows(&self) -> std::ops::RangeInclusive<usize> {
        self.start..=self.end
    }
}

#[derive(Debug, Default)]
struct QueueState {
    jobs: VecDeque<Job>,
    closed: bool,
}

/// スケジューラとワーカーで共有するFIFOのジョブキュー。
/// ロックはpush/popの間だけ保持し、ジョブの処理中には持たない。
#[derive(Debug, Default)]
pub struct JobQueue {
    state: Mutex<QueueState>,
    available: Condvar,
}

impl JobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, job: Job) {
        self.state.lock().unwrap().jobs.push_back(job);
        self.available.notify_one();
    }

    /// 空なら即座に `None` を返す
    pub fn try_pop(&self) -> Option<Job> {
        self.state.lock().unwrap().jobs.pop_front()
    }

    /// `try_pop` と同じロックの中で閉じられているかも返す
    pub fn try_pop_or_closed(&self) -> (Option<Job>, bool) {
        let mut state = self.state.lock().unwrap();
        (state.jobs.pop_front(), state.closed)
    }

    /// ジョブが来るまでブロックする。閉じられていて空なら `None`。
    pub fn pop(&self) -> Option<Job> {
        let state = self.state.lock().unwrap();
        let mut state = self
            .available
            .wait_while(state, |s| s.jobs.is_empty() && !s.closed)
            .unwrap();
        state.jobs.pop_front()
    }

    /// 以降ワーカーに終了を知らせる。残っているジョブは取り出せる。
    pub fn close(&self) {
        self.state.lock().unwrap().closed = true;
        self.available.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().unwrap().closed
    }

    pub fn len(&self) -> usize {
        self.state.lock().unwrap().jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
