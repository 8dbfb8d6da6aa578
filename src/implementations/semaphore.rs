use std::sync::{Condvar, Mutex};

/*
  未完了ジョブ数を数えるカウンティングセマフォ（世代バリア）

  - スケジューラはジョブをキューに入れる「前」に increment する
    （先に入れると、全ジョブを数え終わる前に wait が 0 を観測しうる）
  - ワーカーはジョブ完了後に decrement する
  - wait はカウントが 0 になるまで Condvar でブロックする（スピンしない）

  decrement と wait は同じ Mutex を通るので、ワーカーがグリッドへ書いた内容は
  wait から戻ったスケジューラから必ず見える。
*/
#[derive(Debug, Default)]
pub struct Semaphore {
    count: Mutex<usize>,
    zero: Condvar,
}

impl Semaphore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&self) {
        *self.count.lock().unwrap() += 1;
    }

    pub fn decrement(&self) {
        let mut count = self.count.lock().unwrap();
        assert!(*count > 0, "カウントが0のセマフォをdecrementしました");
        *count -= 1;
        // 0かどうかの再確認は待機側に任せる
        self.zero.notify_all();
    }

    /// カウントがちょうど0になるまでブロックする
    pub fn wait(&self) {
        let count = self.count.lock().unwrap();
        let _count = self.zero.wait_while(count, |c| *c > 0).unwrap();
    }

    pub fn count(&self) -> usize {
        *self.count.lock().unwrap()
    }
}
