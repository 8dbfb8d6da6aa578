use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use rand::Rng;

use gameoflife_rust::benchmark::{append_result, HEADER};
use gameoflife_rust::grid::Grid;
use gameoflife_rust::implementations::job_queue::{Job, JobQueue};
use gameoflife_rust::implementations::semaphore::Semaphore;
use gameoflife_rust::implementations::worker::PollStrategy;
use gameoflife_rust::timing::BenchmarkStats;
use gameoflife_rust::{Engine, LifeError};

fn job(grid: &Arc<Grid>, start: usize, end: usize) -> Job {
    Job {
        current: Arc::clone(grid),
        next: Arc::clone(grid),
        start,
        end,
    }
}

#[test]
fn test_semaphore_waits_for_slowest_job() {
    const JOBS: usize = 8;
    let sema = Arc::new(Semaphore::new());
    let done = Arc::new(AtomicUsize::new(0));

    let mut rng = rand::thread_rng();
    let sleeps: Vec<u64> = (0..JOBS).map(|_| rng.gen_range(5..60)).collect();
    let slowest = Duration::from_millis(*sleeps.iter().max().unwrap());

    // ジョブを見せる前に全部数えておく
    for _ in 0..JOBS {
        sema.increment();
    }

    let started = Instant::now();
    let handles: Vec<_> = sleeps
        .into_iter()
        .map(|ms| {
            let sema = Arc::clone(&sema);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(ms));
                done.fetch_add(1, Ordering::SeqCst);
                sema.decrement();
            })
        })
        .collect();

    sema.wait();
    assert!(started.elapsed() >= slowest);
    assert_eq!(done.load(Ordering::SeqCst), JOBS);
    assert_eq!(sema.count(), 0);

    for h in handles {
        h.join().unwrap();
    }
}

#[test]
fn test_job_queue_is_fifo() {
    let grid = Arc::new(Grid::new(4, 4));
    let queue = JobQueue::new();
    assert!(queue.try_pop().is_none());

    queue.push(job(&grid, 0, 1));
    queue.push(job(&grid, 2, 3));
    assert_eq!(queue.len(), 2);

    assert_eq!(queue.try_pop().map(|j| j.start), Some(0));
    assert_eq!(queue.pop().map(|j| j.start), Some(2));
    assert!(queue.is_empty());
}

#[test]
fn test_job_queue_close_wakes_blocked_worker() {
    let queue = Arc::new(JobQueue::new());
    let waiter = {
        let queue = Arc::clone(&queue);
        thread::spawn(move || queue.pop().is_none())
    };

    thread::sleep(Duration::from_millis(20));
    queue.close();
    assert!(waiter.join().unwrap());
    assert!(queue.is_closed());
}

#[test]
fn test_job_queue_drains_after_close() {
    let grid = Arc::new(Grid::new(2, 2));
    let queue = JobQueue::new();
    queue.push(job(&grid, 0, 1));
    queue.close();

    assert_eq!(queue.pop().map(|j| j.rows()), Some(0..=1));
    assert!(queue.pop().is_none());
}

#[test]
fn test_job_queue_reports_closed_with_pop() {
    let grid = Arc::new(Grid::new(2, 2));
    let queue = JobQueue::new();

    let (job_taken, closed) = queue.try_pop_or_closed();
    assert!(job_taken.is_none());
    assert!(!closed);

    queue.push(job(&grid, 0, 1));
    queue.close();

    let (job_taken, closed) = queue.try_pop_or_closed();
    assert_eq!(job_taken.map(|j| j.start), Some(0));
    assert!(closed);

    let (job_taken, closed) = queue.try_pop_or_closed();
    assert!(job_taken.is_none());
    assert!(closed);
}

#[test]
fn test_engine_collects_timing() {
    let grid = Grid::with_live_cells(16, 16, &[(7, 8), (8, 8), (9, 8)]);
    let mut engine = Engine::new(grid, 4, PollStrategy::Block).unwrap();
    let started = Instant::now();
    engine.run_generations(10);
    let (grid, stats) = engine.finish(started.elapsed());

    assert_eq!(stats.threads, 4);
    assert!(stats.avg_time_per_generation > 0.0);
    assert!(stats.avg_time_per_unit > 0.0);
    // 1世代あたり4ジョブ
    let ratio = stats.units_per_second / stats.generations_per_second;
    assert!((ratio - 4.0).abs() < 1e-6, "ratio={}", ratio);
    assert_eq!(grid.live_count(), 3);
}

#[test]
fn test_engine_drop_stops_workers() {
    let engine = Engine::new(Grid::new(8, 8), 8, PollStrategy::Spin).unwrap();
    assert_eq!(engine.worker_count(), 8);
    drop(engine);
}

#[test]
fn test_benchmark_csv_header_written_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.csv");

    let stats = BenchmarkStats {
        threads: 4,
        avg_time_per_generation: 1.5,
        avg_time_per_unit: 0.25,
        generations_per_second: 600.0,
        units_per_second: 2400.0,
        total_execution_time: 166.5,
    };
    append_result(&path, &stats).unwrap();
    append_result(&path, &stats).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], HEADER.join(","));
    assert_eq!(lines[1], "4,1.5,0.25,600,2400,166.5");
    assert_eq!(lines[1], lines[2]);
}

#[test]
fn test_load_missing_file() {
    match Grid::load_from_file("no/such/grid.cells") {
        Err(LifeError::Io { path, .. }) => assert!(path.ends_with("grid.cells")),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_save_failure_is_reported_as_file_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing-dir").join("out.cells");

    let err = Grid::new(2, 2).save_to_file(&path).unwrap_err();
    assert!(matches!(err, LifeError::Io { .. }));
    let message = err.to_string();
    assert!(message.contains("ファイル操作に失敗しました"), "{}", message);
    assert!(!message.contains("読み込めません"), "{}", message);
}

#[test]
fn test_save_and_load_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("glider.cells");
    let grid = Grid::with_live_cells(6, 4, &[(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)]);

    grid.save_to_file(&path).unwrap();
    let loaded = Grid::load_from_file(&path).unwrap();
    assert_eq!(grid, loaded);
}
