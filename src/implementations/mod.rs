pub mod job_queue;
pub mod rayon_parallel;
pub mod scheduler;
pub mod semaphore;
pub mod single;
pub mod worker;
