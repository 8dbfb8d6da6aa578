pub mod benchmark;
pub mod config;
pub mod error;
pub mod grid;
pub mod implementations;
pub mod timing;

pub use error::LifeError;
pub use implementations::scheduler::{run, Engine};
