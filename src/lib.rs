pub mod app;
pub mod config;
pub mod distance;
pub mod domain;
pub mod error;
pub mod evaluation;
pub mod fixtures;
pub mod render;
pub mod report;
pub mod setup;
pub mod solver;
pub mod utils;

pub use config::SolverConfig;
pub use error::{Error, Result};
