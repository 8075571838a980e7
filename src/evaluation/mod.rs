pub mod fitness;
pub mod schedule;
