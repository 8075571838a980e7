pub mod guided;
pub mod neighbourhood;
pub mod search;
pub mod tabu;

pub use search::LocalSearchSolver;
