pub mod haversine;
pub mod matrix;

pub use haversine::{haversine_km, travel_minutes};
pub use matrix::TimeMatrix;
