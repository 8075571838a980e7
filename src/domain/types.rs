use serde::{Deserialize, Serialize};

use crate::config::SolverConfig;
use crate::distance::matrix::TimeMatrix;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Coordinate { lat, lon }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// Arrival interval in minutes from the shared epoch, bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: i64,
    pub end: i64,
}

impl TimeWindow {
    pub fn new(start: i64, end: i64) -> Self {
        TimeWindow { start, end }
    }

    pub fn contains(&self, time: i64) -> bool {
        (self.start..=self.end).contains(&time)
    }

    pub fn is_well_formed(&self) -> bool {
        self.start <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    pub coordinate: Coordinate,
    pub time_window: TimeWindow,
}

#[derive(Debug, Clone)]
pub struct ProblemInstance {
    pub nodes: Vec<Node>,
    pub time_matrix: TimeMatrix,
    pub config: SolverConfig,
}

impl ProblemInstance {
    pub fn node_names(&self) -> Vec<String> {
        self.nodes.iter().map(|n| n.name.clone()).collect()
    }

    pub fn time_windows(&self) -> Vec<TimeWindow> {
        self.nodes.iter().map(|n| n.time_window).collect()
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }
}
