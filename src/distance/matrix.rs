use rayon::prelude::*;
use tracing::{debug, info, trace};

use super::haversine::{haversine_km, travel_minutes};
use crate::domain::types::Coordinate;
use crate::error::MatrixError;

/// Square travel-time matrix in whole minutes, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeMatrix {
    size: usize,
    times: Vec<i64>,
}

impl TimeMatrix {
    /// Builds the all-pairs matrix from coordinates at a constant speed.
    /// Rows are computed in parallel.
    pub fn from_coordinates(
        coordinates: &[Coordinate],
        speed_kmh: f64,
    ) -> Result<TimeMatrix, MatrixError> {
        if !speed_kmh.is_finite() || speed_kmh <= 0.0 {
            return Err(MatrixError::InvalidSpeed(speed_kmh));
        }
        if let Some((index, c)) = coordinates.iter().enumerate().find(|(_, c)| !c.is_valid()) {
            return Err(MatrixError::InvalidCoordinate {
                index,
                lat: c.lat,
                lon: c.lon,
            });
        }

        info!(
            "Creating travel-time matrix for {} nodes at {} km/h",
            coordinates.len(),
            speed_kmh
        );

        let size = coordinates.len();
        let times: Vec<i64> = coordinates
            .par_iter()
            .flat_map_iter(|&from| {
                coordinates
                    .iter()
                    .map(move |&to| travel_minutes(haversine_km(from, to), speed_kmh))
            })
            .collect();

        let matrix = TimeMatrix { size, times };
        matrix.log_rows();
        Ok(matrix)
    }

    /// Wraps precomputed rows. Every row must have `rows.len()` entries.
    pub fn from_rows(rows: Vec<Vec<i64>>) -> TimeMatrix {
        let size = rows.len();
        debug_assert!(rows.iter().all(|r| r.len() == size));
        TimeMatrix {
            size,
            times: rows.into_iter().flatten().collect(),
        }
    }

    #[inline]
    pub fn get(&self, from: usize, to: usize) -> i64 {
        self.times[from * self.size + to]
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn row(&self, from: usize) -> &[i64] {
        &self.times[from * self.size..(from + 1) * self.size]
    }

    pub fn is_symmetric(&self) -> bool {
        (0..self.size).all(|i| (i + 1..self.size).all(|j| self.get(i, j) == self.get(j, i)))
    }

    /// Mean off-diagonal travel time, 0 for matrices with fewer than two nodes.
    pub fn mean_arc(&self) -> f64 {
        if self.size < 2 {
            return 0.0;
        }
        let total: i64 = self.times.iter().sum();
        total as f64 / (self.size * (self.size - 1)) as f64
    }

    fn log_rows(&self) {
        debug!("Time matrix ({}x{}):", self.size, self.size);
        for i in 0..self.size {
            trace!("{:?}", self.row(i));
        }
    }
}
