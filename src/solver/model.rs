use tracing::debug;

use super::index_manager::IndexManager;
use crate::config::SolverConfig;
use crate::distance::matrix::TimeMatrix;
use crate::domain::types::{ProblemInstance, TimeWindow};
use crate::error::ModelError;

/// Everything a routing engine needs: transit times, the time dimension and
/// the fleet layout.
#[derive(Debug, Clone)]
pub struct RoutingModel {
    manager: IndexManager,
    matrix: TimeMatrix,
    windows: Vec<TimeWindow>,
    vehicle_starts: Vec<TimeWindow>,
    max_wait: i64,
    horizon: i64,
}

impl RoutingModel {
    pub fn new(
        matrix: TimeMatrix,
        windows: Vec<TimeWindow>,
        config: &SolverConfig,
    ) -> Result<RoutingModel, ModelError> {
        let nodes = matrix.size();
        if config.vehicle_count == 0 {
            return Err(ModelError::NoVehicles);
        }
        if config.depot_index >= nodes {
            return Err(ModelError::DepotOutOfRange {
                depot: config.depot_index,
                nodes,
            });
        }
        if windows.len() != nodes {
            return Err(ModelError::WindowCountMismatch {
                expected: nodes,
                actual: windows.len(),
            });
        }
        if let Some((node, w)) = windows.iter().enumerate().find(|(_, w)| !w.is_well_formed()) {
            return Err(ModelError::InvertedTimeWindow {
                node,
                start: w.start,
                end: w.end,
            });
        }
        if config.max_wait_minutes < 0 {
            return Err(ModelError::NegativeLimit {
                name: "max_wait_minutes",
                value: config.max_wait_minutes,
            });
        }
        if config.max_route_duration_minutes < 0 {
            return Err(ModelError::NegativeLimit {
                name: "max_route_duration_minutes",
                value: config.max_route_duration_minutes,
            });
        }

        let horizon = config.max_route_duration_minutes;
        let vehicle_starts = vec![TimeWindow::new(0, horizon); config.vehicle_count];

        debug!(
            "Routing model: {} nodes, {} vehicles, depot {}, max wait {}, horizon {}",
            nodes, config.vehicle_count, config.depot_index, config.max_wait_minutes, horizon
        );

        Ok(RoutingModel {
            manager: IndexManager::new(nodes, config.vehicle_count, config.depot_index),
            matrix,
            windows,
            vehicle_starts,
            max_wait: config.max_wait_minutes,
            horizon,
        })
    }

    pub fn from_problem(problem: &ProblemInstance) -> Result<RoutingModel, ModelError> {
        RoutingModel::new(
            problem.time_matrix.clone(),
            problem.time_windows(),
            &problem.config,
        )
    }

    pub fn manager(&self) -> &IndexManager {
        &self.manager
    }

    pub fn num_vehicles(&self) -> usize {
        self.manager.num_vehicles()
    }

    pub fn num_nodes(&self) -> usize {
        self.manager.num_nodes()
    }

    pub fn depot(&self) -> usize {
        self.manager.depot()
    }

    /// Non-depot nodes in node order.
    pub fn customers(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.num_nodes()).filter(move |&n| n != self.depot())
    }

    #[inline]
    pub fn transit(&self, from_node: usize, to_node: usize) -> i64 {
        self.matrix.get(from_node, to_node)
    }

    pub fn matrix(&self) -> &TimeMatrix {
        &self.matrix
    }

    pub fn max_wait(&self) -> i64 {
        self.max_wait
    }

    pub fn horizon(&self) -> i64 {
        self.horizon
    }

    /// Allowed arrival interval at a node, clipped to the dimension capacity.
    pub fn node_range(&self, node: usize) -> TimeWindow {
        self.clip(self.windows[node])
    }

    /// Allowed departure interval for a vehicle: depot window intersected with
    /// the vehicle's availability.
    pub fn start_range(&self, vehicle: usize) -> TimeWindow {
        let depot = self.windows[self.depot()];
        let avail = self.vehicle_starts[vehicle];
        self.clip(TimeWindow::new(
            depot.start.max(avail.start),
            depot.end.min(avail.end),
        ))
    }

    /// Allowed return interval. The depot window bounds the return of every
    /// vehicle, not only vehicle 0's.
    pub fn end_range(&self, _vehicle: usize) -> TimeWindow {
        self.node_range(self.depot())
    }

    fn clip(&self, w: TimeWindow) -> TimeWindow {
        TimeWindow::new(w.start.max(0), w.end.min(self.horizon))
    }
}
