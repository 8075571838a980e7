use tracing::{debug, info};

use crate::config::constant::SPEED_KMH;
use crate::config::SolverConfig;
use crate::distance::matrix::TimeMatrix;
use crate::domain::types::{Coordinate, Node, ProblemInstance};
use crate::error::Result;

/// Builds the travel-time matrix for the loaded nodes and bundles everything
/// the solver needs.
pub fn setup(nodes: Vec<Node>, config: SolverConfig) -> Result<ProblemInstance> {
    info!(
        "Starting setup with {} vehicles, {} nodes (depot {})",
        config.vehicle_count,
        nodes.len(),
        config.depot_index
    );

    let coordinates: Vec<Coordinate> = nodes.iter().map(|n| n.coordinate).collect();
    let time_matrix = TimeMatrix::from_coordinates(&coordinates, SPEED_KMH)?;
    debug!("Mean travel time: {:.1} min", time_matrix.mean_arc());

    info!("Setup completed successfully");
    Ok(ProblemInstance {
        nodes,
        time_matrix,
        config,
    })
}
