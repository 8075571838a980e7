pub mod assignment;
pub mod construction;
pub mod index_manager;
pub mod local_search;
pub mod model;
pub mod params;
pub mod tour;

use tracing::{info, span, warn, Level};

pub use assignment::Assignment;
pub use local_search::LocalSearchSolver;
pub use model::RoutingModel;
pub use params::{FirstSolutionStrategy, Metaheuristic, SearchParameters};

use crate::domain::solution::{RoutingSolution, SolveOutcome, Stop, VehicleRoute};
use crate::domain::types::ProblemInstance;
use crate::error::{ModelError, Result};

/// A routing engine. Given the model and search parameters it returns an
/// assignment consistent with every time window and the route-duration bound,
/// or `None` when it finds no feasible assignment within the time budget.
pub trait RoutingSolver {
    fn solve(&self, model: &RoutingModel, params: &SearchParameters)
        -> Result<Option<Assignment>>;
}

/// Packages the problem for `solver`, runs it and reads the routes back.
pub fn solve<S>(problem: &ProblemInstance, solver: &S) -> Result<SolveOutcome>
where
    S: RoutingSolver + ?Sized,
{
    let model = RoutingModel::from_problem(problem)?;
    let params = problem.config.search_parameters();

    info!(
        "Solving with {} / {} (time limit {:?})",
        params.first_solution_strategy, params.metaheuristic, params.time_limit
    );

    let assignment = {
        let span = span!(Level::INFO, "solve");
        let _guard = span.enter();
        solver.solve(&model, &params)?
    };

    match assignment {
        Some(assignment) => Ok(SolveOutcome::Solved(unpack(problem, &model, &assignment)?)),
        None => {
            warn!("No solution found");
            Ok(SolveOutcome::NoSolution)
        }
    }
}

/// Walks each vehicle's successor chain from its start to its end, reading the
/// arrival time at every index.
pub fn unpack(
    problem: &ProblemInstance,
    model: &RoutingModel,
    assignment: &Assignment,
) -> Result<RoutingSolution> {
    let manager = model.manager();
    let mut routes = Vec::with_capacity(model.num_vehicles());

    for vehicle in 0..model.num_vehicles() {
        let mut stops = Vec::new();
        let mut travel_time = 0;
        let mut index = manager.start(vehicle);

        loop {
            let node = manager.index_to_node(index);
            let arrival = assignment
                .cumul(index)
                .ok_or(ModelError::BrokenAssignment { vehicle, index })?;
            if let Some(prev) = stops.last().map(|s: &Stop| s.node) {
                travel_time += model.transit(prev, node);
            }
            stops.push(Stop {
                node,
                name: problem.nodes[node].name.clone(),
                arrival,
            });

            if manager.is_end(index) {
                break;
            }
            // A route can never be longer than every index once.
            if stops.len() > manager.num_indices() {
                return Err(ModelError::BrokenAssignment { vehicle, index }.into());
            }
            index = assignment
                .next(index)
                .ok_or(ModelError::BrokenAssignment { vehicle, index })?;
        }

        routes.push(VehicleRoute {
            vehicle,
            stops,
            travel_time,
        });
    }

    let objective = routes.iter().map(|r| r.travel_time).sum();
    Ok(RoutingSolution { routes, objective })
}
