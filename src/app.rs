//! Entry points used by the binary. Each takes its configuration explicitly
//! and returns values; nothing here prints.

use std::path::Path;

use tracing::{info, span, Level};

use crate::config::SolverConfig;
use crate::domain::solution::SolveOutcome;
use crate::domain::types::ProblemInstance;
use crate::error::Result;
use crate::render::{self, RenderOptions};
use crate::setup::{load_nodes, setup};
use crate::solver::{self, LocalSearchSolver, RoutingSolver};

/// The loaded problem together with what the solver made of it.
#[derive(Debug, Clone)]
pub struct SolveRun {
    pub problem: ProblemInstance,
    pub outcome: SolveOutcome,
}

/// Loads the node table at `csv_path` and solves it with the built-in engine.
pub fn solve_file(csv_path: &Path, config: SolverConfig) -> Result<SolveRun> {
    solve_file_with(csv_path, config, &LocalSearchSolver::default())
}

pub fn solve_file_with<S>(csv_path: &Path, config: SolverConfig, solver: &S) -> Result<SolveRun>
where
    S: RoutingSolver + ?Sized,
{
    let problem = {
        let setup_span = span!(Level::INFO, "setup");
        let _guard = setup_span.enter();
        let nodes = load_nodes(csv_path)?;
        setup(nodes, config)?
    };

    let outcome = solver::solve(&problem, solver)?;
    if let Some(solution) = outcome.solution() {
        info!("Total travel time {} min", solution.objective);
    }
    Ok(SolveRun { problem, outcome })
}

/// Draws the solved routes of `run`. Returns `false` without writing anything
/// when there is no solution to draw.
pub fn plot_run(run: &SolveRun, output: &Path, options: &RenderOptions) -> Result<bool> {
    let Some(solution) = run.outcome.solution() else {
        return Ok(false);
    };
    render::render_to_file(&run.problem.nodes, &solution.route_map(), options, output)?;
    Ok(true)
}

/// Draws the routes stored in `routes_path` over the nodes in `csv_path`.
pub fn plot_file(
    csv_path: &Path,
    routes_path: &Path,
    output: &Path,
    options: &RenderOptions,
) -> Result<()> {
    let nodes = load_nodes(csv_path)?;
    let routes = render::load_route_map(routes_path)?;
    info!(
        "Plotting {} routes from {}",
        routes.len(),
        routes_path.display()
    );
    render::render_to_file(&nodes, &routes, options, output)?;
    Ok(())
}
