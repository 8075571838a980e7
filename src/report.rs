use std::fs;
use std::path::Path;

use colored::*;
use itertools::Itertools;
use tracing::info;

use crate::domain::solution::{RoutingSolution, SolveOutcome, VehicleRoute};
use crate::error::{Error, Result};

pub const NO_SOLUTION: &str = "No solution found.";

/// ` Depot (arrive=0) -> C1 (arrive=12) -> Depot (arrive=30)`
pub fn format_route(route: &VehicleRoute) -> String {
    let stops = route
        .stops
        .iter()
        .map(|s| format!("{} (arrive={})", s.name, s.arrival))
        .join(" -> ");
    format!(" {stops}")
}

/// Plain-text report, one header line and one stop line per vehicle.
pub fn format_outcome(outcome: &SolveOutcome) -> String {
    match outcome {
        SolveOutcome::Solved(solution) => solution
            .routes
            .iter()
            .map(|route| {
                format!(
                    "Route for vehicle {}:\n{}\n",
                    route.vehicle,
                    format_route(route)
                )
            })
            .join("\n"),
        SolveOutcome::NoSolution => format!("{NO_SOLUTION}\n"),
    }
}

/// Prints the report to stdout, highlighting unused vehicles and the totals.
pub fn print_outcome(outcome: &SolveOutcome) {
    let SolveOutcome::Solved(solution) = outcome else {
        println!("{}", NO_SOLUTION.red());
        return;
    };

    for route in &solution.routes {
        println!();
        println!("{}", format!("Route for vehicle {}:", route.vehicle).bold());
        let line = format_route(route);
        if route.is_unused() {
            println!("{}", line.dimmed());
        } else {
            println!("{line}");
        }
    }
    println!();
    println!(
        "{}, {}",
        format!("Total travel time: {} min", solution.objective).green(),
        vehicles_used(solution)
    );
}

/// `Vehicles used: 1/2`, counting vehicles that leave the depot.
pub fn vehicles_used(solution: &RoutingSolution) -> String {
    format!(
        "Vehicles used: {}/{}",
        solution.routes.iter().filter(|r| !r.is_unused()).count(),
        solution.routes.len()
    )
}

/// Saves the solution as pretty JSON, readable by `plot --routes`.
pub fn write_routes_json(solution: &RoutingSolution, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(solution)?;
    fs::write(path, json).map_err(|source| Error::Output {
        path: path.display().to_string(),
        source,
    })?;
    info!("Routes written to {}", path.display());
    Ok(())
}
