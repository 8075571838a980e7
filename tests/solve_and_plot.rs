use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::{NamedTempFile, TempDir};

use vrptw::app::{self, SolveRun};
use vrptw::domain::solution::SolveOutcome;
use vrptw::error::{Error, InputError, RenderError};
use vrptw::fixtures::{generate_random_nodes, to_csv};
use vrptw::render::{BasemapMode, RenderOptions};
use vrptw::report::{self, format_outcome};
use vrptw::solver::Metaheuristic;
use vrptw::SolverConfig;

const DELIVERY_CSV: &str = "\
location,lat,lon,tw_start,tw_end
Depot,1.3000,103.8000,0,120
C1,1.3100,103.8100,0,30
C2,1.2900,103.7900,0,30
C3,1.3050,103.8300,30,90
C4,1.2800,103.8100,60,120
";

fn csv_file(content: impl AsRef<[u8]>) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_ref()).unwrap();
    file
}

fn quick_config() -> SolverConfig {
    SolverConfig {
        time_limit_seconds: 1,
        ..SolverConfig::default()
    }
}

fn no_basemap() -> RenderOptions {
    RenderOptions {
        basemap: BasemapMode::None,
        ..RenderOptions::default()
    }
}

/// Replays every route through the matrix and checks the time constraints.
fn assert_routes_respect_constraints(run: &SolveRun, config: &SolverConfig) {
    let solution = run.outcome.solution().expect("expected a solution");
    let matrix = &run.problem.time_matrix;
    assert_eq!(solution.routes.len(), config.vehicle_count);

    let mut visited = Vec::new();
    for route in &solution.routes {
        let stops = &route.stops;
        assert!(stops.len() >= 2);
        assert_eq!(stops[0].node, config.depot_index);
        assert_eq!(stops[stops.len() - 1].node, config.depot_index);

        let mut travel = 0;
        for pair in stops.windows(2) {
            let t = matrix.get(pair[0].node, pair[1].node);
            let gap = pair[1].arrival - pair[0].arrival;
            assert!(gap >= t, "arrival earlier than travel allows");
            assert!(gap - t <= config.max_wait_minutes, "waited too long");
            travel += t;
        }
        for stop in stops {
            let window = run.problem.nodes[stop.node].time_window;
            assert!(window.contains(stop.arrival), "{} at {}", stop.name, stop.arrival);
            assert!((0..=config.max_route_duration_minutes).contains(&stop.arrival));
        }
        assert_eq!(travel, route.travel_time);
        assert!(route.duration() <= config.max_route_duration_minutes);

        visited.extend(stops[1..stops.len() - 1].iter().map(|s| s.node));
    }

    visited.sort_unstable();
    let expected: Vec<usize> = (0..run.problem.nodes.len())
        .filter(|&n| n != config.depot_index)
        .collect();
    assert_eq!(visited, expected, "every customer exactly once");
}

#[test]
fn unreachable_customer_gives_no_solution() {
    // 222 minutes away but must be served by minute 5.
    let csv = csv_file("location,lat,lon,tw_start,tw_end\nDepot,0,0,0,120\nFar,0,1,0,5\n");
    let run = app::solve_file(csv.path(), quick_config()).unwrap();
    assert_eq!(run.outcome, SolveOutcome::NoSolution);
    assert_eq!(run.problem.time_matrix.get(0, 1), 222);
    assert_eq!(format_outcome(&run.outcome), "No solution found.\n");
}

#[test]
fn two_vehicles_with_compatible_windows() {
    let config = quick_config();
    let csv = csv_file(DELIVERY_CSV);
    let run = app::solve_file(csv.path(), config.clone()).unwrap();
    assert_routes_respect_constraints(&run, &config);
    assert!(run.problem.time_matrix.is_symmetric());

    let text = format_outcome(&run.outcome);
    assert!(text.contains("Route for vehicle 0:"));
    assert!(text.contains("Route for vehicle 1:"));
    assert!(text.contains("Depot (arrive="));
}

#[test]
fn every_metaheuristic_solves_random_instances() {
    let nodes = generate_random_nodes(8, 120, 11);
    let csv = csv_file(to_csv(&nodes).unwrap());
    for metaheuristic in Metaheuristic::ALL {
        let config = SolverConfig {
            vehicle_count: 4,
            max_wait_minutes: 120,
            metaheuristic,
            ..quick_config()
        };
        let run = app::solve_file(csv.path(), config.clone()).unwrap();
        assert!(
            run.outcome.solution().is_some(),
            "{metaheuristic:?} found no solution"
        );
        assert_routes_respect_constraints(&run, &config);
    }
}

#[test]
fn malformed_row_is_reported_with_its_number() {
    let csv = csv_file(
        "location,lat,lon,tw_start,tw_end\nDepot,1.3,103.8,0,120\nC1,north,103.81,0,30\n",
    );
    match app::solve_file(csv.path(), quick_config()) {
        Err(Error::Input(InputError::InvalidField { row, column, .. })) => {
            assert_eq!(row, 2);
            assert_eq!(column, "lat");
        }
        other => panic!("expected InvalidField, got {other:?}"),
    }
}

#[test]
fn solve_then_plot_from_saved_routes() {
    let dir = TempDir::new().unwrap();
    let csv = csv_file(DELIVERY_CSV);
    let run = app::solve_file(csv.path(), quick_config()).unwrap();
    let solution = run.outcome.solution().unwrap();

    let routes_path = dir.path().join("routes.json");
    report::write_routes_json(solution, &routes_path).unwrap();

    let svg_path = dir.path().join("map.svg");
    app::plot_file(csv.path(), &routes_path, &svg_path, &no_basemap()).unwrap();

    let svg = fs::read_to_string(&svg_path).unwrap();
    assert!(svg.contains("<svg") && svg.trim_end().ends_with("</svg>"));
    // At least a line and a legend swatch per vehicle, plus arrowheads.
    assert!(svg.matches("<polyline").count() >= 2 * solution.routes.len());
    assert_eq!(svg.matches("<circle").count(), 5);
    for route in &solution.routes {
        assert!(svg.contains(&format!("Vehicle {}", route.vehicle)));
    }
    assert!(svg.contains("Delivery Scheduling VRPTW"));
}

#[test]
fn plot_run_draws_the_solution_directly() {
    let dir = TempDir::new().unwrap();
    let csv = csv_file(DELIVERY_CSV);
    let run = app::solve_file(csv.path(), quick_config()).unwrap();
    let svg_path = dir.path().join("direct.svg");
    assert!(app::plot_run(&run, &svg_path, &no_basemap()).unwrap());
    assert!(svg_path.exists());
}

#[test]
fn hand_written_routes_with_unknown_stop_fail() {
    let dir = TempDir::new().unwrap();
    let csv = csv_file(DELIVERY_CSV);
    let routes_path = dir.path().join("routes.json");
    fs::write(&routes_path, r#"{ "0": ["Depot", "C1", "Depot"], "1": ["Depot", "C9", "Depot"] }"#)
        .unwrap();
    let svg_path = dir.path().join("map.svg");

    match app::plot_file(csv.path(), &routes_path, &svg_path, &no_basemap()) {
        Err(Error::Render(RenderError::UnknownStop { vehicle, name })) => {
            assert_eq!(vehicle, 1);
            assert_eq!(name, "C9");
        }
        other => panic!("expected UnknownStop, got {other:?}"),
    }
    assert!(!Path::new(&svg_path).exists());
}

#[test]
fn missing_routes_file_is_an_error() {
    let csv = csv_file(DELIVERY_CSV);
    let dir = TempDir::new().unwrap();
    let result = app::plot_file(
        csv.path(),
        &dir.path().join("absent.json"),
        &dir.path().join("map.svg"),
        &no_basemap(),
    );
    assert!(matches!(
        result,
        Err(Error::Render(RenderError::RoutesIo { .. }))
    ));
}
