use std::error::Error;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vrptw::app;
use vrptw::config::constant::DEFAULT_PLOT_PATH;
use vrptw::render::{BasemapMode, RenderOptions};
use vrptw::report;
use vrptw::solver::{FirstSolutionStrategy, Metaheuristic};
use vrptw::SolverConfig;

#[derive(Parser)]
#[clap(author, version, about = "Delivery scheduling with time windows", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a node table and print one route per vehicle
    Solve(SolveArgs),
    /// Draw saved routes over a map
    Plot(PlotArgs),
}

#[derive(Args)]
struct SolveArgs {
    /// CSV with columns location,lat,lon,tw_start,tw_end
    #[arg(short, long)]
    input: PathBuf,

    /// JSON file with solver settings, applied over the environment
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    vehicles: Option<usize>,

    #[arg(long)]
    depot: Option<usize>,

    #[arg(long)]
    max_wait: Option<i64>,

    #[arg(long)]
    max_route_duration: Option<i64>,

    /// AUTOMATIC, PATH_CHEAPEST_ARC or PARALLEL_CHEAPEST_INSERTION
    #[arg(long)]
    first_solution: Option<FirstSolutionStrategy>,

    /// AUTOMATIC, GREEDY_DESCENT, GUIDED_LOCAL_SEARCH, SIMULATED_ANNEALING or TABU_SEARCH
    #[arg(long)]
    metaheuristic: Option<Metaheuristic>,

    /// Search time limit in seconds
    #[arg(short, long)]
    time_limit: Option<u64>,

    /// Write the solution as JSON
    #[arg(long)]
    routes_out: Option<PathBuf>,

    /// Also draw the solution; takes an optional output path
    #[arg(long, num_args = 0..=1, default_missing_value = DEFAULT_PLOT_PATH)]
    plot: Option<PathBuf>,

    /// none, linked or embedded
    #[arg(long, default_value = "linked")]
    basemap: BasemapMode,
}

#[derive(Args)]
struct PlotArgs {
    /// CSV with columns location,lat,lon,tw_start,tw_end
    #[arg(short, long)]
    input: PathBuf,

    /// Solver JSON output or a {"vehicle": ["stop", ...]} object
    #[arg(short, long)]
    routes: PathBuf,

    #[arg(short, long, default_value = DEFAULT_PLOT_PATH)]
    output: PathBuf,

    /// none, linked or embedded
    #[arg(long, default_value = "linked")]
    basemap: BasemapMode,
}

/// Initialize tracing on stderr so stdout only carries the route report
fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Defaults, then `VRPTW_*` variables, then the config file, then flags.
fn solver_config(args: &SolveArgs) -> Result<SolverConfig, Box<dyn Error>> {
    let mut config = SolverConfig::from_env()?;
    if let Some(path) = &args.config {
        config = config.with_json_file(path)?;
    }

    if let Some(v) = args.vehicles {
        config.vehicle_count = v;
    }
    if let Some(v) = args.depot {
        config.depot_index = v;
    }
    if let Some(v) = args.max_wait {
        config.max_wait_minutes = v;
    }
    if let Some(v) = args.max_route_duration {
        config.max_route_duration_minutes = v;
    }
    if let Some(v) = args.first_solution {
        config.first_solution_strategy = v;
    }
    if let Some(v) = args.metaheuristic {
        config.metaheuristic = v;
    }
    if let Some(v) = args.time_limit {
        config.time_limit_seconds = v;
    }
    Ok(config)
}

fn solve(args: SolveArgs) -> Result<(), Box<dyn Error>> {
    let config = solver_config(&args)?;
    info!("Solver config: {:?}", config);

    let run = app::solve_file(&args.input, config)?;
    report::print_outcome(&run.outcome);

    if let Some(path) = &args.routes_out {
        match run.outcome.solution() {
            Some(solution) => report::write_routes_json(solution, path)?,
            None => warn!("No solution, {} not written", path.display()),
        }
    }

    if let Some(path) = &args.plot {
        let options = RenderOptions {
            basemap: args.basemap,
            ..RenderOptions::default()
        };
        if app::plot_run(&run, path, &options)? {
            info!("Map saved to {}", path.display());
        } else {
            warn!("No solution, {} not drawn", path.display());
        }
    }
    Ok(())
}

fn plot(args: PlotArgs) -> Result<(), Box<dyn Error>> {
    let options = RenderOptions {
        basemap: args.basemap,
        ..RenderOptions::default()
    };
    app::plot_file(&args.input, &args.routes, &args.output, &options)?;
    info!("Map saved to {}", args.output.display());
    Ok(())
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Commands::Solve(args) => solve(args),
        Commands::Plot(args) => plot(args),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    run()
}
