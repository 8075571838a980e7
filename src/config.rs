use std::env;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use dotenv::dotenv;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ConfigError;
use crate::solver::{FirstSolutionStrategy, Metaheuristic, SearchParameters};

pub mod constant {
    pub(crate) const SEED: u64 = 64;
    pub(crate) const EARTH_RADIUS_KM: f64 = 6371.0;
    pub(crate) const SPEED_KMH: f64 = 30.0;
    pub(crate) const GLS_LAMBDA_FACTOR: f64 = 0.1;
    pub(crate) const TABU_LOWER_BOUND_LEN: usize = 7;
    pub(crate) const TABU_UPPER_BOUND_LEN: usize = 15;
    pub(crate) const ASPIRATION_THRESHOLD: i64 = 0;
    pub(crate) const MIN_NO_IMPROVEMENT: usize = 300;
    pub const DEFAULT_PLOT_PATH: &str = "delivery_vrptw.svg";
    pub const PLOT_TITLE: &str = "Delivery Scheduling VRPTW";
}

const ENV_PREFIX: &str = "VRPTW_";

/// Knobs handed to the routing model and the search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverConfig {
    pub vehicle_count: usize,
    pub depot_index: usize,
    pub max_wait_minutes: i64,
    pub max_route_duration_minutes: i64,
    pub first_solution_strategy: FirstSolutionStrategy,
    pub metaheuristic: Metaheuristic,
    pub time_limit_seconds: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            vehicle_count: 2,
            depot_index: 0,
            max_wait_minutes: 30,
            max_route_duration_minutes: 120,
            first_solution_strategy: FirstSolutionStrategy::PathCheapestArc,
            metaheuristic: Metaheuristic::GuidedLocalSearch,
            time_limit_seconds: 3,
        }
    }
}

impl SolverConfig {
    /// Defaults overridden by `VRPTW_*` variables (a `.env` file is honoured).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        let mut config = SolverConfig::default();

        if let Some(v) = read_var("VEHICLE_COUNT")? {
            config.vehicle_count = v;
        }
        if let Some(v) = read_var("DEPOT_INDEX")? {
            config.depot_index = v;
        }
        if let Some(v) = read_var("MAX_WAIT_MINUTES")? {
            config.max_wait_minutes = v;
        }
        if let Some(v) = read_var("MAX_ROUTE_DURATION_MINUTES")? {
            config.max_route_duration_minutes = v;
        }
        if let Some(v) = read_var("FIRST_SOLUTION_STRATEGY")? {
            config.first_solution_strategy = v;
        }
        if let Some(v) = read_var("METAHEURISTIC")? {
            config.metaheuristic = v;
        }
        if let Some(v) = read_var("TIME_LIMIT_SECONDS")? {
            config.time_limit_seconds = v;
        }

        debug!("Solver config from environment: {:?}", config);
        Ok(config)
    }

    /// Reads a JSON config file. Missing keys keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        SolverConfig::default().with_json_file(path)
    }

    /// Overrides only the keys present in the JSON config file at `path`.
    pub fn with_json_file(self, path: &Path) -> Result<Self, ConfigError> {
        let json_error = |source: serde_json::Error| ConfigError::Json {
            path: path.display().to_string(),
            source,
        };
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let overrides: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(&content).map_err(json_error)?;

        let mut merged = serde_json::to_value(&self).map_err(json_error)?;
        if let serde_json::Value::Object(fields) = &mut merged {
            fields.extend(overrides);
        }
        let config: SolverConfig = serde_json::from_value(merged).map_err(json_error)?;
        info!("Loaded solver config from {}", path.display());
        Ok(config)
    }

    pub fn search_parameters(&self) -> SearchParameters {
        SearchParameters {
            first_solution_strategy: self.first_solution_strategy,
            metaheuristic: self.metaheuristic,
            time_limit: Duration::from_secs(self.time_limit_seconds),
        }
    }
}

fn read_var<T>(suffix: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let key = format!("{ENV_PREFIX}{suffix}");
    match env::var(&key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidVar {
                key,
                value: raw,
                reason: e.to_string(),
            }),
        Err(_) => Ok(None),
    }
}
