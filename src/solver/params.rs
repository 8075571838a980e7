use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How the first feasible assignment is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FirstSolutionStrategy {
    Automatic,
    PathCheapestArc,
    ParallelCheapestInsertion,
}

/// Improvement strategy applied after the first solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Metaheuristic {
    Automatic,
    GreedyDescent,
    GuidedLocalSearch,
    SimulatedAnnealing,
    TabuSearch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchParameters {
    pub first_solution_strategy: FirstSolutionStrategy,
    pub metaheuristic: Metaheuristic,
    pub time_limit: Duration,
}

impl Default for SearchParameters {
    fn default() -> Self {
        SearchParameters {
            first_solution_strategy: FirstSolutionStrategy::Automatic,
            metaheuristic: Metaheuristic::Automatic,
            time_limit: Duration::from_secs(3),
        }
    }
}

impl FirstSolutionStrategy {
    pub const ALL: [FirstSolutionStrategy; 3] = [
        FirstSolutionStrategy::Automatic,
        FirstSolutionStrategy::PathCheapestArc,
        FirstSolutionStrategy::ParallelCheapestInsertion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FirstSolutionStrategy::Automatic => "AUTOMATIC",
            FirstSolutionStrategy::PathCheapestArc => "PATH_CHEAPEST_ARC",
            FirstSolutionStrategy::ParallelCheapestInsertion => "PARALLEL_CHEAPEST_INSERTION",
        }
    }
}

impl Metaheuristic {
    pub const ALL: [Metaheuristic; 5] = [
        Metaheuristic::Automatic,
        Metaheuristic::GreedyDescent,
        Metaheuristic::GuidedLocalSearch,
        Metaheuristic::SimulatedAnnealing,
        Metaheuristic::TabuSearch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metaheuristic::Automatic => "AUTOMATIC",
            Metaheuristic::GreedyDescent => "GREEDY_DESCENT",
            Metaheuristic::GuidedLocalSearch => "GUIDED_LOCAL_SEARCH",
            Metaheuristic::SimulatedAnnealing => "SIMULATED_ANNEALING",
            Metaheuristic::TabuSearch => "TABU_SEARCH",
        }
    }
}

impl fmt::Display for FirstSolutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Metaheuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn normalise(raw: &str) -> String {
    raw.trim().to_ascii_uppercase().replace(['-', ' '], "_")
}

impl FromStr for FirstSolutionStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalise(s);
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == key)
            .ok_or_else(|| format!("unknown first solution strategy `{s}`"))
    }
}

impl FromStr for Metaheuristic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalise(s);
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == key)
            .ok_or_else(|| format!("unknown metaheuristic `{s}`"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_engine_style_names() {
        assert_eq!(
            "PATH_CHEAPEST_ARC".parse::<FirstSolutionStrategy>(),
            Ok(FirstSolutionStrategy::PathCheapestArc)
        );
        assert_eq!(
            "guided-local-search".parse::<Metaheuristic>(),
            Ok(Metaheuristic::GuidedLocalSearch)
        );
        assert!("SAVINGS".parse::<FirstSolutionStrategy>().is_err());
    }

    #[test]
    fn serde_names_match_display() {
        for m in Metaheuristic::ALL {
            let json = serde_json::to_string(&m).unwrap();
            assert_eq!(json, format!("\"{m}\""));
        }
        for s in FirstSolutionStrategy::ALL {
            let json = serde_json::to_string(&s).unwrap();
            assert_eq!(json, format!("\"{s}\""));
        }
    }
}
