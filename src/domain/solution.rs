use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stop {
    pub node: usize,
    pub name: String,
    pub arrival: i64,
}

/// One vehicle's tour, depot to depot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleRoute {
    pub vehicle: usize,
    pub stops: Vec<Stop>,
    pub travel_time: i64,
}

impl VehicleRoute {
    /// Elapsed time between leaving and returning to the depot.
    pub fn duration(&self) -> i64 {
        match (self.stops.first(), self.stops.last()) {
            (Some(first), Some(last)) => last.arrival - first.arrival,
            _ => 0,
        }
    }

    /// True when the vehicle never leaves the depot.
    pub fn is_unused(&self) -> bool {
        self.stops.len() <= 2
    }

    pub fn stop_names(&self) -> Vec<String> {
        self.stops.iter().map(|s| s.name.clone()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingSolution {
    pub routes: Vec<VehicleRoute>,
    pub objective: i64,
}

impl RoutingSolution {
    pub fn route_map(&self) -> RouteMap {
        RouteMap(
            self.routes
                .iter()
                .map(|r| (r.vehicle, r.stop_names()))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveOutcome {
    Solved(RoutingSolution),
    NoSolution,
}

impl SolveOutcome {
    pub fn solution(&self) -> Option<&RoutingSolution> {
        match self {
            SolveOutcome::Solved(solution) => Some(solution),
            SolveOutcome::NoSolution => None,
        }
    }
}

/// Vehicle -> ordered stop names, the renderer's input. Serialises as a plain
/// JSON object so it can also be written by hand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteMap(pub BTreeMap<usize, Vec<String>>);

impl RouteMap {
    pub fn iter(&self) -> impl Iterator<Item = (&usize, &Vec<String>)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Parses either a full solver result or a bare vehicle -> stops mapping.
pub fn parse_routes_document(content: &str) -> Result<RouteMap, serde_json::Error> {
    match serde_json::from_str::<RoutingSolution>(content) {
        Ok(solution) => Ok(solution.route_map()),
        Err(_) => serde_json::from_str::<RouteMap>(content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop(node: usize, name: &str, arrival: i64) -> Stop {
        Stop {
            node,
            name: name.to_string(),
            arrival,
        }
    }

    #[test]
    fn duration_spans_depot_to_depot() {
        let route = VehicleRoute {
            vehicle: 0,
            stops: vec![stop(0, "Depot", 5), stop(1, "C1", 20), stop(0, "Depot", 41)],
            travel_time: 30,
        };
        assert_eq!(route.duration(), 36);
        assert!(!route.is_unused());
    }

    #[test]
    fn hand_written_map_is_accepted() {
        let map =
            parse_routes_document(r#"{ "0": ["Depot", "C3", "Depot"], "1": ["Depot", "Depot"] }"#)
                .unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.0[&0], vec!["Depot", "C3", "Depot"]);
    }

    #[test]
    fn solver_output_is_accepted() {
        let solution = RoutingSolution {
            routes: vec![VehicleRoute {
                vehicle: 0,
                stops: vec![stop(0, "Depot", 0), stop(2, "C2", 10), stop(0, "Depot", 20)],
                travel_time: 20,
            }],
            objective: 20,
        };
        let json = serde_json::to_string(&solution).unwrap();
        let map = parse_routes_document(&json).unwrap();
        assert_eq!(map.0[&0], vec!["Depot", "C2", "Depot"]);
    }
}
