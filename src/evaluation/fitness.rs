use crate::evaluation::schedule::is_feasible;
use crate::solver::model::RoutingModel;

/// Total transit of one vehicle's tour, depot to depot.
pub fn route_travel_time(model: &RoutingModel, customers: &[usize]) -> i64 {
    let depot = model.depot();
    let mut prev = depot;
    let mut total = 0;
    for &node in customers {
        total += model.transit(prev, node);
        prev = node;
    }
    total + model.transit(prev, depot)
}

/// Objective of a full plan, or `None` if any vehicle's route breaks the time
/// dimension.
pub fn find_cost(model: &RoutingModel, routes: &[Vec<usize>]) -> Option<i64> {
    let mut total = 0;
    for (vehicle, route) in routes.iter().enumerate() {
        if !is_feasible(model, vehicle, route) {
            return None;
        }
        total += route_travel_time(model, route);
    }
    Some(total)
}

/// Arcs travelled by a plan, depot legs included. Empty routes contribute no arcs.
pub fn route_arcs(model: &RoutingModel, routes: &[Vec<usize>]) -> Vec<(usize, usize)> {
    let depot = model.depot();
    let mut arcs = Vec::new();
    for route in routes.iter().filter(|r| !r.is_empty()) {
        let mut prev = depot;
        for &node in route {
            arcs.push((prev, node));
            prev = node;
        }
        arcs.push((prev, depot));
    }
    arcs
}
