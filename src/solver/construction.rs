use tracing::{debug, info, warn};

use crate::evaluation::fitness::route_travel_time;
use crate::evaluation::schedule::is_feasible;
use crate::solver::model::RoutingModel;
use crate::solver::params::FirstSolutionStrategy;
use crate::solver::tour::Tour;

/// Builds the first feasible plan with the requested strategy, falling back to
/// the other one when it strands customers.
pub fn initial_solution(model: &RoutingModel, strategy: FirstSolutionStrategy) -> Option<Tour> {
    let order = match strategy {
        FirstSolutionStrategy::Automatic | FirstSolutionStrategy::PathCheapestArc => [
            FirstSolutionStrategy::PathCheapestArc,
            FirstSolutionStrategy::ParallelCheapestInsertion,
        ],
        FirstSolutionStrategy::ParallelCheapestInsertion => [
            FirstSolutionStrategy::ParallelCheapestInsertion,
            FirstSolutionStrategy::PathCheapestArc,
        ],
    };

    for (attempt, s) in order.into_iter().enumerate() {
        let routes = match s {
            FirstSolutionStrategy::ParallelCheapestInsertion => parallel_cheapest_insertion(model),
            _ => path_cheapest_arc(model),
        };
        match routes.and_then(|r| Tour::from_routes(model, &r)) {
            Some(tour) => {
                info!("First solution ({}) with cost {}", s, tour.cost);
                return Some(tour);
            }
            None if attempt == 0 => warn!("{} found no first solution, trying fallback", s),
            None => debug!("{} found no first solution", s),
        }
    }
    None
}

/// Grows one vehicle's path at a time, always following the cheapest arc to an
/// unrouted customer that keeps the route (including its return) feasible.
pub fn path_cheapest_arc(model: &RoutingModel) -> Option<Vec<Vec<usize>>> {
    let mut unrouted: Vec<usize> = model.customers().collect();
    let mut routes = vec![Vec::new(); model.num_vehicles()];

    for (vehicle, route) in routes.iter_mut().enumerate() {
        let mut current = model.depot();
        loop {
            let mut candidates: Vec<(i64, usize)> = unrouted
                .iter()
                .enumerate()
                .map(|(pos, &node)| (model.transit(current, node), pos))
                .collect();
            candidates.sort_unstable();

            let chosen = candidates.into_iter().find(|&(_, pos)| {
                route.push(unrouted[pos]);
                let ok = is_feasible(model, vehicle, route);
                route.pop();
                ok
            });

            match chosen {
                Some((_, pos)) => {
                    let node = unrouted.remove(pos);
                    route.push(node);
                    current = node;
                }
                None => break,
            }
        }
        debug!("Vehicle {} path: {:?}", vehicle, route);
    }

    if unrouted.is_empty() {
        Some(routes)
    } else {
        debug!("Unrouted after path cheapest arc: {:?}", unrouted);
        None
    }
}

/// Repeatedly inserts the customer whose cheapest feasible insertion, over all
/// vehicles and positions, adds the least travel time.
pub fn parallel_cheapest_insertion(model: &RoutingModel) -> Option<Vec<Vec<usize>>> {
    let mut unrouted: Vec<usize> = model.customers().collect();
    let mut routes: Vec<Vec<usize>> = vec![Vec::new(); model.num_vehicles()];

    while !unrouted.is_empty() {
        let mut best: Option<(i64, usize, usize, usize)> = None;

        for (pos, &node) in unrouted.iter().enumerate() {
            for (vehicle, route) in routes.iter().enumerate() {
                let base = route_travel_time(model, route);
                for at in 0..=route.len() {
                    let mut candidate = route.clone();
                    candidate.insert(at, node);
                    if !is_feasible(model, vehicle, &candidate) {
                        continue;
                    }
                    let delta = route_travel_time(model, &candidate) - base;
                    if best.map_or(true, |(d, ..)| delta < d) {
                        best = Some((delta, pos, vehicle, at));
                    }
                }
            }
        }

        let (_, pos, vehicle, at) = best?;
        let node = unrouted.remove(pos);
        routes[vehicle].insert(at, node);
    }

    Some(routes)
}
