use crate::evaluation::schedule::schedule_route;
use crate::solver::model::RoutingModel;

/// What a routing engine hands back: a successor for every non-end index and
/// the time-dimension value (arrival time) at every index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    next: Vec<Option<usize>>,
    cumul: Vec<i64>,
}

impl Assignment {
    pub fn new(next: Vec<Option<usize>>, cumul: Vec<i64>) -> Self {
        debug_assert_eq!(next.len(), cumul.len());
        Assignment { next, cumul }
    }

    /// Successor of `index`, `None` for route ends.
    pub fn next(&self, index: usize) -> Option<usize> {
        self.next.get(index).copied().flatten()
    }

    pub fn cumul(&self, index: usize) -> Option<i64> {
        self.cumul.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.next.len()
    }

    pub fn is_empty(&self) -> bool {
        self.next.is_empty()
    }

    /// Encodes per-vehicle node sequences. `None` if a route cannot be
    /// scheduled inside the time dimension.
    pub fn from_routes(model: &RoutingModel, routes: &[Vec<usize>]) -> Option<Assignment> {
        let manager = model.manager();
        let mut next = vec![None; manager.num_indices()];
        let mut cumul = vec![0; manager.num_indices()];

        for (vehicle, route) in routes.iter().enumerate() {
            let schedule = schedule_route(model, vehicle, route)?;
            let indices: Vec<usize> = std::iter::once(manager.start(vehicle))
                .chain(route.iter().map(|&node| manager.node_to_index(node)))
                .chain(std::iter::once(manager.end(vehicle)))
                .collect();

            for (k, &index) in indices.iter().enumerate() {
                cumul[index] = schedule.arrivals[k];
                next[index] = indices.get(k + 1).copied();
            }
        }
        Some(Assignment { next, cumul })
    }
}
