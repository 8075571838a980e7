use crate::domain::types::TimeWindow;
use crate::solver::model::RoutingModel;

/// Arrival times for one vehicle: depot departure, each customer, depot return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    pub arrivals: Vec<i64>,
}

impl Schedule {
    pub fn start(&self) -> i64 {
        self.arrivals[0]
    }

    pub fn end(&self) -> i64 {
        self.arrivals[self.arrivals.len() - 1]
    }

    pub fn duration(&self) -> i64 {
        self.end() - self.start()
    }
}

/// Propagates the interval of reachable arrival times along the visit order.
/// Each step allows `transit` plus up to `max_wait` of slack, intersected with
/// the next stop's window. Returns `None` as soon as an interval is empty.
fn forward_ranges(
    model: &RoutingModel,
    vehicle: usize,
    customers: &[usize],
) -> Option<Vec<TimeWindow>> {
    let mut ranges = Vec::with_capacity(customers.len() + 2);
    let start = model.start_range(vehicle);
    if !start.is_well_formed() {
        return None;
    }
    ranges.push(start);

    let depot = model.depot();
    let mut prev_node = depot;
    let stops = customers
        .iter()
        .map(|&c| (c, model.node_range(c)))
        .chain(std::iter::once((depot, model.end_range(vehicle))));

    for (node, window) in stops {
        let prev = ranges[ranges.len() - 1];
        let t = model.transit(prev_node, node);
        let range = TimeWindow::new(
            (prev.start + t).max(window.start),
            (prev.end + t + model.max_wait()).min(window.end),
        );
        if !range.is_well_formed() {
            return None;
        }
        ranges.push(range);
        prev_node = node;
    }
    Some(ranges)
}

/// True when the vehicle can serve `customers` in this order.
pub fn is_feasible(model: &RoutingModel, vehicle: usize, customers: &[usize]) -> bool {
    forward_ranges(model, vehicle, customers).is_some()
}

/// Picks concrete arrival times: the earliest possible return, then walking
/// backwards the latest arrival at each earlier stop that still reaches the
/// next one. This keeps waiting, and so route duration, to a minimum.
pub fn schedule_route(
    model: &RoutingModel,
    vehicle: usize,
    customers: &[usize],
) -> Option<Schedule> {
    let ranges = forward_ranges(model, vehicle, customers)?;
    let depot = model.depot();
    let nodes: Vec<usize> = std::iter::once(depot)
        .chain(customers.iter().copied())
        .chain(std::iter::once(depot))
        .collect();

    let mut arrivals = vec![0; ranges.len()];
    let last = ranges.len() - 1;
    arrivals[last] = ranges[last].start;
    for k in (0..last).rev() {
        let t = model.transit(nodes[k], nodes[k + 1]);
        arrivals[k] = ranges[k].end.min(arrivals[k + 1] - t);
    }
    Some(Schedule { arrivals })
}
