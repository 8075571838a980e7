use crate::evaluation::fitness::find_cost;
use crate::solver::model::RoutingModel;

/// One entry of the giant tour. Separators stand for "return to the depot and
/// hand over to the next vehicle".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visit {
    pub node: usize,
    pub is_separator: bool,
}

/// All vehicles' routes concatenated, split by `num_vehicles - 1` separators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tour {
    pub visits: Vec<Visit>,
    pub cost: i64,
}

impl Tour {
    /// Flattens per-vehicle routes. Returns `None` if the plan is infeasible.
    pub fn from_routes(model: &RoutingModel, routes: &[Vec<usize>]) -> Option<Tour> {
        let cost = find_cost(model, routes)?;
        let depot = model.depot();
        let mut visits = Vec::with_capacity(model.num_nodes() + routes.len());
        for (vehicle, route) in routes.iter().enumerate() {
            if vehicle > 0 {
                visits.push(Visit {
                    node: depot,
                    is_separator: true,
                });
            }
            visits.extend(route.iter().map(|&node| Visit {
                node,
                is_separator: false,
            }));
        }
        Some(Tour { visits, cost })
    }

    pub fn routes(&self) -> Vec<Vec<usize>> {
        split_routes(&self.visits)
    }
}

/// Splits a giant tour at its separators, one route per vehicle.
pub fn split_routes(visits: &[Visit]) -> Vec<Vec<usize>> {
    let mut routes = vec![Vec::new()];
    for visit in visits {
        if visit.is_separator {
            routes.push(Vec::new());
        } else if let Some(route) = routes.last_mut() {
            route.push(visit.node);
        }
    }
    routes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SolverConfig;
    use crate::distance::matrix::TimeMatrix;
    use crate::domain::types::TimeWindow;

    #[test]
    fn routes_survive_flattening() {
        let config = SolverConfig {
            vehicle_count: 3,
            ..SolverConfig::default()
        };
        let model = RoutingModel::new(
            TimeMatrix::from_rows(vec![vec![1; 4]; 4]),
            vec![TimeWindow::new(0, 120); 4],
            &config,
        )
        .unwrap();
        let routes = vec![vec![2, 1], vec![], vec![3]];
        let tour = Tour::from_routes(&model, &routes).unwrap();
        assert_eq!(tour.visits.len(), 5);
        assert_eq!(tour.routes(), routes);
    }
}
