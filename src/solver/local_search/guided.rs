use std::collections::HashMap;

use tracing::trace;

use crate::evaluation::fitness::route_arcs;
use crate::solver::model::RoutingModel;

/// Arc penalties for guided local search. The augmented objective is
/// `cost + lambda * sum(penalty(arc))` over the arcs a plan uses.
#[derive(Debug, Clone)]
pub struct ArcPenalties {
    lambda: f64,
    penalties: HashMap<(usize, usize), u32>,
}

impl ArcPenalties {
    pub fn new(lambda: f64) -> Self {
        ArcPenalties {
            lambda,
            penalties: HashMap::new(),
        }
    }

    pub fn penalty(&self, arc: (usize, usize)) -> u32 {
        self.penalties.get(&arc).copied().unwrap_or(0)
    }

    pub fn augmented_cost(&self, model: &RoutingModel, routes: &[Vec<usize>], cost: i64) -> f64 {
        let total: u32 = route_arcs(model, routes)
            .into_iter()
            .map(|arc| self.penalty(arc))
            .sum();
        cost as f64 + self.lambda * total as f64
    }

    /// Penalises the arcs of a local optimum with the highest utility
    /// `transit / (1 + penalty)`. Zero-length arcs are never penalised.
    pub fn penalize(&mut self, model: &RoutingModel, routes: &[Vec<usize>]) {
        let utilities: Vec<((usize, usize), f64)> = route_arcs(model, routes)
            .into_iter()
            .map(|arc| {
                let transit = model.transit(arc.0, arc.1) as f64;
                (arc, transit / (1.0 + self.penalty(arc) as f64))
            })
            .collect();

        let max_utility = utilities.iter().map(|(_, u)| *u).fold(0.0, f64::max);
        if max_utility <= 0.0 {
            return;
        }

        for (arc, utility) in utilities {
            if utility >= max_utility {
                *self.penalties.entry(arc).or_insert(0) += 1;
                trace!("Penalised arc {:?} -> {}", arc, self.penalty(arc));
            }
        }
    }
}
