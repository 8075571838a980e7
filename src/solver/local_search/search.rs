use std::collections::VecDeque;
use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, span, trace, Level};

use super::guided::ArcPenalties;
use super::neighbourhood::{apply_move, find_neighbours, random_move, Candidate};
use super::tabu::{choose_best_candidate, insert_and_adjust_tabu_list};
use crate::config::constant::{
    ASPIRATION_THRESHOLD, GLS_LAMBDA_FACTOR, MIN_NO_IMPROVEMENT, SEED, TABU_LOWER_BOUND_LEN,
    TABU_UPPER_BOUND_LEN,
};
use crate::error::Result;
use crate::solver::assignment::Assignment;
use crate::solver::construction::initial_solution;
use crate::solver::model::RoutingModel;
use crate::solver::params::{Metaheuristic, SearchParameters};
use crate::solver::tour::Tour;
use crate::solver::RoutingSolver;
use crate::utils::{calculate_max_no_improvement, temperature};

/// Built-in engine: a constructive first solution followed by a
/// neighbourhood search over the giant tour.
#[derive(Debug, Clone)]
pub struct LocalSearchSolver {
    seed: u64,
}

impl Default for LocalSearchSolver {
    fn default() -> Self {
        LocalSearchSolver { seed: SEED }
    }
}

impl LocalSearchSolver {
    pub fn with_seed(seed: u64) -> Self {
        LocalSearchSolver { seed }
    }

    /// Runs the metaheuristic from `initial` and returns the cheapest tour seen.
    pub fn improve(
        &self,
        model: &RoutingModel,
        metaheuristic: Metaheuristic,
        initial: Tour,
        deadline: Instant,
    ) -> Tour {
        let max_no_improvement =
            calculate_max_no_improvement(initial.visits.len(), MIN_NO_IMPROVEMENT);
        let mut state = SearchState::new(initial, self.seed, model);

        let loop_span = span!(Level::INFO, "search", metaheuristic = %metaheuristic);
        let _loop_guard = loop_span.enter();

        let runs = max_no_improvement * 20;
        for iteration in 1.. {
            if Instant::now() >= deadline {
                info!("Time limit reached at iteration {}", iteration);
                break;
            }
            if state.stagnation >= max_no_improvement {
                info!("Ended early at iteration {}", iteration);
                state.ended_early = true;
                break;
            }

            let moved = match metaheuristic {
                Metaheuristic::Automatic | Metaheuristic::GreedyDescent => {
                    greedy_descent_step(&mut state, model)
                }
                Metaheuristic::GuidedLocalSearch => guided_local_search_step(&mut state, model),
                Metaheuristic::TabuSearch => tabu_search_step(&mut state, model, iteration),
                Metaheuristic::SimulatedAnnealing => {
                    if iteration > runs {
                        break;
                    }
                    simulated_annealing_step(&mut state, model, iteration, runs)
                }
            };
            if !moved {
                debug!("No further move at iteration {}", iteration);
                break;
            }

            state.record(iteration);
        }

        state.report_final_stats();
        state.best
    }
}

impl RoutingSolver for LocalSearchSolver {
    fn solve(
        &self,
        model: &RoutingModel,
        params: &SearchParameters,
    ) -> Result<Option<Assignment>> {
        let deadline = Instant::now() + params.time_limit;

        let initial = {
            let span = span!(Level::INFO, "first_solution");
            let _guard = span.enter();
            initial_solution(model, params.first_solution_strategy)
        };
        let Some(initial) = initial else {
            info!("No feasible first solution");
            return Ok(None);
        };

        let best = self.improve(model, params.metaheuristic, initial, deadline);
        Ok(Assignment::from_routes(model, &best.routes()))
    }
}

struct SearchState {
    current: Tour,
    best: Tour,
    best_iteration: usize,
    best_updates: Vec<(usize, i64)>,
    stagnation: usize,
    max_stagnation: usize,
    ended_early: bool,
    tabu_list: VecDeque<(usize, usize)>,
    len_tabu_list: usize,
    parent_move: Option<(usize, usize)>,
    penalties: ArcPenalties,
    temperature_scale: f64,
    rng: ChaCha8Rng,
}

impl SearchState {
    fn new(initial: Tour, seed: u64, model: &RoutingModel) -> Self {
        let mean_arc = model.matrix().mean_arc();
        SearchState {
            current: initial.clone(),
            best_updates: vec![(0, initial.cost)],
            best: initial,
            best_iteration: 0,
            stagnation: 0,
            max_stagnation: 0,
            ended_early: false,
            tabu_list: VecDeque::new(),
            len_tabu_list: TABU_LOWER_BOUND_LEN,
            parent_move: None,
            penalties: ArcPenalties::new(GLS_LAMBDA_FACTOR * mean_arc),
            temperature_scale: mean_arc.max(1.0),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Tracks the best tour and stagnation after each move.
    fn record(&mut self, iteration: usize) {
        if self.current.cost < self.best.cost {
            self.best = self.current.clone();
            self.best_iteration = iteration;
            self.best_updates.push((iteration, self.best.cost));
            self.max_stagnation = self.max_stagnation.max(self.stagnation);
            self.stagnation = 0;
            info!(
                "New best at iteration {}: cost = {}",
                iteration, self.best.cost
            );
        } else {
            self.stagnation += 1;
        }
        trace!("Current tour cost {}", self.current.cost);
    }

    fn take(&mut self, candidate: &Candidate, model: &RoutingModel) -> bool {
        match apply_move(&self.current, candidate.mv, model) {
            Some(next) => {
                self.current = next;
                true
            }
            None => false,
        }
    }

    fn report_final_stats(&self) {
        info!(
            "Search complete. Best cost {} found at iteration {}",
            self.best.cost, self.best_iteration
        );
        debug!("Max stagnation: {}", self.max_stagnation.max(self.stagnation));
        debug!("Early end triggered: {}", self.ended_early);
        debug!("Best-so-far updates: {:?}", self.best_updates);
    }
}

fn greedy_descent_step(state: &mut SearchState, model: &RoutingModel) -> bool {
    let candidates = find_neighbours(&state.current, model, &|_, cost| cost as f64);
    match candidates.first() {
        Some(best) if best.cost < state.current.cost => {
            let best = *best;
            state.take(&best, model)
        }
        _ => false,
    }
}

/// Moves downhill on the augmented objective; at a local optimum the most
/// useful arcs are penalised instead.
fn guided_local_search_step(state: &mut SearchState, model: &RoutingModel) -> bool {
    let candidates = {
        let penalties = &state.penalties;
        find_neighbours(&state.current, model, &|routes, cost| {
            penalties.augmented_cost(model, routes, cost)
        })
    };
    if candidates.is_empty() {
        return false;
    }

    let routes = state.current.routes();
    let current_score = state
        .penalties
        .augmented_cost(model, &routes, state.current.cost);

    let best = candidates[0];
    if best.score < current_score {
        state.take(&best, model)
    } else {
        state.penalties.penalize(model, &routes);
        true
    }
}

fn tabu_search_step(state: &mut SearchState, model: &RoutingModel, iteration: usize) -> bool {
    let candidates = find_neighbours(&state.current, model, &|_, cost| cost as f64);
    let Some(chosen) = choose_best_candidate(
        &candidates,
        &state.tabu_list,
        state.best.cost,
        ASPIRATION_THRESHOLD,
        state.parent_move,
    ) else {
        return false;
    };

    let positions = chosen.mv.positions();
    insert_and_adjust_tabu_list(&mut state.tabu_list, positions, state.len_tabu_list);
    state.parent_move = Some(positions);

    if iteration % 20 == 0 && TABU_LOWER_BOUND_LEN < TABU_UPPER_BOUND_LEN {
        state.len_tabu_list = state
            .rng
            .gen_range(TABU_LOWER_BOUND_LEN..TABU_UPPER_BOUND_LEN);
    }

    state.take(&chosen, model)
}

/// One random move, accepted with the Metropolis rule under a linearly
/// cooling temperature.
fn simulated_annealing_step(
    state: &mut SearchState,
    model: &RoutingModel,
    iteration: usize,
    runs: usize,
) -> bool {
    let n = state.current.visits.len();
    if n < 2 {
        return false;
    }

    let mv = random_move(n, &mut state.rng);
    let Some(next) = apply_move(&state.current, mv, model) else {
        return true;
    };

    let delta = (next.cost - state.current.cost) as f64;
    let temp = temperature(runs, iteration, state.temperature_scale);
    let accept = delta <= 0.0 || (temp > 0.0 && state.rng.gen::<f64>() < (-delta / temp).exp());
    if accept {
        state.current = next;
    }
    true
}
