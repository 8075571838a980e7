use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::evaluation::fitness::find_cost;
use crate::solver::model::RoutingModel;
use crate::solver::tour::{split_routes, Tour, Visit};

/// Edit of the giant tour. Positions refer to the tour before the move, except
/// `Relocate::to` which is the slot after removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Swap(usize, usize),
    Relocate { from: usize, to: usize },
    Reverse(usize, usize),
}

impl Move {
    pub fn apply(&self, visits: &mut Vec<Visit>) {
        match *self {
            Move::Swap(i, j) => visits.swap(i, j),
            Move::Relocate { from, to } => {
                let visit = visits.remove(from);
                visits.insert(to, visit);
            }
            Move::Reverse(i, j) => visits[i..=j].reverse(),
        }
    }

    /// The pair of tour positions touched, smallest first.
    pub fn positions(&self) -> (usize, usize) {
        let (a, b) = match *self {
            Move::Swap(i, j) | Move::Reverse(i, j) => (i, j),
            Move::Relocate { from, to } => (from, to),
        };
        if a < b {
            (a, b)
        } else {
            (b, a)
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    pub score: f64,
    pub cost: i64,
    pub mv: Move,
}

/// Every swap, relocate and 2-opt reversal of the tour.
pub fn all_moves(visits: &[Visit]) -> Vec<Move> {
    let n = visits.len();
    let mut moves = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            if !(visits[i].is_separator && visits[j].is_separator) {
                moves.push(Move::Swap(i, j));
            }
            if j > i + 1 {
                moves.push(Move::Reverse(i, j));
            }
        }
        for to in 0..n {
            // Adjacent relocations are already covered by swaps.
            if to != i && to + 1 != i && to != i + 1 {
                moves.push(Move::Relocate { from: i, to });
            }
        }
    }
    moves
}

/// Scores every feasible neighbour in parallel and returns them best first.
/// `score` gets the neighbour's routes and true travel cost.
pub fn find_neighbours<F>(tour: &Tour, model: &RoutingModel, score: &F) -> Vec<Candidate>
where
    F: Fn(&[Vec<usize>], i64) -> f64 + Sync,
{
    let moves = all_moves(&tour.visits);

    let mut candidates: Vec<Candidate> = moves
        .par_iter()
        .filter_map(|&mv| {
            let mut visits = tour.visits.clone();
            mv.apply(&mut visits);
            let routes = split_routes(&visits);
            let cost = find_cost(model, &routes)?;
            Some(Candidate {
                score: score(&routes, cost),
                cost,
                mv,
            })
        })
        .collect();

    candidates.par_sort_by(|a, b| a.score.total_cmp(&b.score));
    candidates
}

/// Applies a move and re-evaluates, `None` if the result is infeasible.
pub fn apply_move(tour: &Tour, mv: Move, model: &RoutingModel) -> Option<Tour> {
    let mut visits = tour.visits.clone();
    mv.apply(&mut visits);
    let cost = find_cost(model, &split_routes(&visits))?;
    Some(Tour { visits, cost })
}

/// Uniformly random move over a tour of `n` visits (`n >= 2`).
pub fn random_move(n: usize, rng: &mut ChaCha8Rng) -> Move {
    let i = rng.gen_range(0..n);
    let mut j = rng.gen_range(0..n - 1);
    if j >= i {
        j += 1;
    }
    match rng.gen_range(0..3) {
        0 => Move::Swap(i.min(j), i.max(j)),
        1 => Move::Relocate { from: i, to: j },
        _ => Move::Reverse(i.min(j), i.max(j)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn visit(node: usize) -> Visit {
        Visit {
            node,
            is_separator: false,
        }
    }

    #[test]
    fn relocate_moves_one_visit() {
        let mut visits = vec![visit(1), visit(2), visit(3), visit(4)];
        Move::Relocate { from: 0, to: 2 }.apply(&mut visits);
        let nodes: Vec<usize> = visits.iter().map(|v| v.node).collect();
        assert_eq!(nodes, vec![2, 3, 1, 4]);
    }

    #[test]
    fn reverse_flips_segment() {
        let mut visits = vec![visit(1), visit(2), visit(3), visit(4)];
        Move::Reverse(1, 3).apply(&mut visits);
        let nodes: Vec<usize> = visits.iter().map(|v| v.node).collect();
        assert_eq!(nodes, vec![1, 4, 3, 2]);
    }

    #[test]
    fn no_swap_between_two_separators() {
        let sep = Visit {
            node: 0,
            is_separator: true,
        };
        let moves = all_moves(&[sep, sep]);
        assert!(!moves.contains(&Move::Swap(0, 1)));
    }

    #[test]
    fn random_moves_stay_in_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..200 {
            let (a, b) = random_move(5, &mut rng).positions();
            assert!(a < b && b < 5);
        }
    }
}
