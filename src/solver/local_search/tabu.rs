use std::collections::VecDeque;

use super::neighbourhood::Candidate;
use crate::utils::moves_overlap;

/// Picks the best candidate whose positions are not tabu. A tabu candidate is
/// still taken when it beats the best cost seen so far by more than the
/// aspiration threshold.
pub fn choose_best_candidate(
    candidates: &[Candidate],
    tabu_list: &VecDeque<(usize, usize)>,
    best_cost: i64,
    aspiration_threshold: i64,
    parent_move: Option<(usize, usize)>,
) -> Option<Candidate> {
    let first = *candidates.first()?;

    if !tabu_list.contains(&first.mv.positions()) {
        return Some(first);
    }
    if first.cost + aspiration_threshold < best_cost {
        return Some(first);
    }

    candidates
        .iter()
        .find(|c| {
            let pair = c.mv.positions();
            !tabu_list.contains(&pair)
                && parent_move.map_or(true, |parent| !moves_overlap(&pair, &parent))
        })
        .or_else(|| candidates.iter().find(|c| !tabu_list.contains(&c.mv.positions())))
        .copied()
}

/// Pushes the move just applied and trims the list to `len_tabu_list`.
pub fn insert_and_adjust_tabu_list(
    tabu_list: &mut VecDeque<(usize, usize)>,
    positions: (usize, usize),
    len_tabu_list: usize,
) {
    tabu_list.push_front(positions);

    while tabu_list.len() > len_tabu_list {
        tabu_list.pop_back();
    }
}
