use std::cmp::max;

/// Linear cooling from `factor` at the first iteration to 0 at `runs`.
pub fn temperature(runs: usize, iteration: usize, temperature_factor: f64) -> f64 {
    if runs == 0 {
        return 0.0;
    }
    ((runs.saturating_sub(iteration)) as f64 / runs as f64) * temperature_factor
}

pub fn moves_overlap(a: &(usize, usize), b: &(usize, usize)) -> bool {
    a.0 == b.0 || a.0 == b.1 || a.1 == b.0 || a.1 == b.1
}

/// Iterations without improvement before the search stops early.
pub fn calculate_max_no_improvement(tour_len: usize, floor: usize) -> usize {
    let scaling_factor = if tour_len < 50 { 15.0 } else { 9.0 };
    max(floor, (scaling_factor * (tour_len as f64).powf(1.33)) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temperature_cools_linearly() {
        assert_eq!(temperature(100, 0, 2.0), 2.0);
        assert_eq!(temperature(100, 50, 2.0), 1.0);
        assert_eq!(temperature(100, 150, 2.0), 0.0);
    }

    #[test]
    fn overlap_detects_shared_position() {
        assert!(moves_overlap(&(1, 4), &(4, 7)));
        assert!(!moves_overlap(&(1, 4), &(2, 3)));
    }

    #[test]
    fn stagnation_limit_has_a_floor() {
        assert_eq!(calculate_max_no_improvement(3, 300), 300);
        assert!(calculate_max_no_improvement(200, 300) > 300);
    }
}
