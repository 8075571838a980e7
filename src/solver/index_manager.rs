/// Maps between node numbers and the solver's variable indices.
///
/// Layout: every non-depot node in node order, then one start index per
/// vehicle, then one end index per vehicle. The depot therefore appears once
/// per vehicle start and once per vehicle end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexManager {
    num_nodes: usize,
    num_vehicles: usize,
    depot: usize,
}

impl IndexManager {
    pub fn new(num_nodes: usize, num_vehicles: usize, depot: usize) -> Self {
        debug_assert!(depot < num_nodes);
        IndexManager {
            num_nodes,
            num_vehicles,
            depot,
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    pub fn num_vehicles(&self) -> usize {
        self.num_vehicles
    }

    pub fn depot(&self) -> usize {
        self.depot
    }

    fn num_customers(&self) -> usize {
        self.num_nodes - 1
    }

    /// Total number of indices (customers + starts + ends).
    pub fn num_indices(&self) -> usize {
        self.num_customers() + 2 * self.num_vehicles
    }

    pub fn start(&self, vehicle: usize) -> usize {
        self.num_customers() + vehicle
    }

    pub fn end(&self, vehicle: usize) -> usize {
        self.num_customers() + self.num_vehicles + vehicle
    }

    pub fn is_start(&self, index: usize) -> bool {
        (self.num_customers()..self.num_customers() + self.num_vehicles).contains(&index)
    }

    pub fn is_end(&self, index: usize) -> bool {
        index >= self.num_customers() + self.num_vehicles && index < self.num_indices()
    }

    pub fn index_to_node(&self, index: usize) -> usize {
        if index >= self.num_customers() {
            self.depot
        } else if index < self.depot {
            index
        } else {
            index + 1
        }
    }

    /// The depot resolves to vehicle 0's start index.
    pub fn node_to_index(&self, node: usize) -> usize {
        if node == self.depot {
            self.start(0)
        } else if node < self.depot {
            node
        } else {
            node - 1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_with_depot_in_the_middle() {
        let m = IndexManager::new(4, 2, 1);
        assert_eq!(m.num_indices(), 3 + 4);
        assert_eq!(m.index_to_node(0), 0);
        assert_eq!(m.index_to_node(1), 2);
        assert_eq!(m.index_to_node(2), 3);
        assert_eq!(m.start(1), 4);
        assert_eq!(m.end(0), 5);
        assert_eq!(m.index_to_node(m.end(1)), 1);
        assert!(m.is_start(3) && !m.is_end(3));
        assert!(m.is_end(6) && !m.is_start(6));
        assert!(!m.is_end(7));
    }

    #[test]
    fn node_and_index_round_trip_for_customers() {
        let m = IndexManager::new(6, 3, 0);
        for node in 1..6 {
            assert_eq!(m.index_to_node(m.node_to_index(node)), node);
        }
        assert_eq!(m.node_to_index(0), m.start(0));
    }
}
