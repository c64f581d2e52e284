/// A pride's hunting ground: a contiguous slice of the node pool plus the
/// fittest node observed in it so far.
#[derive(Debug, Clone, PartialEq)]
pub struct Territory {
    pub nodes: Vec<usize>,
    /// Lowest fitness seen after a successful hunt; infinity until the first one.
    pub best_fitness: f64,
    pub best_node: Option<usize>,
}

impl Territory {
    pub fn new(nodes: Vec<usize>) -> Self {
        Territory { nodes, best_fitness: f64::INFINITY, best_node: None }
    }

    /// Splits `num_nodes` into contiguous groups of `pride_size`.
    ///
    /// Groups with fewer than two nodes are dropped. If no group survives, a
    /// single territory spanning the whole pool is returned.
    pub fn partition(num_nodes: usize, pride_size: usize) -> Vec<Territory> {
        let all: Vec<usize> = (0..num_nodes).collect();
        let territories: Vec<Territory> = all.chunks(pride_size.max(1)).filter(|group| group.len() >= 2).map(|group| Territory::new(group.to_vec())).collect();

        if territories.is_empty() { vec![Territory::new(all)] } else { territories }
    }

    /// Keeps `node` as the territory's best if `fitness` beats the record.
    pub fn record(&mut self, node: usize, fitness: f64) {
        if fitness < self.best_fitness {
            self.best_fitness = fitness;
            self.best_node = Some(node);
        }
    }
}
