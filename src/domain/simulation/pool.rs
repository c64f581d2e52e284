use crate::domain::simulation::node::Node;

use std::cmp::Ordering;

/// The node pool of one trial, exclusively owned by its runner.
///
/// Nodes are addressed by their index, which equals their id.
#[derive(Debug, Clone, Default)]
pub struct NodePool {
    nodes: Vec<Node>,
}

impl NodePool {
    pub fn new(nodes: Vec<Node>) -> Self {
        NodePool { nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn get(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.nodes.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }

    /// Nodes that are not failed, regardless of capacity.
    pub fn active_count(&self) -> usize {
        self.nodes.iter().filter(|n| !n.failed).count()
    }

    pub fn failed_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.failed).count()
    }

    /// Indices of nodes that may receive an allocation, in pool order.
    pub fn allocatable_indices(&self) -> Vec<usize> {
        self.nodes.iter().enumerate().filter(|(_, n)| n.is_allocatable()).map(|(i, _)| i).collect()
    }

    /// Indices of nodes that are not failed (the fault injector's candidates).
    pub fn active_indices(&self) -> Vec<usize> {
        self.nodes.iter().enumerate().filter(|(_, n)| !n.failed).map(|(i, _)| i).collect()
    }

    /// Among `candidates`, the index minimising `key`. Ties go to the earliest candidate.
    pub fn min_by_key<F>(&self, candidates: &[usize], key: F) -> Option<usize>
    where
        F: Fn(&Node) -> f64,
    {
        candidates.iter().copied().min_by(|&a, &b| key(&self.nodes[a]).partial_cmp(&key(&self.nodes[b])).unwrap_or(Ordering::Equal))
    }

    /// Least-utilized allocatable node.
    pub fn least_utilized(&self) -> Option<usize> {
        self.min_by_key(&self.allocatable_indices(), Node::utilization)
    }

    /// Adds `demand` to node `index` if it is allocatable and has room.
    ///
    /// This is the only way strategies increase a node's load, so no node is
    /// ever pushed past its capacity or assigned while failed.
    pub fn try_assign(&mut self, index: usize, demand: f64) -> bool {
        match self.nodes.get_mut(index) {
            Some(node) if node.can_fit(demand) => {
                node.current_load += demand;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool_with_loads(loads: &[f64]) -> NodePool {
        let nodes = loads
            .iter()
            .enumerate()
            .map(|(i, load)| {
                let mut node = Node::new(i as i64, 4, 2500.0, 0.002);
                node.current_load = *load;
                node
            })
            .collect();
        NodePool::new(nodes)
    }

    #[test]
    fn test_least_utilized_prefers_first_on_tie() {
        let pool = pool_with_loads(&[5000.0, 1000.0, 1000.0]);
        assert_eq!(pool.least_utilized(), Some(1));
    }

    #[test]
    fn test_least_utilized_skips_failed() {
        let mut pool = pool_with_loads(&[5000.0, 1000.0, 3000.0]);
        pool.get_mut(1).unwrap().failed = true;

        assert_eq!(pool.least_utilized(), Some(2));
        assert_eq!(pool.active_count(), 2);
        assert_eq!(pool.failed_count(), 1);
        assert_eq!(pool.allocatable_indices(), vec![0, 2]);
    }

    #[test]
    fn test_try_assign_respects_capacity() {
        let mut pool = pool_with_loads(&[9000.0]);

        assert!(!pool.try_assign(0, 1500.0));
        assert_eq!(pool.get(0).unwrap().current_load, 9000.0);

        assert!(pool.try_assign(0, 1000.0));
        assert_eq!(pool.get(0).unwrap().current_load, 10_000.0);
    }

    #[test]
    fn test_try_assign_rejects_failed_and_unknown() {
        let mut pool = pool_with_loads(&[0.0]);
        pool.get_mut(0).unwrap().failed = true;

        assert!(!pool.try_assign(0, 1.0));
        assert!(!pool.try_assign(5, 1.0));
    }

    #[test]
    fn test_empty_pool_has_no_target() {
        let pool = NodePool::default();
        assert!(pool.is_empty());
        assert_eq!(pool.least_utilized(), None);
    }
}
