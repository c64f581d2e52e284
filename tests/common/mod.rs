#![allow(dead_code)]

use lb_heuristic_sim::domain::simulation::node::Node;
use lb_heuristic_sim::domain::simulation::pool::NodePool;
use lb_heuristic_sim::domain::simulation::task::Task;

/// Pool of equal nodes (capacity 10 000) with the given loads.
pub fn pool_with_loads(loads: &[f64]) -> NodePool {
    NodePool::new(
        loads
            .iter()
            .enumerate()
            .map(|(i, load)| {
                let mut node = Node::new(i as i64, 4, 2500.0, 0.002);
                node.current_load = *load;
                node
            })
            .collect(),
    )
}

pub fn task(id: i64, demand: f64) -> Task {
    Task::new(id, demand, demand, 1, 1)
}
