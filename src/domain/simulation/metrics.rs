use crate::domain::simulation::pool::NodePool;

use serde::Serialize;

/// Final statistics of one trial, serialized with the keys the comparison
/// consumers expect (`avg_response_time`, `throughput`, ...).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationMetrics {
    /// Seconds.
    pub avg_response_time: f64,
    /// Percent of the stream completed, 0..=100.
    pub throughput: f64,
    /// Percent of failed nodes whose load was fully migrated, 0..=100.
    pub fault_tolerance: f64,
    /// kWh-equivalent units.
    pub energy_consumption: f64,
    pub active_nodes: usize,
    pub completed_tasks: usize,
}

impl SimulationMetrics {
    /// Values reported for a strategy whose trial could not be run.
    pub fn placeholder() -> Self {
        SimulationMetrics { avg_response_time: 1.0, throughput: 0.0, fault_tolerance: 0.0, energy_consumption: 0.0, active_nodes: 0, completed_tasks: 0 }
    }
}

/// Base response time of an idle node.
const BASE_RESPONSE_TIME: f64 = 0.1;
/// Additional delay of a fully utilized node.
const LOADED_RESPONSE_DELAY: f64 = 0.9;
/// Response time reported when no active node is left.
const DEFAULT_RESPONSE_TIME: f64 = 0.5;

/// Reduces the final node state into [`SimulationMetrics`]. Pure: calling it
/// twice on the same state yields identical values.
pub fn calculate(pool: &NodePool, completed_tasks: usize, num_tasks: usize) -> SimulationMetrics {
    let active: Vec<_> = pool.iter().filter(|n| !n.failed).collect();
    let failed: Vec<_> = pool.iter().filter(|n| n.failed).collect();

    let response_times: Vec<f64> = active
        .iter()
        .filter(|n| n.capacity() > 0.0)
        .map(|n| BASE_RESPONSE_TIME + LOADED_RESPONSE_DELAY * (n.current_load / n.capacity()).min(1.0))
        .collect();
    let avg_response_time =
        if response_times.is_empty() { DEFAULT_RESPONSE_TIME } else { response_times.iter().sum::<f64>() / response_times.len() as f64 };

    let throughput = if num_tasks > 0 { (100.0 * completed_tasks as f64 / num_tasks as f64).clamp(0.0, 100.0) } else { 0.0 };

    let fault_tolerance = if failed.is_empty() {
        100.0
    } else {
        let recovered = failed.iter().filter(|n| n.current_load == 0.0).count();
        100.0 * recovered as f64 / failed.len() as f64
    };

    let energy_consumption = active.iter().map(|n| n.current_load * n.energy_coefficient).sum();

    SimulationMetrics { avg_response_time, throughput, fault_tolerance, energy_consumption, active_nodes: active.len(), completed_tasks }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::simulation::node::Node;

    fn node(load: f64, failed: bool) -> Node {
        let mut node = Node::new(0, 4, 2500.0, 0.002);
        node.current_load = load;
        node.failed = failed;
        node
    }

    #[test]
    fn test_metrics_of_mixed_pool() {
        let pool = NodePool::new(vec![node(0.0, false), node(10_000.0, false), node(5000.0, true), node(0.0, true)]);

        let metrics = calculate(&pool, 8, 10);

        // (0.1 + 1.0) / 2
        assert!((metrics.avg_response_time - 0.55).abs() < 1e-9);
        assert!((metrics.throughput - 80.0).abs() < 1e-9);
        assert!((metrics.fault_tolerance - 50.0).abs() < 1e-9);
        assert!((metrics.energy_consumption - 20.0).abs() < 1e-9);
        assert_eq!(metrics.active_nodes, 2);
        assert_eq!(metrics.completed_tasks, 8);
    }

    #[test]
    fn test_defaults_for_degenerate_input() {
        let metrics = calculate(&NodePool::default(), 0, 0);

        assert_eq!(metrics.avg_response_time, 0.5);
        assert_eq!(metrics.throughput, 0.0);
        assert_eq!(metrics.fault_tolerance, 100.0);
        assert_eq!(metrics.energy_consumption, 0.0);
        assert_eq!(metrics.active_nodes, 0);
    }

    #[test]
    fn test_throughput_is_capped() {
        let pool = NodePool::new(vec![node(0.0, false)]);
        assert_eq!(calculate(&pool, 12, 10).throughput, 100.0);
    }

    #[test]
    fn test_calculate_is_idempotent() {
        let pool = NodePool::new(vec![node(1234.0, false), node(0.0, true)]);
        assert_eq!(calculate(&pool, 3, 7), calculate(&pool, 3, 7));
    }

    #[test]
    fn test_serializes_with_mapping_keys() {
        let json = serde_json::to_value(SimulationMetrics::placeholder()).unwrap();
        for key in ["avg_response_time", "throughput", "fault_tolerance", "energy_consumption", "active_nodes", "completed_tasks"] {
            assert!(json.get(key).is_some(), "missing key {}", key);
        }
        assert_eq!(json["avg_response_time"], 1.0);
    }
}
