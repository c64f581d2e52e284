use crate::domain::simulation::node::Node;
use crate::domain::simulation::pool::NodePool;
use crate::domain::simulation::rng::SimRng;
use crate::domain::simulation::simulation_config::{Scenario, WorkloadConfig};
use crate::domain::simulation::task::Task;

use rand::Rng;
use rand::seq::IndexedRandom;

/// Builds the node pool and the task stream of one trial.
#[derive(Debug, Clone)]
pub struct WorkloadGenerator {
    workload: WorkloadConfig,
}

impl WorkloadGenerator {
    pub fn new(workload: WorkloadConfig) -> Self {
        WorkloadGenerator { workload }
    }

    pub fn generate_pool(&self, num_nodes: usize, rng: &mut SimRng) -> NodePool {
        let nodes = (0..num_nodes)
            .map(|i| {
                let rated_speed = rng.random_range(self.workload.rated_speed.clone()) as f64;
                let energy_coefficient = rng.random_range(self.workload.energy_coefficient.clone());
                Node::new(i as i64, self.workload.processing_elements, rated_speed, energy_coefficient)
            })
            .collect();

        NodePool::new(nodes)
    }

    pub fn generate_tasks(&self, num_tasks: usize, rng: &mut SimRng) -> Vec<Task> {
        (0..num_tasks)
            .map(|i| {
                let length = rng.random_range(self.workload.task_length.clone()) as f64;
                let required_capacity = rng.random_range(self.workload.required_capacity.clone()) as f64;
                let priority = self.workload.priorities.choose(rng).copied().unwrap_or(1);
                Task::new(i as i64, length, required_capacity, self.workload.required_elements, priority)
            })
            .collect()
    }

    /// Pool first, then tasks, both from the same stream.
    pub fn generate(&self, scenario: Scenario, rng: &mut SimRng) -> (NodePool, Vec<Task>) {
        let pool = self.generate_pool(scenario.num_nodes, rng);
        let tasks = self.generate_tasks(scenario.num_tasks, rng);
        log::debug!("Generated {} nodes and {} tasks.", pool.len(), tasks.len());
        (pool, tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::simulation::rng::seeded_rng;

    #[test]
    fn test_generated_values_stay_in_range() {
        let (mut rng, _) = seeded_rng(Some(7));
        let generator = WorkloadGenerator::new(WorkloadConfig::default());

        let (pool, tasks) = generator.generate(Scenario::new(30, 200), &mut rng);

        assert_eq!(pool.len(), 30);
        for (i, node) in pool.iter().enumerate() {
            assert_eq!(node.id.id, i as i64);
            assert_eq!(node.processing_elements, 4);
            assert!((2000.0..=4000.0).contains(&node.rated_speed));
            assert!((8000.0..=16000.0).contains(&node.capacity()));
            assert!((0.001..=0.003).contains(&node.energy_coefficient));
            assert_eq!(node.current_load, 0.0);
            assert!(!node.failed);
        }

        assert_eq!(tasks.len(), 200);
        for (i, task) in tasks.iter().enumerate() {
            assert_eq!(task.id.id, i as i64);
            assert!((200.0..=4000.0).contains(&task.length));
            assert!((200.0..=4000.0).contains(&task.required_capacity));
            assert_eq!(task.required_elements, 1);
            assert!([1, 2, 3].contains(&task.priority));
            assert!(!task.is_migration());
        }
    }

    #[test]
    fn test_same_seed_generates_same_workload() {
        let generator = WorkloadGenerator::new(WorkloadConfig::default());
        let (mut a, _) = seeded_rng(Some(11));
        let (mut b, _) = seeded_rng(Some(11));

        let (pool_a, tasks_a) = generator.generate(Scenario::new(10, 50), &mut a);
        let (pool_b, tasks_b) = generator.generate(Scenario::new(10, 50), &mut b);

        assert_eq!(pool_a.nodes(), pool_b.nodes());
        assert_eq!(tasks_a, tasks_b);
    }

    #[test]
    fn test_empty_scenario() {
        let (mut rng, _) = seeded_rng(Some(1));
        let generator = WorkloadGenerator::new(WorkloadConfig::default());

        let (pool, tasks) = generator.generate(Scenario::new(0, 0), &mut rng);
        assert!(pool.is_empty());
        assert!(tasks.is_empty());
    }
}
