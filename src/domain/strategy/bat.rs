//! Bat algorithm: echolocate towards the least-utilized node, occasionally
//! exploring a random one first.

use crate::api::simulation_dto::BatDto;
use crate::domain::simulation::node::Node;
use crate::domain::simulation::pool::NodePool;
use crate::domain::simulation::rng::SimRng;
use crate::domain::simulation::simulation_config::probability;
use crate::domain::simulation::task::Task;
use crate::domain::strategy::strategy_trait::AllocationStrategy;
use crate::error::ConversionError;

use rand::Rng;
use rand::seq::IndexedRandom;

#[derive(Debug, Clone, PartialEq)]
pub struct BatParams {
    /// Carried for completeness; no placement decision reads it.
    pub loudness: f64,
    /// A random node is tried first when a uniform draw exceeds this rate.
    pub pulse_rate: f64,
}

impl Default for BatParams {
    fn default() -> Self {
        BatParams { loudness: 0.5, pulse_rate: 0.5 }
    }
}

impl TryFrom<BatDto> for BatParams {
    type Error = ConversionError;

    fn try_from(dto: BatDto) -> Result<Self, Self::Error> {
        Ok(BatParams { loudness: dto.loudness, pulse_rate: probability("pulseRate", dto.pulse_rate)? })
    }
}

#[derive(Debug, Clone)]
pub struct BatStrategy {
    params: BatParams,
}

impl BatStrategy {
    pub fn new(params: BatParams) -> Self {
        BatStrategy { params }
    }
}

impl AllocationStrategy for BatStrategy {
    fn name(&self) -> &'static str {
        "Bat Algorithm"
    }

    fn allocate(&mut self, pool: &mut NodePool, task: &Task, rng: &mut SimRng) -> bool {
        let active = pool.allocatable_indices();
        let Some(best) = pool.min_by_key(&active, Node::utilization) else {
            return false;
        };

        if rng.random::<f64>() > self.params.pulse_rate {
            if let Some(&candidate) = active.choose(rng) {
                if pool.try_assign(candidate, task.required_capacity) {
                    return true;
                }
            }
        }

        pool.try_assign(best, task.required_capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::simulation::rng::seeded_rng;

    fn pool_with_loads(loads: &[f64]) -> NodePool {
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

    #[test]
    fn test_without_exploration_targets_least_utilized() {
        let mut pool = pool_with_loads(&[4000.0, 1000.0, 7000.0]);
        let mut bat = BatStrategy::new(BatParams { pulse_rate: 1.0, ..BatParams::default() });
        let (mut rng, _) = seeded_rng(Some(1));

        assert!(bat.allocate(&mut pool, &Task::new(0, 500.0, 500.0, 1, 1), &mut rng));
        assert_eq!(pool.get(1).unwrap().current_load, 1500.0);
    }

    #[test]
    fn test_falls_back_to_best_when_random_node_is_full() {
        // Only node 1 has room; whichever node exploration picks, the task lands there.
        let mut pool = pool_with_loads(&[10_000.0, 0.0, 10_000.0]);
        let mut bat = BatStrategy::new(BatParams { pulse_rate: 0.0, ..BatParams::default() });
        let (mut rng, _) = seeded_rng(Some(2));

        for _ in 0..5 {
            assert!(bat.allocate(&mut pool, &Task::new(0, 100.0, 100.0, 1, 1), &mut rng));
        }
        assert_eq!(pool.get(1).unwrap().current_load, 500.0);
        assert_eq!(pool.get(0).unwrap().current_load, 10_000.0);
    }

    #[test]
    fn test_rejects_when_nothing_fits() {
        let mut pool = pool_with_loads(&[9900.0, 9900.0]);
        let mut bat = BatStrategy::new(BatParams::default());
        let (mut rng, _) = seeded_rng(Some(3));

        assert!(!bat.allocate(&mut pool, &Task::new(0, 500.0, 500.0, 1, 1), &mut rng));
        assert_eq!(pool.get(0).unwrap().current_load, 9900.0);
        assert_eq!(pool.get(1).unwrap().current_load, 9900.0);
    }

    #[test]
    fn test_empty_pool_rejects() {
        let mut pool = NodePool::default();
        let mut bat = BatStrategy::new(BatParams::default());
        let (mut rng, _) = seeded_rng(Some(4));

        assert!(!bat.allocate(&mut pool, &Task::new(0, 1.0, 1.0, 1, 1), &mut rng));
    }
}
