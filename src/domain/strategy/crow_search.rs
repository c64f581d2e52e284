//! Crow search: every crow remembers the load of one node's hiding place and
//! follows the memory with the lowest utilization.

use crate::domain::simulation::pool::NodePool;
use crate::domain::simulation::rng::SimRng;
use crate::domain::simulation::task::Task;
use crate::domain::strategy::strategy_trait::AllocationStrategy;

use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq)]
pub struct CrowSearchParams {
    /// Carried for completeness; no placement decision reads it.
    pub flight_length: f64,
}

impl Default for CrowSearchParams {
    fn default() -> Self {
        CrowSearchParams { flight_length: 0.1 }
    }
}

/// Remembered load of one node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemoryRecord {
    pub node: usize,
    pub load: f64,
}

#[derive(Debug, Clone)]
pub struct CrowSearchStrategy {
    params: CrowSearchParams,
    /// Slot `i` remembers pool node `i`. Seeded lazily, refreshed on every call.
    memory: Vec<Option<MemoryRecord>>,
}

impl CrowSearchStrategy {
    pub fn new(num_nodes: usize, params: CrowSearchParams) -> Self {
        CrowSearchStrategy { params, memory: vec![None; num_nodes] }
    }

    pub fn params(&self) -> &CrowSearchParams {
        &self.params
    }

    pub fn memory(&self) -> &[Option<MemoryRecord>] {
        &self.memory
    }

    fn seed_memory(&mut self, pool: &NodePool) {
        self.memory = pool.iter().enumerate().map(|(i, node)| node.is_allocatable().then_some(MemoryRecord { node: i, load: node.current_load })).collect();
    }

    fn refresh_memory(&mut self, pool: &NodePool) {
        for record in self.memory.iter_mut().flatten() {
            if let Some(node) = pool.get(record.node).filter(|n| n.is_allocatable()) {
                record.load = node.current_load;
            }
        }
    }
}

impl AllocationStrategy for CrowSearchStrategy {
    fn name(&self) -> &'static str {
        "Crow Search"
    }

    fn allocate(&mut self, pool: &mut NodePool, task: &Task, _rng: &mut SimRng) -> bool {
        if pool.allocatable_indices().is_empty() {
            return false;
        }

        if self.memory.iter().all(Option::is_none) {
            self.seed_memory(pool);
        }
        self.refresh_memory(pool);

        let best = self
            .memory
            .iter()
            .flatten()
            .filter_map(|record| pool.get(record.node).filter(|n| n.is_allocatable()).map(|n| (record.node, record.load / n.capacity())))
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));

        match best {
            Some((node, _)) => pool.try_assign(node, task.required_capacity),
            None => false,
        }
    }
}
