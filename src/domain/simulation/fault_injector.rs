use crate::domain::simulation::pool::NodePool;
use crate::domain::simulation::rng::SimRng;
use crate::domain::simulation::simulation_config::FaultConfig;
use crate::domain::simulation::task::Task;
use crate::domain::strategy::strategy_trait::AllocationStrategy;
use crate::domain::utils::id::NodeId;

use rand::Rng;
use rand::seq::IndexedRandom;

/// Result of one fault-injection attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum FailureOutcome {
    /// Too few active nodes left, or the failure cap is already reached.
    Suppressed,
    /// A candidate was drawn but the failure roll spared it.
    Survived,
    /// The node failed and its load (if any) now lives on another node.
    Recovered { node: NodeId, migrated_load: f64 },
    /// The node failed and no active node could take its load.
    Lost { node: NodeId, lost_load: f64, lost_tasks: usize },
}

/// Rate-limited, probabilistic node failures with best-effort load migration.
#[derive(Debug, Clone)]
pub struct FaultInjector {
    config: FaultConfig,
    max_failures: usize,
}

impl FaultInjector {
    pub fn new(config: FaultConfig, num_nodes: usize) -> Self {
        let max_failures = config.max_failures(num_nodes);
        FaultInjector { config, max_failures }
    }

    pub fn config(&self) -> &FaultConfig {
        &self.config
    }

    pub fn max_failures(&self) -> usize {
        self.max_failures
    }

    /// Possibly fails one random active node and migrates its load through `strategy`.
    pub fn simulate_failure(&self, pool: &mut NodePool, strategy: &mut dyn AllocationStrategy, rng: &mut SimRng) -> FailureOutcome {
        let active = pool.active_indices();
        if active.len() <= self.config.min_operational_nodes {
            return FailureOutcome::Suppressed;
        }
        if pool.failed_count() >= self.max_failures {
            return FailureOutcome::Suppressed;
        }

        let Some(&index) = active.choose(rng) else {
            return FailureOutcome::Suppressed;
        };
        if rng.random::<f64>() >= self.config.failure_probability {
            return FailureOutcome::Survived;
        }

        if let Some(node) = pool.get_mut(index) {
            node.failed = true;
            log::debug!("Node {} failed carrying load {:.1}.", node.id, node.current_load);
        }

        self.migrate_failed_node(pool, index, strategy, rng)
    }

    /// Tries to move the whole load of the failed node `index` onto another node.
    ///
    /// A node without load counts as recovered. On success the failed node's
    /// load is cleared; otherwise it stays as lost work.
    pub fn migrate_failed_node(&self, pool: &mut NodePool, index: usize, strategy: &mut dyn AllocationStrategy, rng: &mut SimRng) -> FailureOutcome {
        let Some(node) = pool.get(index) else {
            log::error!("Migration requested for unknown node index {}.", index);
            return FailureOutcome::Suppressed;
        };
        let node_id = node.id;
        let load = node.current_load;

        if load <= 0.0 {
            return FailureOutcome::Recovered { node: node_id, migrated_load: 0.0 };
        }

        let migration_task = Task::migration(load);
        if strategy.allocate(pool, &migration_task, rng) {
            if let Some(node) = pool.get_mut(index) {
                node.clear_migrated_load();
            }
            log::debug!("Migrated load {:.1} away from failed node {}.", load, node_id);
            FailureOutcome::Recovered { node: node_id, migrated_load: load }
        } else {
            let lost_tasks = (load / self.config.lost_work_unit).floor() as usize;
            log::debug!("Could not migrate load {:.1} of failed node {}; {} tasks counted as lost.", load, node_id, lost_tasks);
            FailureOutcome::Lost { node: node_id, lost_load: load, lost_tasks }
        }
    }
}
