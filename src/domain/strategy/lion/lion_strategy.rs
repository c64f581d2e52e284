//! Lion optimization: prides hunt inside their territories, overloaded nomads
//! shed load, and a global search catches whatever is left.
//!
//! Fitness here is `utilization * 100` (infinity for failed nodes), so lower
//! is fitter. Hunters and the fallback pick the minimum. The nomad set reuses
//! the same score but takes the maximum: the most loaded nodes become nomads.

use crate::api::simulation_dto::LionDto;
use crate::domain::simulation::node::Node;
use crate::domain::simulation::pool::NodePool;
use crate::domain::simulation::rng::SimRng;
use crate::domain::simulation::simulation_config::probability;
use crate::domain::simulation::task::Task;
use crate::domain::strategy::lion::territory::Territory;
use crate::domain::strategy::strategy_trait::AllocationStrategy;
use crate::error::ConversionError;

use rand::Rng;
use rand::seq::IndexedRandom;

/// Smallest pride size used when none is configured.
const MIN_PRIDE_SIZE: usize = 5;
/// Nomad sets never shrink below this many nodes.
const MIN_NOMADS: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct LionParams {
    /// Nodes per territory; defaults to `max(5, num_nodes / 4)`.
    pub pride_size: Option<usize>,
    /// Chance that a territory with enough lions goes hunting.
    pub exploitation_probability: f64,
    /// Utilization above which a nomad sheds load.
    pub migration_threshold: f64,
    /// Share of a nomad's load that may move in one step.
    pub migration_fraction: f64,
    /// Share of the pool that becomes nomadic (at least two nodes).
    pub nomad_fraction: f64,
}

impl Default for LionParams {
    fn default() -> Self {
        LionParams { pride_size: None, exploitation_probability: 0.7, migration_threshold: 0.8, migration_fraction: 0.3, nomad_fraction: 0.1 }
    }
}

impl TryFrom<LionDto> for LionParams {
    type Error = ConversionError;

    fn try_from(dto: LionDto) -> Result<Self, Self::Error> {
        if dto.pride_size == Some(0) {
            return Err(ConversionError::InvalidParameter { name: "prideSize", reason: "must be at least 1".to_string() });
        }

        Ok(LionParams {
            pride_size: dto.pride_size,
            exploitation_probability: probability("exploitationProbability", dto.exploitation_probability)?,
            migration_threshold: probability("migrationThreshold", dto.migration_threshold)?,
            migration_fraction: probability("migrationFraction", dto.migration_fraction)?,
            nomad_fraction: probability("nomadFraction", dto.nomad_fraction)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct LionStrategy {
    params: LionParams,
    territories: Vec<Territory>,
    nomad_limit: usize,
    /// Built on the first nomad phase and never refreshed afterwards.
    nomads: Option<Vec<usize>>,
}

impl LionStrategy {
    pub fn new(pool: &NodePool, params: LionParams) -> Result<Self, ConversionError> {
        let num_nodes = pool.len();
        let pride_size = params.pride_size.unwrap_or_else(|| MIN_PRIDE_SIZE.max(num_nodes / 4));
        if pride_size == 0 {
            return Err(ConversionError::InvalidParameter { name: "prideSize", reason: "must be at least 1".to_string() });
        }

        let territories = Territory::partition(num_nodes, pride_size);
        let nomad_limit = MIN_NOMADS.max((num_nodes as f64 * params.nomad_fraction).floor() as usize);
        log::debug!("Lion strategy: {} territories of up to {} nodes, {} nomads.", territories.len(), pride_size, nomad_limit);

        Ok(LionStrategy { params, territories, nomad_limit, nomads: None })
    }

    pub fn territories(&self) -> &[Territory] {
        &self.territories
    }

    pub fn nomads(&self) -> Option<&[usize]> {
        self.nomads.as_deref()
    }

    pub fn fitness(node: &Node) -> f64 {
        if !node.is_allocatable() {
            return f64::INFINITY;
        }
        node.current_load / node.capacity() * 100.0
    }

    /// Each territory in turn may send a random group of hunters; the fittest
    /// hunter takes the task if it has room.
    fn hunting_phase(&mut self, pool: &mut NodePool, task: &Task, rng: &mut SimRng) -> bool {
        for territory in self.territories.iter_mut() {
            let active: Vec<usize> = territory.nodes.iter().copied().filter(|&i| pool.get(i).is_some_and(Node::is_allocatable)).collect();
            if active.len() < 2 {
                continue;
            }

            if rng.random::<f64>() < self.params.exploitation_probability {
                let num_hunters = 2.max((active.len() / 2).min(active.len()));
                let hunters: Vec<usize> = active.choose_multiple(rng, num_hunters).copied().collect();

                let Some(best_hunter) = pool.min_by_key(&hunters, Self::fitness) else {
                    continue;
                };
                if pool.try_assign(best_hunter, task.required_capacity) {
                    if let Some(node) = pool.get(best_hunter) {
                        territory.record(best_hunter, Self::fitness(node));
                    }
                    return true;
                }
            }
        }
        false
    }

    fn build_nomads(&mut self, pool: &NodePool) -> bool {
        let mut candidates = pool.allocatable_indices();
        if candidates.is_empty() {
            return false;
        }

        // Stable sort keeps pool order among equally loaded nodes.
        candidates.sort_by(|&a, &b| Self::fitness(&pool.nodes()[b]).total_cmp(&Self::fitness(&pool.nodes()[a])));
        candidates.truncate(self.nomad_limit);
        log::debug!("Lion strategy: nomad set {:?}.", candidates);

        self.nomads = Some(candidates);
        true
    }

    /// Overloaded nomads hand part of their load to the fittest other node.
    ///
    /// Succeeds as soon as any load moves; the triggering task itself is not
    /// placed. Nomads that failed since the set was built are skipped.
    fn nomad_phase(&mut self, pool: &mut NodePool, task: &Task) -> bool {
        if self.nomads.is_none() && !self.build_nomads(pool) {
            return false;
        }
        let Some(nomads) = self.nomads.as_deref() else {
            return false;
        };

        for &nomad in nomads {
            let Some((nomad_load, nomad_capacity)) = pool.get(nomad).filter(|n| n.is_allocatable()).map(|n| (n.current_load, n.capacity())) else {
                continue;
            };
            if nomad_load <= nomad_capacity * self.params.migration_threshold {
                continue;
            }

            let recipients: Vec<usize> = pool.allocatable_indices().into_iter().filter(|&i| i != nomad).collect();
            let Some(recipient) = pool.min_by_key(&recipients, Self::fitness) else {
                continue;
            };
            let spare = pool.get(recipient).map_or(0.0, Node::spare_capacity);

            let migratable = (nomad_load * self.params.migration_fraction).min(task.required_capacity).min(spare);
            if migratable > 0.0 {
                if let Some(node) = pool.get_mut(nomad) {
                    node.current_load -= migratable;
                }
                // Bounded by the recipient's spare capacity above.
                if let Some(node) = pool.get_mut(recipient) {
                    node.current_load += migratable;
                }
                log::trace!("Nomad {} moved {:.1} load to node {}.", nomad, migratable, recipient);
                return true;
            }
        }
        false
    }

    fn global_fallback(&self, pool: &mut NodePool, task: &Task) -> bool {
        let active = pool.allocatable_indices();
        match pool.min_by_key(&active, Self::fitness) {
            Some(best) => pool.try_assign(best, task.required_capacity),
            None => false,
        }
    }
}

impl AllocationStrategy for LionStrategy {
    fn name(&self) -> &'static str {
        "Lion Optimization"
    }

    fn allocate(&mut self, pool: &mut NodePool, task: &Task, rng: &mut SimRng) -> bool {
        self.hunting_phase(pool, task, rng) || self.nomad_phase(pool, task) || self.global_fallback(pool, task)
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

    fn never_hunting() -> LionParams {
        LionParams { exploitation_probability: 0.0, ..LionParams::default() }
    }

    #[test]
    fn test_fitness_is_infinite_for_failed_node() {
        let mut pool = pool_with_loads(&[2500.0]);
        assert_eq!(LionStrategy::fitness(pool.get(0).unwrap()), 25.0);

        pool.get_mut(0).unwrap().failed = true;
        assert_eq!(LionStrategy::fitness(pool.get(0).unwrap()), f64::INFINITY);
    }

    #[test]
    fn test_default_layout() {
        let pool = pool_with_loads(&[0.0; 60]);
        let lion = LionStrategy::new(&pool, LionParams::default()).unwrap();

        assert_eq!(lion.territories().len(), 4);
        assert!(lion.territories().iter().all(|t| t.nodes.len() == 15));
        assert_eq!(lion.nomad_limit, 6);
        assert!(lion.nomads().is_none());
    }

    #[test]
    fn test_rejects_zero_pride_size() {
        let pool = pool_with_loads(&[0.0; 4]);
        let params = LionParams { pride_size: Some(0), ..LionParams::default() };

        assert!(LionStrategy::new(&pool, params).is_err());
    }

    #[test]
    fn test_hunt_places_task_and_records_best() {
        let mut pool = pool_with_loads(&[0.0; 5]);
        let params = LionParams { exploitation_probability: 1.0, ..LionParams::default() };
        let mut lion = LionStrategy::new(&pool, params).unwrap();
        let (mut rng, _) = seeded_rng(Some(1));

        assert!(lion.allocate(&mut pool, &Task::new(0, 1000.0, 1000.0, 1, 1), &mut rng));

        let territory = &lion.territories()[0];
        let best = territory.best_node.unwrap();
        assert_eq!(pool.get(best).unwrap().current_load, 1000.0);
        assert_eq!(territory.best_fitness, 10.0);
        // Hunting succeeded, so no nomad set was needed.
        assert!(lion.nomads().is_none());
    }

    #[test]
    fn test_hunt_skips_territory_with_single_active_node() {
        let mut pool = pool_with_loads(&[0.0; 4]);
        pool.get_mut(1).unwrap().failed = true;
        let params = LionParams { pride_size: Some(2), exploitation_probability: 1.0, ..LionParams::default() };
        let mut lion = LionStrategy::new(&pool, params).unwrap();
        let (mut rng, _) = seeded_rng(Some(4));
        assert_eq!(lion.territories().len(), 2);

        assert!(lion.allocate(&mut pool, &Task::new(0, 700.0, 700.0, 1, 1), &mut rng));

        assert_eq!(pool.get(0).unwrap().current_load, 0.0);
        assert_eq!(pool.get(1).unwrap().current_load, 0.0);
        assert_eq!(pool.get(2).unwrap().current_load + pool.get(3).unwrap().current_load, 700.0);
        assert!(lion.territories()[0].best_node.is_none());
        assert!(matches!(lion.territories()[1].best_node, Some(2 | 3)));
        assert!(lion.nomads().is_none());
    }

    #[test]
    fn test_nomad_sheds_load_without_placing_task() {
        // Every node is above the migration threshold; only node 1 can take much more.
        let mut pool = pool_with_loads(&[9000.0, 8500.0, 9900.0, 9900.0, 9900.0]);
        let params = LionParams { nomad_fraction: 0.0, ..never_hunting() };
        let mut lion = LionStrategy::new(&pool, params).unwrap();
        let (mut rng, _) = seeded_rng(Some(2));

        assert!(lion.allocate(&mut pool, &Task::new(0, 4000.0, 4000.0, 1, 1), &mut rng));

        // Nomads are the two most loaded nodes: 2 and 3 (ties keep pool order).
        assert_eq!(lion.nomads(), Some(&[2usize, 3][..]));
        // Node 2 sends min(0.3 * 9900, 4000, spare of node 1 = 1500) to node 1.
        assert_eq!(pool.get(2).unwrap().current_load, 8400.0);
        assert_eq!(pool.get(1).unwrap().current_load, 10_000.0);
        let total: f64 = pool.iter().map(|n| n.current_load).sum();
        assert_eq!(total, 9000.0 + 8500.0 + 3.0 * 9900.0);
    }

    #[test]
    fn test_nomad_set_is_never_refreshed() {
        let mut pool = pool_with_loads(&[1000.0, 2000.0, 3000.0, 0.0, 0.0]);
        let params = LionParams { nomad_fraction: 0.0, ..never_hunting() };
        let mut lion = LionStrategy::new(&pool, params).unwrap();
        let (mut rng, _) = seeded_rng(Some(3));

        assert!(lion.allocate(&mut pool, &Task::new(0, 500.0, 500.0, 1, 1), &mut rng));
        assert_eq!(lion.nomads(), Some(&[2usize, 1][..]));

        pool.get_mut(4).unwrap().current_load = 9000.0;
        assert!(lion.allocate(&mut pool, &Task::new(1, 500.0, 500.0, 1, 1), &mut rng));
        assert_eq!(lion.nomads(), Some(&[2usize, 1][..]));
    }

    #[test]
    fn test_failed_nomad_keeps_its_load() {
        let mut pool = pool_with_loads(&[9500.0, 9000.0, 0.0, 0.0, 0.0]);
        let params = LionParams { nomad_fraction: 0.0, ..never_hunting() };
        let mut lion = LionStrategy::new(&pool, params).unwrap();
        let (mut rng, _) = seeded_rng(Some(4));

        assert!(lion.allocate(&mut pool, &Task::new(0, 100.0, 100.0, 1, 1), &mut rng));
        assert_eq!(lion.nomads(), Some(&[0usize, 1][..]));
        let load_after_first = pool.get(0).unwrap().current_load;

        pool.get_mut(0).unwrap().failed = true;
        assert!(lion.allocate(&mut pool, &Task::new(1, 100.0, 100.0, 1, 1), &mut rng));

        assert_eq!(pool.get(0).unwrap().current_load, load_after_first);
    }

    #[test]
    fn test_global_fallback_places_on_fittest() {
        let mut pool = pool_with_loads(&[5000.0, 1000.0, 3000.0]);
        let mut lion = LionStrategy::new(&pool, never_hunting()).unwrap();
        let (mut rng, _) = seeded_rng(Some(5));

        // No node is above the migration threshold, so the fallback places the task.
        assert!(lion.allocate(&mut pool, &Task::new(0, 500.0, 500.0, 1, 1), &mut rng));
        assert_eq!(pool.get(1).unwrap().current_load, 1500.0);
    }

    #[test]
    fn test_rejects_when_nothing_fits() {
        let mut pool = pool_with_loads(&[7000.0, 7000.0, 7000.0]);
        let mut lion = LionStrategy::new(&pool, never_hunting()).unwrap();
        let (mut rng, _) = seeded_rng(Some(6));

        assert!(!lion.allocate(&mut pool, &Task::new(0, 4000.0, 4000.0, 1, 1), &mut rng));
        assert!(pool.iter().all(|n| n.current_load == 7000.0));
    }
}
