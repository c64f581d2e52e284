//! Monarch butterfly optimization: the migration operator moves demand to the
//! least-utilized node, the adjustment operator to a random one.

use crate::api::simulation_dto::MonarchDto;
use crate::domain::simulation::node::Node;
use crate::domain::simulation::pool::NodePool;
use crate::domain::simulation::rng::SimRng;
use crate::domain::simulation::task::Task;
use crate::domain::strategy::strategy_trait::AllocationStrategy;
use crate::error::ConversionError;

use rand::Rng;
use rand::seq::IndexedRandom;

#[derive(Debug, Clone, PartialEq)]
pub struct MonarchButterflyParams {
    /// Migration is chosen with probability `bar / (bar + 1)`.
    pub bar: f64,
}

impl Default for MonarchButterflyParams {
    fn default() -> Self {
        MonarchButterflyParams { bar: 5.0 }
    }
}

impl TryFrom<MonarchDto> for MonarchButterflyParams {
    type Error = ConversionError;

    fn try_from(dto: MonarchDto) -> Result<Self, Self::Error> {
        if !dto.bar.is_finite() || dto.bar < 0.0 {
            return Err(ConversionError::InvalidParameter { name: "bar", reason: format!("must be finite and non-negative, got {}", dto.bar) });
        }
        Ok(MonarchButterflyParams { bar: dto.bar })
    }
}

impl MonarchButterflyParams {
    pub fn migration_probability(&self) -> f64 {
        self.bar / (self.bar + 1.0)
    }
}

#[derive(Debug, Clone)]
pub struct MonarchButterflyStrategy {
    params: MonarchButterflyParams,
}

impl MonarchButterflyStrategy {
    pub fn new(params: MonarchButterflyParams) -> Self {
        MonarchButterflyStrategy { params }
    }
}

impl AllocationStrategy for MonarchButterflyStrategy {
    fn name(&self) -> &'static str {
        "Monarch Butterfly"
    }

    fn allocate(&mut self, pool: &mut NodePool, task: &Task, rng: &mut SimRng) -> bool {
        let active = pool.allocatable_indices();
        if active.is_empty() {
            return false;
        }

        let target = if rng.random::<f64>() < self.params.migration_probability() {
            pool.min_by_key(&active, Node::utilization)
        } else {
            active.choose(rng).copied()
        };

        target.is_some_and(|index| pool.try_assign(index, task.required_capacity))
    }
}
