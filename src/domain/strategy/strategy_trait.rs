use std::fmt::Debug;

use crate::domain::simulation::pool::NodePool;
use crate::domain::simulation::rng::SimRng;
use crate::domain::simulation::task::Task;

/// An allocation heuristic.
///
/// `allocate` tries to place `task.required_capacity` on one allocatable node.
/// On success exactly one node's load grows by that amount (Lion's nomad phase
/// instead moves existing load, see its docs) and `true` is returned. On
/// failure nothing is mutated. Implementations never pick a failed node and
/// never exceed a node's capacity.
pub trait AllocationStrategy: Debug + Send {
    fn name(&self) -> &'static str;

    fn allocate(&mut self, pool: &mut NodePool, task: &Task, rng: &mut SimRng) -> bool;
}
