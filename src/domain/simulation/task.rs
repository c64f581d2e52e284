use crate::domain::utils::id::TaskId;

/// Reserved id of the synthetic task that carries a failed node's orphaned load.
pub const MIGRATION_TASK_ID: TaskId = TaskId::new(-1);

/// A unit of demand. Tasks are read-only inputs to allocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: TaskId,
    pub length: f64,
    /// Demand added to the chosen node's load ("mips required").
    pub required_capacity: f64,
    pub required_elements: u32,
    /// Generated for every task but not consulted by any strategy yet.
    pub priority: u8,
}

impl Task {
    pub fn new(id: i64, length: f64, required_capacity: f64, required_elements: u32, priority: u8) -> Self {
        Task { id: TaskId::new(id), length, required_capacity, required_elements, priority }
    }

    /// Synthetic task standing in for the load left on a failed node.
    pub fn migration(load: f64) -> Self {
        Task { id: MIGRATION_TASK_ID, length: load, required_capacity: load, required_elements: 1, priority: 1 }
    }

    pub fn is_migration(&self) -> bool {
        self.id == MIGRATION_TASK_ID
    }
}
