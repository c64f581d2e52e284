use crate::domain::utils::id::NodeId;

/// A simulated compute host with fixed capacity and mutable load.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub processing_elements: u32,
    pub rated_speed: f64,
    /// `processing_elements * rated_speed`, fixed at creation.
    capacity: f64,
    pub current_load: f64,
    pub failed: bool,
    /// Only used by the energy metric.
    pub energy_coefficient: f64,
}

impl Node {
    pub fn new(id: i64, processing_elements: u32, rated_speed: f64, energy_coefficient: f64) -> Self {
        Node {
            id: NodeId::new(id),
            processing_elements,
            rated_speed,
            capacity: processing_elements as f64 * rated_speed,
            current_load: 0.0,
            failed: false,
            energy_coefficient,
        }
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Not failed and able to take any demand at all.
    pub fn is_allocatable(&self) -> bool {
        !self.failed && self.capacity > 0.0
    }

    /// `current_load / capacity`, or infinity for a node without capacity.
    pub fn utilization(&self) -> f64 {
        if self.capacity <= 0.0 {
            return f64::INFINITY;
        }
        self.current_load / self.capacity
    }

    pub fn spare_capacity(&self) -> f64 {
        self.capacity - self.current_load
    }

    pub fn can_fit(&self, demand: f64) -> bool {
        self.is_allocatable() && self.current_load + demand <= self.capacity
    }

    /// Drops the load of a failed node whose work was migrated elsewhere.
    /// The node stays failed.
    pub fn clear_migrated_load(&mut self) {
        self.current_load = 0.0;
    }
}
