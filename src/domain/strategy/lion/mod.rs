pub mod lion_strategy;
pub mod territory;
