pub mod simulation;
pub mod strategy;
pub mod utils;
