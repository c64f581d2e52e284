pub mod fault_injector;
pub mod generator;
pub mod metrics;
pub mod node;
pub mod pool;
pub mod rng;
pub mod runner;
pub mod simulation_config;
pub mod task;
