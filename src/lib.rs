pub mod api;
pub mod comparison;
pub mod domain;
pub mod error;
pub mod loader;
pub mod logger;

use crate::api::simulation_dto::SimulationConfigDto;
use crate::domain::simulation::simulation_config::SimulationConfig;
use crate::error::Result;
use crate::loader::parser::parse_json_file;

/// Loads and validates a simulation config from a JSON file.
pub fn generate_simulation_config(file_path: &str) -> Result<SimulationConfig> {
    let root_dto: SimulationConfigDto = parse_json_file::<SimulationConfigDto>(file_path)?;
    log::info!("Config file '{}' parsed successfully.", file_path);

    let config = SimulationConfig::try_from(root_dto)?;
    log::debug!("Simulation config: {:?}", config);

    Ok(config)
}
