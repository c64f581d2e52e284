use crate::api::simulation_dto::{FaultDto, ScenarioDto, SimulationConfigDto, WorkloadDto};
use crate::domain::strategy::strategy_type::{StrategyParams, StrategyType};
use crate::error::ConversionError;

use std::ops::RangeInclusive;
use std::str::FromStr;

/// Size of one comparison trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scenario {
    pub num_nodes: usize,
    pub num_tasks: usize,
}

impl Scenario {
    pub fn new(num_nodes: usize, num_tasks: usize) -> Self {
        Scenario { num_nodes, num_tasks }
    }
}

impl From<ScenarioDto> for Scenario {
    fn from(dto: ScenarioDto) -> Self {
        Scenario::new(dto.num_nodes, dto.num_tasks)
    }
}

/// Parameter ranges the generator draws nodes and tasks from.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkloadConfig {
    pub processing_elements: u32,
    pub rated_speed: RangeInclusive<u32>,
    pub task_length: RangeInclusive<u32>,
    pub required_capacity: RangeInclusive<u32>,
    pub required_elements: u32,
    pub priorities: Vec<u8>,
    pub energy_coefficient: RangeInclusive<f64>,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        WorkloadConfig {
            processing_elements: 4,
            rated_speed: 2000..=4000,
            task_length: 200..=4000,
            required_capacity: 200..=4000,
            required_elements: 1,
            priorities: vec![1, 2, 3],
            energy_coefficient: 0.001..=0.003,
        }
    }
}

impl TryFrom<WorkloadDto> for WorkloadConfig {
    type Error = ConversionError;

    fn try_from(dto: WorkloadDto) -> Result<Self, Self::Error> {
        if dto.processing_elements == 0 {
            return Err(ConversionError::InvalidParameter { name: "processingElements", reason: "must be at least 1".to_string() });
        }
        let rated_speed = int_range("ratedSpeed", dto.rated_speed)?;
        if *rated_speed.start() == 0 {
            return Err(ConversionError::InvalidParameter { name: "ratedSpeed", reason: "must lie strictly above zero".to_string() });
        }
        if dto.priorities.is_empty() {
            return Err(ConversionError::InvalidParameter { name: "priorities", reason: "at least one priority is required".to_string() });
        }
        let [low, high] = dto.energy_coefficient;
        if low > high || low < 0.0 {
            return Err(ConversionError::InvalidRange { name: "energyCoefficient", low, high });
        }

        Ok(WorkloadConfig {
            processing_elements: dto.processing_elements,
            rated_speed,
            task_length: int_range("taskLength", dto.task_length)?,
            required_capacity: int_range("requiredCapacity", dto.required_capacity)?,
            required_elements: dto.required_elements,
            priorities: dto.priorities,
            energy_coefficient: low..=high,
        })
    }
}

/// Rates and limits of the fault injector.
#[derive(Debug, Clone, PartialEq)]
pub struct FaultConfig {
    /// Chance that a drawn candidate actually fails.
    pub failure_probability: f64,
    /// Chance per processed task that the runner invokes the injector.
    pub failure_check_probability: f64,
    /// Injection is suppressed once active nodes drop to this count.
    pub min_operational_nodes: usize,
    /// Fraction of the pool that may be failed at once (at least one node).
    pub max_failed_fraction: f64,
    /// Load per completed task deducted when a migration fails.
    pub lost_work_unit: f64,
}

impl Default for FaultConfig {
    fn default() -> Self {
        FaultConfig { failure_probability: 0.05, failure_check_probability: 0.1, min_operational_nodes: 3, max_failed_fraction: 0.1, lost_work_unit: 1000.0 }
    }
}

impl FaultConfig {
    /// `max(1, floor(max_failed_fraction * num_nodes))`
    pub fn max_failures(&self, num_nodes: usize) -> usize {
        ((num_nodes as f64 * self.max_failed_fraction).floor() as usize).max(1)
    }
}

impl TryFrom<FaultDto> for FaultConfig {
    type Error = ConversionError;

    fn try_from(dto: FaultDto) -> Result<Self, Self::Error> {
        if dto.lost_work_unit <= 0.0 {
            return Err(ConversionError::InvalidParameter { name: "lostWorkUnit", reason: "must be positive".to_string() });
        }

        Ok(FaultConfig {
            failure_probability: probability("failureProbability", dto.failure_probability)?,
            failure_check_probability: probability("failureCheckProbability", dto.failure_check_probability)?,
            min_operational_nodes: dto.min_operational_nodes,
            max_failed_fraction: probability("maxFailedFraction", dto.max_failed_fraction)?,
            lost_work_unit: dto.lost_work_unit,
        })
    }
}

/// Validated configuration of a whole comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub scenarios: Vec<Scenario>,
    pub strategies: Vec<StrategyType>,
    pub seed: Option<u64>,
    pub workload: WorkloadConfig,
    pub fault: FaultConfig,
    pub strategy_params: StrategyParams,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            scenarios: vec![Scenario::new(60, 1000), Scenario::new(20, 200)],
            strategies: StrategyType::ALL.to_vec(),
            seed: None,
            workload: WorkloadConfig::default(),
            fault: FaultConfig::default(),
            strategy_params: StrategyParams::default(),
        }
    }
}

impl TryFrom<SimulationConfigDto> for SimulationConfig {
    type Error = ConversionError;

    fn try_from(dto: SimulationConfigDto) -> Result<Self, Self::Error> {
        let strategies = dto.strategies.iter().map(|name| StrategyType::from_str(name)).collect::<Result<Vec<_>, _>>()?;

        Ok(SimulationConfig {
            scenarios: dto.scenarios.into_iter().map(Scenario::from).collect(),
            strategies,
            seed: dto.seed,
            workload: WorkloadConfig::try_from(dto.workload)?,
            fault: FaultConfig::try_from(dto.fault)?,
            strategy_params: StrategyParams::try_from((dto.lion, dto.bat, dto.crow, dto.monarch))?,
        })
    }
}

pub(crate) fn probability(name: &'static str, value: f64) -> Result<f64, ConversionError> {
    if (0.0..=1.0).contains(&value) { Ok(value) } else { Err(ConversionError::InvalidProbability { name, value }) }
}

fn int_range(name: &'static str, [low, high]: [u32; 2]) -> Result<RangeInclusive<u32>, ConversionError> {
    if low > high {
        return Err(ConversionError::InvalidRange { name, low: low as f64, high: high as f64 });
    }
    Ok(low..=high)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_dto_matches_default_config() {
        let config = SimulationConfig::try_from(SimulationConfigDto::default()).unwrap();
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn test_max_failures_has_floor_of_one() {
        let fault = FaultConfig::default();
        assert_eq!(fault.max_failures(3), 1);
        assert_eq!(fault.max_failures(20), 2);
        assert_eq!(fault.max_failures(60), 6);
        assert_eq!(fault.max_failures(0), 1);
    }

    #[test]
    fn test_rejects_probability_out_of_range() {
        let mut dto = SimulationConfigDto::default();
        dto.fault.failure_probability = 1.5;

        let err = SimulationConfig::try_from(dto).unwrap_err();
        assert_eq!(err, ConversionError::InvalidProbability { name: "failureProbability", value: 1.5 });
    }

    #[test]
    fn test_rejects_zero_rated_speed() {
        let mut dto = SimulationConfigDto::default();
        dto.workload.rated_speed = [0, 100];

        assert!(matches!(SimulationConfig::try_from(dto), Err(ConversionError::InvalidParameter { name: "ratedSpeed", .. })));
    }

    #[test]
    fn test_rejects_inverted_range() {
        let mut dto = SimulationConfigDto::default();
        dto.workload.task_length = [500, 100];

        assert!(matches!(SimulationConfig::try_from(dto), Err(ConversionError::InvalidRange { name: "taskLength", .. })));
    }

    #[test]
    fn test_rejects_unknown_strategy() {
        let mut dto = SimulationConfigDto::default();
        dto.strategies = vec!["Lion".to_string(), "Wolf".to_string()];

        assert_eq!(SimulationConfig::try_from(dto).unwrap_err(), ConversionError::UnknownStrategyType("Wolf".to_string()));
    }
}
