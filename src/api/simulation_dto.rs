use serde::Deserialize;

/// Root of the JSON simulation config. Every field is optional in the file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimulationConfigDto {
    pub scenarios: Vec<ScenarioDto>,
    pub strategies: Vec<String>,
    pub seed: Option<u64>,
    pub workload: WorkloadDto,
    pub fault: FaultDto,
    pub lion: LionDto,
    pub bat: BatDto,
    pub crow: CrowDto,
    pub monarch: MonarchDto,
}

impl Default for SimulationConfigDto {
    fn default() -> Self {
        SimulationConfigDto {
            scenarios: vec![ScenarioDto { num_nodes: 60, num_tasks: 1000 }, ScenarioDto { num_nodes: 20, num_tasks: 200 }],
            strategies: vec!["Lion".to_string(), "Bat".to_string(), "CrowSearch".to_string(), "MonarchButterfly".to_string()],
            seed: None,
            workload: WorkloadDto::default(),
            fault: FaultDto::default(),
            lion: LionDto::default(),
            bat: BatDto::default(),
            crow: CrowDto::default(),
            monarch: MonarchDto::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioDto {
    pub num_nodes: usize,
    pub num_tasks: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkloadDto {
    pub processing_elements: u32,
    pub rated_speed: [u32; 2],
    pub task_length: [u32; 2],
    pub required_capacity: [u32; 2],
    pub required_elements: u32,
    pub priorities: Vec<u8>,
    pub energy_coefficient: [f64; 2],
}

impl Default for WorkloadDto {
    fn default() -> Self {
        WorkloadDto {
            processing_elements: 4,
            rated_speed: [2000, 4000],
            task_length: [200, 4000],
            required_capacity: [200, 4000],
            required_elements: 1,
            priorities: vec![1, 2, 3],
            energy_coefficient: [0.001, 0.003],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FaultDto {
    pub failure_probability: f64,
    pub failure_check_probability: f64,
    pub min_operational_nodes: usize,
    pub max_failed_fraction: f64,
    pub lost_work_unit: f64,
}

impl Default for FaultDto {
    fn default() -> Self {
        FaultDto {
            failure_probability: 0.05,
            failure_check_probability: 0.1,
            min_operational_nodes: 3,
            max_failed_fraction: 0.1,
            lost_work_unit: 1000.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LionDto {
    pub pride_size: Option<usize>,
    pub exploitation_probability: f64,
    pub migration_threshold: f64,
    pub migration_fraction: f64,
    pub nomad_fraction: f64,
}

impl Default for LionDto {
    fn default() -> Self {
        LionDto { pride_size: None, exploitation_probability: 0.7, migration_threshold: 0.8, migration_fraction: 0.3, nomad_fraction: 0.1 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BatDto {
    pub loudness: f64,
    pub pulse_rate: f64,
}

impl Default for BatDto {
    fn default() -> Self {
        BatDto { loudness: 0.5, pulse_rate: 0.5 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CrowDto {
    pub flight_length: f64,
}

impl Default for CrowDto {
    fn default() -> Self {
        CrowDto { flight_length: 0.1 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MonarchDto {
    pub bar: f64,
}

impl Default for MonarchDto {
    fn default() -> Self {
        MonarchDto { bar: 5.0 }
    }
}
