use crate::domain::simulation::fault_injector::{FailureOutcome, FaultInjector};
use crate::domain::simulation::generator::WorkloadGenerator;
use crate::domain::simulation::metrics::{self, SimulationMetrics};
use crate::domain::simulation::pool::NodePool;
use crate::domain::simulation::rng::{SimRng, seeded_rng};
use crate::domain::simulation::simulation_config::{Scenario, SimulationConfig};
use crate::domain::simulation::task::Task;
use crate::domain::strategy::strategy_trait::AllocationStrategy;
use crate::domain::strategy::strategy_type::StrategyType;
use crate::error::ConversionError;

use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    Idle,
    Running,
    Done,
}

/// Counters collected while the stream is processed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStatistics {
    pub tasks_attempted: usize,
    pub allocations_rejected: usize,
    pub failure_checks: usize,
    pub failures_injected: usize,
    pub migrations_recovered: usize,
    pub migrations_lost: usize,
}

impl RunStatistics {
    /// Books a fault-injection outcome; lost work is taken off `completed_tasks`.
    fn record_failure(&mut self, outcome: &FailureOutcome, completed_tasks: &mut usize) {
        match outcome {
            FailureOutcome::Suppressed | FailureOutcome::Survived => {}
            FailureOutcome::Recovered { .. } => {
                self.failures_injected += 1;
                self.migrations_recovered += 1;
            }
            FailureOutcome::Lost { lost_tasks, .. } => {
                self.failures_injected += 1;
                self.migrations_lost += 1;
                *completed_tasks = completed_tasks.saturating_sub(*lost_tasks);
            }
        }
    }
}

/// Drives one trial: a fixed pool and task stream processed by one strategy.
///
/// A runner is single-use for an independent trial. Calling [`run`](Self::run)
/// again replays the stream on top of the existing load.
#[derive(Debug)]
pub struct SimulationRunner {
    scenario: Scenario,
    seed: u64,
    rng: SimRng,
    pool: NodePool,
    tasks: Vec<Task>,
    strategy: Box<dyn AllocationStrategy>,
    fault_injector: FaultInjector,
    failure_check_probability: f64,
    completed_tasks: usize,
    statistics: RunStatistics,
    state: RunnerState,
}

impl SimulationRunner {
    /// Generates the pool and stream for `scenario` and instantiates `strategy_type` on it.
    ///
    /// Without a `seed` a fresh one is drawn; [`seed`](Self::seed) reports it either way.
    pub fn new(config: &SimulationConfig, scenario: Scenario, strategy_type: StrategyType, seed: Option<u64>) -> Result<Self, ConversionError> {
        let (mut rng, seed) = seeded_rng(seed);
        let generator = WorkloadGenerator::new(config.workload.clone());
        let (pool, tasks) = generator.generate(scenario, &mut rng);
        let strategy = strategy_type.get_instance(&pool, &config.strategy_params)?;

        Ok(Self::with_parts(config, scenario, seed, rng, pool, tasks, strategy))
    }

    /// Assembles a runner from an already built pool, stream and strategy.
    pub fn with_parts(
        config: &SimulationConfig,
        scenario: Scenario,
        seed: u64,
        rng: SimRng,
        pool: NodePool,
        tasks: Vec<Task>,
        strategy: Box<dyn AllocationStrategy>,
    ) -> Self {
        let fault_injector = FaultInjector::new(config.fault.clone(), pool.len());

        SimulationRunner {
            scenario,
            seed,
            rng,
            pool,
            tasks,
            strategy,
            fault_injector,
            failure_check_probability: config.fault.failure_check_probability,
            completed_tasks: 0,
            statistics: RunStatistics::default(),
            state: RunnerState::Idle,
        }
    }

    /// Processes the whole stream in generation order and returns the metrics.
    pub fn run(&mut self) -> SimulationMetrics {
        if self.state == RunnerState::Done {
            log::warn!("Replaying {} onto the load of a finished run.", self.strategy.name());
        }
        self.state = RunnerState::Running;
        self.completed_tasks = 0;
        self.statistics = RunStatistics::default();

        log::info!(
            "Starting {} with {} nodes and {} tasks (seed {}).",
            self.strategy.name(),
            self.scenario.num_nodes,
            self.scenario.num_tasks,
            self.seed
        );

        for task in &self.tasks {
            self.statistics.tasks_attempted += 1;
            if self.strategy.allocate(&mut self.pool, task, &mut self.rng) {
                self.completed_tasks += 1;
                log::trace!("Task {} placed ({:.0} demand).", task.id, task.required_capacity);
            } else {
                self.statistics.allocations_rejected += 1;
                log::trace!("Task {} rejected ({:.0} demand).", task.id, task.required_capacity);
            }

            if self.rng.random::<f64>() < self.failure_check_probability {
                self.statistics.failure_checks += 1;
                let outcome = self.fault_injector.simulate_failure(&mut self.pool, self.strategy.as_mut(), &mut self.rng);
                self.statistics.record_failure(&outcome, &mut self.completed_tasks);
            }
        }

        self.state = RunnerState::Done;
        let metrics = self.metrics();

        log::info!(
            "{} finished: response {:.2}s, throughput {:.1}%, fault tolerance {:.1}%, energy {:.2}kWh.",
            self.strategy.name(),
            metrics.avg_response_time,
            metrics.throughput,
            metrics.fault_tolerance,
            metrics.energy_consumption
        );
        log::debug!("{} statistics: {:?}", self.strategy.name(), self.statistics);

        metrics
    }

    /// Metrics of the current state.
    pub fn metrics(&self) -> SimulationMetrics {
        metrics::calculate(&self.pool, self.completed_tasks, self.tasks.len())
    }

    pub fn state(&self) -> RunnerState {
        self.state
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn scenario(&self) -> Scenario {
        self.scenario
    }

    pub fn pool(&self) -> &NodePool {
        &self.pool
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn completed_tasks(&self) -> usize {
        self.completed_tasks
    }

    pub fn statistics(&self) -> &RunStatistics {
        &self.statistics
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }
}
