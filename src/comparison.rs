//! Runs every configured strategy over every scenario and reports the results.

use crate::domain::simulation::metrics::SimulationMetrics;
use crate::domain::simulation::runner::{RunStatistics, SimulationRunner};
use crate::domain::simulation::simulation_config::{Scenario, SimulationConfig};
use crate::domain::strategy::strategy_type::StrategyType;
use crate::domain::utils::statistics::{StatParameter, StatisticEvent, StatsWriter};
use crate::error::Result;

use colored::Colorize;
use std::fmt::Write;

/// Outcome of one strategy on one scenario.
#[derive(Debug, Clone)]
pub struct ComparisonResult {
    pub scenario: Scenario,
    pub strategy: StrategyType,
    pub seed: u64,
    pub metrics: SimulationMetrics,
    /// `None` when the trial could not be run and placeholder metrics were substituted.
    pub statistics: Option<RunStatistics>,
}

impl ComparisonResult {
    pub fn to_statistic_event(&self) -> StatisticEvent {
        let mut event = StatisticEvent::new();
        event
            .set(StatParameter::NumNodes, self.scenario.num_nodes)
            .set(StatParameter::NumTasks, self.scenario.num_tasks)
            .set(StatParameter::Strategy, self.strategy.display_name())
            .set(StatParameter::Seed, self.seed)
            .set(StatParameter::AvgResponseTime, self.metrics.avg_response_time)
            .set(StatParameter::Throughput, self.metrics.throughput)
            .set(StatParameter::FaultTolerance, self.metrics.fault_tolerance)
            .set(StatParameter::EnergyConsumption, self.metrics.energy_consumption)
            .set(StatParameter::ActiveNodes, self.metrics.active_nodes)
            .set(StatParameter::CompletedTasks, self.metrics.completed_tasks);

        if let Some(statistics) = &self.statistics {
            event.set(StatParameter::FailuresInjected, statistics.failures_injected).set(StatParameter::MigrationsRecovered, statistics.migrations_recovered);
        }
        event
    }
}

/// Runs all strategies of `config` on `scenario`.
///
/// Every strategy sees the same pool and stream because they share `seed`.
/// A strategy that cannot be built is reported with placeholder metrics.
pub fn run_scenario(config: &SimulationConfig, scenario: Scenario, seed: u64) -> Vec<ComparisonResult> {
    config
        .strategies
        .iter()
        .map(|&strategy| match SimulationRunner::new(config, scenario, strategy, Some(seed)) {
            Ok(mut runner) => {
                let metrics = runner.run();
                ComparisonResult { scenario, strategy, seed, metrics, statistics: Some(runner.statistics().clone()) }
            }
            Err(e) => {
                log::warn!("Could not run {}: {}. Reporting placeholder metrics.", strategy, e);
                ComparisonResult { scenario, strategy, seed, metrics: SimulationMetrics::placeholder(), statistics: None }
            }
        })
        .collect()
}

/// Runs every scenario of `config`.
///
/// Scenario `i` is seeded with `config.seed + i`, or with a fresh random
/// seed when the config has none.
pub fn run_comparison(config: &SimulationConfig) -> Vec<ComparisonResult> {
    config
        .scenarios
        .iter()
        .enumerate()
        .flat_map(|(i, &scenario)| {
            let seed = config.seed.map_or_else(rand::random::<u64>, |seed| seed.wrapping_add(i as u64));
            log::info!("Running comparison with {} nodes and {} tasks (seed {}).", scenario.num_nodes, scenario.num_tasks, seed);
            run_scenario(config, scenario, seed)
        })
        .collect()
}

/// Multi-line report of one result.
pub fn format_result(result: &ComparisonResult) -> String {
    let m = &result.metrics;
    format!(
        "{} results:\n- Avg Response Time: {:.2}s\n- Throughput: {:.1}%\n- Fault Tolerance: {:.1}%\n- Energy Used: {:.2}kWh\n- Active Nodes: {}/{}\n- Completed Tasks: {}/{}",
        result.strategy.display_name().bold(),
        m.avg_response_time,
        m.throughput,
        m.fault_tolerance,
        m.energy_consumption,
        m.active_nodes,
        result.scenario.num_nodes,
        m.completed_tasks,
        result.scenario.num_tasks
    )
}

/// Fixed-width summary table of the results belonging to one scenario.
pub fn format_summary_table(results: &[ComparisonResult]) -> String {
    let mut table = String::new();
    let _ = writeln!(
        table,
        "{:<20} | {:<10} | {:<10} | {:<8} | {:<12} | {}",
        "Algorithm", "Response(s)", "Throughput%", "Fault%", "Energy(kWh)", "Completed"
    );
    let _ = writeln!(table, "{}", "-".repeat(85));

    for result in results {
        let m = &result.metrics;
        let _ = writeln!(
            table,
            "{:<20} | {:>10.2} | {:>10.1}% | {:>7.1}% | {:>12.2} | {:>4}/{}",
            result.strategy.display_name(),
            m.avg_response_time,
            m.throughput,
            m.fault_tolerance,
            m.energy_consumption,
            m.completed_tasks,
            result.scenario.num_tasks
        );
    }
    table
}

/// Writes one CSV row per result.
pub fn write_results(results: &[ComparisonResult], writer: &mut StatsWriter) -> Result<()> {
    for result in results {
        writer.add_event(&result.to_statistic_event())?;
    }
    writer.flush()
}
