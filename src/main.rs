use anyhow::Context;
use clap::Parser;

use lb_heuristic_sim::comparison::{format_result, format_summary_table, run_comparison, write_results};
use lb_heuristic_sim::domain::simulation::simulation_config::{Scenario, SimulationConfig};
use lb_heuristic_sim::domain::strategy::strategy_type::StrategyType;
use lb_heuristic_sim::domain::utils::statistics::StatsWriter;
use lb_heuristic_sim::{generate_simulation_config, logger};

/// Compare load-balancing heuristics on a simulated node pool.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// JSON config file; built-in defaults are used without it.
    #[arg(short, long)]
    config: Option<String>,

    /// Run a single scenario with this many nodes (requires --tasks).
    #[arg(short, long, requires = "tasks")]
    nodes: Option<usize>,

    /// Number of tasks of the single scenario (requires --nodes).
    #[arg(short, long, requires = "nodes")]
    tasks: Option<usize>,

    /// Seed for reproducible runs.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Strategy to run (Lion, Bat, CrowSearch, MonarchButterfly); repeatable.
    #[arg(long = "strategy")]
    strategies: Vec<String>,

    /// CSV file for the results; printed to stdout when omitted.
    #[arg(short, long)]
    output: Option<String>,
}

impl Cli {
    fn apply_overrides(&self, config: &mut SimulationConfig) -> anyhow::Result<()> {
        if let (Some(num_nodes), Some(num_tasks)) = (self.nodes, self.tasks) {
            config.scenarios = vec![Scenario::new(num_nodes, num_tasks)];
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if !self.strategies.is_empty() {
            config.strategies = self.strategies.iter().map(|s| s.parse::<StrategyType>()).collect::<Result<Vec<_>, _>>()?;
        }
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logger::init();

    let mut config = match &cli.config {
        Some(path) => generate_simulation_config(path).with_context(|| format!("loading config '{}'", path))?,
        None => SimulationConfig::default(),
    };
    cli.apply_overrides(&mut config)?;

    let results = run_comparison(&config);

    for (scenario, scenario_results) in config.scenarios.iter().zip(results.chunks(config.strategies.len().max(1))) {
        println!("\nPerformance comparison with {} nodes and {} tasks:", scenario.num_nodes, scenario.num_tasks);
        for result in scenario_results {
            println!("\n{}", format_result(result));
        }
        println!("\nPerformance Summary:");
        print!("{}", format_summary_table(scenario_results));
    }

    let mut writer = StatsWriter::new(cli.output.as_deref()).context("opening results output")?;
    write_results(&results, &mut writer)?;
    if let Some(path) = &cli.output {
        log::info!("Results written to '{}'.", path);
    }

    Ok(())
}
