use serde::Serialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Write};

use crate::error::Result;

/// Each event consists of a set of key-value-pairs with the measured data of one simulation run.
/// This enum specifies all allowed keys and thus the columns of the output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StatParameter {
    /// Number of nodes in the scenario.
    NumNodes,

    /// Number of tasks in the scenario stream.
    NumTasks,

    /// Display name of the allocation strategy.
    Strategy,

    /// Seed the run was started with.
    Seed,

    /// Mean response time of the active nodes in seconds.
    AvgResponseTime,

    /// Completed tasks in percent of the stream.
    Throughput,

    /// Recovered failed nodes in percent.
    FaultTolerance,

    /// Energy of the active nodes (kWh-equivalent).
    EnergyConsumption,

    ActiveNodes,

    CompletedTasks,

    /// Nodes marked failed by the fault injector.
    FailuresInjected,

    /// Failed nodes whose load was migrated away completely.
    MigrationsRecovered,
}

impl StatParameter {
    /// All columns in output order.
    pub const ALL: [StatParameter; 12] = [
        StatParameter::NumNodes,
        StatParameter::NumTasks,
        StatParameter::Strategy,
        StatParameter::Seed,
        StatParameter::AvgResponseTime,
        StatParameter::Throughput,
        StatParameter::FaultTolerance,
        StatParameter::EnergyConsumption,
        StatParameter::ActiveNodes,
        StatParameter::CompletedTasks,
        StatParameter::FailuresInjected,
        StatParameter::MigrationsRecovered,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            StatParameter::NumNodes => "NumNodes",
            StatParameter::NumTasks => "NumTasks",
            StatParameter::Strategy => "Strategy",
            StatParameter::Seed => "Seed",
            StatParameter::AvgResponseTime => "AvgResponseTime",
            StatParameter::Throughput => "Throughput",
            StatParameter::FaultTolerance => "FaultTolerance",
            StatParameter::EnergyConsumption => "EnergyConsumption",
            StatParameter::ActiveNodes => "ActiveNodes",
            StatParameter::CompletedTasks => "CompletedTasks",
            StatParameter::FailuresInjected => "FailuresInjected",
            StatParameter::MigrationsRecovered => "MigrationsRecovered",
        }
    }

    /// Returns the defined order of columns for the CSV header
    pub fn headers() -> Vec<&'static str> {
        Self::ALL.iter().map(StatParameter::header).collect()
    }
}

/// store values in their native format, only format them when writing to the CSV.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StatValue {
    Integer(i64),
    Unsigned(u64),
    Float(f64),
    Text(String),
}

impl From<i64> for StatValue {
    fn from(v: i64) -> Self {
        StatValue::Integer(v)
    }
}

impl From<u64> for StatValue {
    fn from(v: u64) -> Self {
        StatValue::Unsigned(v)
    }
}

impl From<usize> for StatValue {
    fn from(v: usize) -> Self {
        StatValue::Unsigned(v as u64)
    }
}

impl From<f64> for StatValue {
    fn from(v: f64) -> Self {
        StatValue::Float(v)
    }
}

impl From<String> for StatValue {
    fn from(v: String) -> Self {
        StatValue::Text(v)
    }
}

impl From<&str> for StatValue {
    fn from(v: &str) -> Self {
        StatValue::Text(v.to_string())
    }
}

impl StatValue {
    fn to_cell(&self) -> String {
        match self {
            StatValue::Integer(i) => i.to_string(),
            StatValue::Unsigned(u) => u.to_string(),
            StatValue::Float(f) => format!("{:.4}", f),
            StatValue::Text(t) => t.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StatisticEvent {
    data: HashMap<StatParameter, StatValue>,
}

impl StatisticEvent {
    pub fn new() -> Self {
        Self { data: HashMap::new() }
    }

    pub fn set<V: Into<StatValue>>(&mut self, param: StatParameter, value: V) -> &mut Self {
        self.data.insert(param, value.into());
        self
    }

    pub fn get(&self, param: StatParameter) -> Option<&StatValue> {
        self.data.get(&param)
    }

    /// Cells in header order, `NA` for every column the event does not carry.
    pub fn to_row(&self) -> Vec<String> {
        StatParameter::ALL
            .iter()
            .map(|param| match self.data.get(param) {
                Some(val) => val.to_cell(),
                None => "NA".to_string(),
            })
            .collect()
    }
}

/// Writes statistic events as `;`-separated rows to a file or stdout.
pub struct StatsWriter {
    csv_wtr: csv::Writer<Box<dyn Write>>,
}

impl StatsWriter {
    /// Opens the sink and writes the header row.
    pub fn new(filename: Option<&str>) -> Result<Self> {
        let writer: Box<dyn Write> = match filename {
            Some(f) => Box::new(File::create(f)?),
            None => Box::new(io::stdout()),
        };

        Self::from_writer(writer)
    }

    pub fn from_writer(writer: Box<dyn Write>) -> Result<Self> {
        let mut csv_wtr = csv::WriterBuilder::new().delimiter(b';').from_writer(writer);
        csv_wtr.write_record(StatParameter::headers())?;

        Ok(StatsWriter { csv_wtr })
    }

    pub fn add_event(&mut self, event: &StatisticEvent) -> Result<()> {
        self.csv_wtr.write_record(event.to_row())?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.csv_wtr.flush()?;
        Ok(())
    }
}
