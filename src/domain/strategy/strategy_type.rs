use crate::api::simulation_dto::{BatDto, CrowDto, LionDto, MonarchDto};
use crate::domain::simulation::pool::NodePool;
use crate::domain::strategy::bat::{BatParams, BatStrategy};
use crate::domain::strategy::crow_search::{CrowSearchParams, CrowSearchStrategy};
use crate::domain::strategy::lion::lion_strategy::{LionParams, LionStrategy};
use crate::domain::strategy::monarch_butterfly::{MonarchButterflyParams, MonarchButterflyStrategy};
use crate::domain::strategy::strategy_trait::AllocationStrategy;
use crate::error::ConversionError;

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyType {
    Lion,
    Bat,
    CrowSearch,
    MonarchButterfly,
}

/// Tuning parameters of all strategies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrategyParams {
    pub lion: LionParams,
    pub bat: BatParams,
    pub crow: CrowSearchParams,
    pub monarch: MonarchButterflyParams,
}

impl TryFrom<(LionDto, BatDto, CrowDto, MonarchDto)> for StrategyParams {
    type Error = ConversionError;

    fn try_from(args: (LionDto, BatDto, CrowDto, MonarchDto)) -> Result<Self, Self::Error> {
        let (lion, bat, crow, monarch) = args;

        Ok(StrategyParams {
            lion: LionParams::try_from(lion)?,
            bat: BatParams::try_from(bat)?,
            crow: CrowSearchParams { flight_length: crow.flight_length },
            monarch: MonarchButterflyParams::try_from(monarch)?,
        })
    }
}

impl StrategyType {
    pub const ALL: [StrategyType; 4] = [StrategyType::Lion, StrategyType::Bat, StrategyType::CrowSearch, StrategyType::MonarchButterfly];

    /// Human readable name used in reports.
    pub fn display_name(&self) -> &'static str {
        match self {
            StrategyType::Lion => "Lion Optimization",
            StrategyType::Bat => "Bat Algorithm",
            StrategyType::CrowSearch => "Crow Search",
            StrategyType::MonarchButterfly => "Monarch Butterfly",
        }
    }

    // Factory method to create a concrete strategy bound to `pool`
    pub fn get_instance(&self, pool: &NodePool, params: &StrategyParams) -> Result<Box<dyn AllocationStrategy>, ConversionError> {
        match self {
            StrategyType::Lion => Ok(Box::new(LionStrategy::new(pool, params.lion.clone())?)),
            StrategyType::Bat => Ok(Box::new(BatStrategy::new(params.bat.clone()))),
            StrategyType::CrowSearch => Ok(Box::new(CrowSearchStrategy::new(pool.len(), params.crow.clone()))),
            StrategyType::MonarchButterfly => Ok(Box::new(MonarchButterflyStrategy::new(params.monarch.clone()))),
        }
    }
}

impl fmt::Display for StrategyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for StrategyType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Lion" | "LionOptimization" => Ok(StrategyType::Lion),
            "Bat" | "BatAlgorithm" => Ok(StrategyType::Bat),
            "CrowSearch" | "Crow" => Ok(StrategyType::CrowSearch),
            "MonarchButterfly" | "Monarch" => Ok(StrategyType::MonarchButterfly),
            _ => Err(ConversionError::UnknownStrategyType(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::simulation::node::Node;

    #[test]
    fn test_parse_names() {
        assert_eq!(StrategyType::from_str("Lion"), Ok(StrategyType::Lion));
        assert_eq!(StrategyType::from_str("Crow"), Ok(StrategyType::CrowSearch));
        assert_eq!(StrategyType::from_str("MonarchButterfly"), Ok(StrategyType::MonarchButterfly));
        assert!(StrategyType::from_str("lion").is_err());
    }

    #[test]
    fn test_instances_report_their_name() {
        let pool = NodePool::new((0..8).map(|i| Node::new(i, 4, 2500.0, 0.002)).collect());
        let params = StrategyParams::default();

        for strategy_type in StrategyType::ALL {
            let strategy = strategy_type.get_instance(&pool, &params).unwrap();
            assert_eq!(strategy.name(), strategy_type.display_name());
        }
    }
}
