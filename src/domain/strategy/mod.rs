pub mod bat;
pub mod crow_search;
pub mod lion;
pub mod monarch_butterfly;
pub mod strategy_trait;
pub mod strategy_type;
