pub mod balance_aggregator;
pub mod cost_reporter;
pub mod expense_splitter;
pub mod settlement_planner;

pub use balance_aggregator::BalanceAggregator;
pub use cost_reporter::CostReporter;
pub use expense_splitter::{ExpenseSplitter, split_amount};
pub use settlement_planner::SettlementPlanner;
