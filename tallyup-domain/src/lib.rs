#![warn(clippy::uninlined_format_args)]

pub mod error;
pub mod model;
pub mod services;

pub use error::{InvalidObligationReason, LedgerError};
pub use model::{
    Balances, CostSummary, DebtEdge, GroupCost, GroupId, Money, Obligation, ObligationId,
    ObligationKind, ParticipantCost, ParticipantId, Settlement, SettlementInstruction,
};
pub use services::{
    BalanceAggregator, CostReporter, ExpenseSplitter, SettlementPlanner, split_amount,
};
