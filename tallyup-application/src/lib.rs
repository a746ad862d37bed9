#![warn(clippy::uninlined_format_args)]

pub mod error;
pub mod ledger_service;
pub mod model;
pub mod ports;

pub use error::{LedgerServiceError, SourceError, UnknownPolicyError};
pub use ledger_service::LedgerService;
pub use model::{
    BalanceReport, GroupInfo, InvalidObligationPolicy, ObligationDraft, PersonBalance,
    SettlementResult,
};
pub use ports::{LedgerObserver, LedgerStore, NoopObserver, ObligationSource};
