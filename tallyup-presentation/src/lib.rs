#![warn(clippy::uninlined_format_args)]

pub mod cost_presenter;
pub mod error_presenter;
pub mod group_presenter;
pub mod settlement_presenter;
pub mod text_table;

pub use cost_presenter::CostPresenter;
pub use error_presenter::{format_ledger_error, format_service_error};
pub use group_presenter::GroupPresenter;
pub use settlement_presenter::{SettlementPresenter, SettlementView};
