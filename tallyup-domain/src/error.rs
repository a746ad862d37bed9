use crate::model::{Money, ObligationId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("Obligation {obligation} rejected: {reason}")]
    InvalidObligation {
        obligation: ObligationId,
        reason: InvalidObligationReason,
    },
    #[error("Arithmetic overflow while {operation}")]
    ArithmeticOverflow { operation: &'static str },
    #[error("Sum of balances must be zero (found {total})")]
    ImbalancedLedger { total: Money },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidObligationReason {
    #[error("beneficiary list is empty")]
    EmptyBeneficiaries,
    #[error("amount must be positive (found {0})")]
    NonPositiveAmount(Money),
    #[error("payer is missing")]
    MissingPayer,
    #[error("beneficiary at position {index} is missing")]
    MissingBeneficiary { index: usize },
}

pub(crate) fn overflow(operation: &'static str) -> LedgerError {
    LedgerError::ArithmeticOverflow { operation }
}
