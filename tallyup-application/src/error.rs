use tallyup_domain::{GroupId, LedgerError, ObligationId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    #[error("Group '{0}' was not found")]
    GroupNotFound(GroupId),
    #[error("Group '{0}' already exists")]
    GroupAlreadyExists(GroupId),
    #[error("Obligation source unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerServiceError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("Obligation {obligation} appears more than once in the requested scope")]
    DuplicateObligation { obligation: ObligationId },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown invalid-obligation policy '{0}' (expected 'reject' or 'skip')")]
pub struct UnknownPolicyError(pub String);
