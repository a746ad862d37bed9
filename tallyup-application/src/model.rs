use crate::error::UnknownPolicyError;
use std::str::FromStr;
use tallyup_domain::{
    GroupId, Money, ObligationId, ObligationKind, ParticipantId, SettlementInstruction,
};

/// An obligation as submitted to a store, before it has an id or a group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObligationDraft {
    pub name: String,
    pub kind: ObligationKind,
    pub payer: ParticipantId,
    pub beneficiaries: Vec<ParticipantId>,
    pub amount: Money,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupInfo {
    pub id: GroupId,
    pub members: Vec<ParticipantId>,
    pub obligation_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonBalance {
    pub id: ParticipantId,
    pub balance: Money,
}

/// What to do with an obligation the splitter rejects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InvalidObligationPolicy {
    /// Fail the whole request.
    #[default]
    Reject,
    /// Drop the obligation, tell the observer and keep going.
    Skip,
}

impl FromStr for InvalidObligationPolicy {
    type Err = UnknownPolicyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "skip" => Ok(Self::Skip),
            other => Err(UnknownPolicyError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceReport {
    pub group: GroupId,
    /// Sorted by participant id; includes members with a zero balance.
    pub balances: Vec<PersonBalance>,
    pub skipped: Vec<ObligationId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementResult {
    pub group: GroupId,
    pub balances: Vec<PersonBalance>,
    pub instructions: Vec<SettlementInstruction>,
    pub skipped: Vec<ObligationId>,
}
