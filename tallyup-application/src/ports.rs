use crate::{
    error::SourceError,
    model::{GroupInfo, ObligationDraft},
};
use tallyup_domain::{
    GroupId, LedgerError, Obligation, ObligationId, ParticipantId, SettlementInstruction,
};

/// Supplies closed obligation sets for a scope.
///
/// Implementations must not return partial or duplicated records: the zero-sum
/// invariant only holds over a complete set.
pub trait ObligationSource: Send + Sync {
    fn obligations_for_group(&self, group: &GroupId) -> Result<Vec<Obligation>, SourceError>;

    fn obligations_for_participant(
        &self,
        participant: &ParticipantId,
    ) -> Result<Vec<Obligation>, SourceError>;

    fn members_of(&self, group: &GroupId) -> Result<Vec<ParticipantId>, SourceError>;
}

pub trait LedgerStore: ObligationSource {
    fn create_group(
        &self,
        group: GroupId,
        members: Vec<ParticipantId>,
    ) -> Result<GroupInfo, SourceError>;

    fn add_member(&self, group: &GroupId, participant: ParticipantId) -> Result<(), SourceError>;

    /// Stores the draft and registers its payer and beneficiaries as members.
    fn add_obligation(
        &self,
        group: &GroupId,
        draft: ObligationDraft,
    ) -> Result<ObligationId, SourceError>;

    fn group(&self, group: &GroupId) -> Result<GroupInfo, SourceError>;

    fn groups(&self) -> Vec<GroupInfo>;
}

/// Receives ledger events from the application layer.
pub trait LedgerObserver: Send + Sync {
    fn obligation_skipped(&self, _obligation: &Obligation, _error: &LedgerError) {}

    fn settlement_planned(&self, _group: &GroupId, _instructions: &[SettlementInstruction]) {}
}

pub struct NoopObserver;

impl LedgerObserver for NoopObserver {}
