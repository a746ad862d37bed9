use dashmap::{DashMap, mapref::entry::Entry};
use fxhash::FxBuildHasher;
use indexmap::IndexSet;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};
use tallyup_application::{
    GroupInfo, LedgerStore, ObligationDraft, ObligationSource, SourceError,
};
use tallyup_domain::{GroupId, Obligation, ObligationId, ParticipantId};

struct GroupRecord {
    seq: u64,
    members: IndexSet<ParticipantId, FxBuildHasher>,
    obligations: Vec<Obligation>,
}

impl GroupRecord {
    fn info(&self, id: &GroupId) -> GroupInfo {
        GroupInfo {
            id: id.clone(),
            members: self.members.iter().cloned().collect(),
            obligation_count: self.obligations.len(),
        }
    }
}

/// Concurrent in-memory group store.
///
/// Members keep their registration order. Obligation ids are unique across
/// every group of one store and start at 1.
#[derive(Clone)]
pub struct InMemoryLedgerStore {
    groups: Arc<DashMap<GroupId, GroupRecord, FxBuildHasher>>,
    next_group: Arc<AtomicU64>,
    next_obligation: Arc<AtomicU64>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self {
            groups: Arc::new(DashMap::default()),
            next_group: Arc::new(AtomicU64::new(0)),
            next_obligation: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn contains_group(&self, group: &GroupId) -> bool {
        self.groups.contains_key(group)
    }
}

impl Default for InMemoryLedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ObligationSource for InMemoryLedgerStore {
    fn obligations_for_group(&self, group: &GroupId) -> Result<Vec<Obligation>, SourceError> {
        self.groups
            .get(group)
            .map(|record| record.obligations.clone())
            .ok_or_else(|| SourceError::GroupNotFound(group.clone()))
    }

    fn obligations_for_participant(
        &self,
        participant: &ParticipantId,
    ) -> Result<Vec<Obligation>, SourceError> {
        let mut obligations: Vec<Obligation> = self
            .groups
            .iter()
            .flat_map(|record| {
                record
                    .obligations
                    .iter()
                    .filter(|obligation| {
                        obligation.payer == *participant
                            || obligation.beneficiaries.contains(participant)
                    })
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .collect();
        obligations.sort_by_key(|obligation| obligation.id);
        Ok(obligations)
    }

    fn members_of(&self, group: &GroupId) -> Result<Vec<ParticipantId>, SourceError> {
        self.groups
            .get(group)
            .map(|record| record.members.iter().cloned().collect())
            .ok_or_else(|| SourceError::GroupNotFound(group.clone()))
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn create_group(
        &self,
        group: GroupId,
        members: Vec<ParticipantId>,
    ) -> Result<GroupInfo, SourceError> {
        match self.groups.entry(group) {
            Entry::Occupied(entry) => Err(SourceError::GroupAlreadyExists(entry.key().clone())),
            Entry::Vacant(entry) => {
                let record = GroupRecord {
                    seq: self.next_group.fetch_add(1, Ordering::Relaxed),
                    members: members.into_iter().collect(),
                    obligations: Vec::new(),
                };
                let info = record.info(entry.key());
                tracing::debug!(
                    group = %info.id,
                    members = info.members.len(),
                    "Created group"
                );
                entry.insert(record);
                Ok(info)
            }
        }
    }

    fn add_member(&self, group: &GroupId, participant: ParticipantId) -> Result<(), SourceError> {
        let mut record = self
            .groups
            .get_mut(group)
            .ok_or_else(|| SourceError::GroupNotFound(group.clone()))?;
        record.members.insert(participant);
        Ok(())
    }

    fn add_obligation(
        &self,
        group: &GroupId,
        draft: ObligationDraft,
    ) -> Result<ObligationId, SourceError> {
        let mut record = self
            .groups
            .get_mut(group)
            .ok_or_else(|| SourceError::GroupNotFound(group.clone()))?;

        let ObligationDraft {
            name,
            kind,
            payer,
            beneficiaries,
            amount,
        } = draft;
        let id = ObligationId(self.next_obligation.fetch_add(1, Ordering::Relaxed));

        record.members.insert(payer.clone());
        record.members.extend(beneficiaries.iter().cloned());
        record.obligations.push(
            Obligation::new(id, group.clone(), payer, beneficiaries, amount)
                .with_kind(kind)
                .with_name(name),
        );

        tracing::trace!(group = %group, obligation = %id, "Stored obligation");
        Ok(id)
    }

    fn group(&self, group: &GroupId) -> Result<GroupInfo, SourceError> {
        self.groups
            .get(group)
            .map(|record| record.info(group))
            .ok_or_else(|| SourceError::GroupNotFound(group.clone()))
    }

    fn groups(&self) -> Vec<GroupInfo> {
        let mut groups: Vec<(u64, GroupInfo)> = self
            .groups
            .iter()
            .map(|record| (record.seq, record.info(record.key())))
            .collect();
        groups.sort_by_key(|(seq, _)| *seq);
        groups.into_iter().map(|(_, info)| info).collect()
    }
}
