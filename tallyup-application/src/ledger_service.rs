use crate::{
    error::LedgerServiceError,
    model::{BalanceReport, InvalidObligationPolicy, PersonBalance, SettlementResult},
    ports::{LedgerObserver, ObligationSource},
};
use fxhash::FxHashSet;
use tallyup_domain::{
    BalanceAggregator, Balances, CostReporter, ExpenseSplitter, GroupCost, GroupId, LedgerError,
    Money, Obligation, ObligationId, ParticipantCost, ParticipantId, SettlementPlanner,
};

/// Runs the ledger core over obligation sets pulled from a source.
#[derive(Clone, Copy)]
pub struct LedgerService<'a> {
    source: &'a dyn ObligationSource,
    observer: &'a dyn LedgerObserver,
    policy: InvalidObligationPolicy,
}

struct Admitted {
    obligations: Vec<Obligation>,
    skipped: Vec<ObligationId>,
}

impl<'a> LedgerService<'a> {
    pub fn new(source: &'a dyn ObligationSource, observer: &'a dyn LedgerObserver) -> Self {
        Self {
            source,
            observer,
            policy: InvalidObligationPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: InvalidObligationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> InvalidObligationPolicy {
        self.policy
    }

    /// Net balance of every group member, zero-balance members included.
    pub fn group_balances(&self, group: &GroupId) -> Result<BalanceReport, LedgerServiceError> {
        let admitted = self.load_group(group)?;
        let balances = self.balances_with_members(group, &admitted.obligations)?;

        Ok(BalanceReport {
            group: group.clone(),
            balances: to_person_balances(&balances),
            skipped: admitted.skipped,
        })
    }

    /// Balances of the group and the instructions that settle them.
    pub fn settle_group(&self, group: &GroupId) -> Result<SettlementResult, LedgerServiceError> {
        let admitted = self.load_group(group)?;
        let balances = self.balances_with_members(group, &admitted.obligations)?;
        let instructions = SettlementPlanner.plan(&balances)?;

        tracing::info!(
            group = %group,
            participants = balances.len(),
            instructions = instructions.len(),
            skipped = admitted.skipped.len(),
            "Planned group settlement"
        );
        self.observer.settlement_planned(group, &instructions);

        Ok(SettlementResult {
            group: group.clone(),
            balances: to_person_balances(&balances),
            instructions,
            skipped: admitted.skipped,
        })
    }

    pub fn group_costs(&self, group: &GroupId) -> Result<GroupCost, LedgerServiceError> {
        let admitted = self.load_group(group)?;
        Ok(CostReporter.report_all(&admitted.obligations)?)
    }

    /// Costs of one participant across every group they take part in.
    pub fn participant_costs(
        &self,
        participant: &ParticipantId,
    ) -> Result<ParticipantCost, LedgerServiceError> {
        let obligations = self.source.obligations_for_participant(participant)?;
        tracing::debug!(
            participant = %participant,
            obligations = obligations.len(),
            "Loaded participant obligations"
        );
        let admitted = self.admit(obligations)?;
        Ok(CostReporter.report_by_group(&admitted.obligations, participant)?)
    }

    fn load_group(&self, group: &GroupId) -> Result<Admitted, LedgerServiceError> {
        let obligations = self.source.obligations_for_group(group)?;
        tracing::debug!(
            group = %group,
            obligations = obligations.len(),
            "Loaded group obligations"
        );
        self.admit(obligations)
    }

    fn balances_with_members(
        &self,
        group: &GroupId,
        obligations: &[Obligation],
    ) -> Result<Balances, LedgerServiceError> {
        let edges = ExpenseSplitter.split_all(obligations)?;
        let mut balances = BalanceAggregator.aggregate(&edges)?;
        for member in self.source.members_of(group)? {
            balances.entry(member).or_insert(Money::ZERO);
        }
        Ok(balances)
    }

    /// Rejects duplicated records and applies the invalid-obligation policy.
    fn admit(&self, obligations: Vec<Obligation>) -> Result<Admitted, LedgerServiceError> {
        let mut seen: FxHashSet<ObligationId> = FxHashSet::default();
        let mut admitted = Vec::with_capacity(obligations.len());
        let mut skipped = Vec::new();

        for obligation in obligations {
            if !seen.insert(obligation.id) {
                return Err(LedgerServiceError::DuplicateObligation {
                    obligation: obligation.id,
                });
            }

            match ExpenseSplitter.split(&obligation) {
                Ok(_) => admitted.push(obligation),
                Err(err @ LedgerError::InvalidObligation { .. })
                    if self.policy == InvalidObligationPolicy::Skip =>
                {
                    tracing::warn!(
                        obligation = %obligation.id,
                        group = %obligation.group,
                        error = %err,
                        "Skipping invalid obligation"
                    );
                    self.observer.obligation_skipped(&obligation, &err);
                    skipped.push(obligation.id);
                }
                Err(err) => return Err(err.into()),
            }
        }

        Ok(Admitted {
            obligations: admitted,
            skipped,
        })
    }
}

fn to_person_balances(balances: &Balances) -> Vec<PersonBalance> {
    // BTreeMap iteration keeps the output sorted by participant id.
    balances
        .iter()
        .map(|(id, balance)| PersonBalance {
            id: id.clone(),
            balance: *balance,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::SourceError,
        ports::{LedgerObserver, NoopObserver},
    };
    use rstest::rstest;
    use std::{collections::HashMap, sync::Mutex};
    use tallyup_domain::{InvalidObligationReason, SettlementInstruction};

    #[derive(Default)]
    struct FixedSource {
        groups: HashMap<GroupId, (Vec<ParticipantId>, Vec<Obligation>)>,
    }

    impl FixedSource {
        fn with_group(mut self, group: &str, members: &[&str], obligations: Vec<Obligation>) -> Self {
            self.groups.insert(
                GroupId::from(group),
                (
                    members.iter().copied().map(ParticipantId::from).collect(),
                    obligations,
                ),
            );
            self
        }
    }

    impl ObligationSource for FixedSource {
        fn obligations_for_group(&self, group: &GroupId) -> Result<Vec<Obligation>, SourceError> {
            self.groups
                .get(group)
                .map(|(_, obligations)| obligations.clone())
                .ok_or_else(|| SourceError::GroupNotFound(group.clone()))
        }

        fn obligations_for_participant(
            &self,
            participant: &ParticipantId,
        ) -> Result<Vec<Obligation>, SourceError> {
            let mut result: Vec<Obligation> = self
                .groups
                .values()
                .flat_map(|(_, obligations)| obligations.iter())
                .filter(|obligation| {
                    obligation.payer == *participant
                        || obligation.beneficiaries.contains(participant)
                })
                .cloned()
                .collect();
            result.sort_by_key(|obligation| obligation.id);
            Ok(result)
        }

        fn members_of(&self, group: &GroupId) -> Result<Vec<ParticipantId>, SourceError> {
            self.groups
                .get(group)
                .map(|(members, _)| members.clone())
                .ok_or_else(|| SourceError::GroupNotFound(group.clone()))
        }
    }

    #[derive(Default)]
    struct RecordingObserver {
        skipped: Mutex<Vec<ObligationId>>,
        planned: Mutex<Vec<(GroupId, usize)>>,
    }

    impl LedgerObserver for RecordingObserver {
        fn obligation_skipped(&self, obligation: &Obligation, _error: &LedgerError) {
            self.skipped.lock().expect("lock").push(obligation.id);
        }

        fn settlement_planned(&self, group: &GroupId, instructions: &[SettlementInstruction]) {
            self.planned
                .lock()
                .expect("lock")
                .push((group.clone(), instructions.len()));
        }
    }

    fn obligation(id: u64, group: &str, payer: &str, beneficiaries: &[&str], amount: i64) -> Obligation {
        Obligation::new(
            ObligationId(id),
            GroupId::from(group),
            ParticipantId::from(payer),
            beneficiaries.iter().copied().map(ParticipantId::from).collect(),
            Money::from_minor(amount),
        )
    }

    fn person(id: &str, balance: i64) -> PersonBalance {
        PersonBalance {
            id: ParticipantId::from(id),
            balance: Money::from_minor(balance),
        }
    }

    fn trip_source() -> FixedSource {
        FixedSource::default().with_group(
            "trip",
            &["ana", "ben", "cho", "dev"],
            vec![
                obligation(1, "trip", "ana", &["ana", "ben", "cho"], 300),
                obligation(2, "trip", "ben", &["cho"], 50),
            ],
        )
    }

    #[test]
    fn group_balances_include_idle_members() {
        let source = trip_source();
        let service = LedgerService::new(&source, &NoopObserver);

        let report = service
            .group_balances(&GroupId::from("trip"))
            .expect("balances");

        assert_eq!(
            report.balances,
            vec![
                person("ana", 200),
                person("ben", -50),
                person("cho", -150),
                person("dev", 0),
            ]
        );
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn settle_group_notifies_observer() {
        let source = trip_source();
        let observer = RecordingObserver::default();
        let service = LedgerService::new(&source, &observer);

        let result = service.settle_group(&GroupId::from("trip")).expect("settle");

        assert_eq!(
            result.instructions,
            vec![
                SettlementInstruction {
                    from: ParticipantId::from("cho"),
                    to: ParticipantId::from("ana"),
                    amount: Money::from_minor(150),
                },
                SettlementInstruction {
                    from: ParticipantId::from("ben"),
                    to: ParticipantId::from("ana"),
                    amount: Money::from_minor(50),
                },
            ]
        );
        assert_eq!(
            *observer.planned.lock().expect("lock"),
            vec![(GroupId::from("trip"), 2)]
        );
    }

    #[rstest]
    #[case::reject(InvalidObligationPolicy::Reject, false)]
    #[case::skip(InvalidObligationPolicy::Skip, true)]
    fn invalid_obligation_policy(#[case] policy: InvalidObligationPolicy, #[case] succeeds: bool) {
        let source = FixedSource::default().with_group(
            "flat",
            &["ana", "ben"],
            vec![
                obligation(1, "flat", "ana", &["ben"], 40),
                obligation(2, "flat", "ben", &[], 10),
            ],
        );
        let observer = RecordingObserver::default();
        let service = LedgerService::new(&source, &observer).with_policy(policy);

        let result = service.settle_group(&GroupId::from("flat"));

        if succeeds {
            let result = result.expect("skip policy keeps going");
            assert_eq!(result.skipped, vec![ObligationId(2)]);
            assert_eq!(result.instructions.len(), 1);
            assert_eq!(*observer.skipped.lock().expect("lock"), vec![ObligationId(2)]);
        } else {
            assert_eq!(
                result,
                Err(LedgerServiceError::Ledger(LedgerError::InvalidObligation {
                    obligation: ObligationId(2),
                    reason: InvalidObligationReason::EmptyBeneficiaries,
                }))
            );
            assert!(observer.skipped.lock().expect("lock").is_empty());
        }
    }

    #[test]
    fn duplicated_records_are_rejected() {
        let source = FixedSource::default().with_group(
            "flat",
            &["ana", "ben"],
            vec![
                obligation(1, "flat", "ana", &["ben"], 40),
                obligation(1, "flat", "ana", &["ben"], 40),
            ],
        );
        let service = LedgerService::new(&source, &NoopObserver);

        assert_eq!(
            service.group_balances(&GroupId::from("flat")),
            Err(LedgerServiceError::DuplicateObligation {
                obligation: ObligationId(1)
            })
        );
    }

    #[test]
    fn unknown_group_surfaces_source_error() {
        let source = FixedSource::default();
        let service = LedgerService::new(&source, &NoopObserver);

        assert_eq!(
            service.group_costs(&GroupId::from("nope")),
            Err(LedgerServiceError::Source(SourceError::GroupNotFound(
                GroupId::from("nope")
            )))
        );
    }

    #[test]
    fn participant_costs_span_groups() {
        let source = trip_source().with_group(
            "flat",
            &["ana", "cho"],
            vec![obligation(10, "flat", "cho", &["ana", "cho"], 80)],
        );
        let service = LedgerService::new(&source, &NoopObserver);

        let costs = service
            .participant_costs(&ParticipantId::from("ana"))
            .expect("costs");

        assert_eq!(costs.per_group.len(), 2);
        assert_eq!(costs.total.expenses, Money::from_minor(300));
        assert_eq!(costs.total.income, Money::from_minor(140));
        assert_eq!(costs.total.balance, Money::from_minor(160));
    }

    #[rstest]
    #[case::reject("reject", Ok(InvalidObligationPolicy::Reject))]
    #[case::skip_mixed_case(" Skip ", Ok(InvalidObligationPolicy::Skip))]
    #[case::unknown(
        "ignore",
        Err(crate::error::UnknownPolicyError("ignore".to_string()))
    )]
    fn policy_from_str(
        #[case] input: &str,
        #[case] expected: Result<InvalidObligationPolicy, crate::error::UnknownPolicyError>,
    ) {
        assert_eq!(input.parse::<InvalidObligationPolicy>(), expected);
    }
}
