use crate::{
    error::{LedgerError, overflow},
    model::{
        CostSummary, GroupCost, GroupId, Money, Obligation, ObligationKind, ParticipantCost,
        ParticipantId,
    },
    services::ExpenseSplitter,
};
use std::collections::BTreeMap;

/// Derives human-facing cost summaries from obligations.
pub struct CostReporter;

#[derive(Clone, Copy, Default)]
struct CostAccumulator {
    expenses: i128,
    income: i128,
}

impl CostAccumulator {
    fn finish(self) -> Result<CostSummary, LedgerError> {
        let expenses = Money::from_wide(self.expenses);
        let income = Money::from_wide(self.income);
        let balance = Money::from_wide(self.expenses - self.income);
        match (expenses, income, balance) {
            (Some(expenses), Some(income), Some(balance)) => Ok(CostSummary {
                expenses,
                income,
                balance,
            }),
            _ => Err(overflow("reporting costs")),
        }
    }
}

impl CostReporter {
    /// Summary for a single participant. Absent participants get a zero summary.
    pub fn report_for_participant(
        &self,
        obligations: &[Obligation],
        participant: &ParticipantId,
    ) -> Result<CostSummary, LedgerError> {
        Ok(self.report_by_group(obligations, participant)?.total)
    }

    /// Per-participant summaries plus totals by obligation kind.
    pub fn report_all(&self, obligations: &[Obligation]) -> Result<GroupCost, LedgerError> {
        let splitter = ExpenseSplitter;
        let mut per_participant: BTreeMap<ParticipantId, CostAccumulator> = BTreeMap::new();
        let mut total_expenses = 0i128;
        let mut total_transfers = 0i128;

        for obligation in obligations {
            let edges = splitter.split(obligation)?;
            let amount = i128::from(obligation.amount.minor_units());
            match obligation.kind {
                ObligationKind::Expense => total_expenses += amount,
                ObligationKind::Transfer => total_transfers += amount,
            }

            for edge in edges {
                let share = i128::from(edge.amount.minor_units());
                per_participant.entry(edge.source).or_default().expenses += share;
                per_participant.entry(edge.target).or_default().income += share;
            }
        }

        let per_participant: BTreeMap<ParticipantId, CostSummary> = per_participant
            .into_iter()
            .map(|(participant, acc)| acc.finish().map(|summary| (participant, summary)))
            .collect::<Result<_, _>>()?;

        Ok(GroupCost {
            total_expenses: Money::from_wide(total_expenses)
                .ok_or_else(|| overflow("reporting costs"))?,
            total_transfers: Money::from_wide(total_transfers)
                .ok_or_else(|| overflow("reporting costs"))?,
            per_participant,
        })
    }

    /// Total summary of one participant plus one bucket per group they appear in.
    pub fn report_by_group(
        &self,
        obligations: &[Obligation],
        participant: &ParticipantId,
    ) -> Result<ParticipantCost, LedgerError> {
        let splitter = ExpenseSplitter;
        let mut total = CostAccumulator::default();
        let mut per_group: BTreeMap<GroupId, CostAccumulator> = BTreeMap::new();

        for obligation in obligations {
            for edge in splitter.split(obligation)? {
                let share = i128::from(edge.amount.minor_units());
                if edge.source == *participant {
                    total.expenses += share;
                    per_group
                        .entry(obligation.group.clone())
                        .or_default()
                        .expenses += share;
                }
                if edge.target == *participant {
                    total.income += share;
                    per_group.entry(obligation.group.clone()).or_default().income += share;
                }
            }
        }

        let per_group: BTreeMap<GroupId, CostSummary> = per_group
            .into_iter()
            .map(|(group, acc)| acc.finish().map(|summary| (group, summary)))
            .collect::<Result<_, _>>()?;

        Ok(ParticipantCost {
            participant: participant.clone(),
            total: total.finish()?,
            per_group,
        })
    }
}
