use crate::{
    error::{LedgerError, overflow},
    model::{Balances, DebtEdge, Money, ParticipantId, SettlementInstruction},
};
use std::collections::BTreeMap;

/// Folds debt edges into one signed balance per participant.
pub struct BalanceAggregator;

impl BalanceAggregator {
    /// Credits each edge's source and debits its target.
    ///
    /// Participants that appear in no edge are absent from the result. Sums are
    /// accumulated in `i128`, so an overflow is reported only when a final
    /// balance does not fit, independent of edge order.
    pub fn aggregate<'a, I>(&self, edges: I) -> Result<Balances, LedgerError>
    where
        I: IntoIterator<Item = &'a DebtEdge>,
    {
        let mut wide: BTreeMap<ParticipantId, i128> = BTreeMap::new();
        for edge in edges {
            let amount = i128::from(edge.amount.minor_units());
            *wide.entry(edge.source.clone()).or_insert(0) += amount;
            *wide.entry(edge.target.clone()).or_insert(0) -= amount;
        }

        wide.into_iter()
            .map(|(participant, balance)| {
                Money::from_wide(balance)
                    .map(|balance| (participant, balance))
                    .ok_or_else(|| overflow("aggregating balances"))
            })
            .collect()
    }

    /// Sum of every balance in the map.
    pub fn total(balances: &Balances) -> Result<Money, LedgerError> {
        let total: i128 = balances
            .values()
            .map(|balance| i128::from(balance.minor_units()))
            .sum();
        Money::from_wide(total).ok_or_else(|| overflow("summing balances"))
    }

    /// Applies settlement instructions to a copy of `balances`.
    ///
    /// The payer's balance rises by the amount and the payee's falls by it;
    /// participants missing from the map start at zero.
    pub fn apply(
        balances: &Balances,
        instructions: &[SettlementInstruction],
    ) -> Result<Balances, LedgerError> {
        let mut result = balances.clone();
        for instruction in instructions {
            let from = result.entry(instruction.from.clone()).or_insert(Money::ZERO);
            *from = from
                .checked_add(instruction.amount)
                .ok_or_else(|| overflow("applying settlement"))?;

            let to = result.entry(instruction.to.clone()).or_insert(Money::ZERO);
            *to = to
                .checked_sub(instruction.amount)
                .ok_or_else(|| overflow("applying settlement"))?;
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn aggregator() -> BalanceAggregator {
        BalanceAggregator
    }

    fn edge(source: &str, target: &str, amount: i64) -> DebtEdge {
        DebtEdge {
            source: ParticipantId::from(source),
            target: ParticipantId::from(target),
            amount: Money::from_minor(amount),
        }
    }

    fn balances(rows: &[(&str, i64)]) -> Balances {
        rows.iter()
            .map(|&(id, amount)| (ParticipantId::from(id), Money::from_minor(amount)))
            .collect()
    }

    #[rstest]
    #[case::empty(vec![], balances(&[]))]
    #[case::even_split(
        vec![edge("U1", "U2", 12), edge("U1", "U3", 12)],
        balances(&[("U1", 24), ("U2", -12), ("U3", -12)])
    )]
    #[case::self_share_cancels(
        vec![edge("U1", "U1", 3), edge("U1", "U2", 2)],
        balances(&[("U1", 2), ("U2", -2)])
    )]
    #[case::mutual_debts_net_out(
        vec![edge("A", "B", 10), edge("B", "A", 10)],
        balances(&[("A", 0), ("B", 0)])
    )]
    fn aggregate_cases(
        aggregator: BalanceAggregator,
        #[case] edges: Vec<DebtEdge>,
        #[case] expected: Balances,
    ) {
        let result = aggregator.aggregate(&edges).expect("aggregate should succeed");
        assert_eq!(result, expected);
    }

    #[rstest]
    fn aggregate_is_order_independent(aggregator: BalanceAggregator) {
        let edges = vec![
            edge("A", "B", 7),
            edge("C", "A", 3),
            edge("B", "C", 11),
            edge("A", "C", 5),
        ];
        let mut reversed = edges.clone();
        reversed.reverse();

        assert_eq!(
            aggregator.aggregate(&edges),
            aggregator.aggregate(&reversed)
        );
    }

    #[rstest]
    fn aggregate_tolerates_intermediate_overflow(aggregator: BalanceAggregator) {
        let edges = vec![
            edge("A", "B", i64::MAX),
            edge("A", "B", i64::MAX),
            edge("B", "A", i64::MAX),
        ];
        let result = aggregator.aggregate(&edges).expect("final values fit");
        assert_eq!(result, balances(&[("A", i64::MAX), ("B", -i64::MAX)]));
    }

    #[rstest]
    fn aggregate_reports_overflow(aggregator: BalanceAggregator) {
        let edges = vec![edge("A", "B", i64::MAX), edge("A", "C", 1)];
        assert_eq!(
            aggregator.aggregate(&edges),
            Err(LedgerError::ArithmeticOverflow {
                operation: "aggregating balances"
            })
        );
    }

    #[test]
    fn total_sums_all_entries() {
        let input = balances(&[("A", 5), ("B", -3), ("C", -2)]);
        assert_eq!(BalanceAggregator::total(&input), Ok(Money::ZERO));
    }

    #[test]
    fn apply_moves_money_from_payer_to_payee() {
        let input = balances(&[("U1", 24), ("U2", -12), ("U3", -12)]);
        let instructions = [SettlementInstruction {
            from: ParticipantId::from("U2"),
            to: ParticipantId::from("U1"),
            amount: Money::from_minor(12),
        }];

        let result = BalanceAggregator::apply(&input, &instructions).expect("apply");
        assert_eq!(result, balances(&[("U1", 12), ("U2", 0), ("U3", -12)]));
        assert_eq!(input, balances(&[("U1", 24), ("U2", -12), ("U3", -12)]));
    }
}
