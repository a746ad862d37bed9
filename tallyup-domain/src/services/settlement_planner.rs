use crate::{
    error::{LedgerError, overflow},
    model::{Balances, Money, ParticipantId, Settlement, SettlementInstruction},
    services::BalanceAggregator,
};

/// Greedy settlement planning service
pub struct SettlementPlanner;

impl SettlementPlanner {
    /// Plans payments that drive every balance to zero.
    ///
    /// Each step takes the most negative balance (the debitor) and the most
    /// positive balance (the creditor) and moves the debitor's *whole* debt to
    /// the creditor, which may leave the creditor in debt for a later step.
    /// Ties on the extreme value go to the smallest participant id.
    ///
    /// The caller's map is never modified. Every step zeroes the debitor for
    /// good, so at most `n - 1` instructions are produced for `n` participants
    /// with a non-zero balance.
    ///
    /// # Errors
    /// * `ImbalancedLedger` if the balances do not sum to zero
    /// * `ArithmeticOverflow` if a step cannot be represented
    pub fn plan(&self, balances: &Balances) -> Result<Vec<SettlementInstruction>, LedgerError> {
        let total = BalanceAggregator::total(balances)?;
        if !total.is_zero() {
            return Err(LedgerError::ImbalancedLedger { total });
        }

        // Settled participants can never be an extreme of a zero-sum ledger,
        // so the working copy only tracks the open ones.
        let mut working: Balances = balances
            .iter()
            .filter(|(_, balance)| !balance.is_zero())
            .map(|(participant, balance)| (participant.clone(), *balance))
            .collect();
        let mut instructions = Vec::with_capacity(working.len().saturating_sub(1));

        loop {
            let Some((debitor, debt)) = most_negative(&working) else {
                break;
            };
            let Some((creditor, credit)) = most_positive(&working) else {
                break;
            };
            if debitor == creditor || debt.is_zero() || credit.is_zero() {
                break;
            }

            let amount = debt
                .checked_abs()
                .ok_or_else(|| overflow("planning settlement"))?;
            let remaining_credit = credit
                .checked_add(debt)
                .ok_or_else(|| overflow("planning settlement"))?;

            working.remove(&debitor);
            if remaining_credit.is_zero() {
                working.remove(&creditor);
            } else {
                working.insert(creditor.clone(), remaining_credit);
            }

            instructions.push(SettlementInstruction {
                from: debitor,
                to: creditor,
                amount,
            });
        }

        debug_assert!(working.is_empty());
        Ok(instructions)
    }

    /// Takes ownership of balances and returns the settled state together with
    /// the instructions that produced it.
    pub fn settle(&self, balances: Balances) -> Result<Settlement, LedgerError> {
        let instructions = self.plan(&balances)?;
        let new_balances = BalanceAggregator::apply(&balances, &instructions)?;

        debug_assert!(new_balances.values().all(|balance| balance.is_zero()));

        Ok(Settlement {
            new_balances,
            instructions,
        })
    }
}

fn most_negative(balances: &Balances) -> Option<(ParticipantId, Money)> {
    balances
        .iter()
        .min_by(|a, b| a.1.cmp(b.1).then_with(|| a.0.cmp(b.0)))
        .map(|(participant, balance)| (participant.clone(), *balance))
}

fn most_positive(balances: &Balances) -> Option<(ParticipantId, Money)> {
    // Reversed id comparison: among equal balances the smallest id is "greatest".
    balances
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(participant, balance)| (participant.clone(), *balance))
}
