use crate::{
    error::{InvalidObligationReason, LedgerError},
    model::{DebtEdge, Money, Obligation},
};

/// Turns obligations into per-beneficiary debt edges.
pub struct ExpenseSplitter;

impl ExpenseSplitter {
    /// Splits one obligation into edges whose amounts sum to `obligation.amount`.
    ///
    /// Edge order matches beneficiary order. The obligation is validated first;
    /// an invalid obligation produces no edges at all.
    pub fn split(&self, obligation: &Obligation) -> Result<Vec<DebtEdge>, LedgerError> {
        validate(obligation).map_err(|reason| LedgerError::InvalidObligation {
            obligation: obligation.id,
            reason,
        })?;

        let shares = split_amount(obligation.amount, obligation.beneficiaries.len()).ok_or(
            LedgerError::InvalidObligation {
                obligation: obligation.id,
                reason: InvalidObligationReason::NonPositiveAmount(obligation.amount),
            },
        )?;
        let edges = obligation
            .beneficiaries
            .iter()
            .zip(shares)
            .map(|(beneficiary, amount)| DebtEdge {
                source: obligation.payer.clone(),
                target: beneficiary.clone(),
                amount,
            })
            .collect();

        Ok(edges)
    }

    /// Splits a batch, stopping at the first invalid obligation.
    pub fn split_all<'a, I>(&self, obligations: I) -> Result<Vec<DebtEdge>, LedgerError>
    where
        I: IntoIterator<Item = &'a Obligation>,
    {
        let mut edges = Vec::new();
        for obligation in obligations {
            edges.extend(self.split(obligation)?);
        }
        Ok(edges)
    }
}

/// Divides a non-negative `amount` into `parts` integer shares.
///
/// Every share is `amount / parts`; the first `amount % parts` shares carry one
/// extra minor unit. Returns an empty vector when `parts` is zero and `None`
/// for a negative amount.
pub fn split_amount(amount: Money, parts: usize) -> Option<Vec<Money>> {
    if amount.is_negative() {
        return None;
    }
    if parts == 0 {
        return Some(Vec::new());
    }

    let total = amount.minor_units();
    let count = i64::try_from(parts).unwrap_or(i64::MAX);
    let base = total / count;
    // remainder < parts, so it always fits in usize
    let remainder = (total % count).unsigned_abs() as usize;

    let shares = (0..parts)
        .map(|idx| {
            if idx < remainder {
                Money::from_minor(base + 1)
            } else {
                Money::from_minor(base)
            }
        })
        .collect();
    Some(shares)
}

fn validate(obligation: &Obligation) -> Result<(), InvalidObligationReason> {
    if obligation.beneficiaries.is_empty() {
        return Err(InvalidObligationReason::EmptyBeneficiaries);
    }
    if !obligation.amount.is_positive() {
        return Err(InvalidObligationReason::NonPositiveAmount(
            obligation.amount,
        ));
    }
    if obligation.payer.is_blank() {
        return Err(InvalidObligationReason::MissingPayer);
    }
    if let Some(index) = obligation
        .beneficiaries
        .iter()
        .position(|beneficiary| beneficiary.is_blank())
    {
        return Err(InvalidObligationReason::MissingBeneficiary { index });
    }
    Ok(())
}
