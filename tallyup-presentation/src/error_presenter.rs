use tallyup_application::{LedgerServiceError, SourceError};
use tallyup_domain::{InvalidObligationReason, LedgerError};
use tallyup_i18n as i18n;

pub fn format_service_error(error: &LedgerServiceError) -> String {
    match error {
        LedgerServiceError::Ledger(error) => format_ledger_error(error),
        LedgerServiceError::Source(SourceError::GroupNotFound(group)) => {
            i18n::group_not_found(group)
        }
        LedgerServiceError::Source(SourceError::GroupAlreadyExists(group)) => {
            i18n::group_already_exists(group)
        }
        LedgerServiceError::Source(SourceError::Unavailable(detail)) => {
            i18n::source_unavailable(detail)
        }
        LedgerServiceError::DuplicateObligation { obligation } => {
            i18n::duplicate_obligation(obligation)
        }
    }
}

pub fn format_ledger_error(error: &LedgerError) -> String {
    match error {
        LedgerError::InvalidObligation { obligation, reason } => {
            let reason = match reason {
                InvalidObligationReason::EmptyBeneficiaries => i18n::empty_beneficiaries(),
                InvalidObligationReason::NonPositiveAmount(amount) => {
                    i18n::non_positive_amount(amount)
                }
                InvalidObligationReason::MissingPayer => i18n::missing_payer(),
                InvalidObligationReason::MissingBeneficiary { index } => {
                    i18n::missing_beneficiary(*index)
                }
            };
            i18n::invalid_obligation(obligation, reason)
        }
        LedgerError::ArithmeticOverflow { operation } => i18n::arithmetic_overflow(operation),
        LedgerError::ImbalancedLedger { total } => i18n::imbalanced_ledger(total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tallyup_domain::{GroupId, Money, ObligationId};

    #[rstest]
    #[case::group_not_found(
        LedgerServiceError::Source(SourceError::GroupNotFound(GroupId::from("trip"))),
        "trip"
    )]
    #[case::duplicate(
        LedgerServiceError::DuplicateObligation { obligation: ObligationId(9) },
        "#9"
    )]
    #[case::non_positive(
        LedgerServiceError::Ledger(LedgerError::InvalidObligation {
            obligation: ObligationId(4),
            reason: InvalidObligationReason::NonPositiveAmount(Money::from_minor(-5)),
        }),
        "-5"
    )]
    #[case::missing_beneficiary(
        LedgerServiceError::Ledger(LedgerError::InvalidObligation {
            obligation: ObligationId(4),
            reason: InvalidObligationReason::MissingBeneficiary { index: 2 },
        }),
        "#4"
    )]
    #[case::imbalanced(
        LedgerServiceError::Ledger(LedgerError::ImbalancedLedger { total: Money::from_minor(7) }),
        "7"
    )]
    #[case::overflow(
        LedgerServiceError::Ledger(LedgerError::ArithmeticOverflow { operation: "planning settlement" }),
        "planning settlement"
    )]
    fn formatted_errors_carry_their_subject(
        #[case] error: LedgerServiceError,
        #[case] expected: &str,
    ) {
        let text = format_service_error(&error);
        assert!(text.contains(expected), "{text}");
    }
}
