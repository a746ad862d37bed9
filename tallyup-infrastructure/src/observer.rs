use std::sync::atomic::{AtomicUsize, Ordering};
use tallyup_application::LedgerObserver;
use tallyup_domain::{GroupId, LedgerError, Obligation, SettlementInstruction};

/// Forwards ledger events to `tracing` and counts skipped obligations.
#[derive(Default)]
pub struct TracingObserver {
    skipped: AtomicUsize,
}

impl TracingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skipped(&self) -> usize {
        self.skipped.load(Ordering::Relaxed)
    }
}

impl LedgerObserver for TracingObserver {
    fn obligation_skipped(&self, obligation: &Obligation, error: &LedgerError) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(
            obligation = %obligation.id,
            group = %obligation.group,
            payer = %obligation.payer,
            amount = %obligation.amount,
            error = %error,
            "Obligation excluded from computation"
        );
    }

    fn settlement_planned(&self, group: &GroupId, instructions: &[SettlementInstruction]) {
        for (step, instruction) in instructions.iter().enumerate() {
            tracing::debug!(
                group = %group,
                step,
                from = %instruction.from,
                to = %instruction.to,
                amount = %instruction.amount,
                "Settlement step"
            );
        }
    }
}
