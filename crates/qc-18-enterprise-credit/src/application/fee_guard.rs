//! Admission stage that releases locked credit ahead of fee deduction.

use crate::domain::{AccountAddress, FeeTx, Result};
use crate::ports::{AdmissionHandler, AdmissionStage, FeeGatePolicy};
use crate::store::{LockedBalanceLedger, ModuleContext};
use std::sync::Arc;
use tracing::{debug, warn};

/// For fee-gated transactions whose payer holds locked credit, unlock enough
/// to cover the declared fee, then continue the chain.
pub struct FeeInteractionGuard {
    locked: LockedBalanceLedger,
    policy: Arc<dyn FeeGatePolicy>,
}

impl FeeInteractionGuard {
    /// Create a guard.
    pub fn new(locked: LockedBalanceLedger, policy: Arc<dyn FeeGatePolicy>) -> Self {
        Self { locked, policy }
    }
}

impl AdmissionStage for FeeInteractionGuard {
    fn admit(&self, tx: &FeeTx, simulate: bool, next: &dyn AdmissionHandler) -> Result<()> {
        if self.policy.is_fee_gated(tx) {
            let payer = AccountAddress::from_hex(&tx.fee_payer)?;
            if self.locked.is_locked(&payer)? {
                match self.locked.unlock_for_fees(&payer, &tx.fee) {
                    Ok(Some(released)) => {
                        debug!(payer = %payer, released = %released, simulate, "Unlocked credit for fees");
                    }
                    Ok(None) => {}
                    Err(err) => {
                        warn!(payer = %payer, error = %err, "Failed to unlock enterprise credit");
                        return Err(err);
                    }
                }
            }
        }
        next.handle(tx, simulate)
    }
}

/// Ordered admission stages ending in a terminal handler.
pub struct AdmissionChain {
    ctx: ModuleContext,
    stages: Vec<Arc<dyn AdmissionStage>>,
}

impl AdmissionChain {
    /// Create a chain from stages, outermost first.
    pub fn new(ctx: ModuleContext, stages: Vec<Arc<dyn AdmissionStage>>) -> Self {
        Self { ctx, stages }
    }

    /// Run every stage, then `terminal`, in one frame. An `Err` from any
    /// stage or from `terminal` rolls back every earlier stage's effects.
    pub fn run(&self, tx: &FeeTx, simulate: bool, terminal: &dyn AdmissionHandler) -> Result<()> {
        self.ctx.atomically(|| {
            Link {
                stages: &self.stages,
                terminal,
            }
            .handle(tx, simulate)
        })
    }
}

struct Link<'a> {
    stages: &'a [Arc<dyn AdmissionStage>],
    terminal: &'a dyn AdmissionHandler,
}

impl AdmissionHandler for Link<'_> {
    fn handle(&self, tx: &FeeTx, simulate: bool) -> Result<()> {
        match self.stages.split_first() {
            Some((stage, rest)) => stage.admit(
                tx,
                simulate,
                &Link {
                    stages: rest,
                    terminal: self.terminal,
                },
            ),
            None => self.terminal.handle(tx, simulate),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MessageTypeFeeGate;
    use crate::domain::{Coin, EnterpriseError, LockedBalance, TxMessage};
    use crate::testing::TestHarness;
    use crate::ports::outbound::BankLedger;
    use std::cell::Cell;

    const GATED: &str = "beacon/record_beacon_timestamp";

    fn payer() -> AccountAddress {
        AccountAddress::from([0x66; 20])
    }

    fn tx(type_url: &str, fee: u128) -> FeeTx {
        FeeTx {
            fee_payer: payer().to_string(),
            fee: vec![Coin::new("nund", fee)],
            messages: vec![TxMessage::new(type_url)],
            gas_limit: 200_000,
        }
    }

    fn guard(h: &TestHarness) -> FeeInteractionGuard {
        FeeInteractionGuard::new(
            LockedBalanceLedger::new(h.ctx.clone()),
            Arc::new(MessageTypeFeeGate::new([GATED])),
        )
    }

    #[test]
    fn test_gated_tx_unlocks_before_next() {
        let h = TestHarness::new();
        let locked = LockedBalanceLedger::new(h.ctx.clone());
        locked.mint_and_lock(&payer(), &Coin::new("nund", 100)).unwrap();

        let seen_spendable = Cell::new(0u128);
        let next = |_: &FeeTx, _: bool| -> Result<()> {
            seen_spendable.set(h.bank.spendable(&payer(), "nund").amount);
            Ok(())
        };
        guard(&h).admit(&tx(GATED, 25), false, &next).unwrap();
        assert_eq!(seen_spendable.get(), 25);
        assert_eq!(locked.get_locked(&payer()).unwrap().amount, 75);
    }

    #[test]
    fn test_ungated_tx_passes_through() {
        let h = TestHarness::new();
        let locked = LockedBalanceLedger::new(h.ctx.clone());
        locked.mint_and_lock(&payer(), &Coin::new("nund", 100)).unwrap();
        let next = |_: &FeeTx, _: bool| -> Result<()> { Ok(()) };
        guard(&h).admit(&tx("bank/send", 25), false, &next).unwrap();
        assert_eq!(locked.get_locked(&payer()).unwrap().amount, 100);
    }

    #[test]
    fn test_malformed_payer_rejected() {
        let h = TestHarness::new();
        let mut bad = tx(GATED, 1);
        bad.fee_payer = "0x1234".to_string();
        let next = |_: &FeeTx, _: bool| -> Result<()> { Ok(()) };
        assert!(matches!(
            guard(&h).admit(&bad, false, &next),
            Err(EnterpriseError::MalformedAddress { .. })
        ));
    }

    #[test]
    fn test_chain_runs_stages_in_order() {
        let h = TestHarness::new();
        let locked = LockedBalanceLedger::new(h.ctx.clone());
        locked.mint_and_lock(&payer(), &Coin::new("nund", 10)).unwrap();

        let stage: Arc<dyn AdmissionStage> = Arc::new(guard(&h));
        let chain = AdmissionChain::new(h.ctx.clone(), vec![stage]);
        let deduct = |tx: &FeeTx, _: bool| -> Result<()> {
            let payer = AccountAddress::from_hex(&tx.fee_payer)?;
            h.bank.deduct_fee(&payer, &tx.fee)?;
            Ok(())
        };
        chain.run(&tx(GATED, 10), false, &deduct).unwrap();
        assert_eq!(h.bank.spendable(&payer(), "nund").amount, 0);
        assert_eq!(locked.get_spent(&payer()).unwrap().amount, 10);
    }

    #[test]
    fn test_failed_unlock_rejects_before_next() {
        let h = TestHarness::new();
        let locked = LockedBalanceLedger::new(h.ctx.clone());
        // Locked record with no delegation behind it: undelegation fails.
        locked
            .set_locked(&LockedBalance {
                owner: payer(),
                amount: Coin::new("nund", 50),
            })
            .unwrap();

        let called = Cell::new(false);
        let next = |_: &FeeTx, _: bool| -> Result<()> {
            called.set(true);
            Ok(())
        };
        let err = guard(&h).admit(&tx(GATED, 10), false, &next).unwrap_err();

        assert!(matches!(err, EnterpriseError::Ledger(_)));
        assert!(!called.get());
        assert_eq!(locked.get_locked(&payer()).unwrap().amount, 50);
        assert!(locked.get_spent(&payer()).unwrap().is_zero());
        assert!(locked.get_total_spent().unwrap().is_zero());
        assert!(h.events.events_of("credit_unlocked").is_empty());
    }

    #[test]
    fn test_chain_rolls_back_unlock_when_terminal_fails() {
        let h = TestHarness::new();
        let locked = LockedBalanceLedger::new(h.ctx.clone());
        locked.mint_and_lock(&payer(), &Coin::new("nund", 100)).unwrap();

        let stage: Arc<dyn AdmissionStage> = Arc::new(guard(&h));
        let chain = AdmissionChain::new(h.ctx.clone(), vec![stage]);
        let reject = |_: &FeeTx, _: bool| -> Result<()> {
            Err(EnterpriseError::NonPositiveAmount)
        };
        assert!(chain.run(&tx(GATED, 30), false, &reject).is_err());

        assert_eq!(locked.get_locked(&payer()).unwrap().amount, 100);
        assert!(locked.get_spent(&payer()).unwrap().is_zero());
        assert_eq!(h.bank.delegated(&payer(), "nund"), 100);
        assert!(h.events.events_of("credit_unlocked").is_empty());
    }
}
