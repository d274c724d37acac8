//! # Locked Balance Ledger
//!
//! Per-account locked credit, the global locked total and the spent
//! counters. Locked credit is real coin sitting in the custody module
//! account as a delegation from its owner.
//!
//! | Operation | Ledger calls | Tallies |
//! |-----------|--------------|---------|
//! | `mint_and_lock` | mint → send to owner → delegate to custody | locked += amount |
//! | `unlock_for_fees` | undelegate to payer | locked -= released, spent += released |
//!
//! Both run in a single frame so the custody balance and the tallies move
//! together.

use super::context::ModuleContext;
use crate::domain::invariants::module_account_invariant;
use crate::domain::keys::{
    locked_balance_key, spent_key, LOCKED_BALANCE_PREFIX, SPENT_PREFIX, TOTAL_LOCKED_KEY,
    TOTAL_SPENT_KEY,
};
use crate::domain::{
    amount_of, AccountAddress, Coin, EnterpriseError, EnterpriseEvent, LockedBalance, Result,
    SpentCounter,
};
use tracing::debug;

/// Locked and spent credit accounting.
#[derive(Clone)]
pub struct LockedBalanceLedger {
    ctx: ModuleContext,
}

impl LockedBalanceLedger {
    /// Create a ledger over the module context.
    pub fn new(ctx: ModuleContext) -> Self {
        Self { ctx }
    }

    fn denom(&self) -> String {
        self.ctx.params().denom
    }

    /// Locked credit of `owner`; zero coin of the credit denom if none.
    pub fn get_locked(&self, owner: &AccountAddress) -> Result<Coin> {
        let record: Option<LockedBalance> = self.ctx.get_record(&locked_balance_key(owner))?;
        Ok(record.map_or_else(|| Coin::zero(self.denom()), |r| r.amount))
    }

    /// True if `owner` has a positive locked balance.
    pub fn is_locked(&self, owner: &AccountAddress) -> Result<bool> {
        Ok(self.get_locked(owner)?.is_positive())
    }

    /// Spent credit of `owner`.
    pub fn get_spent(&self, owner: &AccountAddress) -> Result<Coin> {
        let record: Option<SpentCounter> = self.ctx.get_record(&spent_key(owner))?;
        Ok(record.map_or_else(|| Coin::zero(self.denom()), |r| r.amount))
    }

    /// Global locked total.
    pub fn get_total_locked(&self) -> Result<Coin> {
        Ok(self
            .ctx
            .get_record::<Coin>(TOTAL_LOCKED_KEY)?
            .unwrap_or_else(|| Coin::zero(self.denom())))
    }

    /// Global spent total.
    pub fn get_total_spent(&self) -> Result<Coin> {
        Ok(self
            .ctx
            .get_record::<Coin>(TOTAL_SPENT_KEY)?
            .unwrap_or_else(|| Coin::zero(self.denom())))
    }

    /// Every locked record in key order, zero balances included.
    pub fn all_locked(&self) -> Result<Vec<LockedBalance>> {
        self.ctx.scan_records(&[LOCKED_BALANCE_PREFIX])
    }

    /// Every spent record in key order.
    pub fn all_spent(&self) -> Result<Vec<SpentCounter>> {
        self.ctx.scan_records(&[SPENT_PREFIX])
    }

    pub(crate) fn set_locked(&self, record: &LockedBalance) -> Result<()> {
        record.owner.validate()?;
        self.ctx.put_record(&locked_balance_key(&record.owner), record)
    }

    pub(crate) fn set_spent(&self, record: &SpentCounter) -> Result<()> {
        record.owner.validate()?;
        self.ctx.put_record(&spent_key(&record.owner), record)
    }

    pub(crate) fn set_total_locked(&self, total: &Coin) -> Result<()> {
        self.ctx.put_record(TOTAL_LOCKED_KEY, total)
    }

    pub(crate) fn set_total_spent(&self, total: &Coin) -> Result<()> {
        self.ctx.put_record(TOTAL_SPENT_KEY, total)
    }

    fn increment_locked(&self, owner: &AccountAddress, amount: &Coin) -> Result<()> {
        let locked = self.get_locked(owner)?.checked_add(amount)?;
        self.set_locked(&LockedBalance {
            owner: owner.clone(),
            amount: locked,
        })?;
        let total = self.get_total_locked()?.checked_add(amount)?;
        self.set_total_locked(&total)
    }

    fn decrement_locked(&self, owner: &AccountAddress, amount: &Coin) -> Result<()> {
        let locked = self.get_locked(owner)?.checked_sub(amount).map_err(|_| {
            EnterpriseError::InvariantViolation(format!(
                "locked balance of {} below release of {}",
                owner, amount
            ))
        })?;
        self.set_locked(&LockedBalance {
            owner: owner.clone(),
            amount: locked,
        })?;
        let total = self.get_total_locked()?.checked_sub(amount).map_err(|_| {
            EnterpriseError::InvariantViolation(format!(
                "global locked total below release of {}",
                amount
            ))
        })?;
        self.set_total_locked(&total)
    }

    fn increment_spent(&self, owner: &AccountAddress, amount: &Coin) -> Result<()> {
        let spent = self.get_spent(owner)?.checked_add(amount)?;
        self.set_spent(&SpentCounter {
            owner: owner.clone(),
            amount: spent,
        })?;
        let total = self.get_total_spent()?.checked_add(amount)?;
        self.set_total_spent(&total)
    }

    /// Mint `amount` to `owner` and lock it under module custody.
    /// A zero amount is a no-op.
    pub fn mint_and_lock(&self, owner: &AccountAddress, amount: &Coin) -> Result<()> {
        if amount.is_zero() {
            return Ok(());
        }
        let module = self.ctx.module_name.as_str();
        self.ctx.atomically(|| {
            self.ctx.bank.mint(module, amount)?;
            self.ctx.bank.send_from_module(module, owner, amount)?;
            self.ctx.bank.delegate_to_module(owner, module, amount)?;
            self.increment_locked(owner, amount)
        })?;
        debug!(owner = %owner, amount = %amount, "Credit minted and locked");
        Ok(())
    }

    /// Release locked credit so `payer` can cover `fees`.
    ///
    /// Releases exactly the fee when locked credit covers it; otherwise
    /// releases everything locked, but only if spendable plus locked covers
    /// the fee. Returns the released amount, or `None` when nothing moved.
    pub fn unlock_for_fees(&self, payer: &AccountAddress, fees: &[Coin]) -> Result<Option<Coin>> {
        let denom = self.denom();
        let fee_total = amount_of(fees, &denom);
        if fee_total == 0 {
            return Ok(None);
        }
        let locked = self.get_locked(payer)?;

        let release = if locked.amount >= fee_total {
            Coin::new(denom.clone(), fee_total)
        } else {
            let spendable = self.ctx.bank.spendable(payer, &denom);
            let available = spendable.amount.saturating_add(locked.amount);
            if available < fee_total || locked.is_zero() {
                debug!(
                    payer = %payer,
                    locked = locked.amount,
                    spendable = spendable.amount,
                    fee = fee_total,
                    "Locked credit cannot cover fee, nothing unlocked"
                );
                return Ok(None);
            }
            locked
        };

        let module = self.ctx.module_name.as_str();
        self.ctx.atomically(|| {
            self.ctx.bank.undelegate_from_module(module, payer, &release)?;
            self.decrement_locked(payer, &release)?;
            self.increment_spent(payer, &release)?;
            self.ctx.events.emit(EnterpriseEvent::CreditUnlocked {
                owner: payer.clone(),
                amount: release.clone(),
            });
            Ok(())
        })?;
        debug!(payer = %payer, amount = %release, "Locked credit released for fees");
        Ok(Some(release))
    }

    /// Check custody balance, global total and per-account sum agree.
    pub fn audit(&self) -> Result<(String, bool)> {
        let denom = self.denom();
        let custody = self.ctx.bank.module_address(&self.ctx.module_name)?;
        let custody_balance = self.ctx.bank.balance(&custody, &denom).amount;
        let total = self.get_total_locked()?.amount;
        let locked = self.all_locked()?;
        Ok(module_account_invariant(custody_balance, total, &locked))
    }
}
