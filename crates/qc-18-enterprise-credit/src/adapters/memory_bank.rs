//! In-memory balance ledger.
//!
//! Tracks per-account balances, coins each account has placed under module
//! custody, module accounts and total supply. Delegated coins physically sit
//! in the module account, so an account's spendable balance equals its bank
//! balance.

use crate::domain::{AccountAddress, Coin, LedgerError, StoreError};
use crate::ports::{BankLedger, Transactional};
use parking_lot::RwLock;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Module account that collects deducted fees.
pub const FEE_COLLECTOR: &str = "fee_collector";

type BalanceKey = (AccountAddress, String);

#[derive(Clone, Debug)]
struct ModuleAccount {
    address: AccountAddress,
    can_mint: bool,
}

#[derive(Clone, Debug, Default)]
struct LedgerState {
    balances: BTreeMap<BalanceKey, u128>,
    delegated: BTreeMap<BalanceKey, u128>,
    supply: BTreeMap<String, u128>,
    modules: BTreeMap<String, ModuleAccount>,
}

impl LedgerState {
    fn module(&self, name: &str) -> Result<&ModuleAccount, LedgerError> {
        self.modules
            .get(name)
            .ok_or_else(|| LedgerError::UnknownModule(name.to_string()))
    }

    fn balance_of(&self, addr: &AccountAddress, denom: &str) -> u128 {
        self.balances
            .get(&(addr.clone(), denom.to_string()))
            .copied()
            .unwrap_or(0)
    }

    fn credit(&mut self, addr: &AccountAddress, coin: &Coin) -> Result<(), LedgerError> {
        let slot = self
            .balances
            .entry((addr.clone(), coin.denom.clone()))
            .or_insert(0);
        *slot = slot.checked_add(coin.amount).ok_or(LedgerError::Overflow)?;
        Ok(())
    }

    fn debit(&mut self, addr: &AccountAddress, coin: &Coin) -> Result<(), LedgerError> {
        let available = self.balance_of(addr, &coin.denom);
        if available < coin.amount {
            return Err(LedgerError::InsufficientFunds {
                account: addr.to_string(),
                required: coin.amount,
                available,
            });
        }
        self.balances
            .insert((addr.clone(), coin.denom.clone()), available - coin.amount);
        Ok(())
    }
}

/// In-memory implementation of `BankLedger`.
///
/// Each `begin` snapshots the whole state; `rollback` restores it.
#[derive(Default)]
pub struct InMemoryBankLedger {
    state: RwLock<LedgerState>,
    frames: RwLock<Vec<LedgerState>>,
}

impl InMemoryBankLedger {
    /// Create a ledger with a fee collector account.
    pub fn new() -> Self {
        Self::default().with_module(FEE_COLLECTOR, false)
    }

    /// Register a module account.
    pub fn with_module(self, name: &str, can_mint: bool) -> Self {
        self.state.write().modules.insert(
            name.to_string(),
            ModuleAccount {
                address: derive_module_address(name),
                can_mint,
            },
        );
        self
    }

    /// Credit an account with freshly issued coins (genesis or test setup).
    pub fn set_balance(&self, addr: &AccountAddress, coin: &Coin) -> Result<(), LedgerError> {
        let mut state = self.state.write();
        let current = state.balance_of(addr, &coin.denom);
        let supply = state.supply.entry(coin.denom.clone()).or_insert(0);
        *supply = supply
            .checked_sub(current)
            .and_then(|s| s.checked_add(coin.amount))
            .ok_or(LedgerError::Overflow)?;
        state
            .balances
            .insert((addr.clone(), coin.denom.clone()), coin.amount);
        Ok(())
    }

    /// Withdraw fees from `payer` into the fee collector.
    pub fn deduct_fee(&self, payer: &AccountAddress, fee: &[Coin]) -> Result<(), LedgerError> {
        let mut state = self.state.write();
        let collector = state.module(FEE_COLLECTOR)?.address.clone();
        let mut next = state.clone();
        for coin in fee {
            next.debit(payer, coin)?;
            next.credit(&collector, coin)?;
        }
        *state = next;
        Ok(())
    }

    /// Coins `addr` has placed under module custody.
    pub fn delegated(&self, addr: &AccountAddress, denom: &str) -> u128 {
        self.state
            .read()
            .delegated
            .get(&(addr.clone(), denom.to_string()))
            .copied()
            .unwrap_or(0)
    }

    /// Total issued supply of `denom`.
    pub fn total_supply(&self, denom: &str) -> u128 {
        self.state.read().supply.get(denom).copied().unwrap_or(0)
    }
}

/// Module address: first 20 bytes of SHA-256 over the module name.
pub fn derive_module_address(name: &str) -> AccountAddress {
    let digest = Sha256::digest(name.as_bytes());
    AccountAddress::new(digest[..20].to_vec())
}

impl Transactional for InMemoryBankLedger {
    fn begin(&self) {
        let snapshot = self.state.read().clone();
        self.frames.write().push(snapshot);
    }

    fn commit(&self) -> Result<(), StoreError> {
        self.frames
            .write()
            .pop()
            .map(|_| ())
            .ok_or(StoreError::NoOpenFrame)
    }

    fn rollback(&self) -> Result<(), StoreError> {
        let snapshot = self.frames.write().pop().ok_or(StoreError::NoOpenFrame)?;
        *self.state.write() = snapshot;
        Ok(())
    }
}

impl BankLedger for InMemoryBankLedger {
    fn mint(&self, module: &str, coin: &Coin) -> Result<(), LedgerError> {
        let mut state = self.state.write();
        let account = state.module(module)?;
        if !account.can_mint {
            return Err(LedgerError::MintNotPermitted(module.to_string()));
        }
        let address = account.address.clone();
        let supply = state.supply.get(&coin.denom).copied().unwrap_or(0);
        let supply = supply.checked_add(coin.amount).ok_or(LedgerError::Overflow)?;
        state.credit(&address, coin)?;
        state.supply.insert(coin.denom.clone(), supply);
        Ok(())
    }

    fn send_from_module(
        &self,
        module: &str,
        to: &AccountAddress,
        coin: &Coin,
    ) -> Result<(), LedgerError> {
        let mut state = self.state.write();
        let from = state.module(module)?.address.clone();
        state.debit(&from, coin)?;
        state.credit(to, coin)
    }

    fn delegate_to_module(
        &self,
        from: &AccountAddress,
        module: &str,
        coin: &Coin,
    ) -> Result<(), LedgerError> {
        let mut state = self.state.write();
        let custody = state.module(module)?.address.clone();
        let key = (from.clone(), coin.denom.clone());
        let delegated = state.delegated.get(&key).copied().unwrap_or(0);
        let delegated = delegated
            .checked_add(coin.amount)
            .ok_or(LedgerError::Overflow)?;
        state.debit(from, coin)?;
        state.credit(&custody, coin)?;
        state.delegated.insert(key, delegated);
        Ok(())
    }

    fn undelegate_from_module(
        &self,
        module: &str,
        to: &AccountAddress,
        coin: &Coin,
    ) -> Result<(), LedgerError> {
        let mut state = self.state.write();
        let custody = state.module(module)?.address.clone();
        let key = (to.clone(), coin.denom.clone());
        let delegated = state.delegated.get(&key).copied().unwrap_or(0);
        if delegated < coin.amount {
            return Err(LedgerError::InsufficientDelegation {
                account: to.to_string(),
                required: coin.amount,
                delegated,
            });
        }
        state.debit(&custody, coin)?;
        state.credit(to, coin)?;
        state.delegated.insert(key, delegated - coin.amount);
        Ok(())
    }

    fn balance(&self, addr: &AccountAddress, denom: &str) -> Coin {
        Coin::new(denom, self.state.read().balance_of(addr, denom))
    }

    fn spendable(&self, addr: &AccountAddress, denom: &str) -> Coin {
        self.balance(addr, denom)
    }

    fn module_address(&self, module: &str) -> Result<AccountAddress, LedgerError> {
        Ok(self.state.read().module(module)?.address.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> AccountAddress {
        AccountAddress::from([0x42; 20])
    }

    fn ledger() -> InMemoryBankLedger {
        InMemoryBankLedger::new()
            .with_module("enterprise", true)
            .with_module("plain", false)
    }

    #[test]
    fn test_mint_requires_permission() {
        let bank = ledger();
        assert!(bank.mint("enterprise", &Coin::new("nund", 10)).is_ok());
        assert_eq!(bank.total_supply("nund"), 10);
        assert_eq!(
            bank.mint("plain", &Coin::new("nund", 10)),
            Err(LedgerError::MintNotPermitted("plain".into()))
        );
        assert!(matches!(
            bank.mint("ghost", &Coin::new("nund", 1)),
            Err(LedgerError::UnknownModule(_))
        ));
    }

    #[test]
    fn test_delegate_cycle() {
        let bank = ledger();
        let coin = Coin::new("nund", 100);
        bank.mint("enterprise", &coin).unwrap();
        bank.send_from_module("enterprise", &user(), &coin).unwrap();
        bank.delegate_to_module(&user(), "enterprise", &coin).unwrap();

        let custody = bank.module_address("enterprise").unwrap();
        assert_eq!(bank.balance(&custody, "nund").amount, 100);
        assert_eq!(bank.spendable(&user(), "nund").amount, 0);
        assert_eq!(bank.delegated(&user(), "nund"), 100);

        bank.undelegate_from_module("enterprise", &user(), &Coin::new("nund", 30))
            .unwrap();
        assert_eq!(bank.spendable(&user(), "nund").amount, 30);
        assert_eq!(bank.delegated(&user(), "nund"), 70);
    }

    #[test]
    fn test_undelegate_more_than_delegated() {
        let bank = ledger();
        let err = bank
            .undelegate_from_module("enterprise", &user(), &Coin::new("nund", 1))
            .unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientDelegation { .. }));
    }

    #[test]
    fn test_rollback_restores_snapshot() {
        let bank = ledger();
        bank.begin();
        bank.mint("enterprise", &Coin::new("nund", 5)).unwrap();
        bank.rollback().unwrap();
        assert_eq!(bank.total_supply("nund"), 0);
    }

    #[test]
    fn test_deduct_fee_is_all_or_nothing() {
        let bank = ledger();
        bank.set_balance(&user(), &Coin::new("nund", 10)).unwrap();
        let err = bank
            .deduct_fee(&user(), &[Coin::new("nund", 5), Coin::new("nund", 6)])
            .unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientFunds { .. }));
        assert_eq!(bank.balance(&user(), "nund").amount, 10);
        bank.deduct_fee(&user(), &[Coin::new("nund", 10)]).unwrap();
        assert_eq!(bank.balance(&user(), "nund").amount, 0);
    }

    #[test]
    fn test_module_addresses_distinct() {
        assert_ne!(
            derive_module_address("enterprise"),
            derive_module_address(FEE_COLLECTOR)
        );
        assert!(derive_module_address("enterprise").validate().is_ok());
    }
}
