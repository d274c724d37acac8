//! # Outbound Ports
//!
//! Dependencies the engine calls into: the versioned key-value store, the
//! host balance ledger, the parameter store and the event bus.
//!
//! All participants in a block or message expose nested transactional
//! frames. The application layer opens a frame on every participant,
//! commits them together on success and rolls them back together on error.

use crate::domain::{
    AccountAddress, Coin, EnterpriseEvent, EnterpriseParams, FeeTx, LedgerError, Result,
    StoreError,
};

/// Nested transactional frames.
pub trait Transactional: Send + Sync {
    /// Open a new frame on top of the current state.
    fn begin(&self);

    /// Fold the innermost frame into its parent.
    fn commit(&self) -> std::result::Result<(), StoreError>;

    /// Discard every change made since the innermost `begin`.
    fn rollback(&self) -> std::result::Result<(), StoreError>;
}

/// Byte-keyed store.
pub trait KvStore: Transactional {
    /// Read a value.
    fn get(&self, key: &[u8]) -> std::result::Result<Option<Vec<u8>>, StoreError>;

    /// True if `key` is present.
    fn has(&self, key: &[u8]) -> std::result::Result<bool, StoreError>;

    /// Insert or overwrite.
    fn set(&self, key: &[u8], value: Vec<u8>) -> std::result::Result<(), StoreError>;

    /// Remove a key. Absent keys are a no-op.
    fn delete(&self, key: &[u8]) -> std::result::Result<(), StoreError>;

    /// All entries whose key starts with `prefix`, in ascending key order.
    fn prefix_scan(&self, prefix: &[u8])
        -> std::result::Result<Vec<(Vec<u8>, Vec<u8>)>, StoreError>;
}

/// Narrow capability over the host balance ledger.
pub trait BankLedger: Transactional {
    /// Create new coins in a module account. Requires mint permission.
    fn mint(&self, module: &str, coin: &Coin) -> std::result::Result<(), LedgerError>;

    /// Move coins from a module account to a user account.
    fn send_from_module(
        &self,
        module: &str,
        to: &AccountAddress,
        coin: &Coin,
    ) -> std::result::Result<(), LedgerError>;

    /// Place a user's coins under module custody. They stop being spendable.
    fn delegate_to_module(
        &self,
        from: &AccountAddress,
        module: &str,
        coin: &Coin,
    ) -> std::result::Result<(), LedgerError>;

    /// Return delegated coins from module custody to the user.
    fn undelegate_from_module(
        &self,
        module: &str,
        to: &AccountAddress,
        coin: &Coin,
    ) -> std::result::Result<(), LedgerError>;

    /// Balance of `denom` held by `addr`.
    fn balance(&self, addr: &AccountAddress, denom: &str) -> Coin;

    /// Spendable balance of `denom` held by `addr`.
    fn spendable(&self, addr: &AccountAddress, denom: &str) -> Coin;

    /// Address of a module account.
    fn module_address(&self, module: &str) -> std::result::Result<AccountAddress, LedgerError>;
}

/// Parameter store.
pub trait ParamSource: Send + Sync {
    /// Current parameters.
    fn params(&self) -> EnterpriseParams;

    /// Replace the parameters after validating them.
    fn set_params(&self, params: EnterpriseParams) -> Result<()>;
}

/// Event bus. Events emitted inside a frame are delivered on outermost commit.
pub trait EventSink: Transactional {
    /// Publish an event.
    fn emit(&self, event: EnterpriseEvent);
}

/// Decides which transactions may pay fees from locked credit.
pub trait FeeGatePolicy: Send + Sync {
    /// True if the transaction belongs to a fee-gated category.
    fn is_fee_gated(&self, tx: &FeeTx) -> bool;
}
