//! # QC-18 Enterprise Credit
//!
//! Purchase order approval and locked fee-credit accounting.
//!
//! **Subsystem ID:** 18
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Whitelisted enterprises raise purchase orders for chain credit. A quorum
//! of authorised signers accepts or rejects each order; accepted orders are
//! minted and held in module custody as locked credit, released only to pay
//! fees on designated message types.
//!
//! ## Lifecycle
//!
//! | Stage | Trigger | Effect |
//! |-------|---------|--------|
//! | Raise | `raise_purchase_order` | Order stored as `Raised`, queued |
//! | Decide | `process_purchase_order` | Signer decision recorded |
//! | Tally | block start | `Accepted` / `Rejected` / stale rejection |
//! | Complete | block start | Mint, delegate to custody, record lock |
//! | Unlock | fee-gated transaction | Locked credit released for the fee |
//!
//! ## Conservation
//!
//! Custody balance == total locked == sum of per-account locked balances.
//! Checked by [`LockedBalanceLedger::audit`].
//!
//! ## Module Structure
//!
//! ```text
//! qc-18-enterprise-credit/
//! ├── domain/          # PurchaseOrder, Coin, params, events, errors, genesis
//! ├── ports/           # Msg/Query/BlockHook/Admission APIs, KvStore, BankLedger
//! ├── store/           # Keyed tables over KvStore
//! ├── application/     # ApprovalEngine, BlockTickProcessor, FeeInteractionGuard
//! └── adapters/        # In-memory store, bank, params, events, fee gate
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod application;
pub mod codec;
pub mod config;
pub mod domain;
pub mod ports;
pub mod store;

#[cfg(test)]
mod testing;

// Re-exports
pub use adapters::{
    derive_module_address, InMemoryBankLedger, InMemoryKvStore, InMemoryParamSource,
    MessageTypeFeeGate, RecordingEventSink, FEE_COLLECTOR,
};
pub use application::{
    AdmissionChain, ApprovalEngine, BlockTickProcessor, EnterpriseService, FeeInteractionGuard,
    TallyOutcome,
};
pub use config::EnterpriseConfig;
pub use domain::{
    AccountAddress, Coin, EnterpriseError, EnterpriseEvent, EnterpriseParams,
    EnterpriseUserAccount, FeeTx, GenesisState, LockedBalance, MsgProcessPurchaseOrder,
    MsgRaisePurchaseOrder, MsgRaisePurchaseOrderResponse, MsgWhitelistAddress, PageRequest,
    PurchaseOrder, PurchaseOrderDecision, PurchaseOrderFilter, PurchaseOrderStatus,
    SpentCounter, TickReport, TxMessage, WhitelistAction,
};
pub use ports::{
    AdmissionHandler, AdmissionStage, BankLedger, BlockHook, EnterpriseMsgApi,
    EnterpriseQueryApi, EventSink, FeeGatePolicy, KvStore, ParamSource, Transactional,
};
pub use store::{
    LockedBalanceLedger, ModuleContext, OrderQueue, PurchaseOrderStore, WhitelistRegistry,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
