//! Events emitted by the enterprise credit engine.

use super::value_objects::{AccountAddress, Coin, PurchaseOrderStatus, WhitelistAction};
use serde::{Deserialize, Serialize};

/// State-change notifications delivered through the `EventSink` port.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnterpriseEvent {
    /// A purchase order was raised.
    RaisePurchaseOrder {
        /// Purchase order id
        id: u64,
        /// Purchaser
        purchaser: AccountAddress,
        /// Requested amount
        amount: Coin,
    },
    /// A signer recorded a decision.
    ProcessDecision {
        /// Purchase order id
        id: u64,
        /// Signer
        signer: AccountAddress,
        /// Decision value
        decision: PurchaseOrderStatus,
    },
    /// A stale order was rejected at block start.
    AutoRejectStale {
        /// Purchase order id
        id: u64,
        /// Purchaser
        purchaser: AccountAddress,
    },
    /// Decisions were tallied and the order left the raised queue.
    TallyDecisions {
        /// Purchase order id
        id: u64,
        /// Purchaser
        purchaser: AccountAddress,
        /// Outcome status
        decision: PurchaseOrderStatus,
        /// Accept count
        accepts: u64,
        /// Reject count
        rejects: u64,
    },
    /// Credit minted and locked for an accepted order.
    PurchaseComplete {
        /// Purchase order id
        id: u64,
        /// Purchaser
        purchaser: AccountAddress,
        /// Minted amount
        amount: Coin,
    },
    /// Locked credit released to pay fees.
    CreditUnlocked {
        /// Fee payer
        owner: AccountAddress,
        /// Released amount
        amount: Coin,
    },
    /// Whitelist membership changed.
    WhitelistAddress {
        /// Affected address
        address: AccountAddress,
        /// Authorising signer
        signer: AccountAddress,
        /// Add or remove
        action: WhitelistAction,
    },
}

impl EnterpriseEvent {
    /// Event type name as published on the bus.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RaisePurchaseOrder { .. } => "raise_purchase_order",
            Self::ProcessDecision { .. } => "process_purchase_order_decision",
            Self::AutoRejectStale { .. } => "auto_reject_stale_purchase_order",
            Self::TallyDecisions { .. } => "tally_purchase_order_decisions",
            Self::PurchaseComplete { .. } => "purchase_complete",
            Self::CreditUnlocked { .. } => "credit_unlocked",
            Self::WhitelistAddress { .. } => "whitelist_purchase_order_address",
        }
    }
}
