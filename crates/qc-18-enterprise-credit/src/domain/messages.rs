//! Signed request messages and the transaction view used at admission.
//!
//! Addresses arrive as hex strings; handlers decode and validate them.

use super::value_objects::{Coin, PurchaseOrderStatus, WhitelistAction};
use serde::{Deserialize, Serialize};

/// Type URL of [`MsgRaisePurchaseOrder`].
pub const RAISE_PURCHASE_ORDER_TYPE: &str = "enterprise/raise_ent_po";
/// Type URL of [`MsgProcessPurchaseOrder`].
pub const PROCESS_PURCHASE_ORDER_TYPE: &str = "enterprise/proc_ent_po";
/// Type URL of [`MsgWhitelistAddress`].
pub const WHITELIST_ADDRESS_TYPE: &str = "enterprise/ent_whitelist";

/// Raise a purchase order for `amount` credit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgRaisePurchaseOrder {
    /// Purchaser address (hex).
    pub purchaser: String,
    /// Requested credit.
    pub amount: Coin,
}

/// Response to [`MsgRaisePurchaseOrder`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgRaisePurchaseOrderResponse {
    /// Allocated purchase order id.
    pub purchase_order_id: u64,
}

/// Record a signer decision on a raised order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgProcessPurchaseOrder {
    /// Signer address (hex).
    pub signer: String,
    /// Target purchase order.
    pub purchase_order_id: u64,
    /// `Accepted` or `Rejected`.
    pub decision: PurchaseOrderStatus,
}

/// Add or remove a purchaser from the whitelist.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgWhitelistAddress {
    /// Signer address (hex).
    pub signer: String,
    /// Address to add or remove (hex).
    pub address: String,
    /// Requested action.
    pub action: WhitelistAction,
}

/// A message carried by a transaction, identified by type URL.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxMessage {
    /// Message type URL.
    pub type_url: String,
}

impl TxMessage {
    /// Create a message entry.
    pub fn new(type_url: impl Into<String>) -> Self {
        Self {
            type_url: type_url.into(),
        }
    }
}

/// Fee-relevant view of a transaction during admission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeTx {
    /// Account the fee is withdrawn from (hex).
    pub fee_payer: String,
    /// Declared fee.
    pub fee: Vec<Coin>,
    /// Messages in the transaction.
    pub messages: Vec<TxMessage>,
    /// Declared gas limit.
    pub gas_limit: u64,
}
