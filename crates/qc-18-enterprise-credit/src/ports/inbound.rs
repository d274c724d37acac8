//! # Inbound Ports
//!
//! What the Enterprise Credit subsystem offers the host runtime: message
//! handlers, read-only queries, the block-start hook and a transaction
//! admission stage.

use crate::domain::{
    AccountAddress, Coin, EnterpriseParams, EnterpriseUserAccount, FeeTx, MsgProcessPurchaseOrder,
    MsgRaisePurchaseOrder, MsgRaisePurchaseOrderResponse, MsgWhitelistAddress, PageRequest,
    PurchaseOrder, PurchaseOrderFilter, Result, TickReport,
};

/// Signed request handlers. Each call either applies fully or not at all.
pub trait EnterpriseMsgApi: Send + Sync {
    /// Raise a purchase order at block time `now`.
    fn raise_purchase_order(
        &self,
        msg: MsgRaisePurchaseOrder,
        now: u64,
    ) -> Result<MsgRaisePurchaseOrderResponse>;

    /// Record a signer decision at block time `now`.
    fn process_purchase_order(&self, msg: MsgProcessPurchaseOrder, now: u64) -> Result<()>;

    /// Add or remove a purchaser from the whitelist.
    fn whitelist_address(&self, msg: MsgWhitelistAddress) -> Result<()>;
}

/// Read-only queries. Addresses are hex strings.
pub trait EnterpriseQueryApi: Send + Sync {
    /// Current parameters.
    fn params(&self) -> EnterpriseParams;

    /// A purchase order by id.
    fn purchase_order(&self, id: u64) -> Result<PurchaseOrder>;

    /// Orders matching `filter`, paginated.
    fn purchase_orders(
        &self,
        filter: &PurchaseOrderFilter,
        page: PageRequest,
    ) -> Result<Vec<PurchaseOrder>>;

    /// Locked credit for an account.
    fn locked_balance(&self, address: &str) -> Result<Coin>;

    /// Global locked total.
    fn total_locked(&self) -> Result<Coin>;

    /// Credit an account has unlocked for fees.
    fn spent(&self, address: &str) -> Result<Coin>;

    /// Global spent total.
    fn total_spent(&self) -> Result<Coin>;

    /// Combined credit position of an account.
    fn enterprise_account(&self, address: &str) -> Result<EnterpriseUserAccount>;

    /// Whitelist membership.
    fn is_whitelisted(&self, address: &str) -> Result<bool>;

    /// Whitelisted addresses, paginated.
    fn whitelist(&self, page: PageRequest) -> Result<Vec<AccountAddress>>;
}

/// Invoked once per block before transactions execute.
pub trait BlockHook: Send + Sync {
    /// Tally raised orders, then complete accepted ones.
    fn on_block_start(&self, now: u64) -> Result<TickReport>;
}

/// Next step in the admission chain.
pub trait AdmissionHandler {
    /// Continue admission.
    fn handle(&self, tx: &FeeTx, simulate: bool) -> Result<()>;
}

impl<F> AdmissionHandler for F
where
    F: Fn(&FeeTx, bool) -> Result<()>,
{
    fn handle(&self, tx: &FeeTx, simulate: bool) -> Result<()> {
        self(tx, simulate)
    }
}

/// A stage of transaction admission, composed ahead of fee deduction.
pub trait AdmissionStage: Send + Sync {
    /// Run this stage, then delegate to `next`.
    fn admit(&self, tx: &FeeTx, simulate: bool, next: &dyn AdmissionHandler) -> Result<()>;
}
