//! Enterprise Credit Service
//!
//! Implements the message, query and block-hook ports over the store
//! components, plus genesis import/export.

use super::approval::ApprovalEngine;
use super::block_tick::BlockTickProcessor;
use super::fee_guard::{AdmissionChain, FeeInteractionGuard};
use crate::adapters::MessageTypeFeeGate;
use crate::config::EnterpriseConfig;
use crate::domain::{
    AccountAddress, Coin, EnterpriseError, EnterpriseEvent, EnterpriseParams,
    EnterpriseUserAccount, GenesisState, MsgProcessPurchaseOrder, MsgRaisePurchaseOrder,
    MsgRaisePurchaseOrderResponse, MsgWhitelistAddress, PageRequest, PurchaseOrder,
    PurchaseOrderFilter, PurchaseOrderStatus, Result, TickReport, WhitelistAction,
};
use crate::ports::{AdmissionStage, BlockHook, EnterpriseMsgApi, EnterpriseQueryApi};
use crate::store::{
    LockedBalanceLedger, ModuleContext, OrderQueue, PurchaseOrderStore, WhitelistRegistry,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Enterprise Credit Service
///
/// Entry point for the host runtime:
/// 1. Signed messages (`EnterpriseMsgApi`)
/// 2. Read-only queries (`EnterpriseQueryApi`)
/// 3. Block start (`BlockHook`)
/// 4. Admission stage (`fee_guard`)
/// 5. Genesis import/export
pub struct EnterpriseService {
    ctx: ModuleContext,
    config: EnterpriseConfig,
    engine: ApprovalEngine,
    orders: PurchaseOrderStore,
    whitelist: WhitelistRegistry,
    locked: LockedBalanceLedger,
    tick: BlockTickProcessor,
}

impl EnterpriseService {
    /// Create a service. The context's module name is taken from `config`.
    pub fn new(mut ctx: ModuleContext, config: EnterpriseConfig) -> Self {
        ctx.module_name = config.module_name.clone();
        Self {
            engine: ApprovalEngine::new(ctx.clone()),
            orders: PurchaseOrderStore::new(ctx.clone()),
            whitelist: WhitelistRegistry::new(ctx.clone()),
            locked: LockedBalanceLedger::new(ctx.clone()),
            tick: BlockTickProcessor::new(ctx.clone(), config.audit_after_tick),
            ctx,
            config,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &EnterpriseConfig {
        &self.config
    }

    /// Admission stage gating on the configured message types.
    pub fn fee_guard(&self) -> FeeInteractionGuard {
        let policy = MessageTypeFeeGate::new(self.config.fee_gated_messages.iter().cloned());
        FeeInteractionGuard::new(self.locked.clone(), Arc::new(policy))
    }

    /// Admission chain holding the fee guard. Runs in one frame.
    pub fn admission_chain(&self) -> AdmissionChain {
        let guard: Arc<dyn AdmissionStage> = Arc::new(self.fee_guard());
        AdmissionChain::new(self.ctx.clone(), vec![guard])
    }

    /// Conservation audit report and whether it is broken.
    pub fn audit(&self) -> Result<(String, bool)> {
        self.locked.audit()
    }

    /// Replace the module parameters.
    ///
    /// The credit denomination is fixed once credit has been locked or spent,
    /// or while any order is raised or accepted: those records are held in
    /// the current denomination.
    pub fn update_params(&self, params: EnterpriseParams) -> Result<()> {
        let current = self.ctx.params();
        if params.denom != current.denom {
            let outstanding = !self.locked.get_total_locked()?.is_zero()
                || !self.locked.get_total_spent()?.is_zero()
                || !self.orders.list(OrderQueue::Raised)?.is_empty()
                || !self.orders.list(OrderQueue::Accepted)?.is_empty();
            if outstanding {
                return Err(EnterpriseError::InvalidParams(format!(
                    "cannot change denomination from {} to {} with outstanding credit or orders",
                    current.denom, params.denom
                )));
            }
        }
        self.ctx.params.set_params(params)
    }

    /// Load module state. The custody balance must equal the locked total.
    pub fn init_genesis(&self, genesis: &GenesisState) -> Result<()> {
        genesis.validate()?;
        let previous = self.ctx.params();
        self.ctx.params.set_params(genesis.params.clone())?;

        let loaded = self.ctx.atomically(|| self.load_genesis(genesis));
        if let Err(err) = loaded {
            self.ctx.params.set_params(previous)?;
            return Err(err);
        }

        info!(
            purchase_orders = genesis.purchase_orders.len(),
            locked_accounts = genesis.locked.len(),
            whitelist = genesis.whitelist.len(),
            total_locked = %genesis.total_locked,
            "Enterprise genesis loaded"
        );
        Ok(())
    }

    fn load_genesis(&self, genesis: &GenesisState) -> Result<()> {
        self.orders
            .set_highest_id(genesis.starting_purchase_order_id)?;

        for addr in &genesis.whitelist {
            self.whitelist.add(addr)?;
        }

        self.locked.set_total_locked(&genesis.total_locked)?;
        self.locked.set_total_spent(&genesis.total_spent)?;

        for order in &genesis.purchase_orders {
            self.orders.save(order)?;
            match order.status {
                PurchaseOrderStatus::Raised => self.orders.enqueue(OrderQueue::Raised, order.id)?,
                PurchaseOrderStatus::Accepted => {
                    self.orders.enqueue(OrderQueue::Accepted, order.id)?
                }
                _ => {}
            }
        }
        for record in &genesis.locked {
            self.locked.set_locked(record)?;
        }
        for record in &genesis.spent {
            self.locked.set_spent(record)?;
        }

        let custody = self.ctx.bank.module_address(&self.ctx.module_name)?;
        let holdings = self.ctx.bank.balance(&custody, &genesis.total_locked.denom);
        if holdings != genesis.total_locked {
            return Err(EnterpriseError::InvalidGenesis(format!(
                "module balance does not match the module holdings: {} <-> {}",
                holdings, genesis.total_locked
            )));
        }
        Ok(())
    }

    /// Export module state.
    pub fn export_genesis(&self) -> Result<GenesisState> {
        Ok(GenesisState {
            params: self.ctx.params(),
            starting_purchase_order_id: self.orders.highest_id()?.unwrap_or(1),
            purchase_orders: self.orders.all()?,
            locked: self.locked.all_locked()?,
            total_locked: self.locked.get_total_locked()?,
            whitelist: self.whitelist.list_all()?,
            total_spent: self.locked.get_total_spent()?,
            spent: self.locked.all_spent()?,
        })
    }
}

impl EnterpriseMsgApi for EnterpriseService {
    fn raise_purchase_order(
        &self,
        msg: MsgRaisePurchaseOrder,
        now: u64,
    ) -> Result<MsgRaisePurchaseOrderResponse> {
        let purchaser = AccountAddress::from_hex(&msg.purchaser)?;
        let purchase_order_id = self.engine.raise_purchase_order(&purchaser, &msg.amount, now)?;
        Ok(MsgRaisePurchaseOrderResponse { purchase_order_id })
    }

    fn process_purchase_order(&self, msg: MsgProcessPurchaseOrder, now: u64) -> Result<()> {
        let signer = AccountAddress::from_hex(&msg.signer)?;
        self.engine
            .process_decision(msg.purchase_order_id, msg.decision, &signer, now)
    }

    fn whitelist_address(&self, msg: MsgWhitelistAddress) -> Result<()> {
        let signer = AccountAddress::from_hex(&msg.signer)?;
        let address = AccountAddress::from_hex(&msg.address)?;
        if !msg.action.is_valid() {
            return Err(EnterpriseError::InvalidAction(msg.action.to_string()));
        }
        if !self.ctx.params().is_signer(&signer) {
            warn!(signer = %signer, "Unauthorised whitelist change attempted");
            return Err(EnterpriseError::Unauthorized(signer.to_string()));
        }

        self.ctx.atomically(|| {
            match msg.action {
                WhitelistAction::Add => self.whitelist.add(&address)?,
                WhitelistAction::Remove => self.whitelist.remove(&address)?,
                WhitelistAction::Nil => {
                    return Err(EnterpriseError::InvalidAction(msg.action.to_string()))
                }
            }
            self.ctx.events.emit(EnterpriseEvent::WhitelistAddress {
                address: address.clone(),
                signer: signer.clone(),
                action: msg.action,
            });
            Ok(())
        })
    }
}

impl EnterpriseQueryApi for EnterpriseService {
    fn params(&self) -> EnterpriseParams {
        self.ctx.params()
    }

    fn purchase_order(&self, id: u64) -> Result<PurchaseOrder> {
        self.orders.get(id)?.ok_or(EnterpriseError::NotFound(id))
    }

    fn purchase_orders(
        &self,
        filter: &PurchaseOrderFilter,
        page: PageRequest,
    ) -> Result<Vec<PurchaseOrder>> {
        self.orders
            .list_filtered(filter, page, self.config.default_page_limit)
    }

    fn locked_balance(&self, address: &str) -> Result<Coin> {
        self.locked.get_locked(&AccountAddress::from_hex(address)?)
    }

    fn total_locked(&self) -> Result<Coin> {
        self.locked.get_total_locked()
    }

    fn spent(&self, address: &str) -> Result<Coin> {
        self.locked.get_spent(&AccountAddress::from_hex(address)?)
    }

    fn total_spent(&self) -> Result<Coin> {
        self.locked.get_total_spent()
    }

    fn enterprise_account(&self, address: &str) -> Result<EnterpriseUserAccount> {
        let owner = AccountAddress::from_hex(address)?;
        let denom = self.ctx.params().denom;
        let locked = self.locked.get_locked(&owner)?;
        let general_supply = self.ctx.bank.balance(&owner, &denom);
        let spent = self.locked.get_spent(&owner)?;
        let spendable = general_supply.checked_add(&locked)?;
        Ok(EnterpriseUserAccount {
            owner,
            locked,
            general_supply,
            spent,
            spendable,
        })
    }

    fn is_whitelisted(&self, address: &str) -> Result<bool> {
        self.whitelist
            .is_whitelisted(&AccountAddress::from_hex(address)?)
    }

    fn whitelist(&self, page: PageRequest) -> Result<Vec<AccountAddress>> {
        self.whitelist
            .list_page(page, self.config.default_page_limit)
    }
}

impl BlockHook for EnterpriseService {
    fn on_block_start(&self, now: u64) -> Result<TickReport> {
        self.tick.run(now)
    }
}
