//! Shared harness for enterprise credit integration tests.

#![allow(dead_code)]

use qc_18_enterprise_credit::{
    AccountAddress, BankLedger, BlockHook, Coin, EnterpriseConfig,
    EnterpriseMsgApi, EnterpriseParams, EnterpriseService, FeeTx, GenesisState, InMemoryBankLedger,
    InMemoryKvStore, InMemoryParamSource, ModuleContext, MsgProcessPurchaseOrder,
    MsgRaisePurchaseOrder, MsgWhitelistAddress, PurchaseOrderStatus, RecordingEventSink,
    TickReport, TxMessage, WhitelistAction,
};
use qc_18_enterprise_credit::domain::Result as CreditResult;
use std::sync::Arc;

pub const MODULE: &str = "enterprise";
pub const DENOM: &str = "nund";
pub const DECISION_TIME_LIMIT: u64 = 100;
pub const GATED_MSG: &str = "wrkchain/record_wrkchain_hash";

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn signers() -> Vec<AccountAddress> {
    vec![
        AccountAddress::from([0xA1; 20]),
        AccountAddress::from([0xA2; 20]),
        AccountAddress::from([0xA3; 20]),
    ]
}

pub fn enterprise(n: u8) -> AccountAddress {
    AccountAddress::from([n; 20])
}

pub fn params() -> EnterpriseParams {
    EnterpriseParams::new(DENOM, 2, DECISION_TIME_LIMIT, signers())
}

/// One node's worth of module wiring over in-memory adapters.
pub struct Chain {
    pub store: Arc<InMemoryKvStore>,
    pub bank: Arc<InMemoryBankLedger>,
    pub events: Arc<RecordingEventSink>,
    pub service: EnterpriseService,
}

impl Chain {
    /// Wired chain with default genesis loaded.
    pub fn new() -> Self {
        let chain = Self::uninitialised();
        chain
            .service
            .init_genesis(&GenesisState {
                params: params(),
                ..Default::default()
            })
            .expect("default genesis");
        chain
    }

    /// Wired chain with no genesis applied.
    pub fn uninitialised() -> Self {
        init_tracing();
        let store = Arc::new(InMemoryKvStore::new());
        let bank = Arc::new(InMemoryBankLedger::new().with_module(MODULE, true));
        let params = Arc::new(InMemoryParamSource::new(params()).expect("params"));
        let events = Arc::new(RecordingEventSink::new());
        let ctx = ModuleContext::new(
            store.clone(),
            bank.clone(),
            params,
            events.clone(),
            MODULE,
        );
        let config = EnterpriseConfig {
            params: self::params(),
            audit_after_tick: true,
            ..Default::default()
        };
        Self {
            store,
            bank,
            events,
            service: EnterpriseService::new(ctx, config),
        }
    }

    pub fn custody(&self) -> AccountAddress {
        self.bank.module_address(MODULE).expect("custody module")
    }

    pub fn whitelist(&self, addr: &AccountAddress) {
        self.service
            .whitelist_address(MsgWhitelistAddress {
                signer: signers()[0].to_string(),
                address: addr.to_string(),
                action: WhitelistAction::Add,
            })
            .expect("whitelist");
    }

    pub fn raise(&self, addr: &AccountAddress, amount: u128, now: u64) -> u64 {
        self.service
            .raise_purchase_order(
                MsgRaisePurchaseOrder {
                    purchaser: addr.to_string(),
                    amount: Coin::new(DENOM, amount),
                },
                now,
            )
            .expect("raise")
            .purchase_order_id
    }

    pub fn decide(&self, id: u64, signer: usize, decision: PurchaseOrderStatus, now: u64) {
        self.service
            .process_purchase_order(
                MsgProcessPurchaseOrder {
                    signer: signers()[signer].to_string(),
                    purchase_order_id: id,
                    decision,
                },
                now,
            )
            .expect("decision");
    }

    pub fn tick(&self, now: u64) -> TickReport {
        self.service.on_block_start(now).expect("tick")
    }

    /// Whitelist, raise, accept by quorum and tick once.
    pub fn fund(&self, addr: &AccountAddress, amount: u128, now: u64) -> u64 {
        self.whitelist(addr);
        let id = self.raise(addr, amount, now);
        self.decide(id, 0, PurchaseOrderStatus::Accepted, now);
        self.decide(id, 1, PurchaseOrderStatus::Accepted, now);
        self.tick(now + 1);
        id
    }

    /// Run the admission chain, then deduct the declared fee.
    pub fn deliver(&self, payer: &AccountAddress, type_url: &str, fee: u128) -> CreditResult<()> {
        self.deliver_fees(payer, type_url, vec![Coin::new(DENOM, fee)])
    }

    /// As `deliver`, with an arbitrary fee coin set.
    pub fn deliver_fees(
        &self,
        payer: &AccountAddress,
        type_url: &str,
        fee: Vec<Coin>,
    ) -> CreditResult<()> {
        let tx = FeeTx {
            fee_payer: payer.to_string(),
            fee,
            messages: vec![TxMessage::new(type_url)],
            gas_limit: 100_000,
        };
        let bank = self.bank.clone();
        let deduct = move |tx: &FeeTx, _simulate: bool| -> CreditResult<()> {
            let payer = AccountAddress::from_hex(&tx.fee_payer)?;
            bank.deduct_fee(&payer, &tx.fee)?;
            Ok(())
        };
        self.service.admission_chain().run(&tx, false, &deduct)
    }
}
