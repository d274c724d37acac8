//! Shared fixtures for unit tests.

use crate::adapters::{InMemoryBankLedger, InMemoryKvStore, InMemoryParamSource, RecordingEventSink};
use crate::domain::{AccountAddress, EnterpriseParams};
use crate::store::{ModuleContext, PurchaseOrderStore};
use std::sync::Arc;

pub const MODULE: &str = "enterprise";

pub fn signer_a() -> AccountAddress {
    AccountAddress::from([0xA1; 20])
}

pub fn signer_b() -> AccountAddress {
    AccountAddress::from([0xA2; 20])
}

pub fn signer_c() -> AccountAddress {
    AccountAddress::from([0xA3; 20])
}

/// `nund`, quorum 2 of 3, 100 second decision window.
pub fn test_params() -> EnterpriseParams {
    EnterpriseParams::new("nund", 2, 100, vec![signer_a(), signer_b(), signer_c()])
}

pub struct TestHarness {
    pub store: Arc<InMemoryKvStore>,
    pub bank: Arc<InMemoryBankLedger>,
    pub params: Arc<InMemoryParamSource>,
    pub events: Arc<RecordingEventSink>,
    pub ctx: ModuleContext,
}

impl TestHarness {
    /// Harness with the id counter seeded to 1.
    pub fn new() -> Self {
        let h = Self::bare();
        PurchaseOrderStore::new(h.ctx.clone())
            .set_highest_id(1)
            .unwrap();
        h
    }

    /// Harness with nothing seeded.
    pub fn bare() -> Self {
        Self::build(InMemoryBankLedger::new().with_module(MODULE, true))
    }

    /// Harness whose custody module may not mint.
    pub fn without_mint_permission() -> Self {
        let h = Self::build(InMemoryBankLedger::new().with_module(MODULE, false));
        PurchaseOrderStore::new(h.ctx.clone())
            .set_highest_id(1)
            .unwrap();
        h
    }

    fn build(bank: InMemoryBankLedger) -> Self {
        let store = Arc::new(InMemoryKvStore::new());
        let bank = Arc::new(bank);
        let params = Arc::new(InMemoryParamSource::new(test_params()).unwrap());
        let events = Arc::new(RecordingEventSink::new());
        let ctx = ModuleContext::new(
            store.clone(),
            bank.clone(),
            params.clone(),
            events.clone(),
            MODULE,
        );
        Self {
            store,
            bank,
            params,
            events,
            ctx,
        }
    }
}
