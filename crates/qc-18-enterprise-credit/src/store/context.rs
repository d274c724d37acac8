//! Module context: injected ports plus the atomic frame every
//! state-changing operation runs in.

use crate::codec;
use crate::domain::{EnterpriseParams, Result};
use crate::ports::{BankLedger, EventSink, KvStore, ParamSource};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tracing::error;

/// Handles to every collaborator the engine touches.
///
/// Cheap to clone; all fields are shared.
#[derive(Clone)]
pub struct ModuleContext {
    /// Module key-value store.
    pub store: Arc<dyn KvStore>,
    /// Host balance ledger.
    pub bank: Arc<dyn BankLedger>,
    /// Parameter store.
    pub params: Arc<dyn ParamSource>,
    /// Event bus.
    pub events: Arc<dyn EventSink>,
    /// Custody module account name.
    pub module_name: String,
}

impl ModuleContext {
    /// Create a context.
    pub fn new(
        store: Arc<dyn KvStore>,
        bank: Arc<dyn BankLedger>,
        params: Arc<dyn ParamSource>,
        events: Arc<dyn EventSink>,
        module_name: impl Into<String>,
    ) -> Self {
        Self {
            store,
            bank,
            params,
            events,
            module_name: module_name.into(),
        }
    }

    /// Current parameters.
    pub fn params(&self) -> EnterpriseParams {
        self.params.params()
    }

    /// Run `op` inside a frame on the store, the ledger and the event bus.
    /// All three commit on `Ok` and roll back on `Err`.
    pub fn atomically<T>(&self, op: impl FnOnce() -> Result<T>) -> Result<T> {
        self.store.begin();
        self.bank.begin();
        self.events.begin();

        match op() {
            Ok(value) => {
                let store = self.store.commit();
                let bank = self.bank.commit();
                let events = self.events.commit();
                store.and(bank).and(events)?;
                Ok(value)
            }
            Err(err) => {
                let rolled_back = self
                    .store
                    .rollback()
                    .and(self.bank.rollback())
                    .and(self.events.rollback());
                if let Err(rollback_err) = rolled_back {
                    error!(error = %rollback_err, "Rollback failed after {}", err);
                }
                Err(err)
            }
        }
    }

    /// Read and decode a record.
    pub(crate) fn get_record<T: DeserializeOwned>(&self, key: &[u8]) -> Result<Option<T>> {
        match self.store.get(key)? {
            Some(bytes) => Ok(Some(codec::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Encode and write a record.
    pub(crate) fn put_record<T: Serialize>(&self, key: &[u8], value: &T) -> Result<()> {
        self.store.set(key, codec::encode(value)?)?;
        Ok(())
    }

    /// Decode every record under `prefix`, in key order.
    pub(crate) fn scan_records<T: DeserializeOwned>(&self, prefix: &[u8]) -> Result<Vec<T>> {
        self.store
            .prefix_scan(prefix)?
            .into_iter()
            .map(|(_, bytes)| codec::decode(&bytes))
            .collect()
    }
}
