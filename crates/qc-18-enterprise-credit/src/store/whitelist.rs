//! Whitelist of addresses permitted to raise purchase orders.

use super::context::ModuleContext;
use crate::domain::keys::{whitelist_key, WHITELIST_PREFIX};
use crate::domain::{AccountAddress, EnterpriseError, PageRequest, Result};
use tracing::debug;

/// Presence-only set of whitelisted purchasers.
///
/// The stored value is the raw address bytes.
#[derive(Clone)]
pub struct WhitelistRegistry {
    ctx: ModuleContext,
}

impl WhitelistRegistry {
    /// Create a registry over the module store.
    pub fn new(ctx: ModuleContext) -> Self {
        Self { ctx }
    }

    /// Add `addr`. Fails if empty or already present.
    pub fn add(&self, addr: &AccountAddress) -> Result<()> {
        if addr.is_empty() {
            return Err(EnterpriseError::EmptyAddress);
        }
        let key = whitelist_key(addr);
        if self.ctx.store.has(&key)? {
            return Err(EnterpriseError::AlreadyWhitelisted(addr.to_string()));
        }
        self.ctx.store.set(&key, addr.as_bytes().to_vec())?;
        debug!(address = %addr, "Address whitelisted");
        Ok(())
    }

    /// Remove `addr`. Fails if empty or absent.
    pub fn remove(&self, addr: &AccountAddress) -> Result<()> {
        if addr.is_empty() {
            return Err(EnterpriseError::EmptyAddress);
        }
        let key = whitelist_key(addr);
        if !self.ctx.store.has(&key)? {
            return Err(EnterpriseError::NotWhitelisted(addr.to_string()));
        }
        self.ctx.store.delete(&key)?;
        debug!(address = %addr, "Address removed from whitelist");
        Ok(())
    }

    /// Membership test. The empty address is never whitelisted.
    pub fn is_whitelisted(&self, addr: &AccountAddress) -> Result<bool> {
        if addr.is_empty() {
            return Ok(false);
        }
        Ok(self.ctx.store.has(&whitelist_key(addr))?)
    }

    /// Every whitelisted address in key order.
    pub fn list_all(&self) -> Result<Vec<AccountAddress>> {
        Ok(self
            .ctx
            .store
            .prefix_scan(&[WHITELIST_PREFIX])?
            .into_iter()
            .map(|(_, value)| AccountAddress::new(value))
            .collect())
    }

    /// One page of [`Self::list_all`].
    pub fn list_page(&self, page: PageRequest, default_limit: usize) -> Result<Vec<AccountAddress>> {
        Ok(page.apply(self.list_all()?, default_limit))
    }
}
