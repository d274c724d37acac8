//! Purchase order records, the id allocator and the two processing queues.

use super::context::ModuleContext;
use crate::codec;
use crate::domain::keys::{
    accepted_queue_key, purchase_order_key, raised_queue_key, split_queue_key,
    ACCEPTED_QUEUE_PREFIX, HIGHEST_PURCHASE_ORDER_ID_KEY, PURCHASE_ORDER_PREFIX,
    RAISED_QUEUE_PREFIX,
};
use crate::domain::{
    EnterpriseError, PageRequest, PurchaseOrder, PurchaseOrderFilter, Result,
};

/// Which processing queue an id sits in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrderQueue {
    /// Awaiting tally.
    Raised,
    /// Awaiting completion.
    Accepted,
}

impl OrderQueue {
    fn key(&self, id: u64) -> Vec<u8> {
        match self {
            Self::Raised => raised_queue_key(id),
            Self::Accepted => accepted_queue_key(id),
        }
    }

    fn prefix(&self) -> u8 {
        match self {
            Self::Raised => RAISED_QUEUE_PREFIX,
            Self::Accepted => ACCEPTED_QUEUE_PREFIX,
        }
    }
}

/// Durable purchase order store.
#[derive(Clone)]
pub struct PurchaseOrderStore {
    ctx: ModuleContext,
}

impl PurchaseOrderStore {
    /// Create a store over the module store.
    pub fn new(ctx: ModuleContext) -> Self {
        Self { ctx }
    }

    /// Next id to allocate, if genesis seeded the counter.
    pub fn highest_id(&self) -> Result<Option<u64>> {
        self.ctx.get_record(HIGHEST_PURCHASE_ORDER_ID_KEY)
    }

    /// Seed or overwrite the id counter.
    pub fn set_highest_id(&self, id: u64) -> Result<()> {
        self.ctx.put_record(HIGHEST_PURCHASE_ORDER_ID_KEY, &id)
    }

    /// Return the next id and advance the counter.
    pub fn allocate_id(&self) -> Result<u64> {
        let id = self
            .highest_id()?
            .ok_or(EnterpriseError::GenesisNotInitialised)?;
        let next = id.checked_add(1).ok_or(EnterpriseError::Overflow)?;
        self.set_highest_id(next)?;
        Ok(id)
    }

    /// Upsert by id. Orders with status `Nil` are refused.
    pub fn save(&self, order: &PurchaseOrder) -> Result<()> {
        if !order.status.is_valid() {
            return Err(EnterpriseError::InvalidStatus(order.status.to_string()));
        }
        self.ctx.put_record(&purchase_order_key(order.id), order)
    }

    /// Load an order.
    pub fn get(&self, id: u64) -> Result<Option<PurchaseOrder>> {
        self.ctx.get_record(&purchase_order_key(id))
    }

    /// True if an order with `id` exists.
    pub fn exists(&self, id: u64) -> Result<bool> {
        Ok(self.ctx.store.has(&purchase_order_key(id))?)
    }

    /// Every order in id order.
    pub fn all(&self) -> Result<Vec<PurchaseOrder>> {
        self.ctx.scan_records(&[PURCHASE_ORDER_PREFIX])
    }

    /// Orders matching `filter`, paginated.
    pub fn list_filtered(
        &self,
        filter: &PurchaseOrderFilter,
        page: PageRequest,
        default_limit: usize,
    ) -> Result<Vec<PurchaseOrder>> {
        let matching: Vec<_> = self
            .all()?
            .into_iter()
            .filter(|po| filter.matches(po))
            .collect();
        Ok(page.apply(matching, default_limit))
    }

    /// Add `id` to `queue`.
    pub fn enqueue(&self, queue: OrderQueue, id: u64) -> Result<()> {
        self.ctx.store.set(&queue.key(id), codec::encode(&id)?)?;
        Ok(())
    }

    /// True if `id` is queued.
    pub fn is_in(&self, queue: OrderQueue, id: u64) -> Result<bool> {
        Ok(self.ctx.store.has(&queue.key(id))?)
    }

    /// Remove `id` from `queue`. Absent ids are a no-op.
    pub fn dequeue(&self, queue: OrderQueue, id: u64) -> Result<()> {
        self.ctx.store.delete(&queue.key(id))?;
        Ok(())
    }

    /// Queued ids in ascending order.
    pub fn list(&self, queue: OrderQueue) -> Result<Vec<u64>> {
        self.ctx
            .store
            .prefix_scan(&[queue.prefix()])?
            .into_iter()
            .map(|(key, _)| split_queue_key(&key))
            .collect()
    }
}
