//! # Approval Engine
//!
//! Owns the purchase order lifecycle:
//!
//! ```text
//! raise ──→ Raised ──tally──→ Accepted ──complete──→ Completed
//!              └─────tally──→ Rejected
//! ```
//!
//! Decisions only append to an order. Status changes happen once per block
//! in `tally_decisions`, over the full accumulated decision list, so every
//! replica sees the same outcome regardless of transaction order within the
//! block.

use crate::domain::invariants::invariant_queue_status;
use crate::domain::{
    AccountAddress, Coin, EnterpriseError, EnterpriseEvent, EnterpriseParams, PurchaseOrder,
    PurchaseOrderStatus, Result, TickReport,
};
use crate::store::{
    LockedBalanceLedger, ModuleContext, OrderQueue, PurchaseOrderStore, WhitelistRegistry,
};
use tracing::{debug, error, info, warn};

/// Result of tallying one raised order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TallyOutcome {
    /// Stale without quorum.
    StaleRejected,
    /// Rejects exceeded the threshold.
    Rejected,
    /// Quorum reached; queued for completion.
    Accepted,
    /// Undecided; re-evaluated next block.
    StillRaised,
}

/// Purchase order lifecycle state machine.
#[derive(Clone)]
pub struct ApprovalEngine {
    ctx: ModuleContext,
    orders: PurchaseOrderStore,
    whitelist: WhitelistRegistry,
    locked: LockedBalanceLedger,
}

impl ApprovalEngine {
    /// Create an engine over the module context.
    pub fn new(ctx: ModuleContext) -> Self {
        Self {
            orders: PurchaseOrderStore::new(ctx.clone()),
            whitelist: WhitelistRegistry::new(ctx.clone()),
            locked: LockedBalanceLedger::new(ctx.clone()),
            ctx,
        }
    }

    /// Raise a new purchase order and queue it for tallying.
    pub fn raise_purchase_order(
        &self,
        purchaser: &AccountAddress,
        amount: &Coin,
        now: u64,
    ) -> Result<u64> {
        if !self.whitelist.is_whitelisted(purchaser)? {
            return Err(EnterpriseError::NotWhitelisted(purchaser.to_string()));
        }
        let params = self.ctx.params();
        if amount.denom != params.denom {
            return Err(EnterpriseError::WrongDenomination {
                expected: params.denom,
                got: amount.denom.clone(),
            });
        }
        if !amount.is_positive() {
            return Err(EnterpriseError::NonPositiveAmount);
        }

        let id = self.ctx.atomically(|| {
            let id = self.orders.allocate_id()?;
            let order = PurchaseOrder::new_raised(id, purchaser.clone(), amount.clone(), now);
            self.orders.save(&order)?;
            self.orders.enqueue(OrderQueue::Raised, id)?;
            self.ctx.events.emit(EnterpriseEvent::RaisePurchaseOrder {
                id,
                purchaser: purchaser.clone(),
                amount: amount.clone(),
            });
            Ok(id)
        })?;

        debug!(id, purchaser = %purchaser, amount = %amount, "Purchase order raised");
        Ok(id)
    }

    /// Record a signer decision. The status is left for the block tally.
    pub fn process_decision(
        &self,
        id: u64,
        decision: PurchaseOrderStatus,
        signer: &AccountAddress,
        now: u64,
    ) -> Result<()> {
        if !self.ctx.params().is_signer(signer) {
            return Err(EnterpriseError::Unauthorized(signer.to_string()));
        }
        let mut order = self.orders.get(id)?.ok_or(EnterpriseError::NotFound(id))?;
        order.record_decision(signer.clone(), decision, now)?;

        self.ctx.atomically(|| {
            self.orders.save(&order)?;
            self.ctx.events.emit(EnterpriseEvent::ProcessDecision {
                id,
                signer: signer.clone(),
                decision,
            });
            Ok(())
        })?;

        debug!(id, signer = %signer, %decision, "Purchase order decision recorded");
        Ok(())
    }

    /// Tally every raised order in id order. Each order is settled in its
    /// own frame; non-fatal failures leave the order queued for the next
    /// block, fatal ones abort.
    pub fn tally_decisions(&self, now: u64) -> Result<TickReport> {
        let params = self.ctx.params();
        let mut report = TickReport::default();

        for id in self.orders.list(OrderQueue::Raised)? {
            match self.ctx.atomically(|| self.tally_one(id, &params, now)) {
                Ok(TallyOutcome::StaleRejected) => report.stale_rejected += 1,
                Ok(TallyOutcome::Rejected) => report.rejected += 1,
                Ok(TallyOutcome::Accepted) => report.accepted += 1,
                Ok(TallyOutcome::StillRaised) => report.still_raised += 1,
                Err(err) if err.is_fatal() => {
                    error!(id, error = %err, "Fatal error tallying purchase order");
                    return Err(err);
                }
                Err(err) => {
                    warn!(id, error = %err, "Skipping purchase order tally");
                    report.skipped += 1;
                }
            }
        }
        Ok(report)
    }

    fn tally_one(&self, id: u64, params: &EnterpriseParams, now: u64) -> Result<TallyOutcome> {
        let mut order = self.orders.get(id)?.ok_or(EnterpriseError::NotFound(id))?;
        invariant_queue_status(&order, PurchaseOrderStatus::Raised)?;

        let tally = order.tally();
        let stale = now.saturating_sub(order.raise_time) >= params.decision_time_limit;

        // Staleness first: a stale order that already has quorum is accepted below.
        let outcome = if stale && tally.accepts < params.min_accepts {
            TallyOutcome::StaleRejected
        } else if tally.rejects > params.reject_threshold() {
            TallyOutcome::Rejected
        } else if tally.accepts >= params.min_accepts {
            TallyOutcome::Accepted
        } else {
            return Ok(TallyOutcome::StillRaised);
        };

        let next = match outcome {
            TallyOutcome::Accepted => PurchaseOrderStatus::Accepted,
            _ => PurchaseOrderStatus::Rejected,
        };
        order.transition(next)?;
        order.completion_time = now;
        self.orders.save(&order)?;
        self.orders.dequeue(OrderQueue::Raised, id)?;
        if outcome == TallyOutcome::Accepted {
            self.orders.enqueue(OrderQueue::Accepted, id)?;
        }

        let event = match outcome {
            TallyOutcome::StaleRejected => EnterpriseEvent::AutoRejectStale {
                id,
                purchaser: order.purchaser.clone(),
            },
            _ => EnterpriseEvent::TallyDecisions {
                id,
                purchaser: order.purchaser.clone(),
                decision: next,
                accepts: tally.accepts,
                rejects: tally.rejects,
            },
        };
        self.ctx.events.emit(event);

        debug!(
            id,
            accepts = tally.accepts,
            rejects = tally.rejects,
            outcome = ?outcome,
            "Purchase order tallied"
        );
        Ok(outcome)
    }

    /// Complete every accepted order in id order: mark completed, mint and
    /// lock the credit, dequeue.
    pub fn complete_accepted(&self, now: u64) -> Result<TickReport> {
        let mut report = TickReport::default();

        for id in self.orders.list(OrderQueue::Accepted)? {
            match self.ctx.atomically(|| self.complete_one(id)) {
                Ok(order) => {
                    report.completed += 1;
                    info!(
                        id,
                        purchaser = %order.purchaser,
                        amount = %order.amount,
                        block_time = now,
                        "Purchase order complete"
                    );
                }
                Err(err) if err.is_fatal() => {
                    error!(id, error = %err, "Fatal error completing purchase order");
                    return Err(err);
                }
                Err(err) => {
                    warn!(id, error = %err, "Skipping purchase order completion");
                    report.skipped += 1;
                }
            }
        }
        Ok(report)
    }

    fn complete_one(&self, id: u64) -> Result<PurchaseOrder> {
        let mut order = self.orders.get(id)?.ok_or(EnterpriseError::NotFound(id))?;
        invariant_queue_status(&order, PurchaseOrderStatus::Accepted)?;

        order.transition(PurchaseOrderStatus::Completed)?;
        self.orders.save(&order)?;
        self.locked.mint_and_lock(&order.purchaser, &order.amount)?;
        self.orders.dequeue(OrderQueue::Accepted, id)?;

        self.ctx.events.emit(EnterpriseEvent::PurchaseComplete {
            id,
            purchaser: order.purchaser.clone(),
            amount: order.amount.clone(),
        });
        Ok(order)
    }
}
