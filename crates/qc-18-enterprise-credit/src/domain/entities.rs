//! # Domain Entities
//!
//! Purchase orders, locked balances, spent counters and the read models
//! returned by queries.

use super::errors::{EnterpriseError, Result};
use super::value_objects::{AccountAddress, Coin, PurchaseOrderStatus};
use serde::{Deserialize, Serialize};

/// A single signer decision recorded on a purchase order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrderDecision {
    /// Deciding signer.
    pub signer: AccountAddress,
    /// `Accepted` or `Rejected`.
    pub decision: PurchaseOrderStatus,
    /// Block time of the decision (seconds).
    pub decision_time: u64,
}

/// Request to mint restricted credit against a named account.
///
/// Never deleted: completed and rejected orders stay as audit records.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    /// Unique, monotonically assigned identifier.
    pub id: u64,
    /// Account the credit is minted to.
    pub purchaser: AccountAddress,
    /// Requested amount.
    pub amount: Coin,
    /// Lifecycle status.
    pub status: PurchaseOrderStatus,
    /// Block time the order was raised.
    pub raise_time: u64,
    /// Block time the order was accepted or rejected.
    pub completion_time: u64,
    /// Decisions in arrival order, at most one per signer.
    pub decisions: Vec<PurchaseOrderDecision>,
}

/// Accept/reject counts over an order's decision list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecisionTally {
    /// Number of accept decisions.
    pub accepts: u64,
    /// Number of reject decisions.
    pub rejects: u64,
}

impl PurchaseOrder {
    /// Create a freshly raised order.
    pub fn new_raised(id: u64, purchaser: AccountAddress, amount: Coin, raise_time: u64) -> Self {
        Self {
            id,
            purchaser,
            amount,
            status: PurchaseOrderStatus::Raised,
            raise_time,
            completion_time: 0,
            decisions: Vec::new(),
        }
    }

    /// True if `signer` already has a decision on this order.
    pub fn has_decided(&self, signer: &AccountAddress) -> bool {
        self.decisions.iter().any(|d| &d.signer == signer)
    }

    /// Count decisions over the full accumulated list.
    pub fn tally(&self) -> DecisionTally {
        self.decisions
            .iter()
            .fold(DecisionTally::default(), |mut t, d| {
                match d.decision {
                    PurchaseOrderStatus::Accepted => t.accepts += 1,
                    PurchaseOrderStatus::Rejected => t.rejects += 1,
                    _ => {}
                }
                t
            })
    }

    /// Append a signer decision. The status is left untouched; tallying
    /// happens once per block.
    pub fn record_decision(
        &mut self,
        signer: AccountAddress,
        decision: PurchaseOrderStatus,
        now: u64,
    ) -> Result<()> {
        if !decision.is_decision() {
            return Err(EnterpriseError::InvalidDecision(decision.to_string()));
        }
        if self.status != PurchaseOrderStatus::Raised {
            return Err(EnterpriseError::AlreadyProcessed {
                id: self.id,
                status: self.status.to_string(),
            });
        }
        if self.has_decided(&signer) {
            return Err(EnterpriseError::DuplicateDecision {
                id: self.id,
                signer: signer.to_string(),
            });
        }
        self.decisions.push(PurchaseOrderDecision {
            signer,
            decision,
            decision_time: now,
        });
        Ok(())
    }

    /// Move to `next`, rejecting backward or skipping transitions.
    pub fn transition(&mut self, next: PurchaseOrderStatus) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(EnterpriseError::InvalidTransition {
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }
        self.status = next;
        Ok(())
    }
}

/// Credit minted to an account but held by the module's custody account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockedBalance {
    /// Account the credit belongs to.
    pub owner: AccountAddress,
    /// Locked quantity.
    pub amount: Coin,
}

/// Cumulative credit unlocked to pay fees.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpentCounter {
    /// Account that spent the credit.
    pub owner: AccountAddress,
    /// Amount spent to date.
    pub amount: Coin,
}

/// Combined view of an account's credit position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnterpriseUserAccount {
    /// Account address.
    pub owner: AccountAddress,
    /// Credit still locked.
    pub locked: Coin,
    /// Bank balance in the credit denomination.
    pub general_supply: Coin,
    /// Credit unlocked for fees to date.
    pub spent: Coin,
    /// Bank balance plus locked credit.
    pub spendable: Coin,
}

/// Outcome counts for one block tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    /// Orders moved to the accepted queue.
    pub accepted: u64,
    /// Orders rejected by signers.
    pub rejected: u64,
    /// Orders auto-rejected as stale.
    pub stale_rejected: u64,
    /// Orders left raised for the next block.
    pub still_raised: u64,
    /// Orders completed and credit locked.
    pub completed: u64,
    /// Queue entries skipped after a non-fatal error.
    pub skipped: u64,
}

/// Filters for listing purchase orders. Unset or empty fields match all.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrderFilter {
    /// Match this status (`Nil` matches all).
    pub status: Option<PurchaseOrderStatus>,
    /// Match this purchaser (empty matches all).
    pub purchaser: Option<AccountAddress>,
}

impl PurchaseOrderFilter {
    /// True if `order` passes every non-empty filter field.
    pub fn matches(&self, order: &PurchaseOrder) -> bool {
        let status_ok = match self.status {
            Some(status) if status.is_valid() => order.status == status,
            _ => true,
        };
        let purchaser_ok = match &self.purchaser {
            Some(p) if !p.is_empty() => &order.purchaser == p,
            _ => true,
        };
        status_ok && purchaser_ok
    }
}

/// Page/limit pagination. Pages are 1-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// 1-based page number; 0 yields an empty page.
    pub page: usize,
    /// Items per page; 0 uses the configured default.
    pub limit: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1, limit: 0 }
    }
}

impl PageRequest {
    /// Create a page request.
    pub fn new(page: usize, limit: usize) -> Self {
        Self { page, limit }
    }

    /// Resolve to a `[start, end)` window over `total` items, or `None` when
    /// the window falls outside the collection.
    pub fn window(&self, total: usize, default_limit: usize) -> Option<(usize, usize)> {
        if self.page == 0 {
            return None;
        }
        let limit = if self.limit == 0 {
            default_limit
        } else {
            self.limit
        };
        let start = (self.page - 1).checked_mul(limit)?;
        if start >= total {
            return None;
        }
        let end = start.saturating_add(limit).min(total);
        Some((start, end))
    }

    /// Apply the window to `items`, clamping out-of-range requests to empty.
    pub fn apply<T>(&self, mut items: Vec<T>, default_limit: usize) -> Vec<T> {
        match self.window(items.len(), default_limit) {
            Some((start, end)) => {
                items.truncate(end);
                items.split_off(start)
            }
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(b: u8) -> AccountAddress {
        AccountAddress::from([b; 20])
    }

    fn order() -> PurchaseOrder {
        PurchaseOrder::new_raised(1, addr(0x01), Coin::new("nund", 500), 1_000)
    }

    #[test]
    fn test_record_decision_appends() {
        let mut po = order();
        po.record_decision(addr(0xA1), PurchaseOrderStatus::Accepted, 1_010)
            .unwrap();
        assert_eq!(po.decisions.len(), 1);
        assert_eq!(po.decisions[0].decision_time, 1_010);
        assert_eq!(po.status, PurchaseOrderStatus::Raised);
    }

    #[test]
    fn test_duplicate_decision_rejected() {
        let mut po = order();
        po.record_decision(addr(0xA1), PurchaseOrderStatus::Accepted, 1)
            .unwrap();
        let err = po
            .record_decision(addr(0xA1), PurchaseOrderStatus::Rejected, 2)
            .unwrap_err();
        assert!(matches!(err, EnterpriseError::DuplicateDecision { id: 1, .. }));
    }

    #[test]
    fn test_decision_on_processed_order_rejected() {
        let mut po = order();
        po.status = PurchaseOrderStatus::Accepted;
        let err = po
            .record_decision(addr(0xA1), PurchaseOrderStatus::Accepted, 1)
            .unwrap_err();
        assert!(matches!(err, EnterpriseError::AlreadyProcessed { .. }));
    }

    #[test]
    fn test_tally_counts() {
        let mut po = order();
        po.record_decision(addr(0xA1), PurchaseOrderStatus::Accepted, 1)
            .unwrap();
        po.record_decision(addr(0xA2), PurchaseOrderStatus::Rejected, 1)
            .unwrap();
        po.record_decision(addr(0xA3), PurchaseOrderStatus::Accepted, 1)
            .unwrap();
        assert_eq!(
            po.tally(),
            DecisionTally {
                accepts: 2,
                rejects: 1
            }
        );
    }

    #[test]
    fn test_transition_guards() {
        let mut po = order();
        assert!(po.transition(PurchaseOrderStatus::Completed).is_err());
        po.transition(PurchaseOrderStatus::Accepted).unwrap();
        po.transition(PurchaseOrderStatus::Completed).unwrap();
        assert!(po.transition(PurchaseOrderStatus::Raised).is_err());
    }

    #[test]
    fn test_filter_matches_non_empty_fields_only() {
        let po = order();
        assert!(PurchaseOrderFilter::default().matches(&po));
        let by_nil = PurchaseOrderFilter {
            status: Some(PurchaseOrderStatus::Nil),
            purchaser: Some(AccountAddress::empty()),
        };
        assert!(by_nil.matches(&po));
        let by_other = PurchaseOrderFilter {
            status: None,
            purchaser: Some(addr(0x02)),
        };
        assert!(!by_other.matches(&po));
        let by_status = PurchaseOrderFilter {
            status: Some(PurchaseOrderStatus::Completed),
            purchaser: None,
        };
        assert!(!by_status.matches(&po));
    }

    #[test]
    fn test_page_window() {
        assert_eq!(PageRequest::new(1, 10).window(25, 100), Some((0, 10)));
        assert_eq!(PageRequest::new(3, 10).window(25, 100), Some((20, 25)));
        assert_eq!(PageRequest::new(4, 10).window(25, 100), None);
        assert_eq!(PageRequest::new(0, 10).window(25, 100), None);
        assert_eq!(PageRequest::new(1, 0).window(25, 100), Some((0, 25)));
    }

    #[test]
    fn test_page_apply() {
        let items: Vec<u32> = (0..7).collect();
        assert_eq!(PageRequest::new(2, 3).apply(items.clone(), 100), vec![3, 4, 5]);
        assert!(PageRequest::new(9, 3).apply(items, 100).is_empty());
    }
}
