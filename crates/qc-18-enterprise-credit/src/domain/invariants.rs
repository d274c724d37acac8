//! # Domain Invariants
//!
//! Conservation rules over the locked-credit tallies. These are pure
//! functions over already-loaded values; the store layer gathers the inputs.

use super::entities::{LockedBalance, PurchaseOrder};
use super::errors::{EnterpriseError, Result};
use super::value_objects::PurchaseOrderStatus;

/// Route name used when reporting a broken module-account invariant.
pub const MODULE_ACCOUNT_INVARIANT: &str = "module-account";

/// Invariant: custody balance == global locked total == sum of locked balances.
///
/// Returns a human readable report and whether the invariant is broken.
pub fn module_account_invariant(
    custody_balance: u128,
    total_locked: u128,
    locked: &[LockedBalance],
) -> (String, bool) {
    let mut sum: u128 = 0;
    for record in locked {
        sum = match sum.checked_add(record.amount.amount) {
            Some(s) => s,
            None => {
                return (
                    format!(
                        "{}: locked balance sum overflowed at {}",
                        MODULE_ACCOUNT_INVARIANT, record.owner
                    ),
                    true,
                )
            }
        };
    }

    let broken = custody_balance != total_locked || total_locked != sum;
    let msg = format!(
        "{}: {} broken\n\tcustody balance: {}\n\ttotal locked: {}\n\tsum of locked balances: {}",
        MODULE_ACCOUNT_INVARIANT,
        if broken { "is" } else { "not" },
        custody_balance,
        total_locked,
        sum
    );
    (msg, broken)
}

/// Invariant: a queued order carries the status of its queue.
pub fn invariant_queue_status(order: &PurchaseOrder, expected: PurchaseOrderStatus) -> Result<()> {
    if order.status != expected {
        return Err(EnterpriseError::InvariantViolation(format!(
            "purchase order {} queued as {} but has status {}",
            order.id, expected, order.status
        )));
    }
    Ok(())
}
