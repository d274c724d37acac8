//! # Store Key Namespace
//!
//! One prefix byte per record family.
//!
//! | Prefix | Record | Key suffix |
//! |--------|--------|------------|
//! | `0x01` | `PurchaseOrder` | big-endian 8-byte id |
//! | `0x02` | `LockedBalance` | account bytes |
//! | `0x03` | whitelist marker | account bytes |
//! | `0x04` | raised queue marker | big-endian 8-byte id |
//! | `0x05` | accepted queue marker | big-endian 8-byte id |
//! | `0x06` | `SpentCounter` | account bytes |
//! | `0x20` | highest allocated purchase order id | - |
//! | `0x98` | global spent total | - |
//! | `0x99` | global locked total | - |

use super::errors::{EnterpriseError, Result};
use super::value_objects::AccountAddress;

/// Purchase orders by id.
pub const PURCHASE_ORDER_PREFIX: u8 = 0x01;
/// Locked balances by address.
pub const LOCKED_BALANCE_PREFIX: u8 = 0x02;
/// Whitelist markers by address.
pub const WHITELIST_PREFIX: u8 = 0x03;
/// Raised queue markers by id.
pub const RAISED_QUEUE_PREFIX: u8 = 0x04;
/// Accepted queue markers by id.
pub const ACCEPTED_QUEUE_PREFIX: u8 = 0x05;
/// Spent counters by address.
pub const SPENT_PREFIX: u8 = 0x06;

/// Highest purchase order id (next id to allocate).
pub const HIGHEST_PURCHASE_ORDER_ID_KEY: &[u8] = &[0x20];
/// Global spent total.
pub const TOTAL_SPENT_KEY: &[u8] = &[0x98];
/// Global locked total.
pub const TOTAL_LOCKED_KEY: &[u8] = &[0x99];

/// Big-endian id bytes, so key order equals numeric order.
pub fn id_to_bytes(id: u64) -> [u8; 8] {
    id.to_be_bytes()
}

/// Decode big-endian id bytes.
pub fn id_from_bytes(bytes: &[u8]) -> Result<u64> {
    let arr: [u8; 8] = bytes.try_into().map_err(|_| {
        EnterpriseError::Codec(format!("unexpected id length ({} != 8)", bytes.len()))
    })?;
    Ok(u64::from_be_bytes(arr))
}

fn prefixed(prefix: u8, suffix: &[u8]) -> Vec<u8> {
    let mut key = Vec::with_capacity(1 + suffix.len());
    key.push(prefix);
    key.extend_from_slice(suffix);
    key
}

/// Key for a purchase order record.
pub fn purchase_order_key(id: u64) -> Vec<u8> {
    prefixed(PURCHASE_ORDER_PREFIX, &id_to_bytes(id))
}

/// Key for an account's locked balance.
pub fn locked_balance_key(owner: &AccountAddress) -> Vec<u8> {
    prefixed(LOCKED_BALANCE_PREFIX, owner.as_bytes())
}

/// Key for an account's spent counter.
pub fn spent_key(owner: &AccountAddress) -> Vec<u8> {
    prefixed(SPENT_PREFIX, owner.as_bytes())
}

/// Key for a whitelist marker.
pub fn whitelist_key(addr: &AccountAddress) -> Vec<u8> {
    prefixed(WHITELIST_PREFIX, addr.as_bytes())
}

/// Key for a raised queue entry.
pub fn raised_queue_key(id: u64) -> Vec<u8> {
    prefixed(RAISED_QUEUE_PREFIX, &id_to_bytes(id))
}

/// Key for an accepted queue entry.
pub fn accepted_queue_key(id: u64) -> Vec<u8> {
    prefixed(ACCEPTED_QUEUE_PREFIX, &id_to_bytes(id))
}

/// Extract the id from a queue key.
pub fn split_queue_key(key: &[u8]) -> Result<u64> {
    match key.split_first() {
        Some((_, rest)) => id_from_bytes(rest),
        None => Err(EnterpriseError::Codec("empty queue key".to_string())),
    }
}
