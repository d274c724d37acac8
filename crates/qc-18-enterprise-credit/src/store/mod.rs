//! # Store Components
//!
//! State owners over the module key-value store. Each component exclusively
//! owns one family of records:
//!
//! | Component | Records |
//! |-----------|---------|
//! | `WhitelistRegistry` | whitelist markers |
//! | `PurchaseOrderStore` | purchase orders, id counter, raised/accepted queues |
//! | `LockedBalanceLedger` | locked balances, spent counters, global totals |

pub mod context;
pub mod locked;
pub mod purchase_orders;
pub mod whitelist;

pub use context::ModuleContext;
pub use locked::LockedBalanceLedger;
pub use purchase_orders::{OrderQueue, PurchaseOrderStore};
pub use whitelist::WhitelistRegistry;
