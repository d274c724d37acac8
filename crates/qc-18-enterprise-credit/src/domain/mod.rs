//! # Domain Module
//!
//! Core domain types for Enterprise Credit: purchase orders, locked balances,
//! parameters, events and the record key namespace.

pub mod entities;
pub mod errors;
pub mod events;
pub mod genesis;
pub mod invariants;
pub mod keys;
pub mod messages;
pub mod params;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use events::EnterpriseEvent;
pub use genesis::GenesisState;
pub use invariants::*;
pub use messages::*;
pub use params::{validate_denom, EnterpriseParams, DEFAULT_DECISION_TIME_LIMIT, DEFAULT_DENOM};
pub use value_objects::*;
