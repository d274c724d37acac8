//! # Adapters
//!
//! In-memory implementations of the outbound ports, used by hosts that embed
//! the engine without a persistent backend and by the test suite.

pub mod events;
pub mod fee_gate;
pub mod memory_bank;
pub mod memory_store;
pub mod params;

pub use events::RecordingEventSink;
pub use fee_gate::MessageTypeFeeGate;
pub use memory_bank::{derive_module_address, InMemoryBankLedger, FEE_COLLECTOR};
pub use memory_store::InMemoryKvStore;
pub use params::InMemoryParamSource;
