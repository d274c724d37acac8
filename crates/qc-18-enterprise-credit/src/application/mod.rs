//! # Application Layer
//!
//! Lifecycle engine, block hook, admission stage and the service facade.

pub mod approval;
pub mod block_tick;
pub mod fee_guard;
pub mod service;

pub use approval::{ApprovalEngine, TallyOutcome};
pub use block_tick::BlockTickProcessor;
pub use fee_guard::{AdmissionChain, FeeInteractionGuard};
pub use service::EnterpriseService;
