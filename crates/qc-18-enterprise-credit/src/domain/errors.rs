//! # Domain Errors
//!
//! Error types for the Enterprise Credit subsystem.
//!
//! Every rejected message carries a stable numeric code (`code()`), a
//! taxonomy bucket (`category()`) and a human readable detail string
//! (`Display`). Codes 101-114 match the registered enterprise module codes.

use thiserror::Error;

/// Result type alias for enterprise credit operations.
pub type Result<T> = std::result::Result<T, EnterpriseError>;

/// Error taxonomy used when reporting a rejection to the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Malformed input detected synchronously in a message handler.
    Validation,
    /// Caller is not whitelisted or not an authorised signer.
    Authorization,
    /// Request conflicts with the current state (missing, already done).
    StateConflict,
    /// A conservation or lifecycle invariant no longer holds.
    Invariant,
    /// Storage, ledger or codec failure underneath the engine.
    Internal,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Validation => "validation",
            Self::Authorization => "authorization",
            Self::StateConflict => "state_conflict",
            Self::Invariant => "invariant",
            Self::Internal => "internal",
        };
        f.write_str(s)
    }
}

/// Key-value store failures.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Underlying backend reported an error.
    #[error("Store backend error: {0}")]
    Backend(String),

    /// `commit`/`rollback` called with no open frame.
    #[error("No open transaction frame")]
    NoOpenFrame,
}

/// Failures reported by the external balance ledger.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Account does not hold enough spendable coins.
    #[error("Insufficient funds for {account}: required {required}, available {available}")]
    InsufficientFunds {
        /// Account being debited
        account: String,
        /// Amount requested
        required: u128,
        /// Amount held
        available: u128,
    },

    /// Account has fewer delegated coins than requested for undelegation.
    #[error("Insufficient delegation for {account}: required {required}, delegated {delegated}")]
    InsufficientDelegation {
        /// Delegating account
        account: String,
        /// Amount requested
        required: u128,
        /// Amount currently delegated
        delegated: u128,
    },

    /// Module account is not registered with the ledger.
    #[error("Unknown module account: {0}")]
    UnknownModule(String),

    /// Module account exists but lacks the minter permission.
    #[error("Module {0} is not permitted to mint")]
    MintNotPermitted(String),

    /// Supply or balance arithmetic overflowed.
    #[error("Ledger arithmetic overflow")]
    Overflow,

    /// Transactional frame handling failed.
    #[error("Ledger journal error: {0}")]
    Journal(String),
}

/// Enterprise credit error type.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EnterpriseError {
    /// Purchase order id counter was never seeded by genesis.
    #[error("Invalid genesis: initial purchase order id hasn't been set")]
    GenesisNotInitialised,

    /// Purchase order does not exist.
    #[error("Purchase order does not exist: id {0}")]
    NotFound(u64),

    /// Purchase order is no longer in the raised state.
    #[error("Purchase order {id} already processed: {status}")]
    AlreadyProcessed {
        /// Purchase order id
        id: u64,
        /// Current status
        status: String,
    },

    /// Decision value is not accept or reject.
    #[error("Invalid decision {0}: decision should be accept or reject")]
    InvalidDecision(String),

    /// Coin denomination differs from the configured credit denomination.
    #[error("Invalid denomination: expected {expected}, got {got}")]
    WrongDenomination {
        /// Configured denomination
        expected: String,
        /// Supplied denomination
        got: String,
    },

    /// Status is not one of the persistable values.
    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    /// Signer already recorded a decision on this order.
    #[error("Signer {signer} already decided on purchase order {id}")]
    DuplicateDecision {
        /// Purchase order id
        id: u64,
        /// Signer address
        signer: String,
    },

    /// Address field was empty.
    #[error("Address cannot be empty")]
    EmptyAddress,

    /// Amount must be strictly positive.
    #[error("Amount must be > 0")]
    NonPositiveAmount,

    /// Whitelist action is not add or remove.
    #[error("Invalid whitelist action: {0}")]
    InvalidAction(String),

    /// Address already whitelisted.
    #[error("Address {0} already whitelisted")]
    AlreadyWhitelisted(String),

    /// Address is not whitelisted.
    #[error("Address {0} not whitelisted")]
    NotWhitelisted(String),

    /// Signer is not in the configured signer set.
    #[error("Unauthorised signer: {0}")]
    Unauthorized(String),

    /// Address could not be decoded.
    #[error("Malformed address {address}: {reason}")]
    MalformedAddress {
        /// Raw input
        address: String,
        /// Decode failure
        reason: String,
    },

    /// Parameter set failed validation.
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// Genesis state failed validation.
    #[error("Invalid genesis: {0}")]
    InvalidGenesis(String),

    /// Illegal lifecycle transition.
    #[error("Invalid purchase order transition: {from} -> {to}")]
    InvalidTransition {
        /// Current status
        from: String,
        /// Attempted status
        to: String,
    },

    /// Conservation or lifecycle invariant broken.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Coin arithmetic overflowed.
    #[error("Arithmetic overflow")]
    Overflow,

    /// Store failure.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Ledger failure.
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Record could not be encoded or decoded.
    #[error("Codec error: {0}")]
    Codec(String),
}

impl EnterpriseError {
    /// Stable numeric code for the error.
    pub fn code(&self) -> u32 {
        match self {
            Self::GenesisNotInitialised => 101,
            Self::NotFound(_) => 102,
            Self::AlreadyProcessed { .. } => 103,
            Self::InvalidDecision(_) => 104,
            Self::WrongDenomination { .. } => 105,
            Self::InvalidStatus(_) => 106,
            Self::DuplicateDecision { .. } => 108,
            Self::EmptyAddress => 109,
            Self::NonPositiveAmount => 110,
            Self::InvalidAction(_) => 111,
            Self::AlreadyWhitelisted(_) => 112,
            Self::NotWhitelisted(_) => 113,
            Self::Unauthorized(_) => 114,
            Self::MalformedAddress { .. } => 115,
            Self::InvalidParams(_) => 116,
            Self::InvalidGenesis(_) => 117,
            Self::InvalidTransition { .. } => 118,
            Self::InvariantViolation(_) => 119,
            Self::Overflow => 120,
            Self::Store(_) => 121,
            Self::Ledger(_) => 122,
            Self::Codec(_) => 123,
        }
    }

    /// Taxonomy bucket for the error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::WrongDenomination { .. }
            | Self::NonPositiveAmount
            | Self::EmptyAddress
            | Self::MalformedAddress { .. }
            | Self::InvalidDecision(_)
            | Self::InvalidAction(_)
            | Self::InvalidStatus(_)
            | Self::InvalidParams(_)
            | Self::InvalidGenesis(_) => ErrorCategory::Validation,

            Self::NotWhitelisted(_) | Self::Unauthorized(_) => ErrorCategory::Authorization,

            Self::NotFound(_)
            | Self::AlreadyProcessed { .. }
            | Self::DuplicateDecision { .. }
            | Self::AlreadyWhitelisted(_) => ErrorCategory::StateConflict,

            Self::GenesisNotInitialised
            | Self::InvalidTransition { .. }
            | Self::InvariantViolation(_) => ErrorCategory::Invariant,

            Self::Overflow | Self::Store(_) | Self::Ledger(_) | Self::Codec(_) => {
                ErrorCategory::Internal
            }
        }
    }

    /// Fatal errors abort the enclosing block tick and should halt block
    /// production.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Invariant | ErrorCategory::Internal
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_match_registered_values() {
        assert_eq!(EnterpriseError::GenesisNotInitialised.code(), 101);
        assert_eq!(EnterpriseError::NotFound(7).code(), 102);
        assert_eq!(
            EnterpriseError::NotWhitelisted("0xab".to_string()).code(),
            113
        );
    }

    #[test]
    fn test_category_mapping() {
        assert_eq!(
            EnterpriseError::NonPositiveAmount.category(),
            ErrorCategory::Validation
        );
        assert_eq!(
            EnterpriseError::Unauthorized("x".into()).category(),
            ErrorCategory::Authorization
        );
        assert_eq!(
            EnterpriseError::DuplicateDecision {
                id: 1,
                signer: "x".into()
            }
            .category(),
            ErrorCategory::StateConflict
        );
        assert_eq!(
            EnterpriseError::Ledger(LedgerError::Overflow).category(),
            ErrorCategory::Internal
        );
    }

    #[test]
    fn test_fatality() {
        assert!(EnterpriseError::InvariantViolation("x".into()).is_fatal());
        assert!(EnterpriseError::Store(StoreError::NoOpenFrame).is_fatal());
        assert!(!EnterpriseError::NotFound(3).is_fatal());
        assert!(!EnterpriseError::EmptyAddress.is_fatal());
    }

    #[test]
    fn test_display_carries_detail() {
        let err = EnterpriseError::WrongDenomination {
            expected: "nund".into(),
            got: "uatom".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("nund"));
        assert!(msg.contains("uatom"));
    }

    #[test]
    fn test_ledger_error_converts() {
        let err: EnterpriseError = LedgerError::MintNotPermitted("enterprise".into()).into();
        assert!(matches!(err, EnterpriseError::Ledger(_)));
        assert!(err.to_string().contains("not permitted to mint"));
    }
}
