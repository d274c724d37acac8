//! Module parameters: credit denomination, signer set and quorum rules.

use super::errors::{EnterpriseError, Result};
use super::value_objects::AccountAddress;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Default credit denomination.
pub const DEFAULT_DENOM: &str = "nund";

/// Default decision window (seconds).
pub const DEFAULT_DECISION_TIME_LIMIT: u64 = 84_600;

/// Enterprise credit parameters.
///
/// Invariant: `signers.len() >= min_accepts >= 1`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnterpriseParams {
    /// Denomination of the minted credit.
    pub denom: String,
    /// Accept decisions required for quorum.
    pub min_accepts: u64,
    /// Seconds before a raised order becomes stale.
    pub decision_time_limit: u64,
    /// Authorised decision makers, in configured order.
    pub signers: Vec<AccountAddress>,
}

impl Default for EnterpriseParams {
    fn default() -> Self {
        Self {
            denom: DEFAULT_DENOM.to_string(),
            min_accepts: 1,
            decision_time_limit: DEFAULT_DECISION_TIME_LIMIT,
            signers: vec![AccountAddress::from([0u8; 20])],
        }
    }
}

impl EnterpriseParams {
    /// Create a parameter set.
    pub fn new(
        denom: impl Into<String>,
        min_accepts: u64,
        decision_time_limit: u64,
        signers: Vec<AccountAddress>,
    ) -> Self {
        Self {
            denom: denom.into(),
            min_accepts,
            decision_time_limit,
            signers,
        }
    }

    /// Validate all fields.
    pub fn validate(&self) -> Result<()> {
        validate_denom(&self.denom)?;

        if self.min_accepts == 0 {
            return Err(EnterpriseError::InvalidParams(
                "min accepts must be positive".to_string(),
            ));
        }
        if self.decision_time_limit == 0 {
            return Err(EnterpriseError::InvalidParams(
                "decision time limit must be positive".to_string(),
            ));
        }
        if self.signers.is_empty() {
            return Err(EnterpriseError::InvalidParams(
                "must have at least one signer".to_string(),
            ));
        }

        let mut seen = BTreeSet::new();
        for signer in &self.signers {
            signer
                .validate()
                .map_err(|e| EnterpriseError::InvalidParams(format!("signer {}: {}", signer, e)))?;
            if !seen.insert(signer) {
                return Err(EnterpriseError::InvalidParams(format!(
                    "duplicate signer {}",
                    signer
                )));
            }
        }

        if (self.signers.len() as u64) < self.min_accepts {
            return Err(EnterpriseError::InvalidParams(
                "number of authorised accounts must be >= number of minimum accepts".to_string(),
            ));
        }
        Ok(())
    }

    /// Maximum rejects tolerated before an order is rejected.
    pub fn reject_threshold(&self) -> u64 {
        (self.signers.len() as u64).saturating_sub(self.min_accepts)
    }

    /// True if `addr` is an authorised signer.
    pub fn is_signer(&self, addr: &AccountAddress) -> bool {
        !addr.is_empty() && self.signers.iter().any(|s| s == addr)
    }
}

/// Denominations are 3-128 chars, start with a letter and otherwise use
/// `[a-zA-Z0-9/:._-]`.
pub fn validate_denom(denom: &str) -> Result<()> {
    let invalid = |reason: &str| EnterpriseError::InvalidParams(format!("denom {:?}: {}", denom, reason));

    if denom.trim().is_empty() {
        return Err(invalid("cannot be blank"));
    }
    if !(3..=128).contains(&denom.len()) {
        return Err(invalid("length must be between 3 and 128"));
    }
    let mut chars = denom.chars();
    if !chars.next().is_some_and(|c| c.is_ascii_alphabetic()) {
        return Err(invalid("must start with a letter"));
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | ':' | '.' | '_' | '-')) {
        return Err(invalid("contains invalid characters"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer(b: u8) -> AccountAddress {
        AccountAddress::from([b; 20])
    }

    #[test]
    fn test_default_params_valid() {
        assert!(EnterpriseParams::default().validate().is_ok());
    }

    #[test]
    fn test_reject_threshold() {
        let p = EnterpriseParams::new("nund", 2, 100, vec![signer(1), signer(2), signer(3)]);
        assert_eq!(p.reject_threshold(), 1);
    }

    #[test]
    fn test_quorum_larger_than_signers_rejected() {
        let p = EnterpriseParams::new("nund", 3, 100, vec![signer(1), signer(2)]);
        assert!(matches!(p.validate(), Err(EnterpriseError::InvalidParams(_))));
    }

    #[test]
    fn test_zero_values_rejected() {
        assert!(EnterpriseParams::new("nund", 0, 100, vec![signer(1)])
            .validate()
            .is_err());
        assert!(EnterpriseParams::new("nund", 1, 0, vec![signer(1)])
            .validate()
            .is_err());
        assert!(EnterpriseParams::new("nund", 1, 100, vec![]).validate().is_err());
    }

    #[test]
    fn test_duplicate_signer_rejected() {
        let p = EnterpriseParams::new("nund", 1, 100, vec![signer(1), signer(1)]);
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_denom_rules() {
        assert!(validate_denom("nund").is_ok());
        assert!(validate_denom("ibc/ABC123").is_ok());
        assert!(validate_denom("  ").is_err());
        assert!(validate_denom("ab").is_err());
        assert!(validate_denom("1abc").is_err());
        assert!(validate_denom("nu nd").is_err());
    }

    #[test]
    fn test_is_signer() {
        let p = EnterpriseParams::new("nund", 1, 100, vec![signer(1)]);
        assert!(p.is_signer(&signer(1)));
        assert!(!p.is_signer(&signer(2)));
        assert!(!p.is_signer(&AccountAddress::empty()));
    }
}
