//! # Domain Value Objects
//!
//! Immutable value types: account addresses, coins and the two small
//! enumerations carried by messages (purchase order status, whitelist action).

use super::errors::{EnterpriseError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Length in bytes of a well-formed account address.
pub const ADDRESS_LEN: usize = 20;

/// Account address.
///
/// Stored as raw bytes so an empty address can be represented and rejected
/// explicitly. Displayed and serialised as `0x`-prefixed lowercase hex.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountAddress(Vec<u8>);

impl AccountAddress {
    /// Wrap raw bytes without validation.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// The empty address.
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Parse a hex string (with or without `0x`).
    pub fn from_hex(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        if digits.is_empty() {
            return Err(EnterpriseError::EmptyAddress);
        }
        let bytes = hex::decode(digits).map_err(|e| EnterpriseError::MalformedAddress {
            address: s.to_string(),
            reason: e.to_string(),
        })?;
        let addr = Self(bytes);
        addr.validate()?;
        Ok(addr)
    }

    /// Check the address is non-empty and of the expected length.
    pub fn validate(&self) -> Result<()> {
        if self.0.is_empty() {
            return Err(EnterpriseError::EmptyAddress);
        }
        if self.0.len() != ADDRESS_LEN {
            return Err(EnterpriseError::MalformedAddress {
                address: self.to_string(),
                reason: format!("expected {} bytes, got {}", ADDRESS_LEN, self.0.len()),
            });
        }
        Ok(())
    }

    /// True if no bytes are present.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw address bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; ADDRESS_LEN]> for AccountAddress {
    fn from(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes.to_vec())
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0))
    }
}

impl FromStr for AccountAddress {
    type Err = EnterpriseError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl Serialize for AccountAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

// Length is not checked here so stored empty addresses still decode.
impl<'de> Deserialize<'de> for AccountAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let digits = s.strip_prefix("0x").unwrap_or(&s);
        hex::decode(digits)
            .map(Self)
            .map_err(serde::de::Error::custom)
    }
}

/// A quantity of a single denomination.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coin {
    /// Denomination.
    pub denom: String,
    /// Non-negative quantity.
    pub amount: u128,
}

impl Coin {
    /// Create a coin.
    pub fn new(denom: impl Into<String>, amount: u128) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }

    /// Zero coin of `denom`.
    pub fn zero(denom: impl Into<String>) -> Self {
        Self::new(denom, 0)
    }

    /// True if the quantity is zero.
    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    /// True if the quantity is strictly positive.
    pub fn is_positive(&self) -> bool {
        self.amount > 0
    }

    fn ensure_same_denom(&self, other: &Coin) -> Result<()> {
        if self.denom != other.denom {
            return Err(EnterpriseError::WrongDenomination {
                expected: self.denom.clone(),
                got: other.denom.clone(),
            });
        }
        Ok(())
    }

    /// Add two coins of the same denomination.
    pub fn checked_add(&self, other: &Coin) -> Result<Coin> {
        self.ensure_same_denom(other)?;
        let amount = self
            .amount
            .checked_add(other.amount)
            .ok_or(EnterpriseError::Overflow)?;
        Ok(Coin::new(self.denom.clone(), amount))
    }

    /// Subtract `other`, failing if the result would be negative.
    pub fn checked_sub(&self, other: &Coin) -> Result<Coin> {
        self.ensure_same_denom(other)?;
        let amount = self
            .amount
            .checked_sub(other.amount)
            .ok_or(EnterpriseError::Overflow)?;
        Ok(Coin::new(self.denom.clone(), amount))
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// Sum of all coins of `denom` in a fee set.
pub fn amount_of(coins: &[Coin], denom: &str) -> u128 {
    coins
        .iter()
        .filter(|c| c.denom == denom)
        .fold(0u128, |acc, c| acc.saturating_add(c.amount))
}

/// Purchase order lifecycle status.
///
/// `Accepted`/`Rejected` double as the decision values a signer submits.
///
/// ```text
/// Raised ──→ Accepted ──→ Completed
///    └─────→ Rejected
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PurchaseOrderStatus {
    /// No status.
    #[default]
    Nil,
    /// Awaiting decisions.
    Raised,
    /// Quorum reached, awaiting completion.
    Accepted,
    /// Rejected by signers or auto-rejected as stale.
    Rejected,
    /// Credit minted and locked.
    Completed,
}

impl PurchaseOrderStatus {
    /// True for the four statuses a stored order may carry.
    pub fn is_valid(&self) -> bool {
        !matches!(self, Self::Nil)
    }

    /// True if the value is an acceptable signer decision.
    pub fn is_decision(&self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected)
    }

    /// Check if transition is valid.
    pub fn can_transition_to(&self, next: PurchaseOrderStatus) -> bool {
        matches!(
            (self, next),
            (Self::Raised, Self::Accepted)
                | (Self::Raised, Self::Rejected)
                | (Self::Accepted, Self::Completed)
        )
    }

    /// Check if terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Completed)
    }

    /// Lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Raised => "raised",
            Self::Accepted => "accept",
            Self::Rejected => "reject",
            Self::Completed => "complete",
        }
    }
}

impl fmt::Display for PurchaseOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PurchaseOrderStatus {
    type Err = EnterpriseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raised" | "raise" => Ok(Self::Raised),
            "accept" | "accepted" => Ok(Self::Accepted),
            "reject" | "rejected" => Ok(Self::Rejected),
            "complete" | "completed" => Ok(Self::Completed),
            "" | "nil" => Ok(Self::Nil),
            other => Err(EnterpriseError::InvalidStatus(other.to_string())),
        }
    }
}

/// Whitelist modification requested by a signer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WhitelistAction {
    /// No action.
    #[default]
    Nil,
    /// Add an address.
    Add,
    /// Remove an address.
    Remove,
}

impl WhitelistAction {
    /// True for `Add` and `Remove`.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Add | Self::Remove)
    }
}

impl fmt::Display for WhitelistAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Nil => "nil",
            Self::Add => "add",
            Self::Remove => "remove",
        };
        f.write_str(s)
    }
}

impl FromStr for WhitelistAction {
    type Err = EnterpriseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "add" => Ok(Self::Add),
            "remove" => Ok(Self::Remove),
            other => Err(EnterpriseError::InvalidAction(other.to_string())),
        }
    }
}
