//! Configuration for the Enterprise Credit subsystem

use crate::domain::errors::{EnterpriseError, Result};
use crate::domain::params::EnterpriseParams;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Default page size for list queries.
pub const DEFAULT_PAGE_LIMIT: usize = 100;

/// Default module (custody account) name.
pub const DEFAULT_MODULE_NAME: &str = "enterprise";

/// Registry messages whose fees may be paid from locked credit by default.
pub const DEFAULT_FEE_GATED_MESSAGES: [&str; 6] = [
    "wrkchain/register_wrkchain",
    "wrkchain/record_wrkchain_hash",
    "wrkchain/purchase_wrkchain_storage",
    "beacon/register_beacon",
    "beacon/record_beacon_timestamp",
    "beacon/purchase_beacon_storage",
];

/// Enterprise credit configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnterpriseConfig {
    /// Initial module parameters
    pub params: EnterpriseParams,
    /// Message type URLs whose fees may be paid from locked credit
    pub fee_gated_messages: BTreeSet<String>,
    /// Page size when a request leaves `limit` at 0
    pub default_page_limit: usize,
    /// Name of the custody module account
    pub module_name: String,
    /// Run the conservation audit at the end of every block tick
    pub audit_after_tick: bool,
}

impl Default for EnterpriseConfig {
    fn default() -> Self {
        Self {
            params: EnterpriseParams::default(),
            fee_gated_messages: DEFAULT_FEE_GATED_MESSAGES
                .into_iter()
                .map(String::from)
                .collect(),
            default_page_limit: DEFAULT_PAGE_LIMIT,
            module_name: DEFAULT_MODULE_NAME.to_string(),
            audit_after_tick: false,
        }
    }
}

impl EnterpriseConfig {
    /// Parse and validate a JSON document. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| EnterpriseError::InvalidParams(format!("config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        self.params.validate()?;
        if self.default_page_limit == 0 {
            return Err(EnterpriseError::InvalidParams(
                "default page limit must be positive".to_string(),
            ));
        }
        if self.module_name.trim().is_empty() {
            return Err(EnterpriseError::InvalidParams(
                "module name cannot be blank".to_string(),
            ));
        }
        Ok(())
    }
}
