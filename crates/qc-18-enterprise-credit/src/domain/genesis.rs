//! Genesis import/export state.

use super::entities::{LockedBalance, PurchaseOrder, SpentCounter};
use super::errors::{EnterpriseError, Result};
use super::params::EnterpriseParams;
use super::value_objects::{AccountAddress, Coin};
use serde::{Deserialize, Serialize};

/// Full module state at a chain boundary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisState {
    /// Module parameters.
    pub params: EnterpriseParams,
    /// Next purchase order id to allocate.
    pub starting_purchase_order_id: u64,
    /// All purchase orders, any status.
    pub purchase_orders: Vec<PurchaseOrder>,
    /// Per-account locked balances.
    pub locked: Vec<LockedBalance>,
    /// Global locked total.
    pub total_locked: Coin,
    /// Whitelisted purchasers.
    pub whitelist: Vec<AccountAddress>,
    /// Global spent total.
    pub total_spent: Coin,
    /// Per-account spent counters.
    pub spent: Vec<SpentCounter>,
}

impl Default for GenesisState {
    fn default() -> Self {
        let params = EnterpriseParams::default();
        let denom = params.denom.clone();
        Self {
            params,
            starting_purchase_order_id: 1,
            purchase_orders: Vec::new(),
            locked: Vec::new(),
            total_locked: Coin::zero(denom.clone()),
            whitelist: Vec::new(),
            total_spent: Coin::zero(denom),
            spent: Vec::new(),
        }
    }
}

impl GenesisState {
    /// Stateless validation of the genesis document.
    pub fn validate(&self) -> Result<()> {
        self.params.validate()?;

        if self.starting_purchase_order_id == 0 {
            return Err(invalid("starting purchase order id should be greater than 0"));
        }

        for po in &self.purchase_orders {
            if po.id == 0 {
                return Err(invalid("purchase order id missing"));
            }
            po.purchaser
                .validate()
                .map_err(|e| invalid(&format!("purchase order {} purchaser: {}", po.id, e)))?;
            if !po.amount.is_positive() {
                return Err(invalid(&format!(
                    "purchase order {} amount must be greater than 0",
                    po.id
                )));
            }
            if !po.status.is_valid() {
                return Err(invalid(&format!("purchase order {} has invalid status", po.id)));
            }
            for decision in &po.decisions {
                decision.signer.validate().map_err(|e| {
                    invalid(&format!("purchase order {} decision signer: {}", po.id, e))
                })?;
                if !decision.decision.is_decision() {
                    return Err(invalid(&format!(
                        "purchase order {} has invalid decision {}",
                        po.id, decision.decision
                    )));
                }
            }
        }

        for record in &self.locked {
            record
                .owner
                .validate()
                .map_err(|e| invalid(&format!("locked owner: {}", e)))?;
        }
        for record in &self.spent {
            record
                .owner
                .validate()
                .map_err(|e| invalid(&format!("spent owner: {}", e)))?;
        }
        for addr in &self.whitelist {
            addr.validate()
                .map_err(|e| invalid(&format!("whitelist entry: {}", e)))?;
        }
        Ok(())
    }
}

fn invalid(msg: &str) -> EnterpriseError {
    EnterpriseError::InvalidGenesis(msg.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::PurchaseOrderDecision;
    use crate::domain::value_objects::PurchaseOrderStatus;

    fn addr(b: u8) -> AccountAddress {
        AccountAddress::from([b; 20])
    }

    #[test]
    fn test_default_genesis_valid() {
        assert!(GenesisState::default().validate().is_ok());
    }

    #[test]
    fn test_zero_starting_id_rejected() {
        let gs = GenesisState {
            starting_purchase_order_id: 0,
            ..Default::default()
        };
        assert!(matches!(gs.validate(), Err(EnterpriseError::InvalidGenesis(_))));
    }

    #[test]
    fn test_zero_amount_order_rejected() {
        let mut gs = GenesisState::default();
        gs.purchase_orders
            .push(PurchaseOrder::new_raised(1, addr(1), Coin::new("nund", 0), 10));
        assert!(gs.validate().is_err());
    }

    #[test]
    fn test_bad_decision_rejected() {
        let mut gs = GenesisState::default();
        let mut po = PurchaseOrder::new_raised(1, addr(1), Coin::new("nund", 5), 10);
        po.decisions.push(PurchaseOrderDecision {
            signer: addr(2),
            decision: PurchaseOrderStatus::Completed,
            decision_time: 11,
        });
        gs.purchase_orders.push(po);
        assert!(gs.validate().is_err());
    }

    #[test]
    fn test_nil_status_rejected() {
        let mut gs = GenesisState::default();
        let mut po = PurchaseOrder::new_raised(1, addr(1), Coin::new("nund", 5), 10);
        po.status = PurchaseOrderStatus::Nil;
        gs.purchase_orders.push(po);
        assert!(gs.validate().is_err());
    }
}
