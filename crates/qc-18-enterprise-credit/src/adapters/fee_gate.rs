use crate::domain::FeeTx;
use crate::ports::FeeGatePolicy;
use std::collections::BTreeSet;

/// Gates a transaction if any of its messages has a configured type URL.
#[derive(Clone, Debug, Default)]
pub struct MessageTypeFeeGate {
    gated: BTreeSet<String>,
}

impl MessageTypeFeeGate {
    /// Create a gate over `type_urls`.
    pub fn new<I, S>(type_urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            gated: type_urls.into_iter().map(Into::into).collect(),
        }
    }
}

impl FeeGatePolicy for MessageTypeFeeGate {
    fn is_fee_gated(&self, tx: &FeeTx) -> bool {
        tx.messages.iter().any(|m| self.gated.contains(&m.type_url))
    }
}
