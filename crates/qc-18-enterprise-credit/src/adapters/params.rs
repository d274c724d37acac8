use crate::domain::{EnterpriseParams, Result};
use crate::ports::ParamSource;
use parking_lot::RwLock;
use tracing::info;

/// Updatable parameter store. Writes are validated before they land.
pub struct InMemoryParamSource {
    params: RwLock<EnterpriseParams>,
}

impl InMemoryParamSource {
    /// Create a source holding validated `params`.
    pub fn new(params: EnterpriseParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params: RwLock::new(params),
        })
    }
}

impl ParamSource for InMemoryParamSource {
    fn params(&self) -> EnterpriseParams {
        self.params.read().clone()
    }

    fn set_params(&self, params: EnterpriseParams) -> Result<()> {
        params.validate()?;
        info!(
            denom = %params.denom,
            min_accepts = params.min_accepts,
            signers = params.signers.len(),
            "Enterprise params updated"
        );
        *self.params.write() = params;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_params_rejected_on_write() {
        let source = InMemoryParamSource::new(EnterpriseParams::default()).unwrap();
        let mut bad = EnterpriseParams::default();
        bad.min_accepts = 5;
        assert!(source.set_params(bad).is_err());
        assert_eq!(source.params(), EnterpriseParams::default());
    }

    #[test]
    fn test_invalid_params_rejected_on_create() {
        let mut bad = EnterpriseParams::default();
        bad.signers.clear();
        assert!(InMemoryParamSource::new(bad).is_err());
    }
}
