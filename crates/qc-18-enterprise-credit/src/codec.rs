//! Record encoding for the key-value store.

use crate::domain::errors::{EnterpriseError, Result};
use serde::{de::DeserializeOwned, Serialize};

/// Encode a record with bincode.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    bincode::serialize(value).map_err(|e| EnterpriseError::Codec(e.to_string()))
}

/// Decode a record with bincode.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    bincode::deserialize(bytes).map_err(|e| EnterpriseError::Codec(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AccountAddress, Coin, PurchaseOrder};

    #[test]
    fn test_purchase_order_survives_encoding() {
        let po = PurchaseOrder::new_raised(9, AccountAddress::from([7; 20]), Coin::new("nund", 42), 5);
        let bytes = encode(&po).unwrap();
        let back: PurchaseOrder = decode(&bytes).unwrap();
        assert_eq!(back, po);
    }

    #[test]
    fn test_garbage_is_codec_error() {
        let err = decode::<PurchaseOrder>(&[0xFF, 0x01]).unwrap_err();
        assert!(matches!(err, EnterpriseError::Codec(_)));
    }
}
