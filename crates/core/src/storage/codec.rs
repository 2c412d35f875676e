//! Record encoding for the durable store.
//!
//! Records are stored as self-describing JSON so they stay readable with
//! generic tools and tolerate added fields.

use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Encodes a record for storage.
pub fn encode<T: Serialize>(record: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(record)?)
}

/// Decodes a stored record.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    Ok(serde_json::from_slice(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::filter_types::metadata;
    use crate::vector::Vector;

    #[test]
    fn test_vector_layout() {
        let v = Vector::new("vec001", vec![0.5, 0.25], "text", metadata(&[("a", "b")]));
        let bytes = encode(&v).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        for field in ["id", "vector", "text", "metadata", "created_at", "updated_at"] {
            assert!(json.get(field).is_some(), "missing field {field}");
        }
        let back: Vector = decode(&bytes).unwrap();
        assert_eq!(back, v);
    }

    #[test]
    fn test_decode_garbage_is_internal() {
        let err = decode::<Vector>(b"not json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }
}
