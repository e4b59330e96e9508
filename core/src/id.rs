//! Translation between wire-level todo ids and backend-native keys.
//!
//! # Design
//! Ids always travel as strings. Each backend gets an `IdCodec` that turns
//! the string into its key type and back. A token that cannot decode is an
//! `IdError`; stores report it as `StoreError::NotFound`, since no record can
//! carry an id the backend would never assign.

use thiserror::Error;

pub use mongodb::bson::oid::ObjectId;

/// Length of a hex-rendered ObjectId.
pub const OBJECT_ID_HEX_LEN: usize = 24;

/// The token is not a well-formed id for the backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed todo id `{token}`: expected {expected}")]
pub struct IdError {
    pub token: String,
    pub expected: &'static str,
}

/// Wire token <-> backend key conversion.
pub trait IdCodec {
    type Key;

    fn decode(token: &str) -> Result<Self::Key, IdError>;
    fn encode(key: &Self::Key) -> String;
}

/// SQLite row ids: base-10, non-negative, no sign or whitespace.
pub struct RowIdCodec;

impl IdCodec for RowIdCodec {
    type Key = i64;

    fn decode(token: &str) -> Result<i64, IdError> {
        let malformed = || IdError {
            token: token.to_string(),
            expected: "a non-negative base-10 integer",
        };
        if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        token.parse::<i64>().map_err(|_| malformed())
    }

    fn encode(key: &i64) -> String {
        key.to_string()
    }
}

/// MongoDB ObjectIds: exactly 24 hex characters.
pub struct ObjectIdCodec;

impl IdCodec for ObjectIdCodec {
    type Key = ObjectId;

    fn decode(token: &str) -> Result<ObjectId, IdError> {
        let malformed = || IdError {
            token: token.to_string(),
            expected: "24 hexadecimal characters",
        };
        if token.len() != OBJECT_ID_HEX_LEN || !token.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(malformed());
        }
        ObjectId::parse_str(token).map_err(|_| malformed())
    }

    fn encode(key: &ObjectId) -> String {
        key.to_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_id_accepts_plain_digits() {
        assert_eq!(RowIdCodec::decode("1"), Ok(1));
        assert_eq!(RowIdCodec::decode("0"), Ok(0));
        assert_eq!(RowIdCodec::decode("007"), Ok(7));
        assert_eq!(RowIdCodec::encode(&42), "42");
    }

    #[test]
    fn row_id_rejects_signs_blanks_and_overflow() {
        for token in ["", "-1", "+1", " 1", "1 ", "1.0", "abc", "99999999999999999999"] {
            let err = RowIdCodec::decode(token).unwrap_err();
            assert_eq!(err.token, token);
        }
    }

    #[test]
    fn object_id_roundtrips_lowercase_hex() {
        let id = ObjectId::new();
        let token = ObjectIdCodec::encode(&id);
        assert_eq!(token.len(), OBJECT_ID_HEX_LEN);
        assert_eq!(ObjectIdCodec::decode(&token), Ok(id));
    }

    #[test]
    fn object_id_accepts_uppercase_hex() {
        let id = ObjectIdCodec::decode("65A1F0C2B3D4E5F60718293A").unwrap();
        assert_eq!(ObjectIdCodec::encode(&id), "65a1f0c2b3d4e5f60718293a");
    }

    #[test]
    fn object_id_rejects_wrong_length_or_alphabet() {
        for token in [
            "",
            "not-24-hex",
            "65a1f0c2b3d4e5f60718293",
            "65a1f0c2b3d4e5f60718293a0",
            "65a1f0c2b3d4e5f60718293g",
        ] {
            assert!(ObjectIdCodec::decode(token).is_err(), "{token} should fail");
        }
    }
}
