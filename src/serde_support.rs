//! Diagnostic (non-wire) `serde` support: hex encoding for curve points and
//! scalars.
//!
//! This is layered on top of the fixed-width codec in [`crate::codec`],
//! never instead of it. The wire format is what interop depends on. These
//! helpers exist so the public value types can derive
//! `Serialize`/`Deserialize` for logging, JSON test fixtures, and ad-hoc
//! debugging without hand-writing an envelope per type.

use ark_ec::CurveGroup;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use serde::de::Error as DeError;
use serde::ser::Error as SerError;
use serde::{Deserialize, Deserializer, Serializer};

fn to_hex<T: CanonicalSerialize>(value: &T) -> Result<String, ark_serialize::SerializationError> {
    let mut buf = Vec::new();
    value.serialize_compressed(&mut buf)?;
    Ok(hex::encode(buf))
}

fn from_hex<T: CanonicalDeserialize>(s: &str) -> Result<T, ark_serialize::SerializationError> {
    let bytes = hex::decode(s).map_err(|_| ark_serialize::SerializationError::InvalidData)?;
    T::deserialize_compressed(&bytes[..])
}

/// Serde helpers for curve points (`G1`/`G2`), as lowercase hex strings.
pub mod point {
    use super::*;

    pub fn serialize<C, S>(value: &C, serializer: S) -> Result<S::Ok, S::Error>
    where
        C: CurveGroup + CanonicalSerialize,
        S: Serializer,
    {
        let hex = to_hex(value).map_err(SerError::custom)?;
        serializer.serialize_str(&hex)
    }

    pub fn deserialize<'de, C, D>(deserializer: D) -> Result<C, D::Error>
    where
        C: CurveGroup + CanonicalDeserialize,
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        from_hex(&s).map_err(DeError::custom)
    }
}

/// Serde helpers for scalar/base-field elements, as lowercase hex strings.
pub mod field {
    use super::*;

    pub fn serialize<F, S>(value: &F, serializer: S) -> Result<S::Ok, S::Error>
    where
        F: CanonicalSerialize,
        S: Serializer,
    {
        let hex = to_hex(value).map_err(SerError::custom)?;
        serializer.serialize_str(&hex)
    }

    pub fn deserialize<'de, F, D>(deserializer: D) -> Result<F, D::Error>
    where
        F: CanonicalDeserialize,
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        from_hex(&s).map_err(DeError::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys;
    use ark_std::test_rng;

    #[derive(serde::Serialize, serde::Deserialize)]
    struct Wrapper {
        #[serde(with = "field")]
        s: crate::config::ScalarField,
    }

    #[test]
    fn field_hex_round_trips() {
        use ark_std::UniformRand;
        let mut rng = test_rng();
        let s = crate::config::ScalarField::rand(&mut rng);
        let w = Wrapper { s };
        let json = serde_json::to_string(&w).unwrap();
        let back: Wrapper = serde_json::from_str(&json).unwrap();
        assert_eq!(back.s, s);
    }

    #[test]
    fn group_public_key_json_round_trips() {
        let mut rng = test_rng();
        let sk = keys::setup(&mut rng);
        let json = serde_json::to_string(&sk.public).unwrap();
        let back: keys::GroupPublicKey = serde_json::from_str(&json).unwrap();
        assert_eq!(sk.public, back);
    }
}
