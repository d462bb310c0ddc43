//! Legacy hash-to-G1.
//!
//! Interprets an `MB`-byte digest as a big-endian field element, then walks
//! candidate x-coordinates upward until one lands on the curve and survives
//! cofactor clearing. This exact walk, not a modern constant-time
//! hash-to-curve, is part of the wire contract: a signature's pseudonym
//! depends on reproducing it bit-for-bit.

use crate::config::{BaseField, G1Aff, G1, MB};
use ark_ec::AffineRepr;
use ark_ff::{Field, PrimeField};

const LOG_TARGET: &str = "group_sign::hash_to_curve";

/// Maps an `MB`-byte digest to a point in G1.
pub fn hash_to_g1(digest: &[u8; MB]) -> G1 {
    let mut x = BaseField::from_be_bytes_mod_order(digest);
    let mut attempts = 0u32;
    loop {
        if let Some(affine) = G1Aff::get_point_from_x_unchecked(x, false) {
            let cleared = affine.mul_by_cofactor_to_group();
            if !ark_ec::CurveGroup::into_affine(cleared).is_zero() {
                tracing::debug!(target: LOG_TARGET, attempts, "hash_to_g1 converged");
                return cleared;
            }
        }
        x += BaseField::ONE;
        attempts += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::hash_to_mb;

    #[test]
    fn maps_to_nonzero_points() {
        let digest = hash_to_mb(b"bsn1");
        let p = hash_to_g1(&digest);
        assert!(!ark_ec::CurveGroup::into_affine(p).is_zero());
    }

    #[test]
    fn is_deterministic() {
        let digest = hash_to_mb(b"basename");
        assert_eq!(hash_to_g1(&digest), hash_to_g1(&digest));
    }

    #[test]
    fn distinct_inputs_map_to_distinct_points() {
        let d1 = hash_to_mb(b"bsn1");
        let d2 = hash_to_mb(b"bsn2");
        assert_ne!(hash_to_g1(&d1), hash_to_g1(&d2));
    }
}
