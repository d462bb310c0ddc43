//! Fiat–Shamir transcript shapes.
//!
//! Challenges are formed by concatenating the ordered argument tuple using
//! the codec encodings, hashing with `H`, and reducing the digest mod `q`.
//! There are no length prefixes and no domain separators: the position of a
//! field in the tuple is its only tag. This is why these builders take their
//! arguments positionally instead of going through a generic/tagged
//! transcript type.

use crate::codec::{write_g1, write_g2, write_scalar, Writer};
use crate::config::{hash_to_mb, ScalarField, G1, G2, MB};
use ark_ff::PrimeField;

const LOG_TARGET: &str = "group_sign::transcript";

fn finish(w: Writer) -> ScalarField {
    let bytes = w.into_bytes();
    let digest = hash_to_mb(&bytes);
    let c = ScalarField::from_be_bytes_mod_order(&digest);
    tracing::debug!(target: LOG_TARGET, bytes = bytes.len(), "transcript reduced to challenge");
    c
}

/// `chal_g2(Y, G, T)`: G2 Schnorr challenge.
pub fn chal_g2(y: &G2, g: &G2, t: &G2) -> ScalarField {
    let mut w = Writer::with_capacity(3 * 4 * MB);
    write_g2(&mut w, y).expect("capacity sized for three G2 points");
    write_g2(&mut w, g).expect("capacity sized for three G2 points");
    write_g2(&mut w, t).expect("capacity sized for three G2 points");
    finish(w)
}

/// `chal_g1(m?, Y, G, T)`: G1 Schnorr challenge. `m`, when present, is
/// exactly `MB` raw bytes prepended ahead of the point tuple.
pub fn chal_g1(m: Option<&[u8; MB]>, y: &G1, g: &G1, t: &G1) -> ScalarField {
    let mut w = Writer::with_capacity(MB + 3 * (2 * MB + 1));
    if let Some(m) = m {
        w.put_fixed(m).expect("capacity sized for optional message block");
    }
    write_g1(&mut w, y).expect("capacity sized for three G1 points");
    write_g1(&mut w, g).expect("capacity sized for three G1 points");
    write_g1(&mut w, t).expect("capacity sized for three G1 points");
    finish(w)
}

/// `chal_eq(m?, Y, Z, A, B, T1, T2)`: Chaum–Pedersen challenge over two G1
/// bases `A, B`.
#[allow(clippy::too_many_arguments)]
pub fn chal_eq(
    m: Option<&[u8; MB]>,
    y: &G1,
    z: &G1,
    a: &G1,
    b: &G1,
    t1: &G1,
    t2: &G1,
) -> ScalarField {
    let mut w = Writer::with_capacity(MB + 6 * (2 * MB + 1));
    if let Some(m) = m {
        w.put_fixed(m).expect("capacity sized for optional message block");
    }
    write_g1(&mut w, y).expect("capacity sized for six G1 points");
    write_g1(&mut w, z).expect("capacity sized for six G1 points");
    write_g1(&mut w, a).expect("capacity sized for six G1 points");
    write_g1(&mut w, b).expect("capacity sized for six G1 points");
    write_g1(&mut w, t1).expect("capacity sized for six G1 points");
    write_g1(&mut w, t2).expect("capacity sized for six G1 points");
    finish(w)
}

/// Hashes `msg` then `bsn` independently to `MB`-byte blocks, concatenates,
/// and rehashes. This is the message-binding digest used by sign/verify.
pub fn message_digest(msg: &[u8], bsn: &[u8]) -> [u8; MB] {
    let h_msg = hash_to_mb(msg);
    let h_bsn = hash_to_mb(bsn);
    let mut concat = [0u8; 2 * MB];
    concat[..MB].copy_from_slice(&h_msg);
    concat[MB..].copy_from_slice(&h_bsn);
    hash_to_mb(&concat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{g1_generator, g2_generator};
    use ark_std::{test_rng, UniformRand};

    #[test]
    fn chal_g2_is_deterministic() {
        let mut rng = test_rng();
        let y = g2_generator() * ScalarField::rand(&mut rng);
        let g = g2_generator();
        let t = g2_generator() * ScalarField::rand(&mut rng);
        assert_eq!(chal_g2(&y, &g, &t), chal_g2(&y, &g, &t));
    }

    #[test]
    fn chal_g1_message_changes_challenge() {
        let mut rng = test_rng();
        let y = g1_generator() * ScalarField::rand(&mut rng);
        let g = g1_generator();
        let t = g1_generator() * ScalarField::rand(&mut rng);
        let m1 = hash_to_mb(b"one");
        let m2 = hash_to_mb(b"two");
        assert_ne!(
            chal_g1(Some(&m1), &y, &g, &t),
            chal_g1(Some(&m2), &y, &g, &t)
        );
        assert_ne!(chal_g1(None, &y, &g, &t), chal_g1(Some(&m1), &y, &g, &t));
    }

    #[test]
    fn chal_eq_depends_on_bases() {
        let mut rng = test_rng();
        let y = g1_generator() * ScalarField::rand(&mut rng);
        let z = g1_generator() * ScalarField::rand(&mut rng);
        let a = g1_generator();
        let b = g1_generator() * ScalarField::rand(&mut rng);
        let t1 = g1_generator() * ScalarField::rand(&mut rng);
        let t2 = g1_generator() * ScalarField::rand(&mut rng);
        let c1 = chal_eq(None, &y, &z, &a, &b, &t1, &t2);
        let c2 = chal_eq(None, &y, &z, &b, &a, &t1, &t2);
        assert_ne!(c1, c2);
    }

    #[test]
    fn message_digest_binds_both_inputs() {
        let d1 = message_digest(b"hello", b"bsn1");
        let d2 = message_digest(b"hellp", b"bsn1");
        let d3 = message_digest(b"hello", b"bsn2");
        assert_ne!(d1, d2);
        assert_ne!(d1, d3);
    }
}
