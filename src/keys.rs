//! Issuer key generation and validation.

use crate::codec::{read_g2, read_scalar, write_g2, write_scalar, Reader, Writer};
use crate::config::{g2_generator, ScalarField, G2, MB};
use crate::error::GsError;
use crate::nizk::schnorr::{self, SchnorrProof};
use ark_std::rand::RngCore;
use ark_std::UniformRand;
use zeroize::Zeroize;

const LOG_TARGET: &str = "group_sign::keys";

/// Issuer public key: `(X, Y)` plus Schnorr self-proofs that the issuer
/// knows the discrete logs of both against `g2`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GroupPublicKey {
    #[serde(with = "crate::serde_support::point")]
    pub x_point: G2,
    #[serde(with = "crate::serde_support::point")]
    pub y_point: G2,
    pub proof_x: SchnorrProof,
    pub proof_y: SchnorrProof,
}

/// Issuer secret key: the public key plus the two discrete logs `x, y`.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct GroupPrivateKey {
    pub public: GroupPublicKey,
    #[serde(with = "crate::serde_support::field")]
    pub x: ScalarField,
    #[serde(with = "crate::serde_support::field")]
    pub y: ScalarField,
}

impl Drop for GroupPrivateKey {
    fn drop(&mut self) {
        self.x.zeroize();
        self.y.zeroize();
    }
}

/// Wire width of an encoded [`GroupPublicKey`]: `X‖Y‖cx‖sx‖cy‖sy`. Two G2
/// points at `4·MB` each plus four scalars at `MB` each (see DESIGN.md for
/// why this is `12·MB` rather than the `8·MB` shorthand).
pub const GROUP_PUBLIC_KEY_LEN: usize = 2 * (4 * MB) + 4 * MB;
/// Wire width of an encoded [`GroupPrivateKey`]: public key plus `x‖y`.
pub const GROUP_PRIVATE_KEY_LEN: usize = GROUP_PUBLIC_KEY_LEN + 2 * MB;

/// Samples `x, y` and proves knowledge of both against `g2`.
pub fn setup<R: RngCore>(rng: &mut R) -> GroupPrivateKey {
    let g2 = g2_generator();
    let x = ScalarField::rand(rng);
    let y = ScalarField::rand(rng);
    let x_point = g2 * x;
    let y_point = g2 * y;
    let proof_x = schnorr::prove(rng, &g2, &x_point, &x, None);
    let proof_y = schnorr::prove(rng, &g2, &y_point, &y, None);
    tracing::debug!(target: LOG_TARGET, "issuer keypair generated");
    GroupPrivateKey {
        public: GroupPublicKey {
            x_point,
            y_point,
            proof_x,
            proof_y,
        },
        x,
        y,
    }
}

/// Verifies both self-proofs on a public key loaded from untrusted bytes.
pub fn validate_public(pk: &GroupPublicKey) -> bool {
    let g2 = g2_generator();
    let ok_x = schnorr::verify(&g2, &pk.x_point, &pk.proof_x, None);
    let ok_y = schnorr::verify(&g2, &pk.y_point, &pk.proof_y, None);
    if !ok_x || !ok_y {
        tracing::warn!(target: LOG_TARGET, ok_x, ok_y, "group public key failed self-proof validation");
    }
    ok_x && ok_y
}

/// Public-key validation plus re-deriving `g2^x ?= X`, `g2^y ?= Y`.
pub fn validate_private(sk: &GroupPrivateKey) -> bool {
    if !validate_public(&sk.public) {
        return false;
    }
    let g2 = g2_generator();
    g2 * sk.x == sk.public.x_point && g2 * sk.y == sk.public.y_point
}

pub fn write_public(w: &mut Writer, pk: &GroupPublicKey) -> Result<(), GsError> {
    write_g2(w, &pk.x_point)?;
    write_g2(w, &pk.y_point)?;
    write_scalar(w, &pk.proof_x.c)?;
    write_scalar(w, &pk.proof_x.s)?;
    write_scalar(w, &pk.proof_y.c)?;
    write_scalar(w, &pk.proof_y.s)?;
    Ok(())
}

pub fn read_public(r: &mut Reader) -> Result<GroupPublicKey, GsError> {
    let x_point = read_g2(r).map_err(|_| GsError::InvalidGroupPublicKey)?;
    let y_point = read_g2(r).map_err(|_| GsError::InvalidGroupPublicKey)?;
    let cx = read_scalar(r)?;
    let sx = read_scalar(r)?;
    let cy = read_scalar(r)?;
    let sy = read_scalar(r)?;
    let pk = GroupPublicKey {
        x_point,
        y_point,
        proof_x: SchnorrProof { c: cx, s: sx },
        proof_y: SchnorrProof { c: cy, s: sy },
    };
    if !validate_public(&pk) {
        return Err(GsError::InvalidGroupPublicKey);
    }
    Ok(pk)
}

pub fn write_private(w: &mut Writer, sk: &GroupPrivateKey) -> Result<(), GsError> {
    write_public(w, &sk.public)?;
    write_scalar(w, &sk.x)?;
    write_scalar(w, &sk.y)?;
    Ok(())
}

pub fn read_private(r: &mut Reader) -> Result<GroupPrivateKey, GsError> {
    let public = read_public(r).map_err(|_| GsError::InvalidGroupPrivateKey)?;
    let x = read_scalar(r)?;
    let y = read_scalar(r)?;
    let sk = GroupPrivateKey { public, x, y };
    if !validate_private(&sk) {
        return Err(GsError::InvalidGroupPrivateKey);
    }
    Ok(sk)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_std::test_rng;

    #[test]
    fn setup_produces_a_self_verifying_key() {
        let mut rng = test_rng();
        let sk = setup(&mut rng);
        assert!(validate_private(&sk));
        assert!(validate_public(&sk.public));
    }

    #[test]
    fn wire_round_trip() {
        let mut rng = test_rng();
        let sk = setup(&mut rng);
        let mut w = Writer::with_capacity(GROUP_PRIVATE_KEY_LEN);
        write_private(&mut w, &sk).unwrap();
        let bytes = w.into_bytes();
        assert_eq!(bytes.len(), GROUP_PRIVATE_KEY_LEN);
        let mut r = Reader::new(&bytes);
        let sk2 = read_private(&mut r).unwrap();
        assert_eq!(sk.x, sk2.x);
        assert_eq!(sk.y, sk2.y);
    }

    #[test]
    fn tampered_public_key_is_rejected() {
        let mut rng = test_rng();
        let sk = setup(&mut rng);
        let mut w = Writer::with_capacity(GROUP_PUBLIC_KEY_LEN);
        write_public(&mut w, &sk.public).unwrap();
        let mut bytes = w.into_bytes();
        bytes[0] ^= 0xFF;
        let mut r = Reader::new(&bytes);
        assert!(read_public(&mut r).is_err());
    }
}
