//! Sign and verify.

use crate::codec::{read_g1, write_g1, Reader, Writer};
use crate::codec::{read_scalar, write_scalar};
use crate::config::{g2_generator, hash_to_mb, ScalarField, G1, MB};
use crate::credentials::UserPrivateKey;
use crate::error::GsError;
use crate::hash_to_curve::hash_to_g1;
use crate::keys::GroupPublicKey;
use crate::nizk::chaum_pedersen::{self, ChaumPedersenProof};
use crate::pairing_check;
use crate::transcript::message_digest;
use ark_ec::CurveGroup;
use ark_std::rand::RngCore;
use ark_std::UniformRand;

const LOG_TARGET: &str = "group_sign::signature";

/// Randomized credentials, per-basename pseudonym, and the Chaum–Pedersen
/// proof tying them together.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Signature {
    #[serde(with = "crate::serde_support::point")]
    pub a: G1,
    #[serde(with = "crate::serde_support::point")]
    pub b: G1,
    #[serde(with = "crate::serde_support::point")]
    pub c: G1,
    #[serde(with = "crate::serde_support::point")]
    pub d: G1,
    #[serde(with = "crate::serde_support::point")]
    pub nym: G1,
    pub proof: ChaumPedersenProof,
}

/// Wire width of [`Signature`]: `A‖B‖C‖D‖NYM‖c‖s`.
pub const SIGNATURE_LEN: usize = 5 * (2 * MB + 1) + 2 * MB;
/// Wire width of a signature tag (pseudonym only): `NYM`.
pub const SIGNATURE_TAG_LEN: usize = 2 * MB + 1;

fn basename_point(bsn: &[u8]) -> G1 {
    hash_to_g1(&hash_to_mb(bsn))
}

/// Produces a signature binding `msg` under pseudonymity domain `bsn`.
pub fn sign<R: RngCore>(rng: &mut R, sk: &UserPrivateKey, msg: &[u8], bsn: &[u8]) -> Signature {
    let r = ScalarField::rand(rng);
    let a = sk.credentials.a * r;
    let b = sk.credentials.b * r;
    let c = sk.credentials.c * r;
    let d = sk.credentials.d * r;

    let bsn_point = basename_point(bsn);
    let nym = bsn_point * sk.gsk;
    let h = message_digest(msg, bsn);

    let proof = chaum_pedersen::prove(rng, Some(&h), &b, &bsn_point, &d, &nym, &sk.gsk);
    tracing::debug!(target: LOG_TARGET, "signature produced");

    Signature {
        a,
        b,
        c,
        d,
        nym,
        proof,
    }
}

/// Verifies `sig` against `pk`, `msg`, `bsn`. The randomized masks used by
/// the triple-pairing credential check are drawn from `rng`.
pub fn verify<R: RngCore>(
    rng: &mut R,
    pk: &GroupPublicKey,
    msg: &[u8],
    bsn: &[u8],
    sig: &Signature,
) -> bool {
    if sig.a.into_affine().is_zero() || sig.b.into_affine().is_zero() {
        tracing::debug!(target: LOG_TARGET, "verification rejected: A or B is the identity");
        return false;
    }

    let bsn_point = basename_point(bsn);
    let h = message_digest(msg, bsn);

    if !chaum_pedersen::verify(Some(&h), &sig.b, &bsn_point, &sig.d, &sig.nym, &sig.proof) {
        tracing::debug!(target: LOG_TARGET, "verification rejected: pseudonym proof failed");
        return false;
    }

    let g2 = g2_generator();
    let ok = pairing_check::check(
        rng,
        &sig.a,
        &sig.b,
        &sig.c,
        &sig.d,
        &pk.x_point,
        &pk.y_point,
        &g2,
    );
    if !ok {
        tracing::debug!(target: LOG_TARGET, "verification rejected: credential relation failed");
    }
    ok
}

pub fn write_signature(w: &mut Writer, sig: &Signature) -> Result<(), GsError> {
    write_g1(w, &sig.a)?;
    write_g1(w, &sig.b)?;
    write_g1(w, &sig.c)?;
    write_g1(w, &sig.d)?;
    write_g1(w, &sig.nym)?;
    write_scalar(w, &sig.proof.c)?;
    write_scalar(w, &sig.proof.s)?;
    Ok(())
}

pub fn read_signature(r: &mut Reader) -> Result<Signature, GsError> {
    let a = read_g1(r).map_err(|_| GsError::InvalidSignature)?;
    let b = read_g1(r).map_err(|_| GsError::InvalidSignature)?;
    let c = read_g1(r).map_err(|_| GsError::InvalidSignature)?;
    let d = read_g1(r).map_err(|_| GsError::InvalidSignature)?;
    let nym = read_g1(r).map_err(|_| GsError::InvalidSignature)?;
    let pc = read_scalar(r)?;
    let ps = read_scalar(r)?;
    Ok(Signature {
        a,
        b,
        c,
        d,
        nym,
        proof: ChaumPedersenProof { c: pc, s: ps },
    })
}

/// Extracts the pseudonym tag (`NYM` alone) for comparison without a full
/// signature.
pub fn write_tag(w: &mut Writer, sig: &Signature) -> Result<(), GsError> {
    write_g1(w, &sig.nym)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{join, keys};
    use ark_std::test_rng;

    fn enroll(rng: &mut impl RngCore) -> (keys::GroupPrivateKey, UserPrivateKey) {
        let issuer = keys::setup(rng);
        let challenge = b"nonce-0123456789";
        let (gsk, jm) = join::start_join(rng, challenge);
        let jr = join::process_join(rng, &issuer, &jm, challenge).unwrap();
        let creds = join::finish_join(&issuer.public, &gsk, &jr).unwrap();
        (issuer, UserPrivateKey { credentials: creds, gsk })
    }

    #[test]
    fn honest_signature_verifies() {
        let mut rng = test_rng();
        let (issuer, sk) = enroll(&mut rng);
        let sig = sign(&mut rng, &sk, b"hello", b"bsn1");
        assert!(verify(&mut rng, &issuer.public, b"hello", b"bsn1", &sig));
    }

    #[test]
    fn wrong_message_is_rejected() {
        let mut rng = test_rng();
        let (issuer, sk) = enroll(&mut rng);
        let sig = sign(&mut rng, &sk, b"hello", b"bsn1");
        assert!(!verify(&mut rng, &issuer.public, b"hellp", b"bsn1", &sig));
    }

    #[test]
    fn wrong_basename_is_rejected() {
        let mut rng = test_rng();
        let (issuer, sk) = enroll(&mut rng);
        let sig = sign(&mut rng, &sk, b"hello", b"bsn1");
        assert!(!verify(&mut rng, &issuer.public, b"hello", b"bsn2", &sig));
    }

    #[test]
    fn pseudonym_is_linkable_across_messages_same_basename() {
        let mut rng = test_rng();
        let (_issuer, sk) = enroll(&mut rng);
        let sig1 = sign(&mut rng, &sk, b"msg-one", b"bsn1");
        let sig2 = sign(&mut rng, &sk, b"msg-two", b"bsn1");
        assert_eq!(sig1.nym, sig2.nym);
    }

    #[test]
    fn pseudonym_differs_across_basenames() {
        let mut rng = test_rng();
        let (_issuer, sk) = enroll(&mut rng);
        let sig1 = sign(&mut rng, &sk, b"msg", b"bsn1");
        let sig2 = sign(&mut rng, &sk, b"msg", b"bsn2");
        assert_ne!(sig1.nym, sig2.nym);
    }

    #[test]
    fn wire_round_trip() {
        let mut rng = test_rng();
        let (_issuer, sk) = enroll(&mut rng);
        let sig = sign(&mut rng, &sk, b"hello", b"bsn1");
        let mut w = Writer::with_capacity(SIGNATURE_LEN);
        write_signature(&mut w, &sig).unwrap();
        let bytes = w.into_bytes();
        assert_eq!(bytes.len(), SIGNATURE_LEN);
        let mut r = Reader::new(&bytes);
        assert_eq!(read_signature(&mut r).unwrap(), sig);
    }
}
