//! Join sub-protocol: user-side start, issuer-side processing, user-side
//! finish.

use crate::codec::{read_g1, read_scalar, write_g1, write_scalar, Reader, Writer};
use crate::config::{g1_generator, hash_to_mb, ScalarField, G1, MB};
use crate::credentials::{read_credentials, write_credentials, UserCredentials};
use crate::error::GsError;
use crate::keys::{GroupPrivateKey, GroupPublicKey};
use crate::nizk::chaum_pedersen::{self, ChaumPedersenProof};
use crate::nizk::schnorr::{self, SchnorrProof};
use crate::pairing_check;
use ark_std::rand::{RngCore, SeedableRng};
use ark_std::UniformRand;
use rand_chacha::ChaCha20Rng;
use zeroize::Zeroize;

const LOG_TARGET: &str = "group_sign::join";

/// User's commitment to `gsk`, proving knowledge of it, bound to an
/// externally supplied challenge.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct JoinMessage {
    #[serde(with = "crate::serde_support::point")]
    pub q: G1,
    pub proof: SchnorrProof,
}

/// Issuer's response: freshly issued credentials plus a Chaum–Pedersen
/// proof that the same `r·y` exponent was used against `g1→Q` and `B→D`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct JoinResponse {
    pub credentials: UserCredentials,
    pub proof: ChaumPedersenProof,
}

/// Wire width of [`JoinMessage`]: `Q‖c‖s`.
pub const JOIN_MESSAGE_LEN: usize = (2 * MB + 1) + 2 * MB;
/// Wire width of [`JoinResponse`]: `UserCredentials‖c‖s`.
pub const JOIN_RESPONSE_LEN: usize = 4 * (2 * MB + 1) + 2 * MB;

/// User side, start: samples `gsk`, commits `Q = g1^gsk`, proves knowledge
/// of it bound to `H(challenge)`.
pub fn start_join<R: RngCore>(rng: &mut R, challenge: &[u8]) -> (ScalarField, JoinMessage) {
    let gsk = ScalarField::rand(rng);
    let g1 = g1_generator();
    let q = g1 * gsk;
    let h = hash_to_mb(challenge);
    let proof = schnorr::prove(rng, &g1, &q, &gsk, Some(&h));
    tracing::debug!(target: LOG_TARGET, "join started");
    (gsk, JoinMessage { q, proof })
}

/// Issuer side: verifies the user's knowledge proof, then issues
/// credentials over the committed `Q`.
pub fn process_join<R: RngCore>(
    rng: &mut R,
    issuer: &GroupPrivateKey,
    message: &JoinMessage,
    challenge: &[u8],
) -> Result<JoinResponse, GsError> {
    let g1 = g1_generator();
    let h = hash_to_mb(challenge);
    if !schnorr::verify(&g1, &message.q, &message.proof, Some(&h)) {
        tracing::warn!(target: LOG_TARGET, "join message failed knowledge proof");
        return Err(GsError::InvalidJoinMessage);
    }

    let r = ScalarField::rand(rng);
    let a = g1 * r;
    let b = a * issuer.y;
    let d = message.q * (r * issuer.y);
    let c = (a + d) * issuer.x;

    let proof = chaum_pedersen::prove(rng, None, &g1, &message.q, &b, &d, &(r * issuer.y));
    tracing::debug!(target: LOG_TARGET, "join processed, credentials issued");
    Ok(JoinResponse {
        credentials: UserCredentials { a, b, c, d },
        proof,
    })
}

/// User side, finish: re-derives `Q` locally, verifies the issuer's proof
/// and the credential relation, and stores `(A,B,C,D)` on success. Masks
/// for the credential check are drawn from a CSPRNG seeded by `gsk` itself,
/// so verification is deterministic given the secret, trading forward
/// secrecy of these masks for that determinism.
pub fn finish_join(
    public: &GroupPublicKey,
    gsk: &ScalarField,
    response: &JoinResponse,
) -> Result<UserCredentials, GsError> {
    let g1 = g1_generator();
    let g2 = crate::config::g2_generator();
    let q = g1 * gsk;

    let JoinResponse {
        credentials: UserCredentials { a, b, c, d },
        proof,
    } = response;

    if !chaum_pedersen::verify(None, &g1, &q, b, d, proof) {
        tracing::warn!(target: LOG_TARGET, "join response failed equality proof");
        return Err(GsError::InvalidJoinResponse);
    }

    let mut seed_material = [0u8; MB];
    write_scalar_into(gsk, &mut seed_material);
    let mut local_rng = ChaCha20Rng::from_seed(hash_to_mb(&seed_material));
    seed_material.zeroize();

    if !pairing_check::check(
        &mut local_rng,
        a,
        b,
        c,
        d,
        &public.x_point,
        &public.y_point,
        &g2,
    ) {
        tracing::warn!(target: LOG_TARGET, "join response failed credential relation check");
        return Err(GsError::InvalidJoinResponse);
    }

    tracing::debug!(target: LOG_TARGET, "join finished, credentials stored");
    Ok(UserCredentials {
        a: *a,
        b: *b,
        c: *c,
        d: *d,
    })
}

fn write_scalar_into(s: &ScalarField, out: &mut [u8; MB]) {
    let mut w = Writer::with_capacity(MB);
    write_scalar(&mut w, s).expect("MB-byte capacity fits one scalar");
    out.copy_from_slice(w.as_slice());
}

pub fn write_join_message(w: &mut Writer, m: &JoinMessage) -> Result<(), GsError> {
    write_g1(w, &m.q)?;
    write_scalar(w, &m.proof.c)?;
    write_scalar(w, &m.proof.s)?;
    Ok(())
}

pub fn read_join_message(r: &mut Reader) -> Result<JoinMessage, GsError> {
    let q = read_g1(r).map_err(|_| GsError::InvalidJoinMessage)?;
    let c = read_scalar(r)?;
    let s = read_scalar(r)?;
    Ok(JoinMessage {
        q,
        proof: SchnorrProof { c, s },
    })
}

pub fn write_join_response(w: &mut Writer, resp: &JoinResponse) -> Result<(), GsError> {
    write_credentials(w, &resp.credentials)?;
    write_scalar(w, &resp.proof.c)?;
    write_scalar(w, &resp.proof.s)?;
    Ok(())
}

pub fn read_join_response(r: &mut Reader) -> Result<JoinResponse, GsError> {
    let credentials = read_credentials(r).map_err(|_| GsError::InvalidJoinResponse)?;
    let c = read_scalar(r)?;
    let s = read_scalar(r)?;
    Ok(JoinResponse {
        credentials,
        proof: ChaumPedersenProof { c, s },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys;
    use ark_std::test_rng;

    #[test]
    fn honest_join_round_trip() {
        let mut rng = test_rng();
        let issuer = keys::setup(&mut rng);
        let challenge = b"nonce-0123456789";

        let (gsk, jm) = start_join(&mut rng, challenge);
        let jr = process_join(&mut rng, &issuer, &jm, challenge).unwrap();
        let creds = finish_join(&issuer.public, &gsk, &jr).unwrap();

        assert_eq!(creds, jr.credentials);
    }

    #[test]
    fn tampered_join_message_is_rejected() {
        let mut rng = test_rng();
        let issuer = keys::setup(&mut rng);
        let challenge = b"nonce";
        let (_gsk, mut jm) = start_join(&mut rng, challenge);
        jm.proof.s += ScalarField::from(1u64);
        assert!(process_join(&mut rng, &issuer, &jm, challenge).is_err());
    }

    #[test]
    fn wrong_challenge_at_issuer_is_rejected() {
        let mut rng = test_rng();
        let issuer = keys::setup(&mut rng);
        let (_gsk, jm) = start_join(&mut rng, b"nonce-a");
        assert!(process_join(&mut rng, &issuer, &jm, b"nonce-b").is_err());
    }

    #[test]
    fn join_message_wire_round_trip() {
        let mut rng = test_rng();
        let (_gsk, jm) = start_join(&mut rng, b"nonce");
        let mut w = Writer::with_capacity(JOIN_MESSAGE_LEN);
        write_join_message(&mut w, &jm).unwrap();
        let bytes = w.into_bytes();
        assert_eq!(bytes.len(), JOIN_MESSAGE_LEN);
        let mut r = Reader::new(&bytes);
        assert_eq!(read_join_message(&mut r).unwrap(), jm);
    }
}
