//! Schnorr proof of discrete-log knowledge, polymorphic over G1 and G2.
//!
//! The two instantiations differ only in which transcript shape produces
//! the challenge (`chal_g1` admits an optional message block, `chal_g2`
//! does not). That difference is captured by the [`SchnorrTranscript`]
//! trait, implemented once per concrete group.

use crate::config::{ScalarField, G1, G2, MB};
use crate::transcript::{chal_g1, chal_g2};
use ark_ec::CurveGroup;
use ark_std::rand::RngCore;
use ark_std::UniformRand;

/// `(c, s) ∈ Fq²`, the proof produced by [`prove`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SchnorrProof {
    #[serde(with = "crate::serde_support::field")]
    pub c: ScalarField,
    #[serde(with = "crate::serde_support::field")]
    pub s: ScalarField,
}

/// Binds a concrete group to the transcript shape used for its Schnorr
/// challenge. `G2` never carries a message (only `setup` uses it); `G1`
/// optionally does (join-start binds the challenge digest).
pub trait SchnorrTranscript: CurveGroup<ScalarField = ScalarField> {
    fn schnorr_challenge(m: Option<&[u8; MB]>, y: &Self, g: &Self, t: &Self) -> ScalarField;
}

impl SchnorrTranscript for G1 {
    fn schnorr_challenge(m: Option<&[u8; MB]>, y: &Self, g: &Self, t: &Self) -> ScalarField {
        chal_g1(m, y, g, t)
    }
}

impl SchnorrTranscript for G2 {
    fn schnorr_challenge(_m: Option<&[u8; MB]>, y: &Self, g: &Self, t: &Self) -> ScalarField {
        chal_g2(y, g, t)
    }
}

const LOG_TARGET: &str = "group_sign::nizk::schnorr";

/// Proves knowledge of `x` with `y = g^x`. `m`, when given, binds the proof
/// to an externally supplied `MB`-byte digest.
pub fn prove<G: SchnorrTranscript, R: RngCore>(
    rng: &mut R,
    g: &G,
    y: &G,
    x: &ScalarField,
    m: Option<&[u8; MB]>,
) -> SchnorrProof {
    let r = ScalarField::rand(rng);
    let t = *g * r;
    let c = G::schnorr_challenge(m, y, g, &t);
    let s = r + c * x;
    tracing::debug!(target: LOG_TARGET, "schnorr proof generated");
    SchnorrProof { c, s }
}

/// Verifies `proof` against `y = g^x` without knowing `x`: recomputes
/// `T' = g^s * y^(-c)` and checks the challenge re-derives `c`.
pub fn verify<G: SchnorrTranscript>(
    g: &G,
    y: &G,
    proof: &SchnorrProof,
    m: Option<&[u8; MB]>,
) -> bool {
    let t_prime = *g * proof.s - *y * proof.c;
    let c_prime = G::schnorr_challenge(m, y, g, &t_prime);
    let ok = c_prime == proof.c;
    if !ok {
        tracing::debug!(target: LOG_TARGET, "schnorr verification failed");
    }
    ok
}
