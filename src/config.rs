//! Curve binding and compile-time constants.
//!
//! The pairing-friendly curve, its scalar width, and its digest function
//! are fixed compile-time choices, bound concretely to BN254: `ark-ec`'s
//! `Pairing` trait gives us G1/G2/GT generically, `ark-bn254` supplies the
//! concrete group, and `sha2::Sha256` supplies `H` (chosen because its
//! 32-byte digest matches `MB`, BN254's scalar width).

use ark_bn254::{Bn254, Fq, Fr, G1Affine, G1Projective, G2Affine, G2Projective};
use ark_ec::PrimeGroup;

/// Curve-fixed scalar/base-field byte width. BN254's scalar field order and
/// base field modulus are both ~254 bits, so a single width serves scalar,
/// G1-coordinate, and G2-limb encodings.
pub const MB: usize = 32;

/// Minimum accepted seed length for [`crate::engine::Engine::seed`].
pub const MIN_SEED_LEN: usize = 128;

pub type ScalarField = Fr;
pub type BaseField = Fq;
pub type G1 = G1Projective;
pub type G1Aff = G1Affine;
pub type G2 = G2Projective;
pub type G2Aff = G2Affine;
pub type Curve = Bn254;

pub const CURVE_NAME: &str = "BN254";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn g1_generator() -> G1 {
    G1::generator()
}

pub fn g2_generator() -> G2 {
    G2::generator()
}

/// `H`, the transcript/message digest. Digest length matches the curve's
/// scalar encoding width.
pub fn hash_to_mb(data: &[u8]) -> [u8; MB] {
    use sha2::{Digest, Sha256};
    let digest = Sha256::digest(data);
    let mut out = [0u8; MB];
    out.copy_from_slice(&digest);
    out
}
