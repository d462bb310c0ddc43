//! Randomized triple-pairing credential check.
//!
//! `B = A^y` and `C = (A+D)^x` are each single pairing equations; folding
//! both into one randomized linear combination lets the verifier spend a
//! single multi-pairing/final-exponentiation instead of two. The masks
//! `e1, e2` must be drawn fresh for every check. A constant mask would let
//! a forged credential satisfy the combined equation without satisfying
//! either factor individually.

use crate::config::{Curve, ScalarField, G1, G2};
use ark_ec::pairing::{Pairing, PairingOutput};
use ark_ec::CurveGroup;
use ark_std::rand::RngCore;
use ark_std::UniformRand;

const LOG_TARGET: &str = "group_sign::pairing_check";

/// Checks `e(A,Y)=e(B,g2) ∧ e(A+D,X)=e(C,g2)` via one randomized
/// multi-pairing product, requiring `A ≠ O`.
pub fn check<R: RngCore>(
    rng: &mut R,
    a: &G1,
    b: &G1,
    c: &G1,
    d: &G1,
    x_pub: &G2,
    y_pub: &G2,
    g2: &G2,
) -> bool {
    if a.into_affine().is_zero() {
        tracing::debug!(target: LOG_TARGET, "credential check rejected: A is the identity");
        return false;
    }

    let e1 = ScalarField::rand(rng);
    let e2 = ScalarField::rand(rng);

    let lhs_a = *a * e1;
    let lhs_mid = -(*b * e1) - (*c * e2);
    let lhs_c = (*a + *d) * e2;

    let g1_points = [
        lhs_a.into_affine(),
        lhs_mid.into_affine(),
        lhs_c.into_affine(),
    ];
    let g2_points = [*y_pub, *g2, *x_pub].map(|p| p.into_affine());

    let product: PairingOutput<Curve> = Curve::multi_pairing(g1_points, g2_points);
    let ok = product == PairingOutput::<Curve>::zero();
    if !ok {
        tracing::debug!(target: LOG_TARGET, "credential check failed");
    }
    ok
}
