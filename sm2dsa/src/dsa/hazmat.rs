//! Low-level SM2DSA primitives.
//!
//! # ⚠️ Warning: Hazmat!
//!
//! These functions operate on raw scalar values and skip the message/identity
//! hashing the high-level [`SigningKey`][`super::SigningKey`] and
//! [`VerifyingKey`][`super::VerifyingKey`] types perform. Using them
//! incorrectly can produce insecure signatures. We provide this module for
//! protocol implementations which genuinely need the primitive operations.
//!
//! The signing and verification equations are expressed over the
//! [`SignatureGroup`] abstraction so their retry/rejection structure can be
//! tested exhaustively over a small group with a scripted RNG.

use core::fmt::Debug;
use elliptic_curve::subtle::{Choice, ConstantTimeEq};
use signature::{rand_core::CryptoRngCore, Error, Result};

use crate::{FieldBytes, ProjectivePoint, Scalar, Sm2};
use elliptic_curve::{
    ops::{LinearCombination, MulByGenerator, Reduce},
    point::AffineCoordinates,
    Group,
};

/// Group of prime order with a distinguished generator, as required by the
/// SM2DSA signing and verification equations.
///
/// Scalars are integers modulo the group order `n`.
pub trait SignatureGroup {
    /// Scalar modulo the group order.
    type Scalar: Copy + ConstantTimeEq + Debug;

    /// Group element.
    type Element: Copy;

    /// Multiplicative identity scalar.
    const ONE: Self::Scalar;

    /// Sample a uniformly random scalar in `[1, n-1]`.
    ///
    /// Returns an error if the RNG fails.
    fn random_scalar(rng: &mut impl CryptoRngCore) -> Result<Self::Scalar>;

    /// Add two scalars modulo `n`.
    fn scalar_add(a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar;

    /// Subtract `b` from `a` modulo `n`.
    fn scalar_sub(a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar;

    /// Multiply two scalars modulo `n`.
    fn scalar_mul(a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar;

    /// Invert a scalar modulo `n`, if it is non-zero.
    fn scalar_invert(a: &Self::Scalar) -> Option<Self::Scalar>;

    /// Determine whether a scalar is zero.
    fn scalar_is_zero(a: &Self::Scalar) -> Choice;

    /// x-coordinate of `[k]G`, reduced into the scalar field.
    fn x_of_generator_mul(k: &Self::Scalar) -> Self::Scalar;

    /// x-coordinate of `[s]G + [t]P`, reduced into the scalar field.
    ///
    /// Returns an error if the resulting point is the additive identity,
    /// which has no affine x-coordinate.
    fn x_of_lincomb(
        s: &Self::Scalar,
        t: &Self::Scalar,
        p: &Self::Element,
    ) -> Result<Self::Scalar>;
}

/// Compute an SM2DSA signature `(r, s)` over the secret scalar `d` and the
/// message hash scalar `e`, drawing ephemeral scalars from `rng`.
///
/// Steps A3-A7 of [draft-shen-sm2-ecdsa § 5.2.1]: a fresh `k` is drawn on
/// every attempt and the attempt is discarded whenever the standard requires
/// a retry, so signing never fails due to an unlucky `k`.
///
/// [draft-shen-sm2-ecdsa § 5.2.1]: https://datatracker.ietf.org/doc/html/draft-shen-sm2-ecdsa-02#section-5.2.1
pub fn sign_scalars<G: SignatureGroup>(
    d: &G::Scalar,
    e: &G::Scalar,
    rng: &mut impl CryptoRngCore,
) -> Result<(G::Scalar, G::Scalar)> {
    // (1 + dA)⁻¹ does not depend on k. A zero denominator means the key
    // itself is unusable, which no amount of resampling fixes.
    let d_plus_1_inv = G::scalar_invert(&G::scalar_add(&G::ONE, d)).ok_or_else(Error::new)?;

    loop {
        // A3: pick a random number k in [1, n-1] via a random number generator
        let k = G::random_scalar(rng)?;

        // A4: calculate the elliptic curve point (x1, y1)=[k]G
        let x1 = G::x_of_generator_mul(&k);

        // A5: calculate r=(e+x1) modn, return to A3 if r=0 or r+k=n
        let r = G::scalar_add(e, &x1);
        if bool::from(G::scalar_is_zero(&r) | G::scalar_is_zero(&G::scalar_add(&r, &k))) {
            continue;
        }

        // A6: calculate s=((1+dA)^(-1)*(k-r*dA)) modn, return to A3 if s=0
        let s = G::scalar_mul(&d_plus_1_inv, &G::scalar_sub(&k, &G::scalar_mul(&r, d)));
        if bool::from(G::scalar_is_zero(&s)) {
            continue;
        }

        // A7: the digital signature of M is (r, s)
        return Ok((r, s));
    }
}

/// Verify an SM2DSA signature `(r, s)` over the message hash scalar `e`
/// against the public group element `p`.
///
/// Steps B1-B7 of [draft-shen-sm2-ecdsa § 5.3.1] (B3/B4, the message
/// hashing, happen in the caller).
///
/// [draft-shen-sm2-ecdsa § 5.3.1]: https://datatracker.ietf.org/doc/html/draft-shen-sm2-ecdsa-02#section-5.3.1
pub fn verify_scalars<G: SignatureGroup>(
    p: &G::Element,
    e: &G::Scalar,
    r: &G::Scalar,
    s: &G::Scalar,
) -> Result<()> {
    // B1: verify whether r' in [1,n-1], verification failed if not
    // B2: verify whether s' in [1,n-1], verification failed if not
    if bool::from(G::scalar_is_zero(r) | G::scalar_is_zero(s)) {
        return Err(Error::new());
    }

    // B5: calculate t = (r' + s') modn, verification failed if t=0
    let t = G::scalar_add(r, s);
    if bool::from(G::scalar_is_zero(&t)) {
        return Err(Error::new());
    }

    // B6: calculate the point (x1', y1')=[s']G + [t]PA
    let x1 = G::x_of_lincomb(s, &t, p)?;

    // B7: calculate R=(e'+x1') modn, verification pass if yes, otherwise failed
    if bool::from(G::scalar_add(e, &x1).ct_eq(r)) {
        Ok(())
    } else {
        Err(Error::new())
    }
}

impl SignatureGroup for Sm2 {
    type Scalar = Scalar;
    type Element = ProjectivePoint;

    const ONE: Scalar = Scalar::ONE;

    fn random_scalar(rng: &mut impl CryptoRngCore) -> Result<Scalar> {
        let mut bytes = FieldBytes::default();

        // Rejection sampling: candidates outside [1, n-1] are redrawn rather
        // than reduced, keeping the distribution uniform.
        loop {
            rng.try_fill_bytes(&mut bytes).map_err(|_| Error::new())?;

            if let Some(k) = Option::<Scalar>::from(Scalar::from_bytes(&bytes)) {
                if !bool::from(k.is_zero()) {
                    return Ok(k);
                }
            }
        }
    }

    fn scalar_add(a: &Scalar, b: &Scalar) -> Scalar {
        a + b
    }

    fn scalar_sub(a: &Scalar, b: &Scalar) -> Scalar {
        a - b
    }

    fn scalar_mul(a: &Scalar, b: &Scalar) -> Scalar {
        a * b
    }

    fn scalar_invert(a: &Scalar) -> Option<Scalar> {
        a.invert().into()
    }

    fn scalar_is_zero(a: &Scalar) -> Choice {
        a.is_zero()
    }

    fn x_of_generator_mul(k: &Scalar) -> Scalar {
        Scalar::reduce_bytes(&ProjectivePoint::mul_by_generator(k).to_affine().x())
    }

    fn x_of_lincomb(s: &Scalar, t: &Scalar, p: &ProjectivePoint) -> Result<Scalar> {
        let point = ProjectivePoint::lincomb(&ProjectivePoint::GENERATOR, s, p, t);

        // The identity has no affine x-coordinate.
        if bool::from(point.is_identity()) {
            return Err(Error::new());
        }

        Ok(Scalar::reduce_bytes(&point.to_affine().x()))
    }
}
