//! SM2 scalar field elements.

use super::macros::impl_field_element;
use crate::{FieldBytes, Sm2, ORDER_HEX, U256};
use core::{
    fmt::{self, Debug},
    ops::{Shr, ShrAssign},
};
use elliptic_curve::{
    bigint::{
        impl_modulus,
        modular::constant_mod::Residue,
        Limb,
    },
    ff::PrimeField,
    ops::{Invert, Reduce},
    scalar::{FromUintUnchecked, IsHigh},
    subtle::{
        Choice, ConditionallySelectable, ConstantTimeEq, ConstantTimeGreater, CtOption,
    },
    Curve as _, Error, FieldBytesEncoding, Result, ScalarPrimitive,
};

/// Scalars are elements in the finite field modulo `n`.
///
/// # Trait impls
///
/// Much of the important functionality of scalars is provided by traits from
/// the [`ff`](https://docs.rs/ff/) crate, which is re-exported as
/// `sm2dsa::elliptic_curve::ff`:
///
/// - [`Field`](https://docs.rs/ff/latest/ff/trait.Field.html) -
///   represents elements of finite fields and provides:
///   - [`Field::random`](https://docs.rs/ff/latest/ff/trait.Field.html#tymethod.random) -
///     generate a random scalar
///   - `double`, `square`, and `invert` operations
///   - Bounds for `Add`, `Sub`, `Mul`, and `Neg` (as well as `*Assign` equivalents)
///   - Bounds for [`ConditionallySelectable`] from the `subtle` crate
/// - [`PrimeField`](https://docs.rs/ff/latest/ff/trait.PrimeField.html) -
///   represents elements of prime fields and provides:
///   - `from_repr`/`to_repr` for converting field elements from/to big integers.
///
/// Please see the documentation for the relevant traits for more information.
#[derive(Clone, Copy, PartialOrd, Ord)]
pub struct Scalar(U256);

impl_field_element!(Scalar, FieldBytes, U256, ScalarParams, ORDER_HEX);

impl Scalar {
    /// Right shifts the scalar.
    ///
    /// Note: not constant-time with respect to the `shift` parameter.
    pub const fn shr_vartime(&self, shift: usize) -> Scalar {
        Self(self.0.shr_vartime(shift))
    }
}

impl AsRef<Scalar> for Scalar {
    fn as_ref(&self) -> &Scalar {
        self
    }
}

impl Debug for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Scalar(0x{:X})", &self.0)
    }
}

impl FromUintUnchecked for Scalar {
    type Uint = U256;

    fn from_uint_unchecked(uint: Self::Uint) -> Self {
        Self::from_uint_unchecked(uint)
    }
}

impl Invert for Scalar {
    type Output = CtOption<Self>;

    fn invert(&self) -> CtOption<Self> {
        self.invert()
    }
}

impl IsHigh for Scalar {
    fn is_high(&self) -> Choice {
        const MODULUS_SHR1: U256 = Sm2::ORDER.shr_vartime(1);
        self.to_canonical().ct_gt(&MODULUS_SHR1)
    }
}

impl Shr<usize> for Scalar {
    type Output = Self;

    fn shr(self, rhs: usize) -> Self::Output {
        self.shr_vartime(rhs)
    }
}

impl Shr<usize> for &Scalar {
    type Output = Scalar;

    fn shr(self, rhs: usize) -> Self::Output {
        self.shr_vartime(rhs)
    }
}

impl ShrAssign<usize> for Scalar {
    fn shr_assign(&mut self, rhs: usize) {
        *self = *self >> rhs;
    }
}

impl PrimeField for Scalar {
    type Repr = FieldBytes;

    const MODULUS: &'static str = ORDER_HEX;
    const NUM_BITS: u32 = 256;
    const CAPACITY: u32 = 255;
    const TWO_INV: Self = Self(Self::MODULUS_UINT.wrapping_add(&U256::ONE).shr_vartime(1));
    const MULTIPLICATIVE_GENERATOR: Self = Self::from_u64(3);
    const S: u32 = 1;
    const ROOT_OF_UNITY: Self = Self(Self::MODULUS_UINT.wrapping_sub(&U256::ONE));
    const ROOT_OF_UNITY_INV: Self = Self::ROOT_OF_UNITY;
    const DELTA: Self = Self::from_u64(9);

    #[inline]
    fn from_repr(bytes: FieldBytes) -> CtOption<Self> {
        Self::from_bytes(&bytes)
    }

    #[inline]
    fn to_repr(&self) -> FieldBytes {
        self.to_bytes()
    }

    #[inline]
    fn is_odd(&self) -> Choice {
        self.is_odd()
    }
}

impl Reduce<U256> for Scalar {
    type Bytes = FieldBytes;

    fn reduce(w: U256) -> Self {
        let (r, underflow) = w.sbb(&Sm2::ORDER, Limb::ZERO);
        let underflow = Choice::from((underflow.0 >> (Limb::BITS - 1)) as u8);
        Self::from_uint_unchecked(U256::conditional_select(&w, &r, !underflow))
    }

    #[inline]
    fn reduce_bytes(bytes: &FieldBytes) -> Self {
        let w = <U256 as FieldBytesEncoding<Sm2>>::decode_field_bytes(bytes);
        Self::reduce(w)
    }
}

impl From<ScalarPrimitive<Sm2>> for Scalar {
    fn from(w: ScalarPrimitive<Sm2>) -> Self {
        Scalar::from(&w)
    }
}

impl From<&ScalarPrimitive<Sm2>> for Scalar {
    fn from(w: &ScalarPrimitive<Sm2>) -> Scalar {
        Scalar::from_uint_unchecked(*w.as_uint())
    }
}

impl From<Scalar> for ScalarPrimitive<Sm2> {
    fn from(scalar: Scalar) -> ScalarPrimitive<Sm2> {
        ScalarPrimitive::from(&scalar)
    }
}

impl From<&Scalar> for ScalarPrimitive<Sm2> {
    fn from(scalar: &Scalar) -> ScalarPrimitive<Sm2> {
        ScalarPrimitive::new(scalar.into()).unwrap()
    }
}

impl From<Scalar> for FieldBytes {
    fn from(scalar: Scalar) -> Self {
        scalar.to_repr()
    }
}

impl From<&Scalar> for FieldBytes {
    fn from(scalar: &Scalar) -> Self {
        scalar.to_repr()
    }
}

impl From<Scalar> for U256 {
    fn from(scalar: Scalar) -> U256 {
        U256::from(&scalar)
    }
}

impl From<&Scalar> for U256 {
    fn from(scalar: &Scalar) -> U256 {
        scalar.to_canonical()
    }
}

impl TryFrom<U256> for Scalar {
    type Error = Error;

    fn try_from(w: U256) -> Result<Self> {
        Option::from(Self::from_uint(w)).ok_or(Error)
    }
}

#[cfg(test)]
mod tests {
    use super::{Scalar, U256};
    use crate::Sm2;
    use elliptic_curve::{ff::PrimeField, ops::Reduce, scalar::IsHigh, Curve};

    #[test]
    fn two_inv_constant() {
        assert_eq!(Scalar::from_u64(2) * Scalar::TWO_INV, Scalar::ONE);
    }

    #[test]
    fn multiplicative_generator_constants() {
        // 3 is a quadratic non-residue mod `n`, so raising it to
        // `(n - 1) / 2` yields the primitive 2nd root of unity, -1.
        let t = Sm2::ORDER.wrapping_sub(&U256::ONE).shr_vartime(1);
        assert_eq!(
            Scalar::MULTIPLICATIVE_GENERATOR.pow(&t),
            Scalar::ROOT_OF_UNITY
        );
        assert_eq!(
            Scalar::MULTIPLICATIVE_GENERATOR.square(),
            Scalar::DELTA
        );
        assert_eq!(Scalar::ROOT_OF_UNITY * Scalar::ROOT_OF_UNITY_INV, Scalar::ONE);
    }

    #[test]
    fn invert() {
        let a = Scalar::from_u64(7);
        let inv = a.invert().unwrap();
        assert_eq!(a * inv, Scalar::ONE);
        assert!(bool::from(Scalar::ZERO.invert().is_none()));
    }

    #[test]
    fn reduce_wraps_order() {
        assert_eq!(<Scalar as Reduce<U256>>::reduce(Sm2::ORDER), Scalar::ZERO);
        assert_eq!(
            <Scalar as Reduce<U256>>::reduce(Sm2::ORDER.wrapping_add(&U256::from_u64(5))),
            Scalar::from_u64(5)
        );
        assert_eq!(
            <Scalar as Reduce<U256>>::reduce(U256::from_u64(42)),
            Scalar::from_u64(42)
        );
    }

    #[test]
    fn from_bytes_rejects_order() {
        let order = Scalar::from_hex(super::ORDER_HEX);
        assert!(bool::from(Scalar::from_bytes(&order.to_bytes()).is_none()));
    }

    #[test]
    fn is_high() {
        assert!(!bool::from(Scalar::ONE.is_high()));
        assert!(bool::from(
            (Scalar::ZERO - Scalar::ONE).is_high()
        ));
    }
}
