//! Field arithmetic modulo p = 0xfffffffeffffffffffffffffffffffffffffffff00000000ffffffffffffffff

use super::macros::impl_field_element;
use crate::{FieldBytes, U256};
use core::fmt::{self, Debug};
use elliptic_curve::{
    bigint::{
        impl_modulus,
        modular::constant_mod::Residue,
    },
    ff::PrimeField,
    subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption},
};

/// Constant representing the modulus serialized as hex.
const MODULUS_HEX: &str = "fffffffeffffffffffffffffffffffffffffffff00000000ffffffffffffffff";

/// Element in the SM2 finite field modulo
/// `p = 0xfffffffeffffffffffffffffffffffffffffffff00000000ffffffffffffffff`.
#[derive(Clone, Copy)]
pub struct FieldElement(U256);

impl_field_element!(FieldElement, FieldBytes, U256, FieldParams, MODULUS_HEX);

impl Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement(0x{:X})", &self.0)
    }
}

impl PrimeField for FieldElement {
    type Repr = FieldBytes;

    const MODULUS: &'static str = MODULUS_HEX;
    const NUM_BITS: u32 = 256;
    const CAPACITY: u32 = 255;
    const TWO_INV: Self = Self(Self::MODULUS_UINT.wrapping_add(&U256::ONE).shr_vartime(1));
    const MULTIPLICATIVE_GENERATOR: Self = Self::from_u64(13);
    const S: u32 = 1;
    const ROOT_OF_UNITY: Self = Self(Self::MODULUS_UINT.wrapping_sub(&U256::ONE));
    const ROOT_OF_UNITY_INV: Self = Self::ROOT_OF_UNITY;
    const DELTA: Self = Self::from_u64(169);

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
