//! Macro for generating modular arithmetic on canonically-encoded 256-bit
//! field elements.
//!
//! Multiplicative operations run through `crypto-bigint`'s constant-time
//! Montgomery residues; additive operations use the constant modular
//! arithmetic on [`U256`][`elliptic_curve::bigint::U256`] directly. Inversion
//! and square roots are computed by Fermat exponentiation, which is valid for
//! both SM2 moduli (`p ≡ 3 (mod 4)` and `n ≡ 3 (mod 4)`).

/// Implement field arithmetic for a tuple struct wrapping a canonical `U256`.
///
/// Expected to be invoked in a module which imports `U256`, `FieldBytes`,
/// the `Residue`/`impl_modulus!` items from `elliptic_curve::bigint` and the
/// `subtle`/`ff` traits used below.
macro_rules! impl_field_element {
    ($fe:tt, $bytes:ty, $uint:ty, $params:ident, $modulus_hex:expr) => {
        impl_modulus!($params, $uint, $modulus_hex);

        impl $fe {
            /// Zero element.
            pub const ZERO: Self = Self(<$uint>::ZERO);

            /// Multiplicative identity.
            pub const ONE: Self = Self(<$uint>::ONE);

            /// Modulus as a big integer.
            pub(crate) const MODULUS_UINT: $uint = <$uint>::from_be_hex($modulus_hex);

            /// Exponent used for Fermat inversion: the modulus minus two.
            const INVERT_EXP: $uint = Self::MODULUS_UINT.wrapping_sub(&<$uint>::from_u8(2));

            /// Exponent used for square roots: `(modulus + 1) / 4`.
            const SQRT_EXP: $uint = Self::MODULUS_UINT
                .wrapping_add(&<$uint>::ONE)
                .shr_vartime(2);

            /// Create an element from a canonical big endian hex string.
            ///
            /// Does not perform a range check; intended for hardcoded curve
            /// constants known to be in range.
            pub const fn from_hex(hex: &str) -> Self {
                Self(<$uint>::from_be_hex(hex))
            }

            /// Create an element from an unsigned integer known to be less
            /// than the modulus.
            pub const fn from_u64(w: u64) -> Self {
                Self(<$uint>::from_u64(w))
            }

            /// Decode from a canonical big endian byte representation.
            pub fn from_bytes(bytes: &$bytes) -> CtOption<Self> {
                Self::from_uint(<$uint as elliptic_curve::bigint::ArrayEncoding>::from_be_byte_array(*bytes))
            }

            /// Decode from a big integer, checking it is within range.
            pub fn from_uint(uint: $uint) -> CtOption<Self> {
                let is_some = elliptic_curve::subtle::ConstantTimeLess::ct_lt(
                    &uint,
                    &Self::MODULUS_UINT,
                );
                CtOption::new(Self(uint), is_some)
            }

            /// Convert from a big integer without checking it is in range.
            pub const fn from_uint_unchecked(uint: $uint) -> Self {
                Self(uint)
            }

            /// Encode to a canonical big endian byte representation.
            pub fn to_bytes(&self) -> $bytes {
                elliptic_curve::bigint::ArrayEncoding::to_be_byte_array(&self.0)
            }

            /// Canonical (fully reduced) big integer form.
            pub const fn to_canonical(&self) -> $uint {
                self.0
            }

            /// Determine if this element is zero.
            pub fn is_zero(&self) -> Choice {
                self.0.ct_eq(&<$uint>::ZERO)
            }

            /// Determine if this element is odd.
            pub fn is_odd(&self) -> Choice {
                elliptic_curve::bigint::Integer::is_odd(&self.0)
            }

            /// Add modulo the field modulus.
            pub const fn add(&self, rhs: &Self) -> Self {
                Self(self.0.add_mod(&rhs.0, &Self::MODULUS_UINT))
            }

            /// Double modulo the field modulus.
            pub const fn double(&self) -> Self {
                self.add(self)
            }

            /// Subtract modulo the field modulus.
            pub const fn sub(&self, rhs: &Self) -> Self {
                Self(self.0.sub_mod(&rhs.0, &Self::MODULUS_UINT))
            }

            /// Negate modulo the field modulus.
            pub const fn neg(&self) -> Self {
                Self(self.0.neg_mod(&Self::MODULUS_UINT))
            }

            /// Multiply modulo the field modulus.
            pub fn multiply(&self, rhs: &Self) -> Self {
                let lhs = Residue::<$params, { <$uint>::LIMBS }>::new(&self.0);
                let rhs = Residue::<$params, { <$uint>::LIMBS }>::new(&rhs.0);
                Self(lhs.mul(&rhs).retrieve())
            }

            /// Square modulo the field modulus.
            pub fn square(&self) -> Self {
                self.multiply(self)
            }

            /// Exponentiate by the given big integer, in constant time with
            /// respect to `self`.
            pub fn pow(&self, exp: &$uint) -> Self {
                Self(Residue::<$params, { <$uint>::LIMBS }>::new(&self.0).pow(exp).retrieve())
            }

            /// Compute multiplicative inverse: `1 / self`, if `self` is
            /// non-zero.
            pub fn invert(&self) -> CtOption<Self> {
                CtOption::new(self.pow(&Self::INVERT_EXP), !self.is_zero())
            }

            /// Compute modular square root.
            pub fn sqrt(&self) -> CtOption<Self> {
                let sqrt = self.pow(&Self::SQRT_EXP);
                CtOption::new(sqrt, sqrt.multiply(&sqrt).ct_eq(self))
            }
        }

        impl Default for $fe {
            fn default() -> Self {
                Self::ZERO
            }
        }

        impl ConditionallySelectable for $fe {
            fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
                Self(<$uint>::conditional_select(&a.0, &b.0, choice))
            }
        }

        impl ConstantTimeEq for $fe {
            fn ct_eq(&self, other: &Self) -> Choice {
                self.0.ct_eq(&other.0)
            }
        }

        impl PartialEq for $fe {
            fn eq(&self, rhs: &Self) -> bool {
                self.ct_eq(rhs).into()
            }
        }

        impl Eq for $fe {}

        impl elliptic_curve::zeroize::DefaultIsZeroes for $fe {}

        impl From<u64> for $fe {
            fn from(n: u64) -> Self {
                Self::from_u64(n)
            }
        }

        impl core::ops::Add for $fe {
            type Output = Self;

            fn add(self, rhs: Self) -> Self {
                <$fe>::add(&self, &rhs)
            }
        }

        impl core::ops::Add<&$fe> for $fe {
            type Output = Self;

            fn add(self, rhs: &$fe) -> Self {
                <$fe>::add(&self, rhs)
            }
        }

        impl core::ops::Add<&$fe> for &$fe {
            type Output = $fe;

            fn add(self, rhs: &$fe) -> $fe {
                <$fe>::add(self, rhs)
            }
        }

        impl core::ops::AddAssign for $fe {
            fn add_assign(&mut self, rhs: Self) {
                *self = <$fe>::add(self, &rhs);
            }
        }

        impl core::ops::AddAssign<&$fe> for $fe {
            fn add_assign(&mut self, rhs: &$fe) {
                *self = <$fe>::add(self, rhs);
            }
        }

        impl core::ops::Sub for $fe {
            type Output = Self;

            fn sub(self, rhs: Self) -> Self {
                <$fe>::sub(&self, &rhs)
            }
        }

        impl core::ops::Sub<&$fe> for $fe {
            type Output = Self;

            fn sub(self, rhs: &$fe) -> Self {
                <$fe>::sub(&self, rhs)
            }
        }

        impl core::ops::Sub<&$fe> for &$fe {
            type Output = $fe;

            fn sub(self, rhs: &$fe) -> $fe {
                <$fe>::sub(self, rhs)
            }
        }

        impl core::ops::SubAssign for $fe {
            fn sub_assign(&mut self, rhs: Self) {
                *self = <$fe>::sub(self, &rhs);
            }
        }

        impl core::ops::SubAssign<&$fe> for $fe {
            fn sub_assign(&mut self, rhs: &$fe) {
                *self = <$fe>::sub(self, rhs);
            }
        }

        impl core::ops::Mul for $fe {
            type Output = Self;

            fn mul(self, rhs: Self) -> Self {
                <$fe>::multiply(&self, &rhs)
            }
        }

        impl core::ops::Mul<&$fe> for $fe {
            type Output = Self;

            fn mul(self, rhs: &$fe) -> Self {
                <$fe>::multiply(&self, rhs)
            }
        }

        impl core::ops::Mul<&$fe> for &$fe {
            type Output = $fe;

            fn mul(self, rhs: &$fe) -> $fe {
                <$fe>::multiply(self, rhs)
            }
        }

        impl core::ops::MulAssign for $fe {
            fn mul_assign(&mut self, rhs: Self) {
                *self = <$fe>::multiply(self, &rhs);
            }
        }

        impl core::ops::MulAssign<&$fe> for $fe {
            fn mul_assign(&mut self, rhs: &$fe) {
                *self = <$fe>::multiply(self, rhs);
            }
        }

        impl core::ops::Neg for $fe {
            type Output = Self;

            fn neg(self) -> Self {
                <$fe>::neg(&self)
            }
        }

        impl core::iter::Sum for $fe {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                iter.fold(Self::ZERO, |acc, item| acc + item)
            }
        }

        impl<'a> core::iter::Sum<&'a $fe> for $fe {
            fn sum<I: Iterator<Item = &'a $fe>>(iter: I) -> Self {
                iter.copied().sum()
            }
        }

        impl core::iter::Product for $fe {
            fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
                iter.fold(Self::ONE, |acc, item| acc * item)
            }
        }

        impl<'a> core::iter::Product<&'a $fe> for $fe {
            fn product<I: Iterator<Item = &'a $fe>>(iter: I) -> Self {
                iter.copied().product()
            }
        }

        impl elliptic_curve::ff::Field for $fe {
            const ZERO: Self = Self::ZERO;
            const ONE: Self = Self::ONE;

            fn random(mut rng: impl rand_core::RngCore) -> Self {
                // Uniform sampling by rejection: candidates at or above the
                // modulus are redrawn rather than reduced.
                let mut bytes = <$bytes>::default();

                loop {
                    rng.fill_bytes(&mut bytes);
                    if let Some(fe) = Option::<Self>::from(Self::from_bytes(&bytes)) {
                        return fe;
                    }
                }
            }

            fn is_zero(&self) -> Choice {
                Self::is_zero(self)
            }

            #[must_use]
            fn square(&self) -> Self {
                Self::square(self)
            }

            #[must_use]
            fn double(&self) -> Self {
                Self::double(self)
            }

            fn invert(&self) -> CtOption<Self> {
                Self::invert(self)
            }

            fn sqrt(&self) -> CtOption<Self> {
                Self::sqrt(self)
            }

            fn sqrt_ratio(num: &Self, div: &Self) -> (Choice, Self) {
                elliptic_curve::ff::helpers::sqrt_ratio_generic(num, div)
            }
        }
    };
}

pub(crate) use impl_field_element;
