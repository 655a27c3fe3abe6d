// -*- mode: rust; -*-
//
// This file is part of x25519-core.
// See LICENSE for licensing information.

//! Field arithmetic modulo \\(p = 2\^{255} - 19\\).
//!
//! The `x25519_core::field` module provides a type alias
//! `x25519_core::field::FieldElement` to the radix-\\(2\^{25.5}\\)
//! element of the serial backend.
//!
//! Field operations defined in terms of machine operations, such as
//! field multiplication or squaring, are defined in the backend
//! implementation.
//!
//! Field operations defined in terms of other field operations, such
//! as field inversion, are defined here.

use subtle::Choice;
use subtle::ConstantTimeEq;

use crate::backend;

/// A `FieldElement` represents an element of the field
/// \\( \mathbb Z / (2\^{255} - 19)\\).
///
/// The `FieldElement` type is an alias for the 32-bit
/// radix-\\(2\^{25.5}\\) implementation. Both the serial and the
/// vector ladder are built on it.
pub(crate) type FieldElement = backend::serial::u32::field::FieldElement2625;

impl Eq for FieldElement {}

impl PartialEq for FieldElement {
    fn eq(&self, other: &FieldElement) -> bool {
        self.ct_eq(other).into()
    }
}

impl ConstantTimeEq for FieldElement {
    /// Test equality between two `FieldElement`s.  Since the
    /// internal representation is not canonical, the field elements
    /// are normalized to wire format before comparison.
    fn ct_eq(&self, other: &FieldElement) -> Choice {
        self.as_bytes().ct_eq(&other.as_bytes())
    }
}

impl FieldElement {
    /// Compute (self^(2^250-1), self^11), used as a helper function
    /// within invert().
    ///
    /// Each value below is self raised to the power in its name. Squaring
    /// doubles the exponent and multiplying adds exponents, so every
    /// `pow2k(k)` followed by a multiply extends a run of one bits.
    #[rustfmt::skip] // keep alignment of explanatory comments
    pub(crate) fn pow22501(&self) -> (FieldElement, FieldElement) {
        let z2 = self.square();                  // 2
        let z8 = z2.pow2k(2);                    // 8
        let z9 = self * &z8;                     // 9
        let z11 = &z2 * &z9;                     // 11
        let z22 = z11.square();                  // 22
        let z_5_0 = &z9 * &z22;                  // 2^5 - 1 = 31
        let z_10_0 = &z_5_0.pow2k(5) * &z_5_0;   // 2^10 - 1
        let z_20_0 = &z_10_0.pow2k(10) * &z_10_0; // 2^20 - 1
        let z_40_0 = &z_20_0.pow2k(20) * &z_20_0; // 2^40 - 1
        let z_50_0 = &z_40_0.pow2k(10) * &z_10_0; // 2^50 - 1
        let z_100_0 = &z_50_0.pow2k(50) * &z_50_0; // 2^100 - 1
        let z_200_0 = &z_100_0.pow2k(100) * &z_100_0; // 2^200 - 1
        let z_250_0 = &z_200_0.pow2k(50) * &z_50_0; // 2^250 - 1

        (z_250_0, z11)
    }

    /// Given a nonzero field element, compute its inverse.
    ///
    /// The inverse is computed as self^(p-2), since
    /// x^(p-2)x = x^(p-1) = 1 (mod p).
    ///
    /// This function returns zero on input zero.
    #[rustfmt::skip] // keep alignment of explanatory comments
    pub(crate) fn invert(&self) -> FieldElement {
        // p - 2 = 2^255 - 21 = (2^250 - 1) * 2^5 + 11.
        let (z_250_0, z11) = self.pow22501(); // 2^250 - 1, 11
        let z_255_5 = z_250_0.pow2k(5);       // 2^255 - 32
        &z_255_5 * &z11                       // 2^255 - 21
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use num_bigint::BigUint;
    use rand::RngCore;

    fn p() -> BigUint {
        (BigUint::from(1u8) << 255usize) - BigUint::from(19u8)
    }

    fn to_biguint(x: &FieldElement) -> BigUint {
        BigUint::from_bytes_le(&x.as_bytes())
    }

    /// A random field element together with its integer value.
    fn random_element() -> (FieldElement, BigUint) {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        let x = FieldElement::from_bytes(&bytes);
        bytes[31] &= 0x7f;
        (x, BigUint::from_bytes_le(&bytes) % p())
    }

    #[test]
    fn from_bytes_matches_biguint() {
        for _ in 0..100 {
            let (x, a) = random_element();
            assert_eq!(to_biguint(&x), a);
        }
    }

    #[test]
    fn add_sub_match_biguint() {
        for _ in 0..100 {
            let (x, a) = random_element();
            let (y, b) = random_element();
            assert_eq!(to_biguint(&(&x + &y)), (&a + &b) % p());
            assert_eq!(to_biguint(&(&x - &y)), (&a + p() - &b) % p());
            assert_eq!(to_biguint(&-&x), (p() - &a) % p());
        }
    }

    #[test]
    fn mul_square_match_biguint() {
        for _ in 0..100 {
            let (x, a) = random_element();
            let (y, b) = random_element();
            assert_eq!(to_biguint(&(&x * &y)), (&a * &b) % p());
            assert_eq!(to_biguint(&x.square()), (&a * &a) % p());

            // lazily summed operands
            let s = &x + &y;
            let d = &x - &y;
            let expected = ((&a + &b) * (&a + p() - &b)) % p();
            assert_eq!(to_biguint(&(&s * &d)), expected);
            assert_eq!(to_biguint(&d.square()), ((&a + p() - &b).pow(2)) % p());
        }
    }

    #[test]
    fn mul_small_matches_biguint() {
        let (x, a) = random_element();
        for k in [121665u32, 121666] {
            assert_eq!(to_biguint(&x.mul_small(k)), (&a * k) % p());
        }
    }

    #[test]
    fn invert_matches_biguint() {
        for _ in 0..20 {
            let (x, a) = random_element();
            let exponent = p() - BigUint::from(2u8);
            assert_eq!(to_biguint(&x.invert()), a.modpow(&exponent, &p()));
        }
    }

    #[test]
    fn invert_inverts() {
        for _ in 0..20 {
            let (x, _) = random_element();
            if x == FieldElement::ZERO {
                continue;
            }
            assert_eq!(&x * &x.invert(), FieldElement::ONE);
        }
    }

    #[test]
    fn invert_of_zero_is_zero() {
        assert_eq!(FieldElement::ZERO.invert(), FieldElement::ZERO);
        // p itself encodes zero
        let mut p_bytes = [0xffu8; 32];
        p_bytes[0] = 0xed;
        p_bytes[31] = 0x7f;
        let p_elt = FieldElement::from_bytes(&p_bytes);
        assert_eq!(p_elt.invert().as_bytes(), [0u8; 32]);
    }

    #[test]
    fn pow22501_exponents() {
        let (x, a) = random_element();
        let (t250, t11) = x.pow22501();
        let e250 = (BigUint::from(1u8) << 250usize) - BigUint::from(1u8);
        assert_eq!(to_biguint(&t250), a.modpow(&e250, &p()));
        assert_eq!(to_biguint(&t11), a.modpow(&BigUint::from(11u8), &p()));
    }

    #[test]
    fn equality_is_defined_mod_p() {
        let eighteen = FieldElement::from_bytes(&{
            let mut b = [0u8; 32];
            b[0] = 18;
            b
        });
        let all_ones = FieldElement::from_bytes(&[0xff; 32]);
        assert_eq!(eighteen, all_ones);
        assert!(bool::from(eighteen.ct_eq(&all_ones)));
    }
}
