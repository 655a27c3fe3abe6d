// -*- mode: rust; -*-
//
// This file is part of x25519-core.
// See LICENSE for licensing information.

//! Scalar multiplication on the Montgomery form of Curve25519.
//!
//! Montgomery arithmetic works not on the curve itself, but on the
//! \\(u\\)-line, which discards sign information and unifies the curve
//! and its quadratic twist.  See [_Montgomery curves and their
//! arithmetic_][costello-smith] by Costello and Smith for more details.
//!
//! The `MontgomeryPoint` struct contains the affine \\(u\\)-coordinate
//! \\(u\_0(P)\\) of a point \\(P\\) on either the curve or the twist.
//! Here the map \\(u\_0 : \mathcal M \rightarrow \mathbb F\_p \\) is
//! defined by \\(u\_0((u,v)) = u\\); \\(u\_0(\mathcal O) = 0\\).  See
//! section 5.4 of Costello-Smith for more details.
//!
//! # Scalar Multiplication
//!
//! Scalar multiplication is provided by
//! [`MontgomeryPoint::mul_clamped`], which clamps a 32-byte integer
//! the way RFC 7748 requires, and by [`MontgomeryPoint::mul_bits_be`],
//! which takes an arbitrary big-endian bit string. Both run the same
//! constant-time Montgomery ladder.
//!
//! The ladder step is written once, over two independent rails of
//! field arithmetic. Which implementation of those rails runs is
//! decided by the backend at call time; the result is the same
//! either way.
//!
//! Peer points are not validated. Points of small order, points on
//! the twist, and non-canonical encodings all produce a deterministic
//! output, and it is up to the caller to decide whether an all-zero
//! result is acceptable.
//!
//! [costello-smith]: https://eprint.iacr.org/2017/212.pdf

// We allow non snake_case names because coordinates in projective space are
// traditionally denoted by the capitalisation of their respective
// counterparts in affine space.
#![allow(non_snake_case)]

use crate::backend::{self, FieldPair};
use crate::constants::X25519_BASEPOINT;
use crate::field::FieldElement;

use subtle::Choice;
use subtle::ConditionallySelectable;
use subtle::ConstantTimeEq;

#[cfg(feature = "zeroize")]
use zeroize::Zeroize;

/// Holds the \\(u\\)-coordinate of a point on the Montgomery form of
/// Curve25519 or its twist.
#[derive(Copy, Clone, Debug, Default)]
pub struct MontgomeryPoint(pub [u8; 32]);

/// Equality of `MontgomeryPoint`s is defined mod p.
impl ConstantTimeEq for MontgomeryPoint {
    fn ct_eq(&self, other: &MontgomeryPoint) -> Choice {
        let self_fe = FieldElement::from_bytes(&self.0);
        let other_fe = FieldElement::from_bytes(&other.0);

        self_fe.ct_eq(&other_fe)
    }
}

impl PartialEq for MontgomeryPoint {
    fn eq(&self, other: &MontgomeryPoint) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for MontgomeryPoint {}

#[cfg(feature = "zeroize")]
impl Zeroize for MontgomeryPoint {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl MontgomeryPoint {
    /// Fixed-base scalar multiplication (i.e. multiplication by the base point).
    ///
    /// The scalar is clamped first, so the result is the X25519 public
    /// key belonging to the secret `bytes`.
    pub fn mul_base_clamped(bytes: [u8; 32]) -> Self {
        X25519_BASEPOINT.mul_clamped(bytes)
    }

    /// Multiply this point by `clamp_integer(bytes)`. For a description
    /// of clamping, see [`clamp_integer`].
    pub fn mul_clamped(self, bytes: [u8; 32]) -> Self {
        #[allow(unused_mut)]
        let mut s = clamp_integer(bytes);

        // Clamping clears bit 255, so the ladder starts at bit 254.
        let product = self.mul_bits_be(bits_le(&s).rev().skip(1));

        #[cfg(feature = "zeroize")]
        s.zeroize();

        product
    }

    /// Given `self` \\( = u\_0(P) \\), and a big-endian bit representation of an integer
    /// \\(n\\), return \\( u\_0(\[n\]P) \\). This is constant time in the length of `bits`.
    ///
    /// **NOTE:** You probably do not want to use this function. Almost every protocol built on
    /// Curve25519 uses _clamped multiplication_, explained
    /// [here](https://neilmadden.blog/2020/05/28/whats-the-curve25519-clamping-all-about/).
    /// When in doubt, use [`Self::mul_clamped`].
    pub fn mul_bits_be(&self, bits: impl Iterator<Item = bool>) -> MontgomeryPoint {
        backend::mul_bits_be(self, bits)
    }

    /// View this `MontgomeryPoint` as an array of bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert this `MontgomeryPoint` to an array of bytes.
    pub const fn to_bytes(&self) -> [u8; 32] {
        self.0
    }
}

/// Clamps the given little-endian representation of a 32-byte integer.
///
/// Clamping the value puts it in the range:
///
/// **n ∈ 2^254 + 8\*{0, 1, 2, 3, . . ., 2^251 − 1}**
///
/// # Explanation of clamping
///
/// The bits are cleared and set so that the ladder always runs the same
/// number of steps (bit 254 is set, bit 255 is clear) and so that the
/// scalar is a multiple of the cofactor 8 (the low three bits are
/// clear), which maps any small-order component of the peer point to
/// the identity.
pub const fn clamp_integer(mut bytes: [u8; 32]) -> [u8; 32] {
    bytes[0] &= 0b1111_1000;
    bytes[31] &= 0b0111_1111;
    bytes[31] |= 0b0100_0000;
    bytes
}

/// The bits of a little-endian integer, least significant first.
fn bits_le(bytes: &[u8; 32]) -> impl DoubleEndedIterator<Item = bool> + '_ {
    (0..256).map(move |i| ((bytes[i >> 3] >> (i & 7)) & 1u8) == 1)
}

/// The ladder, run on the field-pair implementation `F`.
///
/// Go through the bits from most to least significant, swapping the two
/// ladder points whenever the current bit differs from the previous
/// one, so that a single step formula serves both bit values.
pub(crate) fn mul_bits_be_with<F, I>(point: &MontgomeryPoint, bits: I) -> MontgomeryPoint
where
    F: FieldPair,
    I: Iterator<Item = bool>,
{
    // Algorithm 8 of Costello-Smith 2017
    let affine_u = FieldElement::from_bytes(&point.0);
    let mut x0 = ProjectivePoint::identity();
    let mut x1 = ProjectivePoint {
        U: affine_u,
        W: FieldElement::ONE,
    };

    let mut prev_bit = false;
    for cur_bit in bits {
        let choice = u8::from(prev_bit ^ cur_bit);

        debug_assert!(choice == 0 || choice == 1);

        ProjectivePoint::conditional_swap(&mut x0, &mut x1, choice.into());
        differential_add_and_double::<F>(&mut x0, &mut x1, &affine_u);

        prev_bit = cur_bit;
    }
    // The final value of prev_bit above is the LSB of the scalar
    ProjectivePoint::conditional_swap(&mut x0, &mut x1, Choice::from(u8::from(prev_bit)));

    let result = x0.as_affine();

    // Don't leave the ladder state on the stack
    #[cfg(feature = "zeroize")]
    {
        prev_bit.zeroize();
        x0.zeroize();
        x1.zeroize();
    }

    result
}

/// A `ProjectivePoint` holds a point on the projective line
/// \\( \mathbb P(\mathbb F\_p) \\), which we identify with the Kummer
/// line of the Montgomery curve.
#[derive(Copy, Clone, Debug)]
pub(crate) struct ProjectivePoint {
    pub U: FieldElement,
    pub W: FieldElement,
}

impl ProjectivePoint {
    /// The identity, \\( (1 : 0) \\).
    fn identity() -> ProjectivePoint {
        ProjectivePoint {
            U: FieldElement::ONE,
            W: FieldElement::ZERO,
        }
    }

    /// Dehomogenize this point to affine coordinates.
    ///
    /// # Return
    ///
    /// * \\( u = U / W \\) if \\( W \neq 0 \\);
    /// * \\( 0 \\) if \\( W \eq 0 \\);
    fn as_affine(&self) -> MontgomeryPoint {
        let u = &self.U * &self.W.invert();
        MontgomeryPoint(u.as_bytes())
    }
}

impl ConditionallySelectable for ProjectivePoint {
    fn conditional_select(
        a: &ProjectivePoint,
        b: &ProjectivePoint,
        choice: Choice,
    ) -> ProjectivePoint {
        ProjectivePoint {
            U: FieldElement::conditional_select(&a.U, &b.U, choice),
            W: FieldElement::conditional_select(&a.W, &b.W, choice),
        }
    }

    fn conditional_swap(a: &mut ProjectivePoint, b: &mut ProjectivePoint, choice: Choice) {
        FieldElement::conditional_swap(&mut a.U, &mut b.U, choice);
        FieldElement::conditional_swap(&mut a.W, &mut b.W, choice);
    }
}

#[cfg(feature = "zeroize")]
impl Zeroize for ProjectivePoint {
    fn zeroize(&mut self) {
        self.U.zeroize();
        self.W.zeroize();
    }
}

/// Perform the double-and-add step of the Montgomery ladder.
///
/// Given projective points
/// \\( (U\_P : W\_P) = u(P) \\),
/// \\( (U\_Q : W\_Q) = u(Q) \\),
/// and the affine difference
/// \\(      u\_{P-Q} = u(P-Q) \\), set
/// $$
///     (U\_P : W\_P) \gets u(\[2\]P)
/// $$
/// and
/// $$
///     (U\_Q : W\_Q) \gets u(P + Q).
/// $$
///
/// Every product is issued as one half of a pair, so the two rails of
/// `F` stay busy; only \\(u\_{P-Q} \cdot (DA - CB)\^2\\) is left over
/// and runs on the serial field.
#[rustfmt::skip] // keep alignment of explanatory comments
pub(crate) fn differential_add_and_double<F: FieldPair>(
    P: &mut ProjectivePoint,
    Q: &mut ProjectivePoint,
    affine_PmQ: &FieldElement,
) {
    let u = F::tangle(&P.U, &Q.U);
    let w = F::tangle(&P.W, &Q.W);

    let (t0, t1) = u.sum(&w).untangle();        // (U_P + W_P, U_Q + W_Q)
    let (t2, t3) = u.difference(&w).untangle(); // (U_P - W_P, U_Q - W_Q)

    let t4 = F::tangle(&t0, &t2);               // (U_P + W_P, U_P - W_P)
    let t5 = F::tangle(&t3, &t1);               // (U_Q - W_Q, U_Q + W_Q)

    let t6 = t4.square();                       // ((U_P + W_P)^2, (U_P - W_P)^2)
    let (t7, t8) = t4.product(&t5).untangle();  // (U_P U_Q + W_P U_Q - U_P W_Q - W_P W_Q,
                                                //  U_P U_Q - W_P U_Q + U_P W_Q - W_P W_Q)
    let (t9, t10) = t6.untangle();

    let (t11, t12) = F::tangle(&(&t7 + &t8), &(&t7 - &t8)) // (2 (U_P U_Q - W_P W_Q),
        .square()                                          //  2 (W_P U_Q - U_P W_Q))^2
        .untangle();

    let (t13, t14) = t6.scale_by_curve_constants().untangle(); // (121666 t9, 121665 t10)

    let t15 = &t9 - &t10;                       // 4 U_P W_P
    let t16 = &t13 - &t14;                      // t10 + 121666 t15

    let (t17, t18) = F::tangle(&t9, &t15)       // (t9 t10, t15 t16)
        .product(&F::tangle(&t10, &t16))
        .untangle();

    P.U = t17;                                  // U_{P'} = (U_P + W_P)^2 (U_P - W_P)^2
    P.W = t18;                                  // W_{P'} = (4 U_P W_P) ((U_P - W_P)^2 + ((A + 2)/4) 4 U_P W_P)
    Q.U = t11;                                  // U_{Q'} = W_{P-Q} (U_P U_Q - W_P W_Q)^2
    Q.W = affine_PmQ * &t12;                    // W_{Q'} = U_{P-Q} (W_P U_Q - U_P W_Q)^2
}
