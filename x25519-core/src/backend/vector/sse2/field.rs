// -*- mode: rust; -*-
//
// This file is part of x25519-core.
// See LICENSE for licensing information.

//! An implementation of 2-way vectorized 32-bit field arithmetic using
//! SSE2.
//!
//! The `FieldElement2625x2` struct provides a vector of two field
//! elements, implemented using SSE2 operations.  Its API is designed
//! to abstract away the platform-dependent details, so that the
//! Montgomery ladder can be written generically over it and over the
//! serial [`SerialFieldPair`](crate::backend::serial::SerialFieldPair).
//!
//! Each of the ten limbs is held in its own `__m128i`, with operand
//! \\(a\\) in lane 0 and operand \\(b\\) in lane 1. Lanes are unsigned:
//! operands are normalised to non-negative limbs when they are
//! tangled, and subtraction adds \\(2p\\) first so that no lane
//! underflows.  SSE2 has no 64-bit arithmetic shift, so keeping lanes
//! unsigned is what lets the carry chain use logical shifts.

use core::ops::{Add, Mul, Sub};

use crate::backend::serial::u32::field::FieldElement2625;
use crate::backend::vector::packed_simd::u64x2;
use crate::backend::FieldPair;
use crate::constants::{AMINUS2_OVER_FOUR, APLUS2_OVER_FOUR};

/// The low 25 bits of each lane.
const LOW_25_BITS: u64x2 = u64x2::splat_const::<{ (1 << 25) - 1 }>();
/// The low 26 bits of each lane.
const LOW_26_BITS: u64x2 = u64x2::splat_const::<{ (1 << 26) - 1 }>();

/// The limbs of \\(2p\\), added before a subtraction.
static P_TIMES_2: [u64x2; 10] = [
    u64x2::splat_const::<{ (1 << 27) - 38 }>(),
    u64x2::splat_const::<{ (1 << 26) - 2 }>(),
    u64x2::splat_const::<{ (1 << 27) - 2 }>(),
    u64x2::splat_const::<{ (1 << 26) - 2 }>(),
    u64x2::splat_const::<{ (1 << 27) - 2 }>(),
    u64x2::splat_const::<{ (1 << 26) - 2 }>(),
    u64x2::splat_const::<{ (1 << 27) - 2 }>(),
    u64x2::splat_const::<{ (1 << 26) - 2 }>(),
    u64x2::splat_const::<{ (1 << 27) - 2 }>(),
    u64x2::splat_const::<{ (1 << 26) - 2 }>(),
];

/// A vector of two field elements.
///
/// Lane \\(j\\) of `self.0[i]` is limb \\(i\\) of operand \\(j\\).
///
/// # Bounds
///
/// After [`FieldElement2625x2::new`] every limb is non-negative and
/// within its width. The output of a multiplication, squaring, or
/// [`FieldElement2625x2::scale_by_curve_constants`] is within its
/// width except for limbs 1 and 5, which may exceed \\(2\^{25}\\) by
/// less than \\(2\^{15}\\).  Multiplication and squaring accept limbs
/// below \\(2\^{27}\\); subtraction requires the right-hand side to be
/// below \\(2p\\) limb-wise.
#[derive(Clone, Copy, Debug)]
pub(crate) struct FieldElement2625x2(pub(crate) [u64x2; 10]);

impl FieldElement2625x2 {
    /// Construct a vector from two `FieldElement2625`s.
    ///
    /// Both inputs are carried into non-negative limbs first, so any
    /// lazily combined serial element is accepted.
    pub(crate) fn new(a: &FieldElement2625, b: &FieldElement2625) -> FieldElement2625x2 {
        let a = a.to_positive_limbs();
        let b = b.to_positive_limbs();

        let mut buf = [u64x2::splat(0); 10];
        for i in 0..10 {
            buf[i] = u64x2::new(u64::from(a[i]), u64::from(b[i]));
        }

        FieldElement2625x2(buf)
    }

    /// Split this vector into an array of two `FieldElement2625`s.
    pub(crate) fn split(&self) -> [FieldElement2625; 2] {
        let mut out = [FieldElement2625::ZERO; 2];
        for i in 0..10 {
            // Lanes hold at most 28 bits here, so the casts are exact.
            out[0].0[i] = self.0[i].extract::<0>() as i32;
            out[1].0[i] = self.0[i].extract::<1>() as i32;
        }
        out
    }

    /// Given 64-bit input limbs, reduce to 26/25-bit limbs.
    ///
    /// The carry out of limb 9 can be as large as \\(2\^{33}\\), too
    /// big for the 32-bit multiplier, so it is split at bit 26 and the
    /// two halves are multiplied by 19 into limbs 0 and 1 separately.
    #[inline]
    fn reduce64(mut z: [u64x2; 10]) -> FieldElement2625x2 {
        #[inline(always)]
        fn carry(z: &mut [u64x2; 10], i: usize) {
            debug_assert!(i < 9);
            if i % 2 == 0 {
                z[i + 1] += z[i].shr::<26>();
                z[i] &= LOW_26_BITS;
            } else {
                z[i + 1] += z[i].shr::<25>();
                z[i] &= LOW_25_BITS;
            }
        }

        // Perform two halves of the carry chain in parallel.
        carry(&mut z, 0);
        carry(&mut z, 4);
        carry(&mut z, 1);
        carry(&mut z, 5);
        carry(&mut z, 2);
        carry(&mut z, 6);
        carry(&mut z, 3);
        carry(&mut z, 7);
        // z[4] and z[8] absorbed carries of up to 2^39 and go again.
        carry(&mut z, 4);
        carry(&mut z, 8);
        // z[5] now exceeds its width by at most 2^13.

        // Last carry has a multiplication by 19.
        let c = z[9].shr::<25>();
        z[9] &= LOW_25_BITS;
        let c0 = c & LOW_26_BITS;
        let c1 = c.shr::<26>();

        let x19 = u64x2::splat(19);
        z[0] += c0.mul32(x19);
        z[1] += c1.mul32(x19);
        carry(&mut z, 0);
        // For inputs below 2^27, z[9] < 2^58 before the split, so
        // c1 < 2^7 and z[1] exceeds its width by less than 2^12.

        FieldElement2625x2(z)
    }

    /// Square this field element, and return the result.
    #[rustfmt::skip] // keep alignment of z* calculations
    pub(crate) fn square(&self) -> FieldElement2625x2 {
        let x = &self.0;

        let x19 = u64x2::splat(19);
        let m = |a: u64x2, b: u64x2| a.mul32(b);

        let x0_2 = x[0].shl::<1>();
        let x1_2 = x[1].shl::<1>();
        let x2_2 = x[2].shl::<1>();
        let x3_2 = x[3].shl::<1>();
        let x4_2 = x[4].shl::<1>();
        let x5_2 = x[5].shl::<1>();
        let x6_2 = x[6].shl::<1>();
        let x7_2 = x[7].shl::<1>();

        let x5_19 = m(x19, x[5]);
        let x6_19 = m(x19, x[6]);
        let x7_19 = m(x19, x[7]);
        let x8_19 = m(x19, x[8]);
        let x9_19 = m(x19, x[9]);

        let (x0, x1, x2, x3, x4, x5, x6, x7, x8, x9) =
            (x[0], x[1], x[2], x[3], x[4], x[5], x[6], x[7], x[8], x[9]);

        let z0 = m(x0,   x0)   + ((m(x1_2, x9_19) + m(x3_2, x7_19) + m(x5,   x5_19)).shl::<1>()) + m(x2_2, x8_19) + m(x4_2, x6_19);
        let z1 = m(x0_2, x1)   + ((m(x2,   x9_19) + m(x4,   x7_19)).shl::<1>()) + m(x3_2, x8_19) + m(x5_2, x6_19);
        let z2 = m(x0_2, x2)   + m(x1_2, x1)   + ((m(x3_2, x9_19) + m(x5_2, x7_19)).shl::<1>()) + m(x4_2, x8_19) + m(x6,   x6_19);
        let z3 = m(x0_2, x3)   + m(x1_2, x2)   + ((m(x4,   x9_19) + m(x6,   x7_19)).shl::<1>()) + m(x5_2, x8_19);
        let z4 = m(x0_2, x4)   + m(x1_2, x3_2) + m(x2,   x2)   + ((m(x5_2, x9_19) + m(x7,   x7_19)).shl::<1>()) + m(x6_2, x8_19);
        let z5 = m(x0_2, x5)   + m(x1_2, x4)   + m(x2_2, x3)   + ((m(x6,   x9_19)).shl::<1>()) + m(x7_2, x8_19);
        let z6 = m(x0_2, x6)   + m(x1_2, x5_2) + m(x2_2, x4)   + m(x3_2, x3)   + ((m(x7_2, x9_19)).shl::<1>()) + m(x8,   x8_19);
        let z7 = m(x0_2, x7)   + m(x1_2, x6)   + m(x2_2, x5)   + m(x3_2, x4)   + ((m(x8,   x9_19)).shl::<1>());
        let z8 = m(x0_2, x8)   + m(x1_2, x7_2) + m(x2_2, x6)   + m(x3_2, x5_2) + m(x4,   x4)   + ((m(x9,   x9_19)).shl::<1>());
        let z9 = m(x0_2, x9)   + m(x1_2, x8)   + m(x2_2, x7)   + m(x3_2, x6)   + m(x4_2, x5);

        FieldElement2625x2::reduce64([z0, z1, z2, z3, z4, z5, z6, z7, z8, z9])
    }

    /// Multiply lane 0 by \\((A+2)/4 = 121666\\) and lane 1 by
    /// \\((A-2)/4 = 121665\\).
    pub(crate) fn scale_by_curve_constants(&self) -> FieldElement2625x2 {
        let consts = u64x2::new(u64::from(APLUS2_OVER_FOUR), u64::from(AMINUS2_OVER_FOUR));

        let mut z = [u64x2::splat(0); 10];
        for i in 0..10 {
            z[i] = self.0[i].mul32(consts);
        }

        FieldElement2625x2::reduce64(z)
    }
}

impl<'a, 'b> Add<&'b FieldElement2625x2> for &'a FieldElement2625x2 {
    type Output = FieldElement2625x2;
    /// Add two `FieldElement2625x2`s, without performing a reduction.
    #[inline]
    fn add(self, rhs: &'b FieldElement2625x2) -> FieldElement2625x2 {
        let mut z = self.0;
        for i in 0..10 {
            z[i] += rhs.0[i];
        }
        FieldElement2625x2(z)
    }
}

impl<'a, 'b> Sub<&'b FieldElement2625x2> for &'a FieldElement2625x2 {
    type Output = FieldElement2625x2;
    /// Subtract two `FieldElement2625x2`s, without performing a
    /// reduction. The right-hand side must be below \\(2p\\) limb-wise.
    #[inline]
    fn sub(self, rhs: &'b FieldElement2625x2) -> FieldElement2625x2 {
        let mut z = self.0;
        for i in 0..10 {
            z[i] = (z[i] + P_TIMES_2[i]) - rhs.0[i];
        }
        FieldElement2625x2(z)
    }
}

impl<'a, 'b> Mul<&'b FieldElement2625x2> for &'a FieldElement2625x2 {
    type Output = FieldElement2625x2;
    /// Perform a multiplication.
    ///
    /// Both operands must have limbs below \\(2\^{27}\\), so that
    /// \\(19\\) times a limb still fits the 32-bit multiplier inputs.
    #[rustfmt::skip] // keep alignment of z* calculations
    #[inline]
    fn mul(self, rhs: &'b FieldElement2625x2) -> FieldElement2625x2 {
        let m = |a: u64x2, b: u64x2| a.mul32(b);
        let x19 = u64x2::splat(19);

        let (x0, x1, x2, x3, x4, x5, x6, x7, x8, x9) = (
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4],
            self.0[5], self.0[6], self.0[7], self.0[8], self.0[9],
        );
        let (y0, y1, y2, y3, y4, y5, y6, y7, y8, y9) = (
            rhs.0[0], rhs.0[1], rhs.0[2], rhs.0[3], rhs.0[4],
            rhs.0[5], rhs.0[6], rhs.0[7], rhs.0[8], rhs.0[9],
        );

        // We could save a few multiplications by precomputing these
        // per operand, but the ladder never reuses a multiplicand.
        let y1_19 = m(x19, y1);
        let y2_19 = m(x19, y2);
        let y3_19 = m(x19, y3);
        let y4_19 = m(x19, y4);
        let y5_19 = m(x19, y5);
        let y6_19 = m(x19, y6);
        let y7_19 = m(x19, y7);
        let y8_19 = m(x19, y8);
        let y9_19 = m(x19, y9);

        let x1_2 = x1.shl::<1>();
        let x3_2 = x3.shl::<1>();
        let x5_2 = x5.shl::<1>();
        let x7_2 = x7.shl::<1>();
        let x9_2 = x9.shl::<1>();

        let z0 = m(x0, y0) + m(x1_2, y9_19) + m(x2, y8_19) + m(x3_2, y7_19) + m(x4, y6_19) + m(x5_2, y5_19) + m(x6, y4_19) + m(x7_2, y3_19) + m(x8, y2_19) + m(x9_2, y1_19);
        let z1 = m(x0, y1) + m(x1,   y0)    + m(x2, y9_19) + m(x3,   y8_19) + m(x4, y7_19) + m(x5,   y6_19) + m(x6, y5_19) + m(x7,   y4_19) + m(x8, y3_19) + m(x9,   y2_19);
        let z2 = m(x0, y2) + m(x1_2, y1)    + m(x2, y0)    + m(x3_2, y9_19) + m(x4, y8_19) + m(x5_2, y7_19) + m(x6, y6_19) + m(x7_2, y5_19) + m(x8, y4_19) + m(x9_2, y3_19);
        let z3 = m(x0, y3) + m(x1,   y2)    + m(x2, y1)    + m(x3,   y0)    + m(x4, y9_19) + m(x5,   y8_19) + m(x6, y7_19) + m(x7,   y6_19) + m(x8, y5_19) + m(x9,   y4_19);
        let z4 = m(x0, y4) + m(x1_2, y3)    + m(x2, y2)    + m(x3_2, y1)    + m(x4, y0)    + m(x5_2, y9_19) + m(x6, y8_19) + m(x7_2, y7_19) + m(x8, y6_19) + m(x9_2, y5_19);
        let z5 = m(x0, y5) + m(x1,   y4)    + m(x2, y3)    + m(x3,   y2)    + m(x4, y1)    + m(x5,   y0)    + m(x6, y9_19) + m(x7,   y8_19) + m(x8, y7_19) + m(x9,   y6_19);
        let z6 = m(x0, y6) + m(x1_2, y5)    + m(x2, y4)    + m(x3_2, y3)    + m(x4, y2)    + m(x5_2, y1)    + m(x6, y0)    + m(x7_2, y9_19) + m(x8, y8_19) + m(x9_2, y7_19);
        let z7 = m(x0, y7) + m(x1,   y6)    + m(x2, y5)    + m(x3,   y4)    + m(x4, y3)    + m(x5,   y2)    + m(x6, y1)    + m(x7,   y0)    + m(x8, y9_19) + m(x9,   y8_19);
        let z8 = m(x0, y8) + m(x1_2, y7)    + m(x2, y6)    + m(x3_2, y5)    + m(x4, y4)    + m(x5_2, y3)    + m(x6, y2)    + m(x7_2, y1)    + m(x8, y0)    + m(x9_2, y9_19);
        let z9 = m(x0, y9) + m(x1,   y8)    + m(x2, y7)    + m(x3,   y6)    + m(x4, y5)    + m(x5,   y4)    + m(x6, y3)    + m(x7,   y2)    + m(x8, y1)    + m(x9,   y0);

        FieldElement2625x2::reduce64([z0, z1, z2, z3, z4, z5, z6, z7, z8, z9])
    }
}

impl FieldPair for FieldElement2625x2 {
    #[inline]
    fn tangle(a: &FieldElement2625, b: &FieldElement2625) -> FieldElement2625x2 {
        FieldElement2625x2::new(a, b)
    }

    #[inline]
    fn untangle(&self) -> (FieldElement2625, FieldElement2625) {
        let [a, b] = self.split();
        (a, b)
    }

    #[inline]
    fn sum(&self, rhs: &FieldElement2625x2) -> FieldElement2625x2 {
        self + rhs
    }

    #[inline]
    fn difference(&self, rhs: &FieldElement2625x2) -> FieldElement2625x2 {
        self - rhs
    }

    #[inline]
    fn product(&self, rhs: &FieldElement2625x2) -> FieldElement2625x2 {
        self * rhs
    }

    #[inline]
    fn square(&self) -> FieldElement2625x2 {
        FieldElement2625x2::square(self)
    }

    #[inline]
    fn scale_by_curve_constants(&self) -> FieldElement2625x2 {
        FieldElement2625x2::scale_by_curve_constants(self)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use rand::RngCore;

    fn random_element() -> FieldElement2625 {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        FieldElement2625::from_bytes(&bytes)
    }

    /// A lazily combined element with negative limbs, as the ladder
    /// produces before tangling.
    fn random_unreduced_element() -> FieldElement2625 {
        &random_element() - &random_element()
    }

    fn limbs_within_output_bounds(v: &FieldElement2625x2) -> bool {
        v.0.iter().enumerate().all(|(i, limb)| {
            let bits = if i % 2 == 0 { 26 } else { 25 };
            let slack = if i == 1 || i == 5 { 1 << 15 } else { 0 };
            limb.extract::<0>() < (1 << bits) + slack && limb.extract::<1>() < (1 << bits) + slack
        })
    }

    #[test]
    fn new_split_roundtrips() {
        for _ in 0..100 {
            let a = random_unreduced_element();
            let b = random_element();
            let [a2, b2] = FieldElement2625x2::new(&a, &b).split();
            assert_eq!(a.as_bytes(), a2.as_bytes());
            assert_eq!(b.as_bytes(), b2.as_bytes());
        }
    }

    #[test]
    fn new_normalises_negative_limbs() {
        let minus_one = -&FieldElement2625::ONE;
        let v = FieldElement2625x2::new(&minus_one, &FieldElement2625::ZERO);
        for i in 0..10 {
            assert!(v.0[i].extract::<0>() < (1 << 26));
        }
        let [a, b] = v.split();
        assert_eq!(a.as_bytes(), minus_one.as_bytes());
        assert_eq!(b.as_bytes(), [0u8; 32]);
    }

    #[test]
    fn add_sub_vs_serial() {
        for _ in 0..100 {
            let (a0, a1) = (random_unreduced_element(), random_element());
            let (b0, b1) = (random_element(), random_unreduced_element());
            let a = FieldElement2625x2::new(&a0, &a1);
            let b = FieldElement2625x2::new(&b0, &b1);

            let [s0, s1] = (&a + &b).split();
            assert_eq!(s0.as_bytes(), (&a0 + &b0).as_bytes());
            assert_eq!(s1.as_bytes(), (&a1 + &b1).as_bytes());

            let [d0, d1] = (&a - &b).split();
            assert_eq!(d0.as_bytes(), (&a0 - &b0).as_bytes());
            assert_eq!(d1.as_bytes(), (&a1 - &b1).as_bytes());
        }
    }

    #[test]
    fn sub_of_equal_operands_is_zero() {
        let x = random_element();
        let v = FieldElement2625x2::new(&x, &x);
        let [z0, z1] = (&v - &v).split();
        assert_eq!(z0.as_bytes(), [0u8; 32]);
        assert_eq!(z1.as_bytes(), [0u8; 32]);
    }

    #[test]
    fn mul_vs_serial() {
        for _ in 0..100 {
            let (a0, a1) = (random_unreduced_element(), random_element());
            let (b0, b1) = (random_element(), random_unreduced_element());
            let a = FieldElement2625x2::new(&a0, &a1);
            let b = FieldElement2625x2::new(&b0, &b1);

            let ab = &a * &b;
            assert!(limbs_within_output_bounds(&ab));
            let [c0, c1] = ab.split();
            assert_eq!(c0.as_bytes(), (&a0 * &b0).as_bytes());
            assert_eq!(c1.as_bytes(), (&a1 * &b1).as_bytes());
        }
    }

    #[test]
    fn mul_of_unnormalised_outputs_vs_serial() {
        // Products feed straight into another product in the ladder.
        let (a0, a1) = (random_element(), random_element());
        let a = FieldElement2625x2::new(&a0, &a1);
        let aa = &a * &a;
        let [c0, c1] = (&aa * &aa).split();
        let a0_2 = a0.square();
        let a1_2 = a1.square();
        assert_eq!(c0.as_bytes(), a0_2.square().as_bytes());
        assert_eq!(c1.as_bytes(), a1_2.square().as_bytes());
    }

    #[test]
    fn square_vs_serial() {
        for _ in 0..100 {
            let (a0, a1) = (random_unreduced_element(), random_element());
            let a = FieldElement2625x2::new(&a0, &a1);

            let sq = a.square();
            assert!(limbs_within_output_bounds(&sq));
            let [c0, c1] = sq.split();
            assert_eq!(c0.as_bytes(), a0.square().as_bytes());
            assert_eq!(c1.as_bytes(), a1.square().as_bytes());
            assert_eq!(c0.as_bytes(), (&a * &a).split()[0].as_bytes());
        }
    }

    #[test]
    fn scale_by_curve_constants_vs_serial() {
        for _ in 0..100 {
            let (a0, a1) = (random_element(), random_unreduced_element());
            let a = FieldElement2625x2::new(&a0, &a1);

            let scaled = a.scale_by_curve_constants();
            assert!(limbs_within_output_bounds(&scaled));
            let [c0, c1] = scaled.split();
            assert_eq!(c0.as_bytes(), a0.mul_small(121666).as_bytes());
            assert_eq!(c1.as_bytes(), a1.mul_small(121665).as_bytes());
        }
    }

    #[test]
    fn extreme_limbs_vs_serial() {
        // every limb at the top of its width
        let max = FieldElement2625::from_bytes(&[0xff; 32]);
        let v = FieldElement2625x2::new(&max, &max);
        let [sq, prod] = [v.square().split()[0], (&v * &v).split()[1]];
        assert_eq!(sq.as_bytes(), max.square().as_bytes());
        assert_eq!(prod.as_bytes(), max.square().as_bytes());
        let [d, _] = (&FieldElement2625x2::new(&FieldElement2625::ZERO, &max) - &v).split();
        assert_eq!(d.as_bytes(), (-&max).as_bytes());
    }
}
