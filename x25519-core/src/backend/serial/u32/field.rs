// -*- mode: rust; -*-
//
// This file is part of x25519-core.
// See LICENSE for licensing information.

//! Field arithmetic modulo \\(p = 2\^{255} - 19\\), using \\(32\\)-bit
//! limbs with \\(64\\)-bit products.
//!
//! The limbs are signed, so sums and differences can be left unreduced
//! without a bias term. Products are renormalised by one fixed carry
//! chain, and serialisation is the only place a value is made canonical.

use core::fmt::Debug;
use core::ops::Neg;
use core::ops::{Add, AddAssign};
use core::ops::{Mul, MulAssign};
use core::ops::{Sub, SubAssign};

use subtle::Choice;
use subtle::ConditionallySelectable;

#[cfg(feature = "zeroize")]
use zeroize::Zeroize;

use super::constants::{LIMB_BITS, LIMB_OFFSETS, MAX_LAZY_TERMS};

/// A `FieldElement2625` represents an element of the field
/// \\( \mathbb Z / (2\^{255} - 19)\\).
///
/// In the 32-bit implementation, a `FieldElement` is represented in
/// radix \\(2\^{25.5}\\) as ten `i32`s.  This means that a field
/// element \\(x\\) is represented as
/// $$
/// x = \sum\_{i=0}\^9 x\_i 2\^{\lceil i \frac {51} 2 \rceil}
///   = x\_0 + x\_1 2\^{26} + x\_2 2\^{51} + x\_3 2\^{77} + \cdots + x\_9 2\^{230};
/// $$
/// the coefficients are alternately bounded by \\(2\^{25}\\) and
/// \\(2\^{26}\\).  The limbs are allowed to grow between reductions up
/// until the limbs reach \\(2\^{27}\\) and \\(2\^{26}\\), which is the
/// sum of [`MAX_LAZY_TERMS`] reduced elements.
///
/// # Note
///
/// The `x25519_core::field` module provides a type alias
/// `x25519_core::field::FieldElement` to this type.
#[derive(Copy, Clone)]
pub(crate) struct FieldElement2625(pub(crate) [i32; 10]);

impl Debug for FieldElement2625 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "FieldElement2625({:?})", &self.0[..])
    }
}

#[cfg(feature = "zeroize")]
impl Zeroize for FieldElement2625 {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl<'b> AddAssign<&'b FieldElement2625> for FieldElement2625 {
    fn add_assign(&mut self, rhs: &'b FieldElement2625) {
        for i in 0..10 {
            self.0[i] += rhs.0[i];
        }
    }
}

impl<'a, 'b> Add<&'b FieldElement2625> for &'a FieldElement2625 {
    type Output = FieldElement2625;
    fn add(self, rhs: &'b FieldElement2625) -> FieldElement2625 {
        let mut output = *self;
        output += rhs;
        output
    }
}

define_add_variants!(
    LHS = FieldElement2625,
    RHS = FieldElement2625,
    Output = FieldElement2625
);
define_add_assign_variants!(LHS = FieldElement2625, RHS = FieldElement2625);

impl<'b> SubAssign<&'b FieldElement2625> for FieldElement2625 {
    fn sub_assign(&mut self, rhs: &'b FieldElement2625) {
        for i in 0..10 {
            self.0[i] -= rhs.0[i];
        }
    }
}

impl<'a, 'b> Sub<&'b FieldElement2625> for &'a FieldElement2625 {
    type Output = FieldElement2625;
    fn sub(self, rhs: &'b FieldElement2625) -> FieldElement2625 {
        let mut output = *self;
        output -= rhs;
        output
    }
}

define_sub_variants!(
    LHS = FieldElement2625,
    RHS = FieldElement2625,
    Output = FieldElement2625
);
define_sub_assign_variants!(LHS = FieldElement2625, RHS = FieldElement2625);

impl<'b> MulAssign<&'b FieldElement2625> for FieldElement2625 {
    fn mul_assign(&mut self, rhs: &'b FieldElement2625) {
        let result = (self as &FieldElement2625) * rhs;
        self.0 = result.0;
    }
}

impl<'a, 'b> Mul<&'b FieldElement2625> for &'a FieldElement2625 {
    type Output = FieldElement2625;

    #[rustfmt::skip] // keep alignment of h* calculations
    fn mul(self, rhs: &'b FieldElement2625) -> FieldElement2625 {
        debug_assert!(self.limbs_bounded(MAX_LAZY_TERMS));
        debug_assert!(rhs.limbs_bounded(MAX_LAZY_TERMS));

        let x = self.0.map(i64::from);
        let y = rhs.0.map(i64::from);

        // Alias self, rhs for more readable formulas
        let (f0, f1, f2, f3, f4, f5, f6, f7, f8, f9) =
            (x[0], x[1], x[2], x[3], x[4], x[5], x[6], x[7], x[8], x[9]);
        let (g0, g1, g2, g3, g4, g5, g6, g7, g8, g9) =
            (y[0], y[1], y[2], y[3], y[4], y[5], y[6], y[7], y[8], y[9]);

        // Limb i sits at offset ceil(25.5 i), so the product of two odd
        // limbs lands one bit above the even limb it accumulates into
        // and is doubled. Limbs that wrap past 2^255 pick up a factor 19.
        let g1_19 = 19 * g1;
        let g2_19 = 19 * g2;
        let g3_19 = 19 * g3;
        let g4_19 = 19 * g4;
        let g5_19 = 19 * g5;
        let g6_19 = 19 * g6;
        let g7_19 = 19 * g7;
        let g8_19 = 19 * g8;
        let g9_19 = 19 * g9;

        let f1_2 = 2 * f1;
        let f3_2 = 2 * f3;
        let f5_2 = 2 * f5;
        let f7_2 = 2 * f7;
        let f9_2 = 2 * f9;

        let h0 = f0*g0 + f1_2*g9_19 + f2*g8_19 + f3_2*g7_19 + f4*g6_19 + f5_2*g5_19 + f6*g4_19 + f7_2*g3_19 + f8*g2_19 + f9_2*g1_19;
        let h1 = f0*g1 + f1  *g0    + f2*g9_19 + f3  *g8_19 + f4*g7_19 + f5  *g6_19 + f6*g5_19 + f7  *g4_19 + f8*g3_19 + f9  *g2_19;
        let h2 = f0*g2 + f1_2*g1    + f2*g0    + f3_2*g9_19 + f4*g8_19 + f5_2*g7_19 + f6*g6_19 + f7_2*g5_19 + f8*g4_19 + f9_2*g3_19;
        let h3 = f0*g3 + f1  *g2    + f2*g1    + f3  *g0    + f4*g9_19 + f5  *g8_19 + f6*g7_19 + f7  *g6_19 + f8*g5_19 + f9  *g4_19;
        let h4 = f0*g4 + f1_2*g3    + f2*g2    + f3_2*g1    + f4*g0    + f5_2*g9_19 + f6*g8_19 + f7_2*g7_19 + f8*g6_19 + f9_2*g5_19;
        let h5 = f0*g5 + f1  *g4    + f2*g3    + f3  *g2    + f4*g1    + f5  *g0    + f6*g9_19 + f7  *g8_19 + f8*g7_19 + f9  *g6_19;
        let h6 = f0*g6 + f1_2*g5    + f2*g4    + f3_2*g3    + f4*g2    + f5_2*g1    + f6*g0    + f7_2*g9_19 + f8*g8_19 + f9_2*g7_19;
        let h7 = f0*g7 + f1  *g6    + f2*g5    + f3  *g4    + f4*g3    + f5  *g2    + f6*g1    + f7  *g0    + f8*g9_19 + f9  *g8_19;
        let h8 = f0*g8 + f1_2*g7    + f2*g6    + f3_2*g5    + f4*g4    + f5_2*g3    + f6*g2    + f7_2*g1    + f8*g0    + f9_2*g9_19;
        let h9 = f0*g9 + f1  *g8    + f2*g7    + f3  *g6    + f4*g5    + f5  *g4    + f6*g3    + f7  *g2    + f8*g1    + f9  *g0;

        FieldElement2625::reduce([h0, h1, h2, h3, h4, h5, h6, h7, h8, h9])
    }
}

define_mul_variants!(
    LHS = FieldElement2625,
    RHS = FieldElement2625,
    Output = FieldElement2625
);
define_mul_assign_variants!(LHS = FieldElement2625, RHS = FieldElement2625);

impl<'a> Neg for &'a FieldElement2625 {
    type Output = FieldElement2625;
    fn neg(self) -> FieldElement2625 {
        FieldElement2625(self.0.map(|limb| -limb))
    }
}

impl ConditionallySelectable for FieldElement2625 {
    fn conditional_select(
        a: &FieldElement2625,
        b: &FieldElement2625,
        choice: Choice,
    ) -> FieldElement2625 {
        let mut output = *a;
        output.conditional_assign(b, choice);
        output
    }

    fn conditional_assign(&mut self, other: &FieldElement2625, choice: Choice) {
        let mask = -i32::from(choice.unwrap_u8());
        for i in 0..10 {
            self.0[i] ^= mask & (self.0[i] ^ other.0[i]);
        }
    }

    fn conditional_swap(a: &mut FieldElement2625, b: &mut FieldElement2625, choice: Choice) {
        // mask is all ones when choice is 1, all zeros otherwise
        let mask = -i32::from(choice.unwrap_u8());
        for i in 0..10 {
            let x = mask & (a.0[i] ^ b.0[i]);
            a.0[i] ^= x;
            b.0[i] ^= x;
        }
    }
}

impl FieldElement2625 {
    pub(crate) const fn from_limbs(limbs: [i32; 10]) -> FieldElement2625 {
        FieldElement2625(limbs)
    }

    /// The scalar \\( 0 \\).
    pub(crate) const ZERO: FieldElement2625 = FieldElement2625::from_limbs([0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    /// The scalar \\( 1 \\).
    pub(crate) const ONE: FieldElement2625 = FieldElement2625::from_limbs([1, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    /// The scalar \\( -1 \\).
    #[cfg(test)]
    pub(crate) const MINUS_ONE: FieldElement2625 = FieldElement2625::from_limbs([-1, 0, 0, 0, 0, 0, 0, 0, 0, 0]);

    /// Checks `|t[i]| < terms * 2^LIMB_BITS[i]` for every limb. Only
    /// used in debug assertions.
    pub(crate) fn limbs_bounded(&self, terms: u32) -> bool {
        self.0
            .iter()
            .zip(LIMB_BITS.iter())
            .all(|(&limb, &bits)| i64::from(limb).abs() < i64::from(terms) << bits)
    }

    /// Given `k > 0`, return `self^(2^k)`.
    pub(crate) fn pow2k(&self, k: u32) -> FieldElement2625 {
        debug_assert!(k > 0);
        let mut z = self.square();
        for _ in 1..k {
            z = z.square();
        }
        z
    }

    /// Carry the 64-bit accumulators `h` of a product back into limbs.
    ///
    /// Each carry is rounded, `(h + 2^(w-1)) >> w`, which leaves every
    /// carried limb in `[-2^(w-1), 2^(w-1)]`. The carry out of limb 9
    /// wraps into limb 0 multiplied by 19. The chain is interleaved so
    /// that the two halves proceed in parallel.
    #[inline(always)]
    fn reduce(mut h: [i64; 10]) -> FieldElement2625 {
        #[inline(always)]
        fn carry(h: &mut [i64; 10], i: usize) {
            let bits = LIMB_BITS[i];
            let c = (h[i] + (1 << (bits - 1))) >> bits;
            h[i] -= c << bits;
            if i < 9 {
                h[i + 1] += c;
            } else {
                h[0] += 19 * c;
            }
        }

        // Bound analysis, for |h[i]| < 2^62 on input:
        // carry(0), carry(4) leave |h0|, |h4| <= 2^25 and add < 2^37 above.
        carry(&mut h, 0);
        carry(&mut h, 4);

        carry(&mut h, 1);
        carry(&mut h, 5);

        carry(&mut h, 2);
        carry(&mut h, 6);

        carry(&mut h, 3);
        carry(&mut h, 7);

        // h4 and h8 absorbed the carries from h3 and h7.
        carry(&mut h, 4);
        carry(&mut h, 8);

        // |19 * c9| < 2^42, so h0 may need one more carry.
        carry(&mut h, 9);
        carry(&mut h, 0);

        // After the final carry |h1| <= 2^24 + 2^17 and every other
        // limb is within half its width.
        FieldElement2625(h.map(|limb| limb as i32))
    }

    /// Load a `FieldElement2625` from the low 255 bits of a 256-bit
    /// input.
    ///
    /// Limb `i` is read from the little-endian 32-bit window starting
    /// at byte `LIMB_OFFSETS[i] / 8`, shifted down and masked to its
    /// width. The high bit of the input is ignored.
    pub(crate) fn from_bytes(data: &[u8; 32]) -> FieldElement2625 {
        #[inline]
        fn load4(b: &[u8]) -> u32 {
            u32::from_le_bytes([b[0], b[1], b[2], b[3]])
        }

        let mut limbs = [0i32; 10];
        for i in 0..10 {
            let offset = LIMB_OFFSETS[i];
            let window = load4(&data[(offset / 8) as usize..]);
            limbs[i] = ((window >> (offset % 8)) & ((1 << LIMB_BITS[i]) - 1)) as i32;
        }
        FieldElement2625(limbs)
    }

    /// Carry every limb into `[0, 2^LIMB_BITS[i])` with floor shifts.
    ///
    /// Two full passes suffice for any lazily combined input: the first
    /// leaves only limb 0 out of range, by at most `19 * |c9|`, and the
    /// second pass moves at most one unit across the top. The value
    /// afterwards lies in `[0, 2^255)`, which may still be `>= p`.
    pub(crate) fn to_positive_limbs(&self) -> [u32; 10] {
        let mut h = self.0;

        for _ in 0..2 {
            for i in 0..9 {
                let c = h[i] >> LIMB_BITS[i];
                h[i] -= c << LIMB_BITS[i];
                h[i + 1] += c;
            }
            let c = h[9] >> 25;
            h[9] -= c << 25;
            h[0] += 19 * c;
        }

        debug_assert!(h
            .iter()
            .zip(LIMB_BITS.iter())
            .all(|(&limb, &bits)| 0 <= limb && limb < (1 << bits)));

        h.map(|limb| limb as u32)
    }

    /// Serialize this `FieldElement2625` to a 32-byte array.  The
    /// encoding is canonical.
    pub(crate) fn as_bytes(&self) -> [u8; 32] {
        let mut h = self.to_positive_limbs();

        // Now 0 <= h < 2^255 < 2p, so h >= p exactly when h + 19
        // overflows 2^255. Compute h + 19 - 2^255 in t and read the
        // overflow off bit 255.
        let mut t = h;
        t[0] += 19;
        for i in 0..9 {
            t[i + 1] += t[i] >> LIMB_BITS[i];
            t[i] &= (1 << LIMB_BITS[i]) - 1;
        }
        let overflow = t[9] >> 25;
        t[9] &= (1 << 25) - 1;
        debug_assert!(overflow <= 1);

        // Take t when h >= p, without branching on it.
        let mask = overflow.wrapping_neg();
        for i in 0..10 {
            h[i] ^= mask & (h[i] ^ t[i]);
        }

        let mut s = [0u8; 32];
        let mut acc: u64 = 0;
        let mut acc_bits = 0;
        let mut k = 0;
        for i in 0..10 {
            acc |= u64::from(h[i]) << acc_bits;
            acc_bits += LIMB_BITS[i];
            while acc_bits >= 8 {
                s[k] = acc as u8;
                acc >>= 8;
                acc_bits -= 8;
                k += 1;
            }
        }
        // 255 bits leave seven in the accumulator for the last byte.
        debug_assert!(k == 31 && acc_bits == 7);
        s[31] = acc as u8;

        s
    }

    #[rustfmt::skip] // keep alignment of h* calculations
    fn square_inner(&self) -> [i64; 10] {
        debug_assert!(self.limbs_bounded(MAX_LAZY_TERMS));

        let x = self.0.map(i64::from);
        let (f0, f1, f2, f3, f4, f5, f6, f7, f8, f9) =
            (x[0], x[1], x[2], x[3], x[4], x[5], x[6], x[7], x[8], x[9]);

        let f0_2 = 2 * f0;
        let f1_2 = 2 * f1;
        let f2_2 = 2 * f2;
        let f3_2 = 2 * f3;
        let f4_2 = 2 * f4;
        let f5_2 = 2 * f5;
        let f6_2 = 2 * f6;
        let f7_2 = 2 * f7;
        let f5_38 = 38 * f5;
        let f6_19 = 19 * f6;
        let f7_38 = 38 * f7;
        let f8_19 = 19 * f8;
        let f9_38 = 38 * f9;

        let h0 = f0  *f0    + f1_2*f9_38 + f2_2*f8_19 + f3_2*f7_38 + f4_2*f6_19 + f5  *f5_38;
        let h1 = f0_2*f1    + f2  *f9_38 + f3_2*f8_19 + f4  *f7_38 + f5_2*f6_19;
        let h2 = f0_2*f2    + f1_2*f1    + f3_2*f9_38 + f4_2*f8_19 + f5_2*f7_38 + f6  *f6_19;
        let h3 = f0_2*f3    + f1_2*f2    + f4  *f9_38 + f5_2*f8_19 + f6  *f7_38;
        let h4 = f0_2*f4    + f1_2*f3_2  + f2  *f2    + f5_2*f9_38 + f6_2*f8_19 + f7  *f7_38;
        let h5 = f0_2*f5    + f1_2*f4    + f2_2*f3    + f6  *f9_38 + f7_2*f8_19;
        let h6 = f0_2*f6    + f1_2*f5_2  + f2_2*f4    + f3_2*f3    + f7_2*f9_38 + f8  *f8_19;
        let h7 = f0_2*f7    + f1_2*f6    + f2_2*f5    + f3_2*f4    + f8  *f9_38;
        let h8 = f0_2*f8    + f1_2*f7_2  + f2_2*f6    + f3_2*f5_2  + f4  *f4    + f9  *f9_38;
        let h9 = f0_2*f9    + f1_2*f8    + f2_2*f7    + f3_2*f6    + f4_2*f5;

        [h0, h1, h2, h3, h4, h5, h6, h7, h8, h9]
    }

    /// Compute `self^2`.
    pub(crate) fn square(&self) -> FieldElement2625 {
        FieldElement2625::reduce(self.square_inner())
    }

    /// Compute `k * self` for a small constant `k < 2^20`.
    pub(crate) fn mul_small(&self, k: u32) -> FieldElement2625 {
        debug_assert!(k < (1 << 20));
        debug_assert!(self.limbs_bounded(MAX_LAZY_TERMS));
        let k = i64::from(k);
        FieldElement2625::reduce(self.0.map(|limb| i64::from(limb) * k))
    }
}
