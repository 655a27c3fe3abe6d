// -*- mode: rust; -*-
//
// This file is part of x25519-core.
// See LICENSE for licensing information.

//! This module defines a wrapper over the SSE2 integer vector type to
//! make it more convenient to use.
//!
//! A `u64x2` is an `__m128i` viewed as two unsigned 64-bit lanes. Only
//! the operations the field code needs are provided.

use core::arch::x86_64::{
    __m128i, _mm_add_epi64, _mm_and_si128, _mm_cmpeq_epi8, _mm_movemask_epi8, _mm_mul_epu32,
    _mm_set1_epi64x, _mm_set_epi64x, _mm_slli_epi64, _mm_srli_epi64, _mm_sub_epi64,
};
use core::ops::{Add, AddAssign, BitAnd, BitAndAssign, Sub};

#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug)]
#[repr(transparent)]
pub(crate) struct u64x2(__m128i);

impl From<u64x2> for __m128i {
    #[inline]
    fn from(value: u64x2) -> __m128i {
        value.0
    }
}

impl From<__m128i> for u64x2 {
    #[inline]
    fn from(value: __m128i) -> u64x2 {
        u64x2(value)
    }
}

impl PartialEq for u64x2 {
    #[inline]
    fn eq(&self, rhs: &u64x2) -> bool {
        unsafe {
            let m = _mm_cmpeq_epi8(self.0, rhs.0);
            _mm_movemask_epi8(m) == 0xffff
        }
    }
}

impl Eq for u64x2 {}

impl Add for u64x2 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: u64x2) -> Self {
        unsafe { _mm_add_epi64(self.0, rhs.0).into() }
    }
}

impl AddAssign for u64x2 {
    #[inline]
    fn add_assign(&mut self, rhs: u64x2) {
        *self = *self + rhs
    }
}

impl Sub for u64x2 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: u64x2) -> Self {
        unsafe { _mm_sub_epi64(self.0, rhs.0).into() }
    }
}

impl BitAnd for u64x2 {
    type Output = Self;

    #[inline]
    fn bitand(self, rhs: u64x2) -> Self {
        unsafe { _mm_and_si128(self.0, rhs.0).into() }
    }
}

impl BitAndAssign for u64x2 {
    #[inline]
    fn bitand_assign(&mut self, rhs: u64x2) {
        *self = *self & rhs;
    }
}

impl u64x2 {
    /// A constified variant of `new`.
    ///
    /// Should only be called from `const` contexts. At runtime `new` is
    /// going to be faster.
    #[inline]
    pub(crate) const fn new_const(x0: u64, x1: u64) -> Self {
        // SAFETY: Transmuting between an array and a SIMD type of the
        // same size is safe; lane 0 is the low half of the register.
        unsafe { Self(core::mem::transmute::<[u64; 2], __m128i>([x0, x1])) }
    }

    /// A constified variant of `splat`.
    #[inline]
    pub(crate) const fn splat_const<const N: u64>() -> Self {
        Self::new_const(N, N)
    }

    /// Constructs a new instance with lane 0 set to `x0`.
    #[inline]
    pub(crate) fn new(x0: u64, x1: u64) -> u64x2 {
        unsafe { _mm_set_epi64x(x1 as i64, x0 as i64).into() }
    }

    /// Constructs a new instance with all of the elements initialized
    /// to the given value.
    #[inline]
    pub(crate) fn splat(x: u64) -> u64x2 {
        unsafe { _mm_set1_epi64x(x as i64).into() }
    }

    #[inline]
    pub(crate) fn shl<const N: i32>(self) -> Self {
        unsafe { _mm_slli_epi64::<N>(self.0).into() }
    }

    #[inline]
    pub(crate) fn shr<const N: i32>(self) -> Self {
        unsafe { _mm_srli_epi64::<N>(self.0).into() }
    }

    /// Multiply the low unsigned 32 bits of each lane, producing a full
    /// 64-bit product per lane.
    #[inline]
    pub(crate) fn mul32(self, rhs: u64x2) -> u64x2 {
        unsafe { _mm_mul_epu32(self.0, rhs.0).into() }
    }

    #[inline]
    pub(crate) fn extract<const N: usize>(self) -> u64 {
        // SAFETY: as in `new_const`.
        let lanes = unsafe { core::mem::transmute::<__m128i, [u64; 2]>(self.0) };
        lanes[N]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn lanes_roundtrip() {
        let x = u64x2::new(1, u64::MAX);
        assert_eq!(x.extract::<0>(), 1);
        assert_eq!(x.extract::<1>(), u64::MAX);
        assert_eq!(x, u64x2::new_const(1, u64::MAX));
        assert_eq!(u64x2::splat(7), u64x2::splat_const::<7>());
    }

    #[test]
    fn mul32_uses_low_halves() {
        let x = u64x2::new((5 << 32) | 0xffff_ffff, 3);
        let y = u64x2::new(2, (9 << 32) | 4);
        let z = x.mul32(y);
        assert_eq!(z.extract::<0>(), 0xffff_ffff * 2);
        assert_eq!(z.extract::<1>(), 12);
    }

    #[test]
    fn shifts_are_logical() {
        let x = u64x2::new(1 << 63, 3);
        assert_eq!(x.shr::<62>().extract::<0>(), 2);
        assert_eq!(x.shl::<1>().extract::<0>(), 0);
        assert_eq!(x.shl::<1>().extract::<1>(), 6);
        assert_eq!((x - u64x2::splat(4)).extract::<1>(), u64::MAX);
    }
}
