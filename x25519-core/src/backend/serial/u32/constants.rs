// -*- mode: rust; -*-
//
// This file is part of x25519-core.
// See LICENSE for licensing information.

//! Limb layout of the radix-\\(2\^{25.5}\\) representation.
//!
//! Limb \\(i\\) sits at bit offset \\(\lceil 25.5 i \rceil\\) and is
//! `LIMB_BITS[i]` wide, so a field element is
//! $$
//! t\_0 + t\_1 2\^{26} + t\_2 2\^{51} + t\_3 2\^{77} + \cdots + t\_9 2\^{230}.
//! $$

/// Width in bits of each limb, alternating 26 and 25.
pub(crate) const LIMB_BITS: [u32; 10] = [26, 25, 26, 25, 26, 25, 26, 25, 26, 25];

/// Bit offset of each limb within the 255-bit value.
pub(crate) const LIMB_OFFSETS: [u32; 10] = limb_offsets();

/// The largest number of reduced elements that may be summed (or
/// subtracted) before the result is fed to a multiply or a square.
pub(crate) const MAX_LAZY_TERMS: u32 = 2;

const fn limb_offsets() -> [u32; 10] {
    let mut offsets = [0u32; 10];
    let mut i = 1;
    while i < 10 {
        offsets[i] = offsets[i - 1] + LIMB_BITS[i - 1];
        i += 1;
    }
    offsets
}

const _: () = {
    assert!(LIMB_OFFSETS[9] + LIMB_BITS[9] == 255);
    let mut i = 0;
    while i < 10 {
        // ceil(25.5 * i)
        assert!(LIMB_OFFSETS[i] == (51 * i as u32 + 1) / 2);
        // Each limb is read from one little-endian 32-bit window.
        assert!(LIMB_OFFSETS[i] % 8 + LIMB_BITS[i] <= 32);
        assert!(LIMB_OFFSETS[i] / 8 + 4 <= 32);
        i += 1;
    }
};
