// -*- mode: rust; -*-
//
// This file is part of x25519-core.
// See LICENSE for licensing information.

//! Various constants, such as the X25519 basepoint and the coefficients
//! of the Montgomery curve.
//!
//! Curve25519 is the Montgomery curve
//! $$
//! v\^2 = u\^3 + A u\^2 + u
//! $$
//! over \\(\mathbb F\_p\\), \\(p = 2\^{255} - 19\\), with \\(A = 486662\\).

use crate::montgomery::MontgomeryPoint;
use crate::x25519::X25519_BASEPOINT_BYTES;

/// The X25519 basepoint, in `MontgomeryPoint` format.
pub const X25519_BASEPOINT: MontgomeryPoint = MontgomeryPoint(X25519_BASEPOINT_BYTES);

/// The Montgomery coefficient \\(A\\) of Curve25519.
pub const MONTGOMERY_A: u32 = 486662;

/// \\((A + 2) / 4\\), the constant of the ladder doubling formula.
pub const APLUS2_OVER_FOUR: u32 = 121666;

/// \\((A - 2) / 4\\). The ladder uses it alongside [`APLUS2_OVER_FOUR`]
/// to write the doubling as \\(E \cdot (121666 \cdot AA - 121665 \cdot BB)\\).
pub const AMINUS2_OVER_FOUR: u32 = 121665;

const _: () = {
    assert!(MONTGOMERY_A % 4 == 2);
    assert!((MONTGOMERY_A + 2) / 4 == APLUS2_OVER_FOUR);
    assert!((MONTGOMERY_A - 2) / 4 == AMINUS2_OVER_FOUR);
    // `mul_small` takes factors below 2^20.
    assert!(MONTGOMERY_A < (1 << 20));
};

#[cfg(test)]
mod test {
    use super::*;
    use crate::field::FieldElement;

    /// The basepoint has u = 9, and 9^3 + A*81 + 9 is a square mod p.
    #[test]
    fn basepoint_is_on_curve() {
        let u = FieldElement::from_bytes(X25519_BASEPOINT.as_bytes());
        // u*(u^2 + A*u) + u, at most two reduced terms per operand.
        let inner = &u.square() + &u.mul_small(MONTGOMERY_A);
        let rhs = &(&u * &inner) + &u;
        // Euler's criterion, with (p - 1)/2 = 2^254 - 10 = (2^250 - 1)*2^4 + 6.
        let (t19, _) = rhs.pow22501(); // rhs^(2^250 - 1)
        let t = t19.pow2k(4); // rhs^(2^254 - 16)
        let rhs2 = rhs.square();
        let rhs4 = rhs2.square();
        let rhs6 = &rhs4 * &rhs2;
        let legendre = &t * &rhs6; // rhs^(2^254 - 10)
        assert_eq!(legendre, FieldElement::ONE);
    }
}
