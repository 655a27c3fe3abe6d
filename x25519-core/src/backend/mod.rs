// -*- mode: rust; -*-
//
// This file is part of x25519-core.
// See LICENSE for licensing information.

//! **INTERNALS:** Pluggable implementations for different architectures.
//!
//! The backend code is split into two parts: a serial backend,
//! and a vector backend.
//!
//! The [`serial`] backend contains the 32-bit implementation of field
//! arithmetic, together with a [`FieldPair`] that runs two serial field
//! elements side by side.
//!
//! The `vector` backend packs limb \\(i\\) of two field elements into
//! one SSE2 register, so that each instruction of the ladder step
//! advances both rails at once.
//!
//! The Montgomery ladder is written once, generically over
//! [`FieldPair`]. The functions in this module pick the
//! implementation at runtime and hand it to the ladder; the ladder
//! itself never names a backend.

use crate::field::FieldElement;
use crate::montgomery::{self, MontgomeryPoint};

pub(crate) mod serial;

cfg_if::cfg_if! {
    if #[cfg(all(x25519_core_backend = "simd", target_arch = "x86_64"))] {
        pub(crate) mod vector;
    }
}

/// Two field elements carried through the ladder step together.
///
/// Values enter with [`FieldPair::tangle`] and leave with
/// [`FieldPair::untangle`]; everything in between operates on both
/// rails at once.
///
/// # Bounds
///
/// `tangle` accepts any lazily combined element that the serial
/// backend could contract. The untangled output of
/// [`FieldPair::product`], [`FieldPair::square`] and
/// [`FieldPair::scale_by_curve_constants`] may be multiplied by the
/// serial backend directly, or added/subtracted once before tangling
/// again. [`FieldPair::sum`] and [`FieldPair::difference`] must only be
/// applied to freshly tangled values or to the output of a
/// multiplication. Their results carry the `2p` bias of the vector
/// subtraction and must be tangled again, never multiplied serially.
pub(crate) trait FieldPair: Copy {
    /// Pack `(a, b)`.
    fn tangle(a: &FieldElement, b: &FieldElement) -> Self;

    /// Unpack into `(a, b)`.
    fn untangle(&self) -> (FieldElement, FieldElement);

    /// `(a0 + a1, b0 + b1)`
    fn sum(&self, rhs: &Self) -> Self;

    /// `(a0 - a1, b0 - b1)`
    fn difference(&self, rhs: &Self) -> Self;

    /// `(a0 * a1, b0 * b1)`
    fn product(&self, rhs: &Self) -> Self;

    /// `(a^2, b^2)`
    fn square(&self) -> Self;

    /// `(121666 * a, 121665 * b)`
    fn scale_by_curve_constants(&self) -> Self;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum BackendKind {
    #[cfg(all(x25519_core_backend = "simd", target_arch = "x86_64"))]
    Sse2,
    Serial,
}

#[inline]
pub(crate) fn get_selected_backend() -> BackendKind {
    #[cfg(all(x25519_core_backend = "simd", target_arch = "x86_64"))]
    {
        cpufeatures::new!(cpuid_sse2, "sse2");
        let token_sse2: cpuid_sse2::InitToken = cpuid_sse2::init();
        if token_sse2.get() {
            return BackendKind::Sse2;
        }
    }

    BackendKind::Serial
}

/// Run the Montgomery ladder over `bits` on the fastest available
/// backend.
pub(crate) fn mul_bits_be<I>(point: &MontgomeryPoint, bits: I) -> MontgomeryPoint
where
    I: Iterator<Item = bool>,
{
    let backend = get_selected_backend();

    #[cfg(feature = "log")]
    log::trace!("x25519-core: Montgomery ladder on {:?} backend", backend);

    match backend {
        #[cfg(all(x25519_core_backend = "simd", target_arch = "x86_64"))]
        BackendKind::Sse2 => {
            montgomery::mul_bits_be_with::<vector::sse2::FieldElement2625x2, I>(point, bits)
        }
        BackendKind::Serial => {
            montgomery::mul_bits_be_with::<serial::SerialFieldPair, I>(point, bits)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    #[cfg(all(x25519_core_backend = "simd", target_arch = "x86_64"))]
    fn sse2_is_selected_on_x86_64() {
        // SSE2 is part of the x86_64 baseline.
        assert_eq!(get_selected_backend(), BackendKind::Sse2);
    }

    #[test]
    #[cfg(not(all(x25519_core_backend = "simd", target_arch = "x86_64")))]
    fn serial_is_selected_without_simd() {
        assert_eq!(get_selected_backend(), BackendKind::Serial);
    }
}
