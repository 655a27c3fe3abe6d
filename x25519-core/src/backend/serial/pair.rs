// -*- mode: rust; -*-
//
// This file is part of x25519-core.
// See LICENSE for licensing information.

//! A [`FieldPair`] made of two independent serial field elements.

use crate::backend::FieldPair;
use crate::constants::{AMINUS2_OVER_FOUR, APLUS2_OVER_FOUR};
use crate::field::FieldElement;

/// Both rails of the ladder step, computed one after the other.
#[derive(Copy, Clone, Debug)]
pub(crate) struct SerialFieldPair(FieldElement, FieldElement);

impl FieldPair for SerialFieldPair {
    #[inline]
    fn tangle(a: &FieldElement, b: &FieldElement) -> SerialFieldPair {
        SerialFieldPair(*a, *b)
    }

    #[inline]
    fn untangle(&self) -> (FieldElement, FieldElement) {
        (self.0, self.1)
    }

    #[inline]
    fn sum(&self, rhs: &SerialFieldPair) -> SerialFieldPair {
        SerialFieldPair(&self.0 + &rhs.0, &self.1 + &rhs.1)
    }

    #[inline]
    fn difference(&self, rhs: &SerialFieldPair) -> SerialFieldPair {
        SerialFieldPair(&self.0 - &rhs.0, &self.1 - &rhs.1)
    }

    #[inline]
    fn product(&self, rhs: &SerialFieldPair) -> SerialFieldPair {
        SerialFieldPair(&self.0 * &rhs.0, &self.1 * &rhs.1)
    }

    #[inline]
    fn square(&self) -> SerialFieldPair {
        SerialFieldPair(self.0.square(), self.1.square())
    }

    #[inline]
    fn scale_by_curve_constants(&self) -> SerialFieldPair {
        SerialFieldPair(
            self.0.mul_small(APLUS2_OVER_FOUR),
            self.1.mul_small(AMINUS2_OVER_FOUR),
        )
    }
}
