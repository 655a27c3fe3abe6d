// -*- mode: rust; -*-
//
// This file is part of x25519-core.
// See LICENSE for licensing information.

//! SSE2 dual-rail field arithmetic.

pub(crate) mod field;

pub(crate) use self::field::FieldElement2625x2;
