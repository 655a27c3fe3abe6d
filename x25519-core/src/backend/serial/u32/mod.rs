// -*- mode: rust; -*-
//
// This file is part of x25519-core.
// See LICENSE for licensing information.

//! The `u32` backend uses `u32`s and a `(u32, u32) -> u64` multiplier.
//!
//! Limbs are stored signed so that lazily computed differences need no
//! bias. Every product fits in an `i64` accumulator.

pub(crate) mod field;

pub(crate) mod constants;
