// -*- mode: rust; -*-
//
// This file is part of x25519-core.
// See LICENSE for licensing information.

//! Vectorized field arithmetic.
//!
//! Only SSE2 is targeted: the ladder has exactly two independent rails
//! per step, which is the width of one `__m128i` holding two 64-bit
//! lanes. SSE2 is part of the `x86_64` baseline, so the runtime check
//! in [`crate::backend::get_selected_backend`] only ever fails on
//! exotic targets.

pub(crate) mod packed_simd;

pub(crate) mod sse2;
