// -*- mode: rust; -*-
//
// This file is part of x25519-core.
// See LICENSE for licensing information.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
//------------------------------------------------------------------------
// Documentation:
//------------------------------------------------------------------------
#![doc = include_str!("../README.md")]
//------------------------------------------------------------------------
// Linting:
//------------------------------------------------------------------------
#![cfg_attr(
    not(test),
    warn(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::panic_in_result_fn
    )
)]
#![warn(
    clippy::cast_lossless,
    clippy::checked_conversions,
    missing_docs,
    rust_2018_idioms,
    unused_lifetimes,
    unused_qualifications
)]
#![allow(clippy::needless_range_loop)]

//------------------------------------------------------------------------
// External dependencies:
//------------------------------------------------------------------------

#[cfg(test)]
#[macro_use]
extern crate std;

// Internal macros. Must come first!
#[macro_use]
pub(crate) mod macros;

//------------------------------------------------------------------------
// x25519-core public modules
//------------------------------------------------------------------------

// Scalar multiplication on the Montgomery form of Curve25519
pub mod montgomery;

// Useful constants, like the X25519 basepoint
pub mod constants;

//------------------------------------------------------------------------
// x25519-core internal modules
//------------------------------------------------------------------------

// Finite field arithmetic mod p = 2^255 - 19
pub(crate) mod field;

// Arithmetic backends (serial 32-bit limbs, SSE2 dual-rail) live here
pub(crate) mod backend;

// The X25519 function itself
mod x25519;

//------------------------------------------------------------------------
// Re-exports
//------------------------------------------------------------------------

pub use crate::montgomery::{clamp_integer, MontgomeryPoint};
pub use crate::x25519::{x25519, X25519_BASEPOINT_BYTES};
