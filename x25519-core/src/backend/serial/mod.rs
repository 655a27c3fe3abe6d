// -*- mode: rust; -*-
//
// This file is part of x25519-core.
// See LICENSE for licensing information.

//! Serial implementations of field arithmetic.
//!
//! The [`u32`] module holds the radix-\\(2\^{25.5}\\) field element. The
//! [`pair`] module drives two of them through the ladder's dual-rail
//! interface, which is what runs whenever the vector backend is not
//! available.

pub(crate) mod u32;

pub(crate) mod pair;

pub(crate) use self::pair::SerialFieldPair;
