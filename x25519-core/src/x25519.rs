// -*- mode: rust; -*-
//
// This file is part of x25519-core.
// See LICENSE for licensing information.

//! x25519 Diffie-Hellman key exchange
//!
//! This implements x25519 key exchange as specified by Mike Hamburg
//! and Adam Langley in [RFC7748](https://tools.ietf.org/html/rfc7748).

use crate::montgomery::MontgomeryPoint;

/// The bare, byte-oriented x25519 function, exactly as specified in RFC7748.
///
/// Multiplies `peer_point`, read as a little-endian \\(u\\)-coordinate
/// with its top bit ignored, by the clamped `scalar`, and writes the
/// resulting \\(u\\)-coordinate to `shared_secret`.
///
/// This function never fails. In particular it does not reject peer
/// points of small order, for which the output is all zeroes; callers
/// that need to detect this must compare the output themselves.
///
/// # Example
///
/// ```
/// use x25519_core::{x25519, X25519_BASEPOINT_BYTES};
///
/// let alice_secret = [0x77u8; 32];
/// let mut alice_public = [0u8; 32];
/// x25519(&mut alice_public, &alice_secret, &X25519_BASEPOINT_BYTES);
/// assert_ne!(alice_public, [0u8; 32]);
/// ```
pub fn x25519(shared_secret: &mut [u8; 32], scalar: &[u8; 32], peer_point: &[u8; 32]) {
    *shared_secret = MontgomeryPoint(*peer_point)
        .mul_clamped(*scalar)
        .to_bytes();
}

/// The X25519 basepoint, for use with the bare, byte-oriented x25519
/// function.  This is provided for people who cannot use the typed
/// API; the same point is available as
/// [`constants::X25519_BASEPOINT`](crate::constants::X25519_BASEPOINT).
pub const X25519_BASEPOINT_BYTES: [u8; 32] = [
    9, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
];
