// -*- mode: rust; -*-
//
// This file is part of x25519-core.
// See LICENSE for licensing information.

//! Benchmark the X25519 function.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use rand::RngCore;

use x25519_core::{x25519, MontgomeryPoint, X25519_BASEPOINT_BYTES};

fn random_bytes() -> [u8; 32] {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes
}

fn bench_x25519(c: &mut Criterion) {
    let mut bob_public = [0u8; 32];
    x25519(&mut bob_public, &random_bytes(), &X25519_BASEPOINT_BYTES);

    c.bench_function("x25519", move |b| {
        b.iter_with_setup(random_bytes, |alice_secret| {
            let mut shared = [0u8; 32];
            x25519(&mut shared, &alice_secret, black_box(&bob_public));
            shared
        })
    });
}

fn bench_mul_base_clamped(c: &mut Criterion) {
    let secret = random_bytes();

    c.bench_function("MontgomeryPoint::mul_base_clamped", move |b| {
        b.iter(|| MontgomeryPoint::mul_base_clamped(black_box(secret)))
    });
}

criterion_group! {
    name = x25519_benches;
    config = Criterion::default();
    targets =
        bench_x25519,
        bench_mul_base_clamped,
}
criterion_main! {
    x25519_benches,
}
