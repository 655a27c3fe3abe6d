//! This selects the x25519_core_backend

#![deny(clippy::unwrap_used, dead_code)]

use std::env;

fn main() {
    let target_arch = match env::var("CARGO_CFG_TARGET_ARCH") {
        Ok(arch) => arch,
        _ => "".to_string(),
    };

    // Backend overrides / defaults
    let x25519_core_backend = match env::var("CARGO_CFG_X25519_CORE_BACKEND").as_deref() {
        Ok("serial") => "serial",
        Ok("simd") => {
            // simd can only be enabled on x86_64
            match is_capable_simd(&target_arch) {
                true => "simd",
                false => panic!("Could not override x25519_core_backend to simd"),
            }
        }
        Ok(other) => panic!(
            "x25519_core_backend must be \"serial\" or \"simd\", found {:?}",
            other
        ),
        // default between serial / simd (if potentially capable)
        Err(_) => match is_capable_simd(&target_arch) {
            true => "simd",
            false => "serial",
        },
    };
    println!("cargo:rustc-cfg=x25519_core_backend=\"{x25519_core_backend}\"");
}

// Is the target arch potentially simd capable ?
fn is_capable_simd(arch: &str) -> bool {
    arch == "x86_64"
}
