//! Thin, reentrant bindings over the cryptographic primitives the packet
//! codec composes. Each primitive is a contract (§4.1): the rest of the
//! crate only ever calls through this module, never a crypto crate
//! directly, so the wire-mandated algorithm choices (SHA-1, AES-128-CBC)
//! live in exactly one place.

pub mod aes;
pub mod hmac;
pub mod padding;
pub mod rsa;

use rand::RngCore;

/// Generate cryptographically random byte strings of the requested sizes.
///
/// Assembly calls this with `[16, 16, 20]` for `(iv, aes_key, hmac_key)`.
pub fn random_bytes(sizes: &[usize]) -> Vec<Vec<u8>> {
    let mut rng = rand::rngs::OsRng;
    sizes
        .iter()
        .map(|&len| {
            let mut buf = vec![0u8; len];
            rng.fill_bytes(&mut buf);
            buf
        })
        .collect()
}
