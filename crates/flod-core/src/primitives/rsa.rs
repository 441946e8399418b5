use rsa::traits::{PublicKeyParts, RandomizedEncryptor};
use rsa::{oaep, pss, RsaPrivateKey, RsaPublicKey};
use sha1::Sha1;
use signature::{RandomizedSigner, Verifier};

use crate::constants::OAEP_SHA1_OVERHEAD;
use crate::error::{FlodError, FlodResult};

/// How many plaintext bytes fit in one RSA-OAEP-SHA1 block for a key of
/// this modulus size, per §4.6: `keyBits/8 - 42`.
pub fn rsa_max_plaintext_len(key_size_bytes: usize) -> usize {
    key_size_bytes.saturating_sub(OAEP_SHA1_OVERHEAD)
}

/// RSA-OAEP (SHA-1, MGF1-SHA-1, empty label) encryption of a single block.
/// `|plaintext| <= key_size_bytes - 42`, output is exactly `key_size_bytes`.
pub fn rsa_encrypt_block(plaintext: &[u8], public_key: &RsaPublicKey) -> FlodResult<Vec<u8>> {
    let encrypting_key = oaep::EncryptingKey::<Sha1>::new(public_key.clone());
    let mut rng = rand::rngs::OsRng;
    encrypting_key
        .encrypt_with_rng(&mut rng, plaintext)
        .map_err(|e| FlodError::RsaOperation(e.to_string()))
}

/// RSA-OAEP (SHA-1, MGF1-SHA-1, empty label) decryption of a single block.
/// Fails whenever the block is not valid for this key — this is the
/// "wrong recipient" signal the trial-decryption loop relies on.
pub fn rsa_decrypt_block(ciphertext: &[u8], private_key: &RsaPrivateKey) -> FlodResult<Vec<u8>> {
    let decrypting_key = oaep::DecryptingKey::<Sha1>::new(private_key.clone());
    use rsa::traits::Decryptor;
    decrypting_key
        .decrypt(ciphertext)
        .map_err(|e| FlodError::RsaOperation(e.to_string()))
}

/// Maximum PSS salt length for this key/hash combination, per RFC 8017
/// §9.1.1: `emLen - hLen - 2` where `emLen` is the modulus size in bytes.
fn max_pss_salt_len(modulus_bytes: usize) -> usize {
    modulus_bytes.saturating_sub(crate::constants::SHA1_DIGEST_LEN + 2)
}

/// RSASSA-PSS (SHA-1, MGF1-SHA-1, maximum salt length) signature.
pub fn rsa_sign(message: &[u8], private_key: &RsaPrivateKey) -> FlodResult<Vec<u8>> {
    let salt_len = max_pss_salt_len(private_key.size());
    let signing_key = pss::SigningKey::<Sha1>::new_with_salt_len(private_key.clone(), salt_len);
    let mut rng = rand::rngs::OsRng;
    let signature = signing_key
        .try_sign_with_rng(&mut rng, message)
        .map_err(|e| FlodError::RsaOperation(e.to_string()))?;
    let bytes: Box<[u8]> = signature.into();
    Ok(bytes.into_vec())
}

/// RSASSA-PSS (SHA-1, MGF1-SHA-1, maximum salt length) verification.
pub fn rsa_verify(message: &[u8], signature_bytes: &[u8], public_key: &RsaPublicKey) -> bool {
    let salt_len = max_pss_salt_len(public_key.size());
    let verifying_key = pss::VerifyingKey::<Sha1>::new_with_salt_len(public_key.clone(), salt_len);
    let Ok(sig) = pss::Signature::try_from(signature_bytes) else {
        return false;
    };
    verifying_key.verify(message, &sig).is_ok()
}

/// RSA modulus size in bytes (`keyBits / 8`).
pub fn key_size_bytes(private_key: &RsaPrivateKey) -> usize {
    private_key.n().bits().div_ceil(8)
}

pub fn public_key_size_bytes(public_key: &RsaPublicKey) -> usize {
    public_key.n().bits().div_ceil(8)
}
