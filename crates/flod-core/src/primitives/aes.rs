use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit, generic_array::GenericArray};
use aes::Aes128;

use super::padding::{pkcs7_pad, pkcs7_unpad};
use crate::constants::AES_BLOCK_SIZE;
use crate::error::FlodResult;

/// AES-128-CBC encrypt `plaintext` under `key`/`iv`, PKCS#7-padding it to a
/// block boundary first.
pub fn aes_encrypt(plaintext: &[u8], key: &[u8; 16], iv: &[u8; 16]) -> Vec<u8> {
    let padded = pkcs7_pad(plaintext, AES_BLOCK_SIZE);
    let cipher = Aes128::new(GenericArray::from_slice(key));

    let mut ciphertext = Vec::with_capacity(padded.len());
    let mut prev = *iv;

    for chunk in padded.chunks_exact(AES_BLOCK_SIZE) {
        let mut block = [0u8; AES_BLOCK_SIZE];
        for i in 0..AES_BLOCK_SIZE {
            block[i] = chunk[i] ^ prev[i];
        }
        let mut block_ga = GenericArray::from(block);
        cipher.encrypt_block(&mut block_ga);
        prev.copy_from_slice(&block_ga);
        ciphertext.extend_from_slice(&block_ga);
    }

    ciphertext
}

/// AES-128-CBC decrypt `ciphertext` under `key`/`iv`, then remove the
/// PKCS#7 padding. Fails with [`crate::error::FlodError::Pkcs7PaddingInvalid`]
/// on malformed padding or a non-block-aligned ciphertext.
pub fn aes_decrypt(ciphertext: &[u8], key: &[u8; 16], iv: &[u8; 16]) -> FlodResult<Vec<u8>> {
    if ciphertext.is_empty() || !ciphertext.len().is_multiple_of(AES_BLOCK_SIZE) {
        return Err(crate::error::FlodError::Pkcs7PaddingInvalid);
    }

    let cipher = Aes128::new(GenericArray::from_slice(key));
    let mut plaintext = Vec::with_capacity(ciphertext.len());
    let mut prev = *iv;

    for chunk in ciphertext.chunks_exact(AES_BLOCK_SIZE) {
        let saved: [u8; AES_BLOCK_SIZE] = chunk.try_into().unwrap();
        let mut block = GenericArray::clone_from_slice(chunk);
        cipher.decrypt_block(&mut block);
        for i in 0..AES_BLOCK_SIZE {
            plaintext.push(block[i] ^ prev[i]);
        }
        prev = saved;
    }

    pkcs7_unpad(&plaintext, AES_BLOCK_SIZE)
}
