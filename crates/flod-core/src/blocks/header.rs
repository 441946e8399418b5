//! Header block: assembly, chunked RSA encryption, trial decryption, and
//! parsing (spec §4.5).
//!
//! Trial decryption of a single candidate key is the one place the
//! anti-oracle discipline from §4.2/§7 matters: every failure up to and
//! including a sentinel mismatch must look the same to a caller as "wrong
//! key", while every failure past that point is a genuine protocol error.

use der::asn1::OctetString;
use rsa::{RsaPrivateKey, RsaPublicKey};

use crate::asn1::{
    self, identification_string_offset, sentinel_matches, AlgorithmIdentifier, MPHeader,
    MPHeaderContainer,
};
use crate::constants::{ID_NO_SIGN, ID_RSAES_OAEP, ID_RSASSA_PSS, IDENTIFICATION_STRING};
use crate::error::{FlodError, FlodResult};
use crate::primitives::rsa::{
    key_size_bytes, public_key_size_bytes, rsa_decrypt_block, rsa_encrypt_block,
    rsa_max_plaintext_len, rsa_sign,
};
use crate::primitives::random_bytes;

/// Build and RSA-OAEP-encrypt `MPHeaderContainer` for `recipient_pub`.
///
/// `signer` is `Some((sender_private_key, sender_pgp_id))` to produce a real
/// RSASSA-PSS signature over `aes_key || hmac_key`, or `None` to produce
/// decoy `PGPKeyID`/`signature` bytes indistinguishable in length from the
/// signed case (spec §3 invariant: `|signature| == recipient RSA block size`).
pub fn assemble(
    aes_key: &[u8; 16],
    hmac_key: &[u8; 20],
    recipient_pub: &RsaPublicKey,
    signer: Option<(&RsaPrivateKey, [u8; 8])>,
) -> FlodResult<MPHeaderContainer> {
    let recipient_size = public_key_size_bytes(recipient_pub);
    let max_chunk = rsa_max_plaintext_len(recipient_size);
    if max_chunk == 0 {
        return Err(FlodError::RecipientKeyTooSmall(recipient_size, 1));
    }

    let (signature_algorithm, pgp_key_id, signature) = match signer {
        Some((sender_priv, sender_id)) => {
            let mut sign_content = Vec::with_capacity(32);
            sign_content.extend_from_slice(aes_key);
            sign_content.extend_from_slice(hmac_key);
            let sig = rsa_sign(&sign_content, sender_priv)?;
            (
                AlgorithmIdentifier::new(ID_RSASSA_PSS),
                sender_id.to_vec(),
                sig,
            )
        }
        None => {
            let decoys = random_bytes(&[8, recipient_size]);
            (
                AlgorithmIdentifier::new(ID_NO_SIGN),
                decoys[0].clone(),
                decoys[1].clone(),
            )
        }
    };

    let mp_header = MPHeader {
        identification_string: OctetString::new(IDENTIFICATION_STRING.to_vec())
            .map_err(|e| FlodError::Asn1Encode(e.to_string()))?,
        signature_algorithm,
        pgp_key_id: OctetString::new(pgp_key_id).map_err(|e| FlodError::Asn1Encode(e.to_string()))?,
        signature: OctetString::new(signature).map_err(|e| FlodError::Asn1Encode(e.to_string()))?,
        hmac_key: OctetString::new(hmac_key.to_vec())
            .map_err(|e| FlodError::Asn1Encode(e.to_string()))?,
        aes_key: OctetString::new(aes_key.to_vec())
            .map_err(|e| FlodError::Asn1Encode(e.to_string()))?,
    };

    let header_der = asn1::encode(&mp_header)?;

    let mut encrypted_header = Vec::new();
    for chunk in header_der.chunks(max_chunk) {
        encrypted_header.extend(rsa_encrypt_block(chunk, recipient_pub)?);
    }

    Ok(MPHeaderContainer {
        encryption_algorithm: AlgorithmIdentifier::new(ID_RSAES_OAEP),
        encrypted_header: OctetString::new(encrypted_header)
            .map_err(|e| FlodError::Asn1Encode(e.to_string()))?,
    })
}

/// Attempt trial decryption of `encrypted_header` against one candidate
/// private key (spec §4.5 "Disassemble (single candidate key)").
///
/// `Ok(Some(header))` — this key is the intended recipient, header decoded.
/// `Ok(None)` — reject silently, try the next key (wrong key size, OAEP
/// failure, or sentinel mismatch — all look identical to a caller).
/// `Err(_)` — the sentinel matched (we *are* the recipient) but the
/// remaining chunks didn't decrypt or didn't form valid DER. This is a
/// protocol-level error, not a key mismatch, and must not be retried.
pub fn try_decrypt(
    encrypted_header: &[u8],
    candidate: &RsaPrivateKey,
) -> FlodResult<Option<MPHeader>> {
    let key_size = key_size_bytes(candidate);
    if key_size == 0 || encrypted_header.len() < key_size {
        return Ok(None);
    }
    if encrypted_header.len() % key_size != 0 {
        return Ok(None);
    }

    let first_block = match rsa_decrypt_block(&encrypted_header[..key_size], candidate) {
        Ok(pt) => pt,
        Err(_) => {
            tracing::trace!(key_size_bytes = key_size, "candidate RSA key rejected");
            return Ok(None);
        }
    };

    if first_block.len() < 2 {
        return Ok(None);
    }
    let offset = identification_string_offset(&first_block);
    if !sentinel_matches(&first_block, offset, &IDENTIFICATION_STRING) {
        tracing::trace!(key_size_bytes = key_size, "candidate RSA key sentinel mismatch");
        return Ok(None);
    }

    tracing::debug!(key_size_bytes = key_size, "message is for this key");

    let mut header_der = first_block;
    for chunk in encrypted_header[key_size..].chunks(key_size) {
        let pt = rsa_decrypt_block(chunk, candidate)
            .map_err(|e| FlodError::MalformedPacket(format!("header chunk decrypt failed: {e}")))?;
        header_der.extend(pt);
    }

    let header: MPHeader = asn1::decode(&header_der)
        .map_err(|e| FlodError::MalformedPacket(format!("MPHeader decode failed: {e}")))?;

    Ok(Some(header))
}
