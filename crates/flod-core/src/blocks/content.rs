//! Content block: timestamp + payload serialization and AES encryption
//! (spec §4.3).

use chrono::{NaiveDateTime, Utc};
use der::asn1::{OctetString, Utf8String};

use crate::asn1::{self, AlgorithmIdentifier, MPContent, MPContentContainer};
use crate::constants::{ID_AES_128_CBC, TIMESTAMP_FORMAT};
use crate::error::{FlodError, FlodResult};
use crate::primitives::aes::{aes_decrypt, aes_encrypt};

/// Build `MPContentContainer` from a plaintext payload: timestamp it with
/// the current UTC wall clock, DER-encode, AES-128-CBC/PKCS7 encrypt.
pub fn assemble(content: &str, key: &[u8; 16], iv: &[u8; 16]) -> FlodResult<MPContentContainer> {
    let mp_content = MPContent {
        timestamp: Utf8String::new(&Utc::now().format(TIMESTAMP_FORMAT).to_string())
            .map_err(|e| FlodError::Asn1Encode(e.to_string()))?,
        content: Utf8String::new(content).map_err(|e| FlodError::Asn1Encode(e.to_string()))?,
    };
    let mp_content_der = asn1::encode(&mp_content)?;
    let ciphertext = aes_encrypt(&mp_content_der, key, iv);

    Ok(MPContentContainer {
        initialization_vector: OctetString::new(iv.to_vec())
            .map_err(|e| FlodError::Asn1Encode(e.to_string()))?,
        encryption_algorithm: AlgorithmIdentifier::new(ID_AES_128_CBC),
        encrypted_content: OctetString::new(ciphertext)
            .map_err(|e| FlodError::Asn1Encode(e.to_string()))?,
    })
}

/// Decrypt and decode an `MPContentContainer`, recovering `(timestamp,
/// message)`. Fails with [`FlodError::Pkcs7PaddingInvalid`] on a bad AES
/// key/IV, or [`FlodError::MalformedPacket`] if the decrypted bytes are not
/// a valid `MPContent` DER encoding.
pub fn disassemble(
    container: &MPContentContainer,
    key: &[u8; 16],
) -> FlodResult<(NaiveDateTime, String)> {
    let iv_bytes = container.initialization_vector.as_bytes();
    let iv: [u8; 16] = iv_bytes
        .try_into()
        .map_err(|_| FlodError::MalformedPacket("initializationVector is not 16 bytes".into()))?;

    let plaintext_der = aes_decrypt(container.encrypted_content.as_bytes(), key, &iv)?;
    let mp_content: MPContent = asn1::decode(&plaintext_der)
        .map_err(|e| FlodError::MalformedPacket(format!("MPContent decode failed: {e}")))?;

    let timestamp = NaiveDateTime::parse_from_str(mp_content.timestamp.as_str(), TIMESTAMP_FORMAT)
        .map_err(|e| FlodError::InvalidTimestamp(e.to_string()))?;

    Ok((timestamp, mp_content.content.as_str().to_string()))
}
