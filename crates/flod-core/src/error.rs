use thiserror::Error;

/// Errors the FLOD packet codec can return to a caller.
///
/// Internal candidate-rejection during trial decryption (wrong RSA key,
/// garbled OAEP block) never surfaces here — it advances the trial loop
/// silently, see [`crate::driver::disassemble`].
#[derive(Debug, Error)]
pub enum FlodError {
    /// No private key in the provider decrypted the header sentinel.
    #[error("no matching RSA key for this message")]
    NoMatchingRSAKeyForMessage,

    /// The header advertised a known signer key but the PSS signature did
    /// not verify. A security event, not a routine mismatch.
    #[error("signature verification failed")]
    SignatureVerificationFailed,

    /// The HMAC over the content block did not match. A security event.
    #[error("HMAC verification failed")]
    HMACVerificationFailed,

    /// A candidate key passed the identification-string sentinel check but
    /// the packet was structurally invalid afterwards (bad DER, padding
    /// failure). Distinct from a key mismatch: retrying other keys would
    /// not help and must not be attempted.
    #[error("malformed packet: {0}")]
    MalformedPacket(String),

    #[error("PKCS#7 padding invalid")]
    Pkcs7PaddingInvalid,

    #[error("RSA operation failed: {0}")]
    RsaOperation(String),

    #[error("ASN.1 DER decode failed: {0}")]
    Asn1Decode(String),

    #[error("ASN.1 DER encode failed: {0}")]
    Asn1Encode(String),

    #[error("timestamp is not valid UTF-8 or does not match the expected format: {0}")]
    InvalidTimestamp(String),

    #[error("RSA key too small for a FLOD header ({0} bytes available, header needs {1})")]
    RecipientKeyTooSmall(usize, usize),
}

pub type FlodResult<T> = std::result::Result<T, FlodError>;

impl From<der::Error> for FlodError {
    fn from(e: der::Error) -> Self {
        FlodError::Asn1Decode(e.to_string())
    }
}
