//! HMAC block: integrity tag over the DER encoding of `MPContentContainer`
//! (spec §4.4).

use der::asn1::OctetString;
use subtle::ConstantTimeEq;

use crate::asn1::{AlgorithmIdentifier, MPHMACContainer};
use crate::constants::ID_SHA1;
use crate::error::{FlodError, FlodResult};
use crate::primitives::hmac::hmac_sha1;

/// Compute the HMAC-SHA1 of `content_container_der` under `key` and wrap it
/// in `MPHMACContainer`.
pub fn assemble(content_container_der: &[u8], key: &[u8; 20]) -> FlodResult<MPHMACContainer> {
    let digest = hmac_sha1(content_container_der, key);
    Ok(MPHMACContainer {
        digest_algorithm: AlgorithmIdentifier::new(ID_SHA1),
        digest: OctetString::new(digest.to_vec())
            .map_err(|e| FlodError::Asn1Encode(e.to_string()))?,
    })
}

/// Recompute the HMAC of `content_container_der` under `key` and compare it
/// to `hmac_container.digest` in constant time.
pub fn verify(
    hmac_container: &MPHMACContainer,
    key: &[u8; 20],
    content_container_der: &[u8],
) -> bool {
    let expected = hmac_sha1(content_container_der, key);
    expected.ct_eq(hmac_container.digest.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_verifies() {
        let key = [9u8; 20];
        let data = b"der-encoded content container";
        let container = assemble(data, &key).unwrap();
        assert!(verify(&container, &key, data));
    }

    #[test]
    fn tampered_content_fails() {
        let key = [9u8; 20];
        let container = assemble(b"original data", &key).unwrap();
        assert!(!verify(&container, &key, b"tampered data!"));
    }

    #[test]
    fn wrong_key_fails() {
        let container = assemble(b"data", &[1u8; 20]).unwrap();
        assert!(!verify(&container, &[2u8; 20], b"data"));
    }
}
