//! DER encodings of the five FLOD envelope entities (spec §3).
//!
//! Every structure here is a plain `SEQUENCE` derived with `der::Sequence`,
//! the same shape `spki::AlgorithmIdentifier` and friends use upstream in
//! the RustCrypto ecosystem the `rsa` crate already pulls in.

use der::asn1::{Null, OctetString};
use der::oid::ObjectIdentifier;
use der::Sequence;

/// `AlgorithmIdentifier ::= SEQUENCE { algorithm OBJECT IDENTIFIER, parameters NULL }`
///
/// Every algorithm identifier in a FLOD packet carries `NULL` parameters —
/// the envelope never needs anything richer, so this does not generalize to
/// `ANY` parameters the way `spki`'s version does.
#[derive(Clone, Debug, PartialEq, Eq, Sequence)]
pub struct AlgorithmIdentifier {
    pub algorithm: ObjectIdentifier,
    pub parameters: Null,
}

impl AlgorithmIdentifier {
    pub fn new(algorithm: ObjectIdentifier) -> Self {
        Self {
            algorithm,
            parameters: Null,
        }
    }
}

/// `MPHeader ::= SEQUENCE` — the secret core, encrypted under the
/// recipient's RSA-OAEP public key before it ever appears on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Sequence)]
pub struct MPHeader {
    pub identification_string: OctetString,
    pub signature_algorithm: AlgorithmIdentifier,
    pub pgp_key_id: OctetString,
    pub signature: OctetString,
    pub hmac_key: OctetString,
    pub aes_key: OctetString,
}

/// `MPHeaderContainer ::= SEQUENCE { encryptionAlgorithm AlgorithmIdentifier, encryptedHeader OCTET STRING }`
#[derive(Clone, Debug, PartialEq, Eq, Sequence)]
pub struct MPHeaderContainer {
    pub encryption_algorithm: AlgorithmIdentifier,
    pub encrypted_header: OctetString,
}

/// `MPContent ::= SEQUENCE { timestamp UTF8String, content UTF8String }`
#[derive(Clone, Debug, PartialEq, Eq, Sequence)]
pub struct MPContent {
    pub timestamp: der::asn1::Utf8String,
    pub content: der::asn1::Utf8String,
}

/// `MPContentContainer ::= SEQUENCE { initializationVector OCTET STRING, encryptionAlgorithm AlgorithmIdentifier, encryptedContent OCTET STRING }`
#[derive(Clone, Debug, PartialEq, Eq, Sequence)]
pub struct MPContentContainer {
    pub initialization_vector: OctetString,
    pub encryption_algorithm: AlgorithmIdentifier,
    pub encrypted_content: OctetString,
}

/// `MPHMACContainer ::= SEQUENCE { digestAlgorithm AlgorithmIdentifier, digest OCTET STRING }`
#[derive(Clone, Debug, PartialEq, Eq, Sequence)]
pub struct MPHMACContainer {
    pub digest_algorithm: AlgorithmIdentifier,
    pub digest: OctetString,
}

/// `MessagePacket ::= SEQUENCE { protocolVersion INTEGER, headerBlock MPHeaderContainer, hmacBlock MPHMACContainer, contentBlock MPContentContainer }`
#[derive(Clone, Debug, PartialEq, Eq, Sequence)]
pub struct MessagePacket {
    pub protocol_version: u8,
    pub header_block: MPHeaderContainer,
    pub hmac_block: MPHMACContainer,
    pub content_block: MPContentContainer,
}
