//! Packet driver: orchestrates assembly and the trial-decryption
//! disassembly loop, and classifies the signature outcome state machine
//! (spec §4.6).

use rsa::{RsaPrivateKey, RsaPublicKey};
use zeroize::Zeroize;

use crate::asn1::{self, AlgorithmIdentifier, MessagePacket};
use crate::blocks::{content, header, hmac as hmac_block};
use crate::constants::{ID_NO_SIGN, ID_RSASSA_PSS, PROTOCOL_VERSION};
use crate::error::{FlodError, FlodResult};
use crate::primitives::random_bytes;
use crate::primitives::rsa::rsa_verify;

/// External collaborator supplying private keys and public-key lookups
/// (spec §6.2). `flod-core` never stores or generates key material itself;
/// `flod-keyring` is this repo's concrete implementation.
pub trait KeyProvider: Send + Sync {
    /// A finite sequence of this party's own RSA private keys, in trial
    /// order. Disassembly tries them in the order returned here.
    fn yield_keys(&self) -> Vec<RsaPrivateKey>;

    /// Resolve an 8-byte PGP-style key id to a public key, a set of public
    /// keys (only ever returned for the all-zero id), or nothing known.
    fn lookup(&self, pgp_key_id: &[u8; 8]) -> LookupResult;
}

/// The result of a [`KeyProvider::lookup`] (spec §9 design note: the source
/// collapses this into one return slot; here it's a tagged variant).
#[derive(Debug, Clone)]
pub enum LookupResult {
    /// Exactly one public key is bound to this id.
    One(RsaPublicKey),
    /// Several public keys share the all-zero "non-PGP plain key" bucket.
    Many(Vec<RsaPublicKey>),
    /// No key is known for this id.
    Absent,
}

/// Classified result of a successful [`disassemble`] (spec §4.6 outcome
/// state machine). Every variant carries the recovered timestamp and
/// message; the discriminant doubles as the legacy `exit_code`.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// `exit_code == 0`: signed by a known PGP-identified sender, verified.
    SignedKnown {
        timestamp: chrono::NaiveDateTime,
        message: String,
        signer_id: [u8; 8],
    },
    /// `exit_code == 1`: signed by a non-PGP key found in the all-zero
    /// bucket, verified.
    SignedNonPgp {
        timestamp: chrono::NaiveDateTime,
        message: String,
        signer_key: Box<RsaPublicKey>,
    },
    /// `exit_code == 2`: unsigned, decoy signature fields present but
    /// untrusted by construction — there is nothing to verify.
    Unsigned {
        timestamp: chrono::NaiveDateTime,
        message: String,
    },
    /// `exit_code == 3`: claims to be signed but authenticity cannot be
    /// established (unknown signer id, or no key in the bucket verifies).
    Unauthenticated {
        timestamp: chrono::NaiveDateTime,
        message: String,
    },
}

impl Outcome {
    /// The `exit_code` integer from spec §4.6's state machine table.
    pub fn exit_code(&self) -> u8 {
        match self {
            Outcome::SignedKnown { .. } => 0,
            Outcome::SignedNonPgp { .. } => 1,
            Outcome::Unsigned { .. } => 2,
            Outcome::Unauthenticated { .. } => 3,
        }
    }

    pub fn timestamp(&self) -> &chrono::NaiveDateTime {
        match self {
            Outcome::SignedKnown { timestamp, .. }
            | Outcome::SignedNonPgp { timestamp, .. }
            | Outcome::Unsigned { timestamp, .. }
            | Outcome::Unauthenticated { timestamp, .. } => timestamp,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Outcome::SignedKnown { message, .. }
            | Outcome::SignedNonPgp { message, .. }
            | Outcome::Unsigned { message, .. }
            | Outcome::Unauthenticated { message, .. } => message,
        }
    }
}

/// Assemble a FLOD packet for `payload`, encrypted to `recipient_pub`, and
/// optionally signed by `signer = (sender_private_key, sender_pgp_id)`
/// (spec §4.6 "Assemble (full)").
pub fn assemble(
    payload: &str,
    recipient_pub: &RsaPublicKey,
    signer: Option<(&RsaPrivateKey, [u8; 8])>,
) -> FlodResult<Vec<u8>> {
    let fresh = random_bytes(&[16, 16, 20]);
    let mut iv: [u8; 16] = fresh[0].clone().try_into().unwrap();
    let mut aes_key: [u8; 16] = fresh[1].clone().try_into().unwrap();
    let mut hmac_key: [u8; 20] = fresh[2].clone().try_into().unwrap();

    let content_container = content::assemble(payload, &aes_key, &iv)?;
    let content_der = asn1::encode(&content_container)?;
    let hmac_container = hmac_block::assemble(&content_der, &hmac_key)?;
    let header_container = header::assemble(&aes_key, &hmac_key, recipient_pub, signer)?;

    iv.zeroize();
    aes_key.zeroize();
    hmac_key.zeroize();

    let packet = MessagePacket {
        protocol_version: PROTOCOL_VERSION,
        header_block: header_container,
        hmac_block: hmac_container,
        content_block: content_container,
    };

    asn1::encode(&packet)
}

/// Disassemble a FLOD packet against every private key `keys` yields, in
/// order, classifying the result per spec §4.6.
///
/// Returns [`FlodError::NoMatchingRSAKeyForMessage`] if no candidate key
/// decrypts the header sentinel, [`FlodError::HMACVerificationFailed`] if
/// the content integrity tag doesn't match (checked for every successful
/// header decryption, signed or not — the stricter reading spec §9 mandates
/// over the source's unsigned-branch-only check), and
/// [`FlodError::SignatureVerificationFailed`] if a known signer's PSS
/// signature fails to verify.
pub fn disassemble(packet: &[u8], keys: &dyn KeyProvider) -> FlodResult<Outcome> {
    let message_packet: MessagePacket = asn1::decode(packet)?;

    let encrypted_header = message_packet.header_block.encrypted_header.as_bytes();

    let mp_header = keys
        .yield_keys()
        .iter()
        .find_map(|candidate| header::try_decrypt(encrypted_header, candidate).transpose())
        .transpose()?
        .ok_or(FlodError::NoMatchingRSAKeyForMessage)?;

    let mut hmac_key: [u8; 20] = mp_header
        .hmac_key
        .as_bytes()
        .try_into()
        .map_err(|_| FlodError::MalformedPacket("HMACKey is not 20 bytes".into()))?;
    let mut aes_key: [u8; 16] = mp_header
        .aes_key
        .as_bytes()
        .try_into()
        .map_err(|_| FlodError::MalformedPacket("AESKey is not 16 bytes".into()))?;

    let content_der = asn1::encode(&message_packet.content_block)?;
    if !hmac_block::verify(&message_packet.hmac_block, &hmac_key, &content_der) {
        hmac_key.zeroize();
        aes_key.zeroize();
        return Err(FlodError::HMACVerificationFailed);
    }

    let (timestamp, message) = content::disassemble(&message_packet.content_block, &aes_key)?;

    let outcome = classify_signature(&mp_header, &hmac_key, &aes_key, keys, timestamp, message);
    hmac_key.zeroize();
    aes_key.zeroize();
    outcome
}

fn classify_signature(
    mp_header: &crate::asn1::MPHeader,
    hmac_key: &[u8; 20],
    aes_key: &[u8; 16],
    keys: &dyn KeyProvider,
    timestamp: chrono::NaiveDateTime,
    message: String,
) -> FlodResult<Outcome> {
    if mp_header.signature_algorithm == AlgorithmIdentifier::new(ID_NO_SIGN) {
        return Ok(Outcome::Unsigned { timestamp, message });
    }
    if mp_header.signature_algorithm != AlgorithmIdentifier::new(ID_RSASSA_PSS) {
        return Err(FlodError::MalformedPacket(
            "signatureAlgorithm is neither RSASSA-PSS nor no-sign".into(),
        ));
    }

    let signer_id: [u8; 8] = mp_header
        .pgp_key_id
        .as_bytes()
        .try_into()
        .map_err(|_| FlodError::MalformedPacket("PGPKeyID is not 8 bytes".into()))?;

    let mut sign_content = Vec::with_capacity(36);
    sign_content.extend_from_slice(aes_key);
    sign_content.extend_from_slice(hmac_key);
    let signature = mp_header.signature.as_bytes();

    match keys.lookup(&signer_id) {
        LookupResult::One(pk) => {
            if rsa_verify(&sign_content, signature, &pk) {
                Ok(Outcome::SignedKnown {
                    timestamp,
                    message,
                    signer_id,
                })
            } else {
                Err(FlodError::SignatureVerificationFailed)
            }
        }
        LookupResult::Many(candidates) => {
            match candidates
                .into_iter()
                .find(|pk| rsa_verify(&sign_content, signature, pk))
            {
                Some(signer_key) => Ok(Outcome::SignedNonPgp {
                    timestamp,
                    message,
                    signer_key: Box::new(signer_key),
                }),
                None => Ok(Outcome::Unauthenticated { timestamp, message }),
            }
        }
        LookupResult::Absent => Ok(Outcome::Unauthenticated { timestamp, message }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct TestProvider {
        own_keys: Vec<RsaPrivateKey>,
        contacts: Vec<([u8; 8], RsaPublicKey)>,
        plain_bucket: Vec<RsaPublicKey>,
        lookups_seen: Mutex<Vec<[u8; 8]>>,
    }

    impl KeyProvider for TestProvider {
        fn yield_keys(&self) -> Vec<RsaPrivateKey> {
            self.own_keys.clone()
        }

        fn lookup(&self, pgp_key_id: &[u8; 8]) -> LookupResult {
            self.lookups_seen.lock().unwrap().push(*pgp_key_id);
            if *pgp_key_id == [0u8; 8] {
                if self.plain_bucket.is_empty() {
                    return LookupResult::Absent;
                }
                return LookupResult::Many(self.plain_bucket.clone());
            }
            self.contacts
                .iter()
                .find(|(id, _)| id == pgp_key_id)
                .map(|(_, pk)| LookupResult::One(pk.clone()))
                .unwrap_or(LookupResult::Absent)
        }
    }

    fn test_key(bits: usize) -> RsaPrivateKey {
        let mut rng = rand::rngs::OsRng;
        RsaPrivateKey::new(&mut rng, bits).unwrap()
    }

    #[test]
    fn roundtrip_unsigned_is_code_2() {
        let recipient = test_key(2048);
        let packet = assemble("hello", &recipient.to_public_key(), None).unwrap();
        let provider = TestProvider {
            own_keys: vec![recipient],
            contacts: vec![],
            plain_bucket: vec![],
            lookups_seen: Mutex::new(vec![]),
        };
        let outcome = disassemble(&packet, &provider).unwrap();
        assert_eq!(outcome.exit_code(), 2);
        assert_eq!(outcome.message(), "hello");
    }

    #[test]
    fn roundtrip_signed_known_sender_is_code_0() {
        let recipient = test_key(2048);
        let sender = test_key(2048);
        let sender_id = [1u8, 2, 3, 4, 5, 6, 7, 8];
        let packet = assemble(
            "hello",
            &recipient.to_public_key(),
            Some((&sender, sender_id)),
        )
        .unwrap();
        let provider = TestProvider {
            own_keys: vec![recipient],
            contacts: vec![(sender_id, sender.to_public_key())],
            plain_bucket: vec![],
            lookups_seen: Mutex::new(vec![]),
        };
        let outcome = disassemble(&packet, &provider).unwrap();
        assert_eq!(outcome.exit_code(), 0);
        match outcome {
            Outcome::SignedKnown { signer_id, .. } => assert_eq!(signer_id, sender_id),
            _ => panic!("expected SignedKnown"),
        }
    }

    #[test]
    fn roundtrip_signed_non_pgp_is_code_1() {
        let recipient = test_key(2048);
        let sender = test_key(2048);
        let other = test_key(2048);
        let packet = assemble(
            "hi",
            &recipient.to_public_key(),
            Some((&sender, [0u8; 8])),
        )
        .unwrap();
        let provider = TestProvider {
            own_keys: vec![recipient],
            contacts: vec![],
            plain_bucket: vec![other.to_public_key(), sender.to_public_key()],
            lookups_seen: Mutex::new(vec![]),
        };
        let outcome = disassemble(&packet, &provider).unwrap();
        assert_eq!(outcome.exit_code(), 1);
    }

    #[test]
    fn unknown_signer_is_code_3_not_an_error() {
        let recipient = test_key(2048);
        let sender = test_key(2048);
        let sender_id = [9u8; 8];
        let packet = assemble(
            "hello",
            &recipient.to_public_key(),
            Some((&sender, sender_id)),
        )
        .unwrap();
        let provider = TestProvider {
            own_keys: vec![recipient],
            contacts: vec![],
            plain_bucket: vec![],
            lookups_seen: Mutex::new(vec![]),
        };
        let outcome = disassemble(&packet, &provider).unwrap();
        assert_eq!(outcome.exit_code(), 3);
    }

    #[test]
    fn not_for_me_raises_no_matching_key() {
        let recipient = test_key(2048);
        let intruder = test_key(2048);
        let packet = assemble("hello", &recipient.to_public_key(), None).unwrap();
        let provider = TestProvider {
            own_keys: vec![intruder],
            contacts: vec![],
            plain_bucket: vec![],
            lookups_seen: Mutex::new(vec![]),
        };
        let result = disassemble(&packet, &provider);
        assert!(matches!(
            result,
            Err(FlodError::NoMatchingRSAKeyForMessage)
        ));
    }

    #[test]
    fn tampered_content_fails_hmac_even_when_unsigned() {
        let recipient = test_key(2048);
        let mut packet = assemble("hello", &recipient.to_public_key(), None).unwrap();
        let last = packet.len() - 1;
        packet[last] ^= 0xFF;
        let provider = TestProvider {
            own_keys: vec![recipient],
            contacts: vec![],
            plain_bucket: vec![],
            lookups_seen: Mutex::new(vec![]),
        };
        let result = disassemble(&packet, &provider);
        assert!(result.is_err());
    }

    #[test]
    fn tampered_signature_fails_for_known_signer() {
        let recipient = test_key(2048);
        let sender = test_key(2048);
        let sender_id = [1u8; 8];
        let mut message_packet: MessagePacket = asn1::decode(
            &assemble(
                "hello",
                &recipient.to_public_key(),
                Some((&sender, sender_id)),
            )
            .unwrap(),
        )
        .unwrap();

        let decrypted = header::try_decrypt(
            message_packet
                .header_block
                .encrypted_header
                .as_bytes(),
            &recipient,
        )
        .unwrap()
        .unwrap();
        let mut tampered_sig = decrypted.signature.as_bytes().to_vec();
        tampered_sig[0] ^= 0xFF;

        let mut tampered_header = decrypted.clone();
        tampered_header.signature = der::asn1::OctetString::new(tampered_sig).unwrap();
        let header_der = asn1::encode(&tampered_header).unwrap();
        let pub_key = recipient.to_public_key();
        let max_chunk = crate::primitives::rsa::rsa_max_plaintext_len(
            crate::primitives::rsa::public_key_size_bytes(&pub_key),
        );
        let mut encrypted_header = Vec::new();
        for chunk in header_der.chunks(max_chunk) {
            encrypted_header
                .extend(crate::primitives::rsa::rsa_encrypt_block(chunk, &pub_key).unwrap());
        }
        message_packet.header_block.encrypted_header =
            der::asn1::OctetString::new(encrypted_header).unwrap();

        let packet = asn1::encode(&message_packet).unwrap();
        let provider = TestProvider {
            own_keys: vec![recipient],
            contacts: vec![(sender_id, sender.to_public_key())],
            plain_bucket: vec![],
            lookups_seen: Mutex::new(vec![]),
        };
        let result = disassemble(&packet, &provider);
        assert!(matches!(
            result,
            Err(FlodError::SignatureVerificationFailed)
        ));
    }

    #[test]
    fn empty_payload_roundtrips_unsigned() {
        let recipient = test_key(2048);
        let packet = assemble("", &recipient.to_public_key(), None).unwrap();
        let provider = TestProvider {
            own_keys: vec![recipient],
            contacts: vec![],
            plain_bucket: vec![],
            lookups_seen: Mutex::new(vec![]),
        };
        let outcome = disassemble(&packet, &provider).unwrap();
        assert_eq!(outcome.exit_code(), 2);
        assert_eq!(outcome.message(), "");
    }

    #[test]
    fn tampered_initialization_vector_fails_hmac() {
        let recipient = test_key(2048);
        let der_bytes = assemble("hello", &recipient.to_public_key(), None).unwrap();
        let mut packet: MessagePacket = asn1::decode(&der_bytes).unwrap();
        let mut iv = packet.content_block.initialization_vector.as_bytes().to_vec();
        iv[0] ^= 0xFF;
        packet.content_block.initialization_vector = der::asn1::OctetString::new(iv).unwrap();
        let tampered = asn1::encode(&packet).unwrap();

        let provider = TestProvider {
            own_keys: vec![recipient],
            contacts: vec![],
            plain_bucket: vec![],
            lookups_seen: Mutex::new(vec![]),
        };
        assert!(matches!(
            disassemble(&tampered, &provider),
            Err(FlodError::HMACVerificationFailed)
        ));
    }

    #[test]
    fn header_length_is_a_multiple_of_the_rsa_block_size() {
        let recipient = test_key(2048);
        let der_bytes = assemble("a longer message to force multiple header chunks", &recipient.to_public_key(), None).unwrap();
        let packet: MessagePacket = asn1::decode(&der_bytes).unwrap();
        let header_len = packet.header_block.encrypted_header.as_bytes().len();
        let key_size = crate::primitives::rsa::public_key_size_bytes(&recipient.to_public_key());
        assert_eq!(header_len % key_size, 0);
    }

    #[test]
    fn wrong_recipient_raises_no_matching_key() {
        let recipient = test_key(2048);
        let unrelated = test_key(2048);
        let packet = assemble("hello", &recipient.to_public_key(), None).unwrap();
        let provider = TestProvider {
            own_keys: vec![unrelated],
            contacts: vec![],
            plain_bucket: vec![],
            lookups_seen: Mutex::new(vec![]),
        };
        assert!(matches!(
            disassemble(&packet, &provider),
            Err(FlodError::NoMatchingRSAKeyForMessage)
        ));
    }
}
