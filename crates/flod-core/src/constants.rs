//! Fixed wire constants for the FLOD packet format.
//!
//! OIDs, the protocol version, and the timestamp format are all bit-exact
//! parts of the envelope — changing any of them changes the wire format.

use const_oid::ObjectIdentifier;

/// `identificationString` literal: the 4 ASCII bytes `FLOD`.
pub const IDENTIFICATION_STRING: [u8; 4] = *b"FLOD";

/// Current (and only) protocol version.
pub const PROTOCOL_VERSION: u8 = 1;

/// `MPContent.timestamp` format: `YYYY-MM-DD HH:MM:SS`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const AES_BLOCK_SIZE: usize = 16;
pub const AES_KEY_LEN: usize = 16;
pub const HMAC_KEY_LEN: usize = 20;
pub const IV_LEN: usize = 16;
pub const PGP_KEY_ID_LEN: usize = 8;
pub const SHA1_DIGEST_LEN: usize = 20;

/// RSA-OAEP-SHA1 overhead: `2 * hLen + 2` per RFC 8017 §7.1.1.
pub const OAEP_SHA1_OVERHEAD: usize = 2 * SHA1_DIGEST_LEN + 2;

/// `id-rsaes-oaep` (RFC 8017, PKCS#1 v2.2).
pub const ID_RSAES_OAEP: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.7");

/// `id-RSASSA-PSS` (RFC 8017, PKCS#1 v2.2).
pub const ID_RSASSA_PSS: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.10");

/// `id-sha1`.
pub const ID_SHA1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.14.3.2.26");

/// `aes128-CBC-PAD` (NIST AES arc).
pub const ID_AES_128_CBC: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.1.2");

/// FLOD-project private sentinel OID signalling "this header is unsigned".
/// Picked from an unassigned private-enterprise arc; any OID distinct from
/// [`ID_RSASSA_PSS`] would satisfy the wire contract, this one is just the
/// constant this implementation commits to.
pub const ID_NO_SIGN: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.3.6.1.4.1.55555.1.1");
