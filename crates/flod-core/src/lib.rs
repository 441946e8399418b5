//! FLOD packet codec
//!
//! Hybrid-encryption message envelope combining RSA-OAEP key wrapping,
//! HMAC-SHA1 integrity, optional RSASSA-PSS sender authentication, and a
//! timestamped AES-128-CBC payload, serialized as a single DER structure.
//!
//! This crate has no I/O and no key storage of its own — callers supply a
//! [`KeyProvider`] implementation (see the `flod-keyring` crate for a
//! PKCS#1-PEM-backed one) and the recipient/signer key material directly.

pub mod asn1;
pub mod blocks;
pub mod constants;
pub mod driver;
pub mod error;
pub mod primitives;

pub use driver::{assemble, disassemble, KeyProvider, LookupResult, Outcome};
pub use error::{FlodError, FlodResult};
