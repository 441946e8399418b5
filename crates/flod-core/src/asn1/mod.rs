//! DER codec for the four nested FLOD envelope entities (spec §3 and §4.2).
//!
//! Only definite-length, canonical DER is ever produced or accepted — the
//! `der` crate rejects indefinite-length encodings by construction, there
//! is nothing extra to enforce here.

mod offset;
mod types;

pub use offset::{identification_string_offset, sentinel_matches};
pub use types::{
    AlgorithmIdentifier, MPContent, MPContentContainer, MPHMACContainer, MPHeader,
    MPHeaderContainer, MessagePacket,
};

use der::{Decode, Encode};

use crate::error::{FlodError, FlodResult};

pub fn encode<T: Encode>(value: &T) -> FlodResult<Vec<u8>> {
    value
        .to_der()
        .map_err(|e| FlodError::Asn1Encode(e.to_string()))
}

pub fn decode<'a, T: Decode<'a>>(bytes: &'a [u8]) -> FlodResult<T> {
    T::from_der(bytes).map_err(|e| FlodError::Asn1Decode(e.to_string()))
}
