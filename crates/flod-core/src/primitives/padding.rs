use crate::error::{FlodError, FlodResult};

/// Apply PKCS#7 padding to `data`, extending it to a multiple of
/// `block_size` with 1..=block_size bytes each holding the padding length.
pub fn pkcs7_pad(data: &[u8], block_size: usize) -> Vec<u8> {
    let pad = block_size - (data.len() % block_size);
    let mut out = Vec::with_capacity(data.len() + pad);
    out.extend_from_slice(data);
    out.resize(data.len() + pad, pad as u8);
    out
}

/// Remove PKCS#7 padding from a decrypted AES-CBC plaintext.
///
/// The last byte gives the padding length (1..=block_size); every padding
/// byte must carry that same value. Anything else is malformed padding.
pub fn pkcs7_unpad(data: &[u8], block_size: usize) -> FlodResult<Vec<u8>> {
    if data.is_empty() || !data.len().is_multiple_of(block_size) {
        return Err(FlodError::Pkcs7PaddingInvalid);
    }

    let pad = data[data.len() - 1] as usize;
    if pad == 0 || pad > block_size || pad > data.len() {
        return Err(FlodError::Pkcs7PaddingInvalid);
    }

    for &byte in &data[data.len() - pad..] {
        if byte as usize != pad {
            return Err(FlodError::Pkcs7PaddingInvalid);
        }
    }

    Ok(data[..data.len() - pad].to_vec())
}
