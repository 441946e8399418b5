use hmac::{Hmac, Mac};
use sha1::Sha1;

/// Compute HMAC-SHA1 of `data` under `key`. `key` is the 20-byte HMAC key
/// carried in the header block; any length is accepted here, the envelope
/// invariant (`|HMACKey| == 20`) is enforced by the block layer above.
pub fn hmac_sha1(data: &[u8], key: &[u8]) -> [u8; 20] {
    let mut mac = <Hmac<Sha1> as Mac>::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(data);
    mac.finalize().into_bytes().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_known_answer() {
        // RFC 2202 test case 1: key = 20 bytes of 0x0b, data = "Hi There"
        let key = [0x0bu8; 20];
        let digest = hmac_sha1(b"Hi There", &key);
        assert_eq!(
            hex::encode(digest),
            "b617318655057264e28bc0b6fb378c8ef146be00"
        );
    }

    #[test]
    fn different_keys_give_different_digests() {
        let a = hmac_sha1(b"same content", &[1u8; 20]);
        let b = hmac_sha1(b"same content", &[2u8; 20]);
        assert_ne!(a, b);
    }
}
