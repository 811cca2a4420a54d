//! SHA-384 hasher rendering digests as unpadded URL-safe base64.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use sha2::{Digest, Sha384};

use crate::ports::CidHasher;

/// Live hasher: `base64url(sha384(input))`, always 64 characters.
pub struct Sha384Hasher;

impl CidHasher for Sha384Hasher {
    fn hash_bytes(&self, input: &[u8]) -> String {
        URL_SAFE_NO_PAD.encode(Sha384::digest(input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_fixed_length_and_stable() {
        let a = Sha384Hasher.hash_str("abc");
        assert_eq!(a.len(), 64);
        assert_eq!(a, Sha384Hasher.hash_str("abc"));
        assert_ne!(a, Sha384Hasher.hash_str("abd"));
    }

    #[test]
    fn output_is_url_safe() {
        let h = Sha384Hasher.hash_bytes(&[0xff; 48]);
        assert!(h.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }
}
