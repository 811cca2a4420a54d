//! Hash port used for both identifier synthesis and scope derivation.

/// One-way, deterministic hash producing a fixed-length printable string.
pub trait CidHasher: Send + Sync {
    /// Hashes raw bytes.
    fn hash_bytes(&self, input: &[u8]) -> String;

    /// Hashes a UTF-8 string.
    fn hash_str(&self, input: &str) -> String {
        self.hash_bytes(input.as_bytes())
    }
}
