//! Cryptographic utilities

use rand::RngCore;

/// Generate a random hex-encoded nonce of `bytes` random bytes
pub fn generate_nonce(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    rand::rng().fill_bytes(&mut buf);
    hex::encode(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_nonce() {
        let a = generate_nonce(16);
        let b = generate_nonce(16);

        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }
}
