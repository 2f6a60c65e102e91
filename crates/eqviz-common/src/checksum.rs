//! Checksum utilities for uploaded files

use crate::error::Result;
use sha2::{Digest, Sha256};
use std::io::Read;

/// Compute the hex-encoded SHA-256 digest of an in-memory buffer
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Compute the hex-encoded SHA-256 digest of any readable source
pub fn sha256_reader<R: Read>(reader: &mut R) -> Result<String> {
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_sha256_hex() {
        assert_eq!(
            sha256_hex(b"hello world"),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn test_sha256_reader_matches_buffer_digest() {
        let data = "Equipment Name,Type\n".repeat(1000);
        let mut cursor = Cursor::new(data.as_bytes());
        let streamed = sha256_reader(&mut cursor).unwrap();
        assert_eq!(streamed, sha256_hex(data.as_bytes()));
    }
}
