use sha2::{Digest, Sha256};

use crate::message::Header;

/// Compute SHA256 hex digest
pub fn compute_sha256(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Stable hash of a Message-ID, used as a compact key in summary files.
/// The id is hashed as given, so callers strip angle brackets first.
pub fn message_id_hash(message_id: &str) -> String {
    compute_sha256(message_id.as_bytes())
}

/// SHA256 over a message's header fields and body, used to tell whether a
/// stored summary still describes the message.
pub fn content_hash(headers: &[Header], body: &[u8]) -> String {
    let mut hasher = Sha256::new();
    for header in headers {
        hasher.update(header.name.as_bytes());
        hasher.update(b":");
        hasher.update(header.value.as_bytes());
        hasher.update(b"\r\n");
    }
    hasher.update(b"\r\n");
    hasher.update(body);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256() {
        assert_eq!(
            compute_sha256(b"hello world"),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn test_empty_hash() {
        assert_eq!(
            compute_sha256(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_message_id_hash_is_stable() {
        let a = message_id_hash("123@example.com");
        let b = message_id_hash("123@example.com");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, message_id_hash("124@example.com"));
    }

    #[test]
    fn test_content_hash_tracks_headers_and_body() {
        let headers = vec![Header::new("Subject", "Hello")];
        let base = content_hash(&headers, b"body");
        assert_eq!(base, content_hash(&headers, b"body"));
        assert_ne!(base, content_hash(&headers, b"body!"));
        assert_ne!(
            base,
            content_hash(&[Header::new("Subject", "Changed")], b"body")
        );
    }
}
