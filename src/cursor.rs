//! Opaque pagination cursors.
//!
//! A cursor is base64-encoded JSON `{"queryHash": "...", "offset": N}`. It is
//! bound to the wrapped query that produced it and carries no page size, so a
//! caller may change `limit` between pages.
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::SearchError;

/// Digest bytes kept for the query hash (16 hex characters).
const HASH_BYTES: usize = 8;

/// Decoded cursor contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    #[serde(rename = "queryHash")]
    pub query_hash: String,
    pub offset: i64,
}

/// Fixed-length digest of a wrapped query, used only for equality checks.
#[must_use]
pub fn hash_query(query: &str) -> String {
    let digest = Sha256::digest(query.as_bytes());
    hex::encode(&digest[..HASH_BYTES])
}

/// Encode a cursor for `query` at `offset`.
#[must_use]
pub fn encode_cursor(query: &str, offset: usize) -> String {
    let cursor = Cursor {
        query_hash: hash_query(query),
        offset: i64::try_from(offset).unwrap_or(i64::MAX),
    };
    // Serializing a struct of a String and an i64 cannot fail.
    let json = serde_json::to_vec(&cursor).unwrap_or_default();
    STANDARD.encode(json)
}

/// Decode a cursor token. Any structural failure yields `None`.
///
/// Tokens issued by older versions may carry a `limit` field; unknown fields
/// are dropped during deserialization.
#[must_use]
pub fn decode_cursor(token: &str) -> Option<Cursor> {
    let bytes = STANDARD.decode(token.trim()).ok()?;
    serde_json::from_slice::<Cursor>(&bytes).ok()
}

/// Decode `token` and check that it belongs to `query` and has a usable offset.
pub fn validate_cursor(token: &str, query: &str) -> Result<Cursor, SearchError> {
    let cursor = decode_cursor(token).ok_or(SearchError::MalformedCursor)?;
    if cursor.query_hash != hash_query(query) {
        return Err(SearchError::CursorMismatch);
    }
    if cursor.offset < 0 {
        return Err(SearchError::InvalidOffset(cursor.offset));
    }
    Ok(cursor)
}

/// Cursor for the page after `current_offset`, if any items remain there.
#[must_use]
pub fn generate_next_cursor(
    query: &str,
    current_offset: usize,
    limit: usize,
    total_extracted: usize,
) -> Option<String> {
    let next = current_offset.saturating_add(limit);
    (next < total_extracted).then(|| encode_cursor(query, next))
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_fixed_length_and_deterministic() {
        let a = hash_query("sym:foo lang:go");
        assert_eq!(a.len(), HASH_BYTES * 2);
        assert_eq!(a, hash_query("sym:foo lang:go"));
        assert_ne!(a, hash_query("sym:foo lang:rust"));
    }

    #[test]
    fn test_encode_decode() {
        for offset in [0usize, 1, 30, 12_345] {
            let token = encode_cursor("sym:handleRequest", offset);
            let cursor = decode_cursor(&token).unwrap();
            assert_eq!(cursor.offset, offset as i64);
            assert_eq!(cursor.query_hash, hash_query("sym:handleRequest"));
        }
    }

    #[test]
    fn test_decode_garbage() {
        assert!(decode_cursor("").is_none());
        assert!(decode_cursor("!!!not-base64!!!").is_none());
        // valid base64, not JSON
        assert!(decode_cursor(&STANDARD.encode("hello")).is_none());
        // JSON of the wrong shape
        assert!(decode_cursor(&STANDARD.encode(r#"{"offset": 3}"#)).is_none());
        assert!(decode_cursor(&STANDARD.encode(r#"{"queryHash": 7, "offset": 3}"#)).is_none());
        assert!(
            decode_cursor(&STANDARD.encode(r#"{"queryHash": "abc", "offset": "3"}"#)).is_none()
        );
        assert!(decode_cursor(&STANDARD.encode("[1,2]")).is_none());
    }

    #[test]
    fn test_decode_ignores_legacy_limit() {
        let json = format!(
            r#"{{"queryHash":"{}","offset":20,"limit":10}}"#,
            hash_query("q")
        );
        let cursor = decode_cursor(&STANDARD.encode(json)).unwrap();
        assert_eq!(
            cursor,
            Cursor {
                query_hash: hash_query("q"),
                offset: 20
            }
        );
    }

    #[test]
    fn test_validate_ok() {
        let token = encode_cursor("file:main.rs", 30);
        assert_eq!(validate_cursor(&token, "file:main.rs").unwrap().offset, 30);
    }

    #[test]
    fn test_validate_mismatch() {
        for offset in [0usize, 5, 1000] {
            let token = encode_cursor("sym:a", offset);
            assert_eq!(
                validate_cursor(&token, "sym:b"),
                Err(SearchError::CursorMismatch)
            );
        }
    }

    #[test]
    fn test_validate_malformed() {
        assert_eq!(
            validate_cursor("%%%", "sym:a"),
            Err(SearchError::MalformedCursor)
        );
    }

    #[test]
    fn test_validate_negative_offset() {
        let json = format!(r#"{{"queryHash":"{}","offset":-5}}"#, hash_query("sym:a"));
        let token = STANDARD.encode(json);
        assert_eq!(
            validate_cursor(&token, "sym:a"),
            Err(SearchError::InvalidOffset(-5))
        );
    }

    #[test]
    fn test_next_cursor() {
        assert!(generate_next_cursor("q", 70, 30, 100).is_none());
        assert!(generate_next_cursor("q", 0, 30, 30).is_none());
        let token = generate_next_cursor("q", 0, 30, 31).unwrap();
        assert_eq!(decode_cursor(&token).unwrap().offset, 30);
    }
}
