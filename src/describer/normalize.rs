//! Query decoding and title normalization
//!
//! Titles are canonicalized the way the upstream wiki does it so equivalent
//! spellings share one cache entry: only the first `|` separated title is
//! kept, its first character is uppercased and underscores become spaces.

use crate::error::{DescribeError, Result};

// == Query Unescape ==
/// Decodes a query-string value: `+` becomes a space and every `%` must be
/// followed by two hex digits. The decoded bytes must be valid UTF-8.
pub fn query_unescape(raw: &str) -> Result<String> {
    let bytes = raw.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let hi = bytes.get(i + 1).copied().and_then(hex_value);
                let lo = bytes.get(i + 2).copied().and_then(hex_value);
                match (hi, lo) {
                    (Some(hi), Some(lo)) => decoded.push(hi << 4 | lo),
                    _ => {
                        let end = (i + 3).min(bytes.len());
                        let escape = String::from_utf8_lossy(&bytes[i..end]);
                        return Err(DescribeError::invalid_argument(format!(
                            "person is wrongly encoded: invalid escape {:?}",
                            escape
                        )));
                    }
                }
                i += 3;
            }
            b'+' => {
                decoded.push(b' ');
                i += 1;
            }
            byte => {
                decoded.push(byte);
                i += 1;
            }
        }
    }

    String::from_utf8(decoded).map_err(|_| {
        DescribeError::invalid_argument("person is wrongly encoded: not valid UTF-8")
    })
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

// == Normalize Title ==
/// Canonical form of an already decoded title.
///
/// Pure and idempotent: `normalize_title(&normalize_title(x)) == normalize_title(x)`.
pub fn normalize_title(decoded: &str) -> String {
    let first = decoded.split('|').next().unwrap_or_default();

    let mut chars = first.chars();
    let capitalized: String = match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };

    capitalized.replace('_', " ")
}
