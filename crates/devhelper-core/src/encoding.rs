//! Base64 and URL query encoding.
//!
//! ```
//! use devhelper_core::encoding::{base64_encode, url_encode};
//!
//! assert_eq!(base64_encode(b"hello", false), "aGVsbG8=");
//! assert_eq!(url_encode("a b&c"), "a+b%26c");
//! ```

use crate::error::{Error, Result};
use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use base64::Engine;

/// Encode bytes as padded Base64, using the URL-safe alphabet when asked.
pub fn base64_encode(data: &[u8], url_safe: bool) -> String {
    if url_safe {
        URL_SAFE.encode(data)
    } else {
        STANDARD.encode(data)
    }
}

/// Decode padded Base64. Leading and trailing whitespace is ignored.
pub fn base64_decode(text: &str, url_safe: bool) -> Result<Vec<u8>> {
    let text = text.trim();
    let decoded = if url_safe {
        URL_SAFE.decode(text)
    } else {
        STANDARD.decode(text)
    };
    decoded.map_err(|err| Error::Decode(format!("invalid Base64: {err}")))
}

/// Query-string escaping: unreserved characters stay, space becomes `+`,
/// everything else is percent-encoded.
pub fn url_encode(text: &str) -> String {
    urlencoding::encode(text).replace("%20", "+")
}

/// Reverse of [`url_encode`]. Leading and trailing whitespace is ignored.
pub fn url_decode(text: &str) -> Result<String> {
    let text = text.trim();
    validate_escapes(text)?;
    let spaced = text.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .map_err(|err| Error::Decode(format!("decoded bytes are not UTF-8: {err}")))
}

/// Every `%` must be followed by two hex digits.
fn validate_escapes(text: &str) -> Result<()> {
    let bytes = text.as_bytes();
    for (i, _) in text.match_indices('%') {
        let valid = bytes
            .get(i + 1..i + 3)
            .is_some_and(|pair| pair.iter().all(u8::is_ascii_hexdigit));
        if !valid {
            let end = (i + 3).min(text.len());
            let escape = String::from_utf8_lossy(&bytes[i..end]);
            return Err(Error::Decode(format!("invalid URL escape \"{escape}\"")));
        }
    }
    Ok(())
}
