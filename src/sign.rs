//! Request signatures.
//!
//! A signature is the hex MD5 digest of `token + path + query`, appended as
//! the last query parameter `s`. Identical inputs always give the same
//! signature, so the service can recompute and compare it.

/// Hex digest of `input`. Always 32 lowercase hex characters.
pub fn digest(input: &[u8]) -> String {
    format!("{:x}", md5::compute(input))
}

/// Signature suffix for a request, or `""` without a (non-empty) token.
///
/// `path` is the sanitized image path and `query` the encoded query string
/// (possibly empty); the separator follows from whether `query` is empty.
pub fn sign(token: Option<&str>, path: &str, query: &str) -> String {
    let Some(token) = token.filter(|t| !t.is_empty()) else {
        return String::new();
    };

    let payload = format!("{token}{path}{query}");
    let separator = if query.is_empty() { '?' } else { '&' };
    format!("{separator}s={}", digest(payload.as_bytes()))
}
