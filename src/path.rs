//! Base URL and image path normalization.

use percent_encoding::{AsciiSet, utf8_percent_encode};
use url::Url;

use crate::encode::{COMPONENT, encode_component};
use crate::error::{Error, Result};

/// Whole-path escaping: keeps `/` and the other structural marks that
/// `encodeURI`-style escaping leaves alone, but still escapes `#`, `?`,
/// `:` and `+`, which would otherwise change how the path is read.
const PATH: &AsciiSet = &COMPONENT
    .remove(b';')
    .remove(b',')
    .remove(b'/')
    .remove(b'@')
    .remove(b'&')
    .remove(b'=')
    .remove(b'$');

/// Normalize a base URL to `scheme://host[:port][/pathname]`.
///
/// The caller's text is kept as written (host case, an explicit port and
/// any unescaped prefix characters survive). Query and fragment are cut and
/// one trailing slash is stripped. Fails when there is no scheme or host.
pub fn sanitize_base_url(base: &str) -> Result<String> {
    let invalid = || Error::InvalidBaseUrl(base.to_owned());

    let trimmed = base.trim();
    let end = trimmed.find(['?', '#']).unwrap_or(trimmed.len());
    let cut = &trimmed[..end];
    let cut = cut.strip_suffix('/').unwrap_or(cut);

    let parsed = Url::parse(cut).map_err(|_| invalid())?;
    if !parsed.host_str().is_some_and(|h| !h.is_empty()) {
        return Err(invalid());
    }
    // `https:host` parses, but is not written in authority form.
    match cut.split_once(':') {
        Some((_, rest)) if rest.starts_with("//") => Ok(cut.to_owned()),
        _ => Err(invalid()),
    }
}

/// Normalize an image path to exactly one leading slash.
///
/// With `encode`, a path that is itself an `http(s)://` URL is escaped as a
/// single component so it survives as one path segment; any other path is
/// escaped segment-preserving.
pub fn sanitize_path(path: &str, encode: bool) -> String {
    let bare = path.trim_start_matches('/');

    if !encode {
        return format!("/{bare}");
    }

    if is_absolute_http(bare) {
        format!("/{}", encode_component(bare))
    } else {
        format!("/{}", utf8_percent_encode(bare, PATH))
    }
}

fn is_absolute_http(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://")
}
