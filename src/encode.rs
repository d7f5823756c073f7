//! Query string encoding.
//!
//! Keys ending in `64` carry text payloads and are base64url-encoded; every
//! other value is percent-encoded as a URI component.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::params::Params;

/// Everything except the URI-component unreserved marks is escaped.
pub(crate) const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Suffix marking a base64 payload key.
pub const BASE64_SUFFIX: &str = "64";

/// Percent-encode a single URI component.
pub fn encode_component(input: &str) -> String {
    utf8_percent_encode(input, COMPONENT).to_string()
}

/// URL-safe base64 of the UTF-8 bytes, without padding.
pub fn encode_base64(input: &str) -> String {
    URL_SAFE_NO_PAD.encode(input.as_bytes())
}

/// Whether values under `key` are base64-encoded.
pub fn is_base64_key(key: &str) -> bool {
    key.ends_with(BASE64_SUFFIX)
}

/// Encode `params` as `?k1=v1&k2=v2`, or `""` when nothing survives.
///
/// Empty values are dropped. Order follows insertion order.
pub fn encode_params(params: &Params) -> String {
    let pairs: Vec<String> = params
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| {
            let raw = value.to_string();
            let encoded = if is_base64_key(key) {
                encode_base64(&raw)
            } else {
                encode_component(&raw)
            };
            format!("{}={}", encode_component(key), encoded)
        })
        .collect();

    if pairs.is_empty() {
        String::new()
    } else {
        format!("?{}", pairs.join("&"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_params_encode_to_nothing() {
        assert_eq!(encode_params(&Params::new()), "");
    }

    #[test]
    fn all_empty_values_encode_to_nothing() {
        let p = Params::new().with("w", 0).with("fm", "").with("invert", false);
        assert_eq!(encode_params(&p), "");
    }

    #[test]
    fn empty_values_are_skipped() {
        let p = Params::new().with("a", 0).with("b", "").with("c", 5);
        assert_eq!(encode_params(&p), "?c=5");
    }

    #[test]
    fn list_of_blank_strings_is_skipped() {
        assert_eq!(encode_params(&Params::new().with("auto", [""])), "");
        let p = Params::new().with("auto", ["", ""]).with("w", 1);
        assert_eq!(encode_params(&p), "?w=1");
    }

    #[test]
    fn insertion_order_kept() {
        let p = Params::new().with("w", 100).with("auto", "format").with("h", 50);
        assert_eq!(encode_params(&p), "?w=100&auto=format&h=50");
    }

    #[test]
    fn lists_joined_then_escaped() {
        let p = Params::new().auto(&["format", "compress"]);
        assert_eq!(encode_params(&p), "?auto=format%2Ccompress");
    }

    #[test]
    fn component_escaping() {
        assert_eq!(encode_component("a b&c=d/e"), "a%20b%26c%3Dd%2Fe");
        assert_eq!(encode_component("-_.!~*'()"), "-_.!~*'()");
        assert_eq!(encode_component("#ff0000"), "%23ff0000");
        assert_eq!(encode_component("é"), "%C3%A9");
    }

    #[test]
    fn base64_keys_use_url_safe_alphabet() {
        let p = Params::new().txt64("I cannøt belîév∑ it wors! 😱");
        assert_eq!(
            encode_params(&p),
            "?txt64=SSBjYW5uw7h0IGJlbMOuw6l24oiRIGl0IHdvcnMhIPCfmLE"
        );
    }

    #[test]
    fn base64_keys_never_percent_encoded() {
        let p = Params::new().with("mark64", "https://a.example.com/logo.png?x=1");
        let q = encode_params(&p);
        assert!(!q.contains('%'), "{q}");
        assert_eq!(
            q,
            format!("?mark64={}", encode_base64("https://a.example.com/logo.png?x=1"))
        );
    }

    #[test]
    fn plain_keys_never_base64_encoded() {
        let p = Params::new().with("txt", "Hello, World");
        assert_eq!(encode_params(&p), "?txt=Hello%2C%20World");
    }

    #[test]
    fn keys_are_escaped_too() {
        let p = Params::new().with("a b", 1);
        assert_eq!(encode_params(&p), "?a%20b=1");
    }

    #[test]
    fn deterministic() {
        let p = Params::new().width(300).with("blend64", "#ff0000").quality(40);
        assert_eq!(encode_params(&p), encode_params(&p.clone()));
    }
}
