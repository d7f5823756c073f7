//! URL, srcset and text-endpoint construction.
//!
//! # Example
//!
//! ```
//! use zensrcset::{Client, ClientConfig, Params, SrcsetOptions};
//!
//! let client = Client::new(ClientConfig::new("https://assets.example.com")).unwrap();
//!
//! let src = client.build_url("image.png", &Params::new().width(100).height(100));
//! assert_eq!(src, "https://assets.example.com/image.png?w=100&h=100");
//!
//! let srcset = client
//!     .build_srcset("image.png", &Params::new(), &SrcsetOptions::new().widths([100, 200]))
//!     .unwrap();
//! assert_eq!(
//!     srcset,
//!     "https://assets.example.com/image.png?w=100 100w,\n\
//!      https://assets.example.com/image.png?w=200 200w"
//! );
//! ```

use crate::encode::encode_params;
use crate::error::Result;
use crate::params::Params;
use crate::path::{sanitize_base_url, sanitize_path};
use crate::sign::sign;
use crate::srcset::{SrcsetMode, SrcsetOptions};

/// Path of the typesetting endpoint.
pub const TEXT_ENDPOINT: &str = "~text";

/// Separator between srcset candidates.
pub const SRCSET_SEPARATOR: &str = ",\n";

/// Where and how to build URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ClientConfig {
    /// `scheme://host[/prefix]` of the image service.
    pub base_url: String,
    /// Secret for request signatures. No signature when absent.
    #[cfg_attr(feature = "serde", serde(default))]
    pub signing_token: Option<String>,
    /// Percent-encode image paths.
    #[cfg_attr(feature = "serde", serde(default))]
    pub encode_path: bool,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            signing_token: None,
            encode_path: false,
        }
    }

    pub fn signing_token(mut self, token: impl Into<String>) -> Self {
        self.signing_token = Some(token.into());
        self
    }

    pub fn encode_path(mut self, encode: bool) -> Self {
        self.encode_path = encode;
        self
    }
}

/// `src` and `srcset` built from the same inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlObject {
    pub src: String,
    pub srcset: String,
}

/// URL builder bound to one validated [`ClientConfig`].
///
/// Holds no mutable state; share it freely across threads.
#[derive(Debug, Clone)]
pub struct Client {
    base: String,
    token: Option<String>,
    encode_path: bool,
}

impl Client {
    /// Validate the base URL once and keep the sanitized form.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let base = sanitize_base_url(&config.base_url)?;
        Ok(Self {
            base,
            token: config.signing_token.filter(|t| !t.is_empty()),
            encode_path: config.encode_path,
        })
    }

    /// Sanitized base URL.
    pub fn base_url(&self) -> &str {
        &self.base
    }

    /// Full request URL: `base + path + query + signature`.
    pub fn build_url(&self, path: &str, params: &Params) -> String {
        self.url_for(path, params, self.encode_path)
    }

    /// Srcset attribute value, candidates joined by `",\n"`.
    pub fn build_srcset(
        &self,
        path: &str,
        params: &Params,
        options: &SrcsetOptions,
    ) -> Result<String> {
        self.srcset_for(path, params, options, self.encode_path)
    }

    /// `src` and `srcset` for the same image.
    pub fn build_url_object(
        &self,
        path: &str,
        params: &Params,
        options: &SrcsetOptions,
    ) -> Result<UrlObject> {
        Ok(UrlObject {
            src: self.build_url(path, params),
            srcset: self.build_srcset(path, params, options)?,
        })
    }

    /// URL for rendering `text` on the typesetting endpoint.
    ///
    /// The text travels as `txt64`, ahead of the caller's text parameters.
    pub fn build_text(&self, text: &str, params: &Params) -> String {
        let mut merged = Params::new().txt64(text);
        merged.merge(params);
        self.url_for(TEXT_ENDPOINT, &merged, false)
    }

    fn url_for(&self, path: &str, params: &Params, encode_path: bool) -> String {
        let path = sanitize_path(path, encode_path);
        let query = encode_params(params);
        let signature = sign(self.token.as_deref(), &path, &query);
        let url = format!("{}{path}{query}{signature}", self.base);
        tracing::trace!(%url, "built url");
        url
    }

    fn srcset_for(
        &self,
        path: &str,
        params: &Params,
        options: &SrcsetOptions,
        encode_path: bool,
    ) -> Result<String> {
        let entries: Vec<String> = match SrcsetMode::select(params, options)? {
            SrcsetMode::Widths(widths) => {
                tracing::debug!(candidates = widths.len(), "building width srcset");
                widths
                    .into_iter()
                    .map(|w| {
                        let sized = params.clone().width(w);
                        format!("{} {w}w", self.url_for(path, &sized, encode_path))
                    })
                    .collect()
            }
            SrcsetMode::DevicePixelRatios { ratios, qualities } => {
                tracing::debug!(
                    candidates = ratios.len(),
                    variable_quality = qualities.is_some(),
                    "building pixel density srcset"
                );
                ratios
                    .into_iter()
                    .map(|dpr| {
                        // Generated dpr/q lead; caller values override them in place.
                        let mut merged = Params::new().dpr(dpr);
                        if let Some(q) = qualities.as_ref().and_then(|t| t.get(dpr)) {
                            merged.set("q", q);
                        } else if let Some(q) = params.get("q") {
                            merged.set("q", q.clone());
                        }
                        merged.merge(params);
                        format!("{} {dpr}x", self.url_for(path, &merged, encode_path))
                    })
                    .collect()
            }
        };
        Ok(entries.join(SRCSET_SEPARATOR))
    }
}

/// Build one URL from a config, validating its base URL.
pub fn build_url(
    config: &ClientConfig,
    path: &str,
    params: &Params,
    encode_path: bool,
) -> Result<String> {
    let client = Client::new(config.clone())?;
    Ok(client.url_for(path, params, encode_path))
}

/// Build a srcset from a config, validating its base URL.
pub fn build_srcset(
    config: &ClientConfig,
    path: &str,
    params: &Params,
    options: &SrcsetOptions,
    encode_path: bool,
) -> Result<String> {
    let client = Client::new(config.clone())?;
    client.srcset_for(path, params, options, encode_path)
}

/// Build `src` and `srcset` from a config.
pub fn build_url_object(
    config: &ClientConfig,
    path: &str,
    params: &Params,
    options: &SrcsetOptions,
    encode_path: bool,
) -> Result<UrlObject> {
    let client = Client::new(config.clone())?;
    Ok(UrlObject {
        src: client.url_for(path, params, encode_path),
        srcset: client.srcset_for(path, params, options, encode_path)?,
    })
}

/// Build a typesetting-endpoint URL from a config.
pub fn build_text(text: &str, config: &ClientConfig, params: &Params) -> Result<String> {
    Ok(Client::new(config.clone())?.build_text(text, params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::sign::digest;
    use crate::srcset::DprQualities;

    const BASE: &str = "https://assets.example.com";

    fn client() -> Client {
        Client::new(ClientConfig::new(BASE)).unwrap()
    }

    #[test]
    fn url_with_size() {
        assert_eq!(
            client().build_url("image.png", &Params::new().width(100).height(100)),
            "https://assets.example.com/image.png?w=100&h=100"
        );
    }

    #[test]
    fn url_without_params() {
        assert_eq!(
            client().build_url("/image.png", &Params::new()),
            "https://assets.example.com/image.png"
        );
    }

    #[test]
    fn invalid_base_rejected() {
        assert!(matches!(
            Client::new(ClientConfig::new("assets.example.com")),
            Err(Error::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn signed_url_appends_last() {
        let c = Client::new(ClientConfig::new(BASE).signing_token("FOO123bar")).unwrap();
        let url = c.build_url("users/1.png", &Params::new().width(400));
        let expected_sig = digest(b"FOO123bar/users/1.png?w=400");
        assert_eq!(
            url,
            format!("https://assets.example.com/users/1.png?w=400&s={expected_sig}")
        );
    }

    #[test]
    fn signed_url_without_query() {
        let c = Client::new(ClientConfig::new(BASE).signing_token("FOO123bar")).unwrap();
        let url = c.build_url("users/1.png", &Params::new());
        assert!(url.ends_with(&format!("/users/1.png?s={}", digest(b"FOO123bar/users/1.png"))));
    }

    #[test]
    fn width_srcset_explicit() {
        let srcset = client()
            .build_srcset(
                "image.png",
                &Params::new(),
                &SrcsetOptions::new().widths([100, 200]),
            )
            .unwrap();
        assert_eq!(
            srcset,
            "https://assets.example.com/image.png?w=100 100w,\n\
             https://assets.example.com/image.png?w=200 200w"
        );
    }

    #[test]
    fn width_srcset_appends_w_after_params() {
        let srcset = client()
            .build_srcset(
                "image.png",
                &Params::new().with("auto", "format"),
                &SrcsetOptions::new().widths([320]),
            )
            .unwrap();
        assert_eq!(
            srcset,
            "https://assets.example.com/image.png?auto=format&w=320 320w"
        );
    }

    #[test]
    fn dpr_srcset_default_ratios() {
        let srcset = client()
            .build_srcset("image.png", &Params::new().width(100), &SrcsetOptions::new())
            .unwrap();
        let lines: Vec<&str> = srcset.split(",\n").collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(
            lines[0],
            "https://assets.example.com/image.png?dpr=1&w=100 1x"
        );
        assert_eq!(
            lines[1],
            "https://assets.example.com/image.png?dpr=1.5&w=100 1.5x"
        );
        assert_eq!(
            lines[4],
            "https://assets.example.com/image.png?dpr=3&w=100 3x"
        );
    }

    #[test]
    fn dpr_srcset_variable_quality() {
        let opts = SrcsetOptions::new()
            .device_pixel_ratios([1.0, 2.0])
            .variable_quality(true);
        let srcset = client()
            .build_srcset("image.png", &Params::new().height(50), &opts)
            .unwrap();
        assert_eq!(
            srcset,
            "https://assets.example.com/image.png?dpr=1&q=75&h=50 1x,\n\
             https://assets.example.com/image.png?dpr=2&q=50&h=50 2x"
        );
    }

    #[test]
    fn dpr_srcset_caller_quality_wins() {
        let opts = SrcsetOptions::new()
            .device_pixel_ratios([2.0])
            .variable_quality(true)
            .variable_qualities(DprQualities::new().with(2.0, 60));
        let srcset = client()
            .build_srcset("image.png", &Params::new().width(100).quality(90), &opts)
            .unwrap();
        assert_eq!(
            srcset,
            "https://assets.example.com/image.png?dpr=2&q=90&w=100 2x"
        );
    }

    #[test]
    fn dpr_srcset_caller_quality_kept_without_variable_quality() {
        let opts = SrcsetOptions::new().device_pixel_ratios([1.0]);
        let srcset = client()
            .build_srcset("image.png", &Params::new().width(100).quality(90), &opts)
            .unwrap();
        assert_eq!(
            srcset,
            "https://assets.example.com/image.png?dpr=1&q=90&w=100 1x"
        );
    }

    #[test]
    fn srcset_errors_surface() {
        let err = client()
            .build_srcset("a.png", &Params::new(), &SrcsetOptions::new().min_width(0))
            .unwrap_err();
        assert_eq!(err, Error::InvalidRange { min: 0, max: 1920 });
    }

    #[test]
    fn url_object_pairs_src_and_srcset() {
        let obj = client()
            .build_url_object(
                "image.png",
                &Params::new(),
                &SrcsetOptions::new().widths([640]),
            )
            .unwrap();
        assert_eq!(obj.src, "https://assets.example.com/image.png");
        assert_eq!(obj.srcset, "https://assets.example.com/image.png?w=640 640w");
    }

    #[test]
    fn text_endpoint() {
        let url = client().build_text("Hello", &Params::new().txt_size(48));
        assert_eq!(
            url,
            "https://assets.example.com/~text?txt64=SGVsbG8&txt-size=48"
        );
    }

    #[test]
    fn encoded_path_from_config() {
        let c = Client::new(ClientConfig::new(BASE).encode_path(true)).unwrap();
        assert_eq!(
            c.build_url("a b.png", &Params::new()),
            "https://assets.example.com/a%20b.png"
        );
    }

    #[test]
    fn free_functions_match_client() {
        let config = ClientConfig::new(BASE);
        let params = Params::new().width(10);
        assert_eq!(
            build_url(&config, "x.png", &params, false).unwrap(),
            client().build_url("x.png", &params)
        );
        assert_eq!(
            build_text("Hi", &config, &Params::new()).unwrap(),
            client().build_text("Hi", &Params::new())
        );
    }
}
