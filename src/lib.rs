//! Request URLs, responsive srcsets, and signatures for a remote
//! image-rendering service.
//!
//! Pure string construction: no I/O, no shared state, every call reentrant.
//!
//! # Modules
//!
//! - [`resolution`] — Geometric width ladders bounded by a tolerance
//! - [`validate`] — Guards for srcset options
//! - [`params`] — Insertion-ordered rendering parameters with typed setters
//! - [`encode`] — Query string encoding (percent and base64url)
//! - [`path`] — Base URL and image path normalization
//! - [`sign`] — Request signatures
//! - [`srcset`] — Srcset options and ladder selection
//! - [`client`] — URL, srcset and text-endpoint construction

#![forbid(unsafe_code)]

pub mod client;
pub mod encode;
pub mod error;
pub mod params;
pub mod path;
pub mod resolution;
pub mod sign;
pub mod srcset;
pub mod validate;

pub use client::{
    Client, ClientConfig, UrlObject, build_srcset, build_text, build_url, build_url_object,
};
pub use error::{Error, Result};
pub use params::{CropMode, FitMode, OutputFormat, ParamValue, ParamWarning, Params};
pub use resolution::generate_resolutions;
pub use srcset::{DprQualities, SrcsetMode, SrcsetOptions};
