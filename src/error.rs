//! Error type shared by every fallible operation in the crate.

use thiserror::Error;

/// Invalid input rejected before any URL is produced.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum Error {
    /// Base URL has no scheme or no host.
    #[error("base URL must match {{protocol}}//{{host}}{{pathname}}, got {0:?}")]
    InvalidBaseUrl(String),

    /// Width bounds are non-positive or inverted.
    #[error(
        "the min and max srcset widths must be positive integers and min must not exceed max; found min: {min} and max: {max}"
    )]
    InvalidRange { min: u32, max: u32 },

    /// Width tolerance is below 0.01 or not a finite number.
    #[error("the srcset width tolerance must be a number greater than or equal to 0.01, found {0}")]
    InvalidWidthTolerance(f64),

    /// Explicit width list is empty.
    #[error("the widths list must be a non-empty list of integers")]
    EmptyWidths,

    /// Explicit width list contains zero.
    #[error("a custom widths list can only contain positive integer values")]
    NonPositiveWidth,

    /// Device pixel ratio list is empty.
    #[error("the device pixel ratio list must be non-empty")]
    EmptyDevicePixelRatios,

    /// Device pixel ratio outside `[1, 5]`.
    #[error("device pixel ratios must lie between 1 and 5, found {0}")]
    DevicePixelRatioOutOfRange(f64),

    /// Variable quality entry with an out-of-range ratio or quality.
    #[error(
        "variable qualities must map ratios between 1 and 5 to qualities between 1 and 100, found {dpr} => {quality}"
    )]
    InvalidVariableQuality { dpr: f64, quality: u32 },
}

/// Result alias for this crate.
pub type Result<T> = core::result::Result<T, Error>;
