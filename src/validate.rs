//! Guards for caller-supplied srcset options.
//!
//! Each check fails fast with an [`Error`] naming the violated constraint.
//! Nothing is mutated on failure.

use crate::error::{Error, Result};
use crate::resolution::{DEFAULT_MAX_WIDTH, DEFAULT_MIN_WIDTH, DEFAULT_WIDTH_TOLERANCE};
use crate::srcset::{DprQualities, SrcsetOptions};

/// Smallest accepted width tolerance.
pub const MIN_WIDTH_TOLERANCE: f64 = 0.01;

/// Smallest accepted device pixel ratio.
pub const MIN_DEVICE_PIXEL_RATIO: f64 = 1.0;

/// Largest accepted device pixel ratio.
pub const MAX_DEVICE_PIXEL_RATIO: f64 = 5.0;

/// Width bounds after defaults have been applied and checked.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ResolvedRange {
    pub min_width: u32,
    pub max_width: u32,
    pub width_tolerance: f64,
}

/// Both bounds positive and `min <= max`.
pub fn validate_range(min: u32, max: u32) -> Result<()> {
    if min == 0 || max == 0 || min > max {
        return Err(Error::InvalidRange { min, max });
    }
    Ok(())
}

/// Tolerance is a number `>= 0.01`. NaN is rejected.
pub fn validate_width_tolerance(tolerance: f64) -> Result<()> {
    if tolerance.is_nan() || tolerance < MIN_WIDTH_TOLERANCE {
        return Err(Error::InvalidWidthTolerance(tolerance));
    }
    Ok(())
}

/// Non-empty, every entry positive.
pub fn validate_widths(widths: &[u32]) -> Result<()> {
    if widths.is_empty() {
        return Err(Error::EmptyWidths);
    }
    if widths.contains(&0) {
        return Err(Error::NonPositiveWidth);
    }
    Ok(())
}

/// Non-empty, every ratio within `[1, 5]`.
pub fn validate_device_pixel_ratios(ratios: &[f64]) -> Result<()> {
    if ratios.is_empty() {
        return Err(Error::EmptyDevicePixelRatios);
    }
    match ratios.iter().find(|&&dpr| !dpr_in_range(dpr)) {
        Some(&dpr) => Err(Error::DevicePixelRatioOutOfRange(dpr)),
        None => Ok(()),
    }
}

/// Every entry maps a ratio within `[1, 5]` to a quality within `1..=100`.
///
/// The map shape itself is guaranteed by [`DprQualities`]; only the entries
/// are checked here.
pub fn validate_variable_qualities(qualities: &DprQualities) -> Result<()> {
    for (dpr, quality) in qualities.iter() {
        if !dpr_in_range(dpr) || !(1..=100).contains(&quality) {
            return Err(Error::InvalidVariableQuality { dpr, quality });
        }
    }
    Ok(())
}

/// Fill absent width-ladder fields with defaults, then validate them.
///
/// Tolerance is checked before the range, so a bad tolerance is reported
/// even when the bounds are also wrong.
pub fn resolve_srcset_options(options: &SrcsetOptions) -> Result<ResolvedRange> {
    let width_tolerance = options.width_tolerance.unwrap_or(DEFAULT_WIDTH_TOLERANCE);
    validate_width_tolerance(width_tolerance)?;

    let min_width = options.min_width.unwrap_or(DEFAULT_MIN_WIDTH);
    let max_width = options.max_width.unwrap_or(DEFAULT_MAX_WIDTH);
    validate_range(min_width, max_width)?;

    Ok(ResolvedRange {
        min_width,
        max_width,
        width_tolerance,
    })
}

fn dpr_in_range(dpr: f64) -> bool {
    (MIN_DEVICE_PIXEL_RATIO..=MAX_DEVICE_PIXEL_RATIO).contains(&dpr)
}
