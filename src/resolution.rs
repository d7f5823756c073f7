//! Responsive width ladder generation.
//!
//! A ladder starts at the minimum width and grows geometrically by
//! `1 + 2 * tolerance` per rung, so the size difference between any two
//! neighbouring srcset candidates stays within the tolerance band. The last
//! rung is always the maximum width.
//!
//! # Example
//!
//! ```
//! use zensrcset::generate_resolutions;
//!
//! let ladder = generate_resolutions(100, 200, 0.16).unwrap();
//! assert_eq!(ladder, vec![100, 132, 174, 200]);
//! ```

use crate::error::Result;
use crate::validate::{validate_range, validate_width_tolerance};

/// Smallest width in a generated ladder when none is given.
pub const DEFAULT_MIN_WIDTH: u32 = 96;

/// Largest width in a generated ladder when none is given.
pub const DEFAULT_MAX_WIDTH: u32 = 1920;

/// Tolerable fractional difference between neighbouring widths.
pub const DEFAULT_WIDTH_TOLERANCE: f64 = 0.16;

/// Generate an ascending ladder of widths spanning `[min_width, max_width]`.
///
/// Fails when the bounds are zero or inverted, or when `tolerance < 0.01`.
/// `min_width == max_width` yields a single rung.
pub fn generate_resolutions(min_width: u32, max_width: u32, tolerance: f64) -> Result<Vec<u32>> {
    validate_range(min_width, max_width)?;
    validate_width_tolerance(tolerance)?;

    if min_width == max_width {
        return Ok(vec![min_width]);
    }

    let growth = 1.0 + tolerance * 2.0;
    let max = f64::from(max_width);
    let mut ladder: Vec<u32> = Vec::new();
    let mut current = f64::from(min_width);

    while current < max {
        let rung = current.round() as u32;
        // Tiny widths with tiny tolerances can round onto the previous rung.
        if ladder.last() != Some(&rung) {
            ladder.push(rung);
        }
        current *= growth;
    }

    // The loop stops on the first value at or past max. Close the ladder
    // with max itself unless rounding already landed there.
    if ladder.last().is_some_and(|&last| last < max_width) {
        ladder.push(max_width);
    }

    tracing::debug!(
        min_width,
        max_width,
        tolerance,
        rungs = ladder.len(),
        "generated srcset width ladder"
    );

    Ok(ladder)
}
