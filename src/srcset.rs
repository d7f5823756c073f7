//! Srcset options and the choice between width and pixel-density ladders.
//!
//! Without a fixed `w` or `h` the image can be served at any width, so the
//! srcset lists widths (`100w`). With a fixed size only the pixel density can
//! vary, so the srcset lists ratios (`2x`).

use crate::error::Result;
use crate::params::Params;
use crate::resolution::generate_resolutions;
use crate::validate::{
    resolve_srcset_options, validate_device_pixel_ratios, validate_variable_qualities,
    validate_widths,
};

/// Device pixel ratios used when none are given.
pub const DEFAULT_DPRS: &[f64] = &[1.0, 1.5, 2.0, 2.5, 3.0];

/// Every half-step ratio the service accepts.
pub const EXTENDED_DPRS: &[f64] = &[1.0, 1.5, 2.0, 2.5, 3.0, 3.5, 4.0, 4.5, 5.0];

/// Quality per ratio when variable quality is on. Falls as the ratio rises.
pub const DEFAULT_DPR_QUALITIES: &[(f64, u32)] = &[
    (1.0, 75),
    (1.5, 62),
    (2.0, 50),
    (2.5, 43),
    (3.0, 35),
    (3.5, 30),
    (4.0, 23),
    (4.5, 22),
    (5.0, 20),
];

/// Whether variable quality is on when not requested.
pub const DEFAULT_VARIABLE_QUALITY: bool = false;

/// Mapping from device pixel ratio to output quality.
///
/// With the `serde` feature this reads and writes a map keyed by ratio
/// (`{"2": 40, "1.5": 62}`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DprQualities {
    entries: Vec<(f64, u32)>,
}

impl DprQualities {
    /// Empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in table, [`DEFAULT_DPR_QUALITIES`].
    pub fn defaults() -> Self {
        Self {
            entries: DEFAULT_DPR_QUALITIES.to_vec(),
        }
    }

    /// Set the quality for `dpr`, replacing any previous entry.
    pub fn set(&mut self, dpr: f64, quality: u32) -> &mut Self {
        match self.entries.iter_mut().find(|(d, _)| *d == dpr) {
            Some((_, q)) => *q = quality,
            None => self.entries.push((dpr, quality)),
        }
        self
    }

    pub fn with(mut self, dpr: f64, quality: u32) -> Self {
        self.set(dpr, quality);
        self
    }

    /// Quality for exactly `dpr`, if listed.
    pub fn get(&self, dpr: f64) -> Option<u32> {
        self.entries.iter().find(|(d, _)| *d == dpr).map(|&(_, q)| q)
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, u32)> + '_ {
        self.entries.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `self` with every entry of `overrides` applied on top.
    pub fn overlaid(mut self, overrides: &DprQualities) -> Self {
        for (dpr, q) in overrides.iter() {
            self.set(dpr, q);
        }
        self
    }
}

impl FromIterator<(f64, u32)> for DprQualities {
    fn from_iter<I: IntoIterator<Item = (f64, u32)>>(iter: I) -> Self {
        let mut out = DprQualities::new();
        for (dpr, q) in iter {
            out.set(dpr, q);
        }
        out
    }
}

#[cfg(feature = "serde")]
mod serde_impls {
    use std::fmt;

    use serde::de::{self, MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::DprQualities;

    impl Serialize for DprQualities {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(self.entries.len()))?;
            for (dpr, quality) in self.iter() {
                map.serialize_entry(&dpr.to_string(), &quality)?;
            }
            map.end()
        }
    }

    /// Ratio key: a numeric string in JSON, a plain number elsewhere.
    struct RatioKey(f64);

    struct RatioKeyVisitor;

    impl Visitor<'_> for RatioKeyVisitor {
        type Value = RatioKey;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a device pixel ratio")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<RatioKey, E> {
            v.trim()
                .parse::<f64>()
                .map(RatioKey)
                .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<RatioKey, E> {
            Ok(RatioKey(v))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<RatioKey, E> {
            Ok(RatioKey(v as f64))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<RatioKey, E> {
            Ok(RatioKey(v as f64))
        }
    }

    impl<'de> Deserialize<'de> for RatioKey {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_any(RatioKeyVisitor)
        }
    }

    struct QualitiesVisitor;

    impl<'de> Visitor<'de> for QualitiesVisitor {
        type Value = DprQualities;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map from device pixel ratio to quality")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<DprQualities, A::Error> {
            let mut qualities = DprQualities::new();
            while let Some((RatioKey(dpr), quality)) = access.next_entry::<RatioKey, u32>()? {
                qualities.set(dpr, quality);
            }
            Ok(qualities)
        }
    }

    impl<'de> Deserialize<'de> for DprQualities {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_map(QualitiesVisitor)
        }
    }
}

/// Caller options for srcset generation. Every field is optional.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct SrcsetOptions {
    /// Explicit widths; overrides min/max/tolerance generation.
    pub widths: Option<Vec<u32>>,
    pub width_tolerance: Option<f64>,
    pub min_width: Option<u32>,
    pub max_width: Option<u32>,
    /// Ratios for fixed-size images. Defaults to [`DEFAULT_DPRS`].
    pub device_pixel_ratios: Option<Vec<f64>>,
    /// Per-ratio qualities laid over [`DEFAULT_DPR_QUALITIES`].
    pub variable_qualities: Option<DprQualities>,
    /// Emit a per-ratio `q` in the pixel-density ladder.
    pub variable_quality: bool,
}

impl Default for SrcsetOptions {
    fn default() -> Self {
        Self {
            widths: None,
            width_tolerance: None,
            min_width: None,
            max_width: None,
            device_pixel_ratios: None,
            variable_qualities: None,
            variable_quality: DEFAULT_VARIABLE_QUALITY,
        }
    }
}

impl SrcsetOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn widths(mut self, widths: impl Into<Vec<u32>>) -> Self {
        self.widths = Some(widths.into());
        self
    }

    pub fn width_tolerance(mut self, tolerance: f64) -> Self {
        self.width_tolerance = Some(tolerance);
        self
    }

    pub fn min_width(mut self, min: u32) -> Self {
        self.min_width = Some(min);
        self
    }

    pub fn max_width(mut self, max: u32) -> Self {
        self.max_width = Some(max);
        self
    }

    pub fn device_pixel_ratios(mut self, ratios: impl Into<Vec<f64>>) -> Self {
        self.device_pixel_ratios = Some(ratios.into());
        self
    }

    pub fn variable_qualities(mut self, qualities: DprQualities) -> Self {
        self.variable_qualities = Some(qualities);
        self
    }

    pub fn variable_quality(mut self, enabled: bool) -> Self {
        self.variable_quality = enabled;
        self
    }

    /// Widths for the width ladder: the explicit list if given, otherwise
    /// a generated ladder from the (defaulted) min, max and tolerance.
    pub fn resolve_widths(&self) -> Result<Vec<u32>> {
        if let Some(widths) = &self.widths {
            validate_widths(widths)?;
            return Ok(widths.clone());
        }

        let range = resolve_srcset_options(self)?;
        generate_resolutions(range.min_width, range.max_width, range.width_tolerance)
    }
}

/// Resolved srcset ladder.
#[derive(Debug, Clone, PartialEq)]
pub enum SrcsetMode {
    /// One candidate per width, described as `<w>w`.
    Widths(Vec<u32>),
    /// One candidate per ratio, described as `<dpr>x`. `qualities` is set
    /// only when variable quality is on.
    DevicePixelRatios {
        ratios: Vec<f64>,
        qualities: Option<DprQualities>,
    },
}

impl SrcsetMode {
    /// Pick and validate the ladder for `params`.
    ///
    /// A non-empty `w` or `h` selects the pixel-density ladder.
    pub fn select(params: &Params, options: &SrcsetOptions) -> Result<Self> {
        if params.has_value("w") || params.has_value("h") {
            Self::device_pixel_ratios(options)
        } else {
            Ok(SrcsetMode::Widths(options.resolve_widths()?))
        }
    }

    fn device_pixel_ratios(options: &SrcsetOptions) -> Result<Self> {
        let ratios = options
            .device_pixel_ratios
            .clone()
            .unwrap_or_else(|| DEFAULT_DPRS.to_vec());
        validate_device_pixel_ratios(&ratios)?;

        if let Some(custom) = &options.variable_qualities {
            validate_variable_qualities(custom)?;
        }

        let qualities = options.variable_quality.then(|| match &options.variable_qualities {
            Some(custom) => DprQualities::defaults().overlaid(custom),
            None => DprQualities::defaults(),
        });

        Ok(SrcsetMode::DevicePixelRatios { ratios, qualities })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn no_size_selects_widths() {
        let mode = SrcsetMode::select(&Params::new(), &SrcsetOptions::new().widths([100, 200]))
            .unwrap();
        assert_eq!(mode, SrcsetMode::Widths(vec![100, 200]));
    }

    #[test]
    fn zero_width_still_selects_widths() {
        let params = Params::new().with("w", 0);
        let mode = SrcsetMode::select(&params, &SrcsetOptions::new()).unwrap();
        assert!(matches!(mode, SrcsetMode::Widths(_)));
    }

    #[test]
    fn height_selects_dpr() {
        let mode = SrcsetMode::select(&Params::new().height(300), &SrcsetOptions::new()).unwrap();
        assert_eq!(
            mode,
            SrcsetMode::DevicePixelRatios {
                ratios: DEFAULT_DPRS.to_vec(),
                qualities: None
            }
        );
    }

    #[test]
    fn variable_quality_merges_tables() {
        let opts = SrcsetOptions::new()
            .variable_quality(true)
            .variable_qualities(DprQualities::new().with(2.0, 90));
        let SrcsetMode::DevicePixelRatios { qualities, .. } =
            SrcsetMode::select(&Params::new().width(100), &opts).unwrap()
        else {
            panic!("expected dpr mode");
        };
        let qualities = qualities.unwrap();
        assert_eq!(qualities.get(1.0), Some(75));
        assert_eq!(qualities.get(2.0), Some(90));
        assert_eq!(qualities.get(1.25), None);
    }

    #[test]
    fn custom_qualities_validated_even_when_disabled() {
        let opts = SrcsetOptions::new().variable_qualities(DprQualities::new().with(9.0, 10));
        assert!(SrcsetMode::select(&Params::new().width(100), &opts).is_err());
    }

    #[test]
    fn bad_ratio_rejected() {
        let opts = SrcsetOptions::new().device_pixel_ratios([1.0, 0.5]);
        assert_eq!(
            SrcsetMode::select(&Params::new().width(100), &opts),
            Err(Error::DevicePixelRatioOutOfRange(0.5))
        );
    }

    #[test]
    fn explicit_widths_win_over_range() {
        let opts = SrcsetOptions::new()
            .widths([320, 640])
            .min_width(10)
            .max_width(20);
        assert_eq!(opts.resolve_widths().unwrap(), vec![320, 640]);
    }

    #[test]
    fn empty_widths_rejected() {
        let opts = SrcsetOptions::new().widths(Vec::new());
        assert_eq!(opts.resolve_widths(), Err(Error::EmptyWidths));
    }

    #[test]
    fn quality_table_is_descending() {
        assert!(DEFAULT_DPR_QUALITIES.windows(2).all(|w| w[0].1 > w[1].1));
        assert_eq!(DEFAULT_DPR_QUALITIES.len(), EXTENDED_DPRS.len());
    }
}
