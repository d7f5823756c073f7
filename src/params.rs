//! Rendering parameters: an insertion-ordered key/value bag with typed setters.
//!
//! Key order is caller-controlled and preserved on the wire, which keeps
//! generated URLs reproducible. Setting an existing key replaces its value
//! in place without moving it.

use std::fmt;

/// Known rendering keys. Sorted for binary search.
const KNOWN_KEYS: &[&str] = &[
    "ar",
    "auto",
    "bg",
    "blend",
    "blend-align",
    "blend-alpha",
    "blend-color",
    "blend-crop",
    "blend-fit",
    "blend-h",
    "blend-mode",
    "blend-pad",
    "blend-size",
    "blend-w",
    "blend-x",
    "blend-y",
    "blend64",
    "blur",
    "border",
    "border-bottom",
    "border-left",
    "border-radius",
    "border-radius-inner",
    "border-right",
    "border-top",
    "bri",
    "ch",
    "chromasub",
    "colorquant",
    "colors",
    "con",
    "corner-radius",
    "crop",
    "cs",
    "dl",
    "dpi",
    "dpr",
    "duotone",
    "duotone-alpha",
    "exp",
    "expires",
    "faceindex",
    "facepad",
    "faces",
    "fill",
    "fill-color",
    "fit",
    "flip",
    "fm",
    "fp-debug",
    "fp-x",
    "fp-y",
    "fp-z",
    "gam",
    "grid-colors",
    "grid-size",
    "h",
    "high",
    "htn",
    "hue",
    "invert",
    "iptc",
    "lossless",
    "mark",
    "mark-align",
    "mark-alpha",
    "mark-base",
    "mark-fit",
    "mark-h",
    "mark-pad",
    "mark-rot",
    "mark-scale",
    "mark-tile",
    "mark-w",
    "mark-x",
    "mark-y",
    "mark64",
    "mask",
    "mask-bg",
    "max-h",
    "max-w",
    "min-h",
    "min-w",
    "monochrome",
    "nr",
    "nrs",
    "orient",
    "pad",
    "pad-bottom",
    "pad-left",
    "pad-right",
    "pad-top",
    "page",
    "palette",
    "pdf-annotation",
    "prefix",
    "px",
    "q",
    "rect",
    "rot",
    "sat",
    "sepia",
    "shad",
    "sharp",
    "transparency",
    "trim",
    "trim-color",
    "trim-md",
    "trim-pad",
    "trim-sd",
    "trim-tol",
    "txt",
    "txt-align",
    "txt-clip",
    "txt-color",
    "txt-fit",
    "txt-font",
    "txt-font64",
    "txt-lead",
    "txt-lig",
    "txt-line",
    "txt-line-color",
    "txt-pad",
    "txt-shad",
    "txt-size",
    "txt-track",
    "txt-width",
    "txt-x",
    "txt-y",
    "txt64",
    "usm",
    "usmrad",
    "vib",
    "w",
];

/// A single parameter value.
///
/// "Empty" values (zero, `false`, empty string, NaN, a list with no
/// non-empty item) are treated as absent and never reach the query string.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Joined with `,` when encoded.
    List(Vec<String>),
}

impl ParamValue {
    /// Whether this value is omitted from the query string.
    pub fn is_empty(&self) -> bool {
        match self {
            ParamValue::Bool(b) => !b,
            ParamValue::Int(i) => *i == 0,
            ParamValue::Float(f) => *f == 0.0 || f.is_nan(),
            ParamValue::Str(s) => s.is_empty(),
            ParamValue::List(items) => items.iter().all(String::is_empty),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(b) => write!(f, "{b}"),
            ParamValue::Int(i) => write!(f, "{i}"),
            ParamValue::Float(v) => write_number(f, *v),
            ParamValue::Str(s) => f.write_str(s),
            ParamValue::List(items) => f.write_str(&items.join(",")),
        }
    }
}

/// Shortest round-trip digits, switching to exponent form (`1e+21`,
/// `1.5e-7`) outside `[1e-6, 1e21)` like ECMAScript number formatting.
fn write_number(f: &mut fmt::Formatter<'_>, v: f64) -> fmt::Result {
    if v.is_infinite() {
        return f.write_str(if v > 0.0 { "Infinity" } else { "-Infinity" });
    }
    let magnitude = v.abs();
    if v == 0.0 || (1e-6..1e21).contains(&magnitude) || v.is_nan() {
        return write!(f, "{v}");
    }
    let exp = format!("{v:e}");
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => write!(f, "{mantissa}e+{power}"),
        _ => f.write_str(&exp),
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        ParamValue::Int(i64::from(v))
    }
}

impl From<u32> for ParamValue {
    fn from(v: u32) -> Self {
        ParamValue::Int(i64::from(v))
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Str(v.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Str(v)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(v: Vec<String>) -> Self {
        ParamValue::List(v)
    }
}

impl From<&[&str]> for ParamValue {
    fn from(v: &[&str]) -> Self {
        ParamValue::List(v.iter().map(|s| (*s).to_owned()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ParamValue {
    fn from(v: [&str; N]) -> Self {
        ParamValue::from(&v[..])
    }
}

/// How the image is resized into the `w`/`h` box.
///
/// Maps to the `fit` parameter.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FitMode {
    Clamp,
    Clip,
    Crop,
    FaceArea,
    Fill,
    FillMax,
    Max,
    Min,
    Scale,
}

impl FitMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FitMode::Clamp => "clamp",
            FitMode::Clip => "clip",
            FitMode::Crop => "crop",
            FitMode::FaceArea => "facearea",
            FitMode::Fill => "fill",
            FitMode::FillMax => "fillmax",
            FitMode::Max => "max",
            FitMode::Min => "min",
            FitMode::Scale => "scale",
        }
    }
}

/// Crop anchor or strategy, used when `fit=crop`.
///
/// Maps to the `crop` parameter; several may be combined.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CropMode {
    Top,
    Bottom,
    Left,
    Right,
    Faces,
    FocalPoint,
    Edges,
    Entropy,
}

impl CropMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CropMode::Top => "top",
            CropMode::Bottom => "bottom",
            CropMode::Left => "left",
            CropMode::Right => "right",
            CropMode::Faces => "faces",
            CropMode::FocalPoint => "focalpoint",
            CropMode::Edges => "edges",
            CropMode::Entropy => "entropy",
        }
    }
}

/// Output encoding.
///
/// Maps to the `fm` parameter.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Avif,
    Blurhash,
    Gif,
    Jp2,
    Jpg,
    Json,
    Jxr,
    Mp4,
    Pjpg,
    Png,
    Png8,
    Png32,
    Webm,
    Webp,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Avif => "avif",
            OutputFormat::Blurhash => "blurhash",
            OutputFormat::Gif => "gif",
            OutputFormat::Jp2 => "jp2",
            OutputFormat::Jpg => "jpg",
            OutputFormat::Json => "json",
            OutputFormat::Jxr => "jxr",
            OutputFormat::Mp4 => "mp4",
            OutputFormat::Pjpg => "pjpg",
            OutputFormat::Png => "png",
            OutputFormat::Png8 => "png8",
            OutputFormat::Png32 => "png32",
            OutputFormat::Webm => "webm",
            OutputFormat::Webp => "webp",
        }
    }
}

/// Non-fatal finding from [`Params::check_keys`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamWarning {
    /// Key is not part of the known rendering-parameter catalog.
    /// It is still encoded as given.
    KeyNotRecognized { key: String },
}

/// Insertion-ordered rendering parameters.
///
/// With the `serde` feature this reads and writes a map (`{"w": 100}`),
/// keeping document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    entries: Vec<(String, ParamValue)>,
}

impl Params {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, replacing an existing value in place.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> &mut Self {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
        self
    }

    /// Chaining form of [`set`](Self::set).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Whether `key` is present with a non-empty value.
    pub fn has_value(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| !v.is_empty())
    }

    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Apply every entry of `other` on top of `self`, in `other`'s order.
    pub fn merge(&mut self, other: &Params) -> &mut Self {
        for (k, v) in other.iter() {
            self.set(k, v.clone());
        }
        self
    }

    /// Report keys outside the known rendering-parameter catalog.
    pub fn check_keys(&self) -> Vec<ParamWarning> {
        self.entries
            .iter()
            .filter(|(k, _)| !is_known_key(k))
            .map(|(k, _)| ParamWarning::KeyNotRecognized { key: k.clone() })
            .collect()
    }

    // ── Typed setters ───────────────────────────────────────────────────

    /// Target width (`w`).
    pub fn width(self, w: u32) -> Self {
        self.with("w", w)
    }

    /// Target height (`h`).
    pub fn height(self, h: u32) -> Self {
        self.with("h", h)
    }

    /// Output quality (`q`).
    pub fn quality(self, q: u32) -> Self {
        self.with("q", q)
    }

    /// Device pixel ratio (`dpr`).
    pub fn dpr(self, dpr: f64) -> Self {
        self.with("dpr", dpr)
    }

    /// Output format (`fm`).
    pub fn format(self, fm: OutputFormat) -> Self {
        self.with("fm", fm.as_str())
    }

    /// Resize fit mode (`fit`).
    pub fn fit(self, fit: FitMode) -> Self {
        self.with("fit", fit.as_str())
    }

    /// Crop anchors (`crop`).
    pub fn crop(self, modes: &[CropMode]) -> Self {
        let list: Vec<String> = modes.iter().map(|m| m.as_str().to_owned()).collect();
        self.with("crop", list)
    }

    /// Automatic enhancements (`auto`), e.g. `["format", "compress"]`.
    pub fn auto(self, features: &[&str]) -> Self {
        self.with("auto", features)
    }

    /// Aspect ratio as `w:h` (`ar`).
    pub fn aspect_ratio(self, w: u32, h: u32) -> Self {
        self.with("ar", format!("{w}:{h}"))
    }

    /// Watermark image URL, base64-encoded on the wire (`mark64`).
    pub fn mark64(self, url: impl Into<String>) -> Self {
        self.with("mark64", url.into())
    }

    /// Blend image URL or color, base64-encoded on the wire (`blend64`).
    pub fn blend64(self, value: impl Into<String>) -> Self {
        self.with("blend64", value.into())
    }

    /// Overlay text, base64-encoded on the wire (`txt64`).
    pub fn txt64(self, text: impl Into<String>) -> Self {
        self.with("txt64", text.into())
    }

    /// Text font family, base64-encoded on the wire (`txt-font64`).
    pub fn txt_font64(self, font: impl Into<String>) -> Self {
        self.with("txt-font64", font.into())
    }

    /// Text size in points (`txt-size`).
    pub fn txt_size(self, size: u32) -> Self {
        self.with("txt-size", size)
    }

    /// Text color as hex (`txt-color`).
    pub fn txt_color(self, hex: impl Into<String>) -> Self {
        self.with("txt-color", hex.into())
    }

    /// Text alignment, e.g. `["middle", "center"]` (`txt-align`).
    pub fn txt_align(self, align: &[&str]) -> Self {
        self.with("txt-align", align)
    }

    /// Text padding in pixels (`txt-pad`).
    pub fn txt_pad(self, pad: u32) -> Self {
        self.with("txt-pad", pad)
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            params.set(k, v);
        }
        params
    }
}

fn is_known_key(key: &str) -> bool {
    KNOWN_KEYS.binary_search(&key).is_ok()
}

#[cfg(feature = "serde")]
mod serde_impls {
    use std::fmt;

    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::{ParamValue, Params};

    impl Serialize for Params {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(self.len()))?;
            for (key, value) in self.iter() {
                map.serialize_entry(key, value)?;
            }
            map.end()
        }
    }

    struct ParamsVisitor;

    impl<'de> Visitor<'de> for ParamsVisitor {
        type Value = Params;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of rendering parameters")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Params, A::Error> {
            let mut params = Params::new();
            while let Some((key, value)) = access.next_entry::<String, ParamValue>()? {
                params.set(key, value);
            }
            Ok(params)
        }
    }

    impl<'de> Deserialize<'de> for Params {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_map(ParamsVisitor)
        }
    }
}
