//! Watermark configuration and its coercion rules.

use serde::{Deserialize, Deserializer, Serialize};

/// Font size in CSS pixels used when [`WatermarkConfig::text_size`] carries
/// no usable numeric prefix.
pub const DEFAULT_FONT_PX: f64 = 16.0;

/// Ratio between the font size and the vertical distance between tiled lines.
const LINE_HEIGHT_FACTOR: f64 = 2.5;

/// Immutable per-session description of a watermark.
///
/// Mirrors the metadata record a host page supplies once at startup: the
/// repeated text, its CSS font size, its opacity, and the pixel dimensions
/// of the rendered overlay. Dimensions are typically the full screen
/// resolution so the overlay survives container resizing; when left at zero
/// the web entry point substitutes the screen's available size.
///
/// The numeric fields are deliberately forgiving: host pages historically
/// ship transparency as a string (`"0.9"`) and font sizes with units
/// (`"16px"`), so the accessors below coerce rather than fail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WatermarkConfig {
    /// The text repeated across the overlay.
    pub text: String,
    /// CSS font size of the repeated text, e.g. `"16px"`.
    pub text_size: String,
    /// Overlay opacity in `[0, 1]`. Accepted as a JSON number or a numeric
    /// string.
    #[serde(deserialize_with = "deserialize_transparency")]
    pub transparency: f64,
    /// Overlay width in pixels.
    pub width: u32,
    /// Overlay height in pixels.
    pub height: u32,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            text: String::new(),
            text_size: String::from("16px"),
            transparency: 0.9,
            width: 0,
            height: 0,
        }
    }
}

impl WatermarkConfig {
    /// Creates a configuration for the given text with default size,
    /// transparency, and unset dimensions.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Sets the CSS font size of the repeated text.
    #[must_use]
    pub fn with_text_size(mut self, text_size: impl Into<String>) -> Self {
        self.text_size = text_size.into();
        self
    }

    /// Sets the overlay opacity.
    #[must_use]
    pub const fn with_transparency(mut self, transparency: f64) -> Self {
        self.transparency = transparency;
        self
    }

    /// Sets the overlay render dimensions in pixels.
    #[must_use]
    pub const fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// The opacity actually used for rendering.
    ///
    /// `NaN` coerces to `0.0` (fully transparent) and finite values clamp
    /// into `[0, 1]`, so a malformed transparency never reaches the raster
    /// backend.
    #[must_use]
    pub fn opacity(&self) -> f64 {
        if self.transparency.is_nan() {
            0.0
        } else {
            self.transparency.clamp(0.0, 1.0)
        }
    }

    /// Numeric prefix of [`text_size`](Self::text_size) in pixels.
    ///
    /// `"16px"` parses to `16.0`; a missing or non-positive prefix falls
    /// back to [`DEFAULT_FONT_PX`] so the tiling step stays positive.
    #[must_use]
    pub fn font_px(&self) -> f64 {
        let size = self.text_size.trim_start();
        let end = size
            .char_indices()
            .find(|&(_, c)| !c.is_ascii_digit() && c != '.' && c != '-' && c != '+')
            .map_or(size.len(), |(index, _)| index);
        size[..end]
            .parse::<f64>()
            .ok()
            .filter(|px| px.is_finite() && *px > 0.0)
            .unwrap_or(DEFAULT_FONT_PX)
    }

    /// Vertical distance between consecutive tiled lines.
    #[must_use]
    pub fn line_height(&self) -> f64 {
        self.font_px() * LINE_HEIGHT_FACTOR
    }
}

fn deserialize_transparency<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    // Unparseable strings become NaN and later coerce to fully transparent.
    Ok(match Raw::deserialize(deserializer)? {
        Raw::Number(value) => value,
        Raw::Text(text) => text.trim().parse().unwrap_or(f64::NAN),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = WatermarkConfig::new("confidential");
        assert_eq!(config.text, "confidential");
        assert_eq!(config.text_size, "16px");
        assert!((config.transparency - 0.9).abs() < f64::EPSILON);
        assert_eq!(config.width, 0);
        assert_eq!(config.height, 0);
    }

    #[test]
    fn test_opacity_clamps() {
        let config = WatermarkConfig::new("x");
        assert!((config.with_transparency(0.5).opacity() - 0.5).abs() < f64::EPSILON);

        let config = WatermarkConfig::new("x");
        assert!((config.with_transparency(1.7).opacity() - 1.0).abs() < f64::EPSILON);

        let config = WatermarkConfig::new("x");
        assert!(config.with_transparency(-0.2).opacity().abs() < f64::EPSILON);
    }

    #[test]
    fn test_opacity_nan_is_fully_transparent() {
        let config = WatermarkConfig::new("x").with_transparency(f64::NAN);
        assert!(config.opacity().abs() < f64::EPSILON);
    }

    #[test]
    fn test_font_px_parses_prefix() {
        let config = WatermarkConfig::new("x").with_text_size("16px");
        assert!((config.font_px() - 16.0).abs() < f64::EPSILON);

        let config = WatermarkConfig::new("x").with_text_size("1.5rem");
        assert!((config.font_px() - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_font_px_falls_back() {
        for size in ["big", "", "px16", "0px", "-4px"] {
            let config = WatermarkConfig::new("x").with_text_size(size);
            assert!(
                (config.font_px() - DEFAULT_FONT_PX).abs() < f64::EPSILON,
                "expected fallback for {size:?}"
            );
        }
    }

    #[test]
    fn test_line_height() {
        let config = WatermarkConfig::new("x").with_text_size("16px");
        assert!((config.line_height() - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_deserialize_numeric_transparency() {
        let config: WatermarkConfig =
            serde_json::from_str(r#"{"text":"a","textSize":"16px","transparency":0.9}"#).unwrap();
        assert!((config.transparency - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn test_deserialize_string_transparency() {
        let config: WatermarkConfig =
            serde_json::from_str(r#"{"text":"a","transparency":"0.75"}"#).unwrap();
        assert!((config.transparency - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_deserialize_garbage_transparency_coerces() {
        let config: WatermarkConfig =
            serde_json::from_str(r#"{"text":"a","transparency":"opaque"}"#).unwrap();
        assert!(config.transparency.is_nan());
        assert!(config.opacity().abs() < f64::EPSILON);
    }

    #[test]
    fn test_serde_round_trip() {
        let config = WatermarkConfig::new("dave@acme.com")
            .with_text_size("14px")
            .with_transparency(0.8)
            .with_dimensions(1920, 1080);
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("textSize"), "camelCase keys expected: {json}");
        let back: WatermarkConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
