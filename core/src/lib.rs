//! Platform-independent logic for the Tidemark watermark overlay.
//!
//! Everything about the watermark that does not need a browser lives here:
//! the [`WatermarkConfig`] record with its coercion rules, the text-tiling
//! geometry that lays repeated text across a rotated surface, and the
//! canonical style tables a DOM guard re-applies when a page tampers with
//! the overlay.
//!
//! # Example
//!
//! ```
//! use tidemark_core::{WatermarkConfig, tiling};
//!
//! let config = WatermarkConfig::new("dave@acme.com")
//!     .with_text_size("16px")
//!     .with_transparency(0.9)
//!     .with_dimensions(1920, 1080);
//!
//! let tiled = tiling::tile_text(&config.text, config.width, config.height);
//! assert!(tiled.chars().count() >= 1920 + 1080);
//! ```

pub mod config;
pub mod style;
pub mod tiling;

pub use config::{DEFAULT_FONT_PX, WatermarkConfig};
pub use style::WATERMARK_CLASS;
pub use tiling::{Line, LinePlan};
