use crate::error::WebError;

use tidemark_core::{WatermarkConfig, style, tiling::LinePlan, tiling::tile_text};

use wasm_bindgen::JsCast;

use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

/// Offscreen drawing surface that rasterizes watermark overlays.
///
/// Each surface owns one `<canvas>` and its 2d context. A guard owns a
/// surface of its own, so independent watermarks never race over a shared
/// canvas; callers embedding Tidemark can still hand in their own canvas
/// via [`OverlaySurface::from_canvas`].
#[derive(Debug, Clone)]
pub struct OverlaySurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl OverlaySurface {
    /// Creates a surface backed by a fresh offscreen canvas.
    pub fn new(document: &Document) -> Result<Self, WebError> {
        let canvas = document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| WebError::CanvasUnsupported)?;
        Self::from_canvas(canvas)
    }

    /// Wraps a caller-supplied canvas.
    pub fn from_canvas(canvas: HtmlCanvasElement) -> Result<Self, WebError> {
        let context = canvas
            .get_context("2d")?
            .ok_or(WebError::CanvasUnsupported)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| WebError::CanvasUnsupported)?;
        Ok(Self { canvas, context })
    }

    /// Returns the backing canvas element.
    #[must_use]
    pub const fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Rasterizes the watermark described by `config` and returns it as a
    /// data URI, suitable for direct assignment to an `<img>` source.
    ///
    /// The text is tiled into one long line, drawn repeatedly along a
    /// 45°-rotated axis with a per-line start offset so repetitions never
    /// align. Deterministic for a fixed config and surface; empty text
    /// produces a blank overlay.
    pub fn render(&self, config: &WatermarkConfig) -> Result<String, WebError> {
        let width = config.width;
        let height = config.height;

        // Resizing also resets the context state from any previous render.
        self.canvas.set_width(width);
        self.canvas.set_height(height);

        let context = &self.context;
        context.save();
        context.translate(f64::from(width) / 2.0, f64::from(height) / 2.0)?;
        // 45 degrees counter clockwise
        context.rotate(315.0_f64.to_radians())?;
        context.set_global_alpha(config.opacity());
        context.set_font(&style::font(&config.text_size));
        context.set_fill_style_str(style::FILL_COLOR);

        let tiled = tile_text(&config.text, width, height);
        for line in LinePlan::new(&tiled, width, height, config.line_height()) {
            context.fill_text(&line.text, line.x, line.y)?;
        }

        context.restore();
        self.canvas.to_data_url().map_err(WebError::from)
    }
}
