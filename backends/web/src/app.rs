use tidemark_core::WatermarkConfig;

use crate::{dom::DomHost, error::WebError, guard::WatermarkGuard};

/// Builder for [`TidemarkApp`].
#[derive(Debug, Default, Clone)]
pub struct TidemarkAppBuilder {
    container_id: Option<String>,
    config: WatermarkConfig,
}

impl TidemarkAppBuilder {
    /// Creates a new builder for a watermark with the given text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            container_id: None,
            config: WatermarkConfig::new(text),
        }
    }

    /// Creates a builder from a complete configuration record.
    #[must_use]
    pub const fn from_config(config: WatermarkConfig) -> Self {
        Self {
            container_id: None,
            config,
        }
    }

    /// Sets the DOM element identifier that should host the watermark.
    #[must_use]
    pub fn with_container_id(mut self, id: impl Into<String>) -> Self {
        self.container_id = Some(id.into());
        self
    }

    /// Sets the CSS font size of the repeated text.
    #[must_use]
    pub fn with_text_size(mut self, text_size: impl Into<String>) -> Self {
        self.config = self.config.with_text_size(text_size);
        self
    }

    /// Sets the overlay opacity.
    #[must_use]
    pub fn with_transparency(mut self, transparency: f64) -> Self {
        self.config = self.config.with_transparency(transparency);
        self
    }

    /// Overrides the overlay render dimensions. When unset, the screen's
    /// available size is used so the watermark survives container resizing.
    #[must_use]
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.config = self.config.with_dimensions(width, height);
        self
    }

    /// Finalises the builder and creates a [`TidemarkApp`].
    ///
    /// # Errors
    ///
    /// Returns an error if the DOM is unavailable or the screen dimensions
    /// cannot be read.
    pub fn build(self) -> Result<TidemarkApp, WebError> {
        TidemarkApp::new_with_options(self)
    }
}

/// Entry point for mounting a Tidemark watermark from the browser.
#[wasm_bindgen]
#[derive(Debug)]
pub struct TidemarkApp {
    host: DomHost,
    container_id: Option<String>,
    config: WatermarkConfig,
    guard: Option<WatermarkGuard>,
}

impl TidemarkApp {
    fn new_with_options(builder: TidemarkAppBuilder) -> Result<Self, WebError> {
        console_error_panic_hook::set_once();

        let host = DomHost::new()?;
        let mut config = builder.config;
        if config.width == 0 || config.height == 0 {
            let (width, height) = host.screen_size()?;
            config = config.with_dimensions(width, height);
        }

        Ok(Self {
            host,
            container_id: builder.container_id,
            config,
            guard: None,
        })
    }

    /// Returns the active guard, if the app is mounted.
    #[must_use]
    pub const fn guard(&self) -> Option<&WatermarkGuard> {
        self.guard.as_ref()
    }

    /// Returns the resolved configuration.
    #[must_use]
    pub const fn config(&self) -> &WatermarkConfig {
        &self.config
    }

    fn mount_into(&mut self, container_id: Option<&str>) -> Result<(), WebError> {
        // Mounting is idempotent; the guard is created once per app.
        if self.guard.is_some() {
            return Ok(());
        }
        let id = container_id.or(self.container_id.as_deref());
        let container = self.host.container(id)?;
        self.guard = Some(WatermarkGuard::mount(&self.host, container, &self.config)?);
        Ok(())
    }
}

use wasm_bindgen::prelude::*;

#[wasm_bindgen]
impl TidemarkApp {
    /// Creates an app that watermarks the document body with the given
    /// text, using the default size and transparency.
    ///
    /// # Errors
    ///
    /// Returns an error if the DOM is unavailable.
    #[wasm_bindgen(constructor)]
    pub fn new(text: String) -> Result<TidemarkApp, WebError> {
        Self::new_with_options(TidemarkAppBuilder::new(text))
    }

    /// Creates an app from a JSON configuration record, e.g.
    /// `{"text":"dave@acme.com","textSize":"16px","transparency":"0.9"}`.
    /// `transparency` may be a number or a numeric string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or the DOM is
    /// unavailable.
    pub fn from_json(json: &str) -> Result<TidemarkApp, WebError> {
        let config: WatermarkConfig =
            serde_json::from_str(json).map_err(|error| WebError::Config(error.to_string()))?;
        Self::new_with_options(TidemarkAppBuilder::from_config(config))
    }

    /// Mounts the watermark into the document body (or the container id
    /// set on the builder) and starts observation.
    ///
    /// # Errors
    ///
    /// Returns an error if the container cannot be found or the overlay
    /// cannot be rendered.
    pub fn mount(&mut self) -> Result<(), WebError> {
        self.mount_into(None)
    }

    /// Mounts the watermark into the element with the given id.
    ///
    /// # Errors
    ///
    /// Returns an error if the container cannot be found or the overlay
    /// cannot be rendered.
    pub fn mount_to(&mut self, container_id: &str) -> Result<(), WebError> {
        self.mount_into(Some(container_id))
    }

    /// Consumes the app, leaving the mounted watermark and its observers
    /// running for the rest of the page's lifetime.
    pub fn forget(mut self) {
        if let Some(guard) = self.guard.take() {
            guard.forget();
        }
    }
}
