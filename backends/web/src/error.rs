use core::fmt;

/// Error type produced by the web backend.
#[derive(Debug, Clone)]
pub enum WebError {
    /// The DOM APIs are not accessible (e.g., when executed outside of a browser).
    DomUnavailable,
    /// The requested container element cannot be located.
    ContainerNotFound(String),
    /// The host does not provide a usable 2d canvas context.
    CanvasUnsupported,
    /// The supplied watermark configuration cannot be parsed.
    Config(String),
    /// Wrapper around JavaScript exceptions.
    Js(String),
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DomUnavailable => write!(f, "DOM is not available"),
            Self::ContainerNotFound(id) => {
                write!(f, "Failed to find container element with id `{id}`")
            }
            Self::CanvasUnsupported => write!(f, "Canvas 2d context is not available"),
            Self::Config(msg) => write!(f, "Invalid watermark configuration: {msg}"),
            Self::Js(msg) => write!(f, "JavaScript error: {msg}"),
        }
    }
}

impl std::error::Error for WebError {}

impl From<wasm_bindgen::JsValue> for WebError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        value
            .as_string()
            .map_or_else(|| Self::Js(format!("{value:?}")), Self::Js)
    }
}

impl From<WebError> for wasm_bindgen::JsValue {
    fn from(value: WebError) -> Self {
        match value {
            WebError::Js(msg) => Self::from(msg),
            other => Self::from(other.to_string()),
        }
    }
}
