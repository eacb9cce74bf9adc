use crate::error::WebError;

use wasm_bindgen::JsCast;

use web_sys::{Document, Element, HtmlElement, Window};

/// Handle to the hosting page.
#[derive(Debug, Clone)]
pub struct DomHost {
    window: Window,
    document: Document,
}

impl DomHost {
    /// Resolves the browsing context this backend runs in.
    pub fn new() -> Result<Self, WebError> {
        let window: Window = web_sys::window().ok_or(WebError::DomUnavailable)?;
        let document: Document = window.document().ok_or(WebError::DomUnavailable)?;
        Ok(Self { window, document })
    }

    /// Returns the owning document.
    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    /// Returns the owning window.
    #[must_use]
    pub const fn window(&self) -> &Window {
        &self.window
    }

    /// Finds the element that should host the watermark. Falls back to the
    /// document body when no id is given.
    pub fn container(&self, container_id: Option<&str>) -> Result<Element, WebError> {
        container_id.map_or_else(
            || {
                self.document
                    .body()
                    .map(Element::from)
                    .ok_or(WebError::DomUnavailable)
            },
            |id| {
                self.document
                    .get_element_by_id(id)
                    .ok_or_else(|| WebError::ContainerNotFound(id.to_string()))
            },
        )
    }

    /// Pixel dimensions of the available screen area.
    ///
    /// The overlay is rendered at this size by default so it keeps covering
    /// the container after resizes.
    pub fn screen_size(&self) -> Result<(u32, u32), WebError> {
        let screen = self.window.screen()?;
        let width = screen.avail_width()?;
        let height = screen.avail_height()?;
        Ok((
            u32::try_from(width.max(0)).unwrap_or(0),
            u32::try_from(height.max(0)).unwrap_or(0),
        ))
    }
}

/// Applies every `(property, value)` pair to `element` with `important`
/// priority.
pub fn set_important_styles<'a, V>(
    element: &Element,
    styles: impl IntoIterator<Item = &'a (&'a str, V)>,
) -> Result<(), WebError>
where
    V: AsRef<str> + 'a,
{
    let html: &HtmlElement = element
        .dyn_ref()
        .ok_or_else(|| WebError::Js(String::from("element carries no inline style")))?;
    let declaration = html.style();
    for (property, value) in styles {
        declaration.set_property_with_priority(property, value.as_ref(), "important")?;
    }
    Ok(())
}
