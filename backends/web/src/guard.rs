use crate::dom::{self, DomHost};
use crate::error::WebError;
use crate::overlay::OverlaySurface;

use core::cell::{Cell, RefCell};
use core::fmt;
use std::rc::Rc;

use tidemark_core::{WatermarkConfig, style};

use js_sys::Array;
use wasm_bindgen::prelude::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, MutationObserver, MutationObserverInit, MutationRecord, Node, Window,
    console,
};

/// Keeps a watermark overlay mounted inside a container element.
///
/// On mount the guard renders the overlay once, injects it as a
/// `div.watermark` child of the container, and wires two observers for the
/// rest of the page's lifetime: a style/structure observer on the watermark
/// subtree that reverts any attribute, child-list, or character-data
/// tampering, and a removal observer on the container that re-creates the
/// watermark node when the page deletes it.
///
/// Corrections are guarded by a re-entrancy latch: while a correction is in
/// flight, the style observer ignores incoming batches so the corrective
/// mutations cannot re-trigger it. The latch is released on the next
/// macrotask via a zero-delay timeout.
///
/// Each guard owns its state; independent guards on distinct containers do
/// not share a drawing surface or observers.
pub struct WatermarkGuard {
    inner: Rc<GuardInner>,
    removal_observer: MutationObserver,
    _style_hook: Closure<dyn FnMut(Array)>,
    _removal_hook: Closure<dyn FnMut(Array)>,
}

struct GuardInner {
    window: Window,
    document: Document,
    container: Element,
    overlay: String,
    display_width: u32,
    watermark: RefCell<Option<Element>>,
    paused: Rc<Cell<bool>>,
    style_observer: RefCell<Option<MutationObserver>>,
    unpause: RefCell<Option<Closure<dyn Fn()>>>,
}

impl WatermarkGuard {
    /// Renders the overlay on a fresh offscreen surface and mounts it into
    /// `container`.
    pub fn mount(
        host: &DomHost,
        container: Element,
        config: &WatermarkConfig,
    ) -> Result<Self, WebError> {
        let surface = OverlaySurface::new(host.document())?;
        Self::mount_with_surface(host, container, config, &surface)
    }

    /// Mounts the watermark using a caller-supplied drawing surface.
    pub fn mount_with_surface(
        host: &DomHost,
        container: Element,
        config: &WatermarkConfig,
        surface: &OverlaySurface,
    ) -> Result<Self, WebError> {
        let overlay = surface.render(config)?;
        let paused = Rc::new(Cell::new(false));

        let inner = Rc::new(GuardInner {
            window: host.window().clone(),
            document: host.document().clone(),
            container,
            overlay,
            display_width: config.width,
            watermark: RefCell::new(None),
            paused: Rc::clone(&paused),
            style_observer: RefCell::new(None),
            unpause: RefCell::new(None),
        });

        // The release callback only touches the latch, so it cannot keep
        // the rest of the guard alive through a reference cycle.
        inner.unpause.replace(Some(Closure::new(move || {
            paused.set(false);
        })));

        let style_hook: Closure<dyn FnMut(Array)> = Closure::new({
            let inner = Rc::clone(&inner);
            move |records: Array| inner.on_style_mutations(&records)
        });
        let style_observer = MutationObserver::new(style_hook.as_ref().unchecked_ref())?;
        inner.style_observer.replace(Some(style_observer));

        let removal_hook: Closure<dyn FnMut(Array)> = Closure::new({
            let inner = Rc::clone(&inner);
            move |records: Array| inner.on_removal_mutations(&records)
        });
        let removal_observer = MutationObserver::new(removal_hook.as_ref().unchecked_ref())?;
        let removal_init = MutationObserverInit::new();
        removal_init.set_child_list(true);
        removal_observer.observe_with_options(&inner.container, &removal_init)?;

        inner.create_watermark()?;

        Ok(Self {
            inner,
            removal_observer,
            _style_hook: style_hook,
            _removal_hook: removal_hook,
        })
    }

    /// The currently mounted watermark element.
    #[must_use]
    pub fn watermark(&self) -> Option<Element> {
        self.inner.watermark.borrow().clone()
    }

    /// The rendered overlay data URI backing the watermark image.
    #[must_use]
    pub fn overlay(&self) -> &str {
        &self.inner.overlay
    }

    /// The container element the guard watches.
    #[must_use]
    pub fn container(&self) -> &Element {
        &self.inner.container
    }

    /// Consumes the guard, leaving its observers running for the rest of
    /// the page's lifetime.
    pub fn forget(self) {
        std::mem::forget(self);
    }
}

impl Drop for WatermarkGuard {
    fn drop(&mut self) {
        // Observers must not outlive their Rust callbacks.
        if let Some(observer) = self.inner.style_observer.borrow().as_ref() {
            observer.disconnect();
        }
        self.removal_observer.disconnect();
    }
}

impl fmt::Debug for WatermarkGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatermarkGuard")
            .field("container", &self.inner.container)
            .field("mounted", &self.inner.watermark.borrow().is_some())
            .field("paused", &self.inner.paused.get())
            .finish_non_exhaustive()
    }
}

impl GuardInner {
    /// Appends a fresh watermark node to the container, applies the
    /// canonical props, and points the style observer at its subtree.
    fn create_watermark(&self) -> Result<(), WebError> {
        let node = self.document.create_element("div")?;
        self.container.append_child(&node)?;
        self.apply_watermark_props(&node)?;
        console::log_2(&JsValue::from_str("watermark"), &node);

        if let Some(observer) = self.style_observer.borrow().as_ref() {
            observer.observe_with_options(&node, &style_observer_init())?;
        }

        self.watermark.replace(Some(node));
        Ok(())
    }

    /// Applies the full canonical style/content set to a watermark root:
    /// the marker class, the overlay `<img>`, and the forced inline styles.
    /// Running it on an already-correct node changes nothing.
    fn apply_watermark_props(&self, node: &Element) -> Result<(), WebError> {
        node.class_list().add_1(style::WATERMARK_CLASS)?;
        node.set_inner_html(&format!("<img src=\"{}\" />", self.overlay));
        dom::set_important_styles(node, style::CONTAINER_STYLES)?;
        if let Some(image) = node.query_selector("img")? {
            dom::set_important_styles(&image, &style::image_styles(self.display_width))?;
        }
        Ok(())
    }

    /// Style/structure observer callback. Reverts each mutated watermark
    /// subtree to the canonical props, unless a correction is already in
    /// flight.
    fn on_style_mutations(&self, records: &Array) {
        if self.paused.get() {
            return;
        }
        for record in records.iter() {
            let Ok(record) = record.dyn_into::<MutationRecord>() else {
                continue;
            };
            let Some(target) = record.target() else {
                continue;
            };
            // The mutation may have hit a descendant (the image, a text
            // node); corrections always run against the watermark root.
            let Some(root) = find_watermark_root(&target) else {
                continue;
            };
            self.paused.set(true);
            if let Err(error) = self.apply_watermark_props(&root) {
                console::warn_1(&error.into());
            }
            self.schedule_unpause();
        }
    }

    /// Removal observer callback. Re-creates the watermark for every
    /// removed node that carries the marker class.
    fn on_removal_mutations(&self, records: &Array) {
        for record in records.iter() {
            let Ok(record) = record.dyn_into::<MutationRecord>() else {
                continue;
            };
            let removed = record.removed_nodes();
            for index in 0..removed.length() {
                let Some(node) = removed.get(index) else {
                    continue;
                };
                if is_watermark(&node) {
                    if let Err(error) = self.create_watermark() {
                        console::warn_1(&error.into());
                    }
                }
            }
        }
    }

    /// Releases the re-entrancy latch on the next macrotask, after the
    /// observer notifications caused by the correction have been swallowed.
    fn schedule_unpause(&self) {
        let borrow = self.unpause.borrow();
        let Some(callback) = borrow.as_ref() else {
            return;
        };
        let _ = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                0,
            );
    }
}

fn is_watermark(node: &Node) -> bool {
    node.dyn_ref::<Element>()
        .is_some_and(|element| element.class_list().contains(style::WATERMARK_CLASS))
}

/// Walks from `node` up the ancestor chain to the watermark root owning it.
///
/// Returns `None` once the chain is exhausted: a mutation whose target no
/// longer sits inside any watermark subtree is ignored rather than chased
/// past the document root.
fn find_watermark_root(node: &Node) -> Option<Element> {
    let mut current = node
        .dyn_ref::<Element>()
        .cloned()
        .or_else(|| node.parent_element());
    while let Some(element) = current {
        if element.class_list().contains(style::WATERMARK_CLASS) {
            return Some(element);
        }
        current = element.parent_element();
    }
    None
}

fn style_observer_init() -> MutationObserverInit {
    let init = MutationObserverInit::new();
    init.set_attributes(true);
    init.set_attribute_filter(&Array::of2(
        &JsValue::from_str("class"),
        &JsValue::from_str("style"),
    ));
    init.set_child_list(true);
    init.set_character_data(true);
    init.set_subtree(true);
    init
}
