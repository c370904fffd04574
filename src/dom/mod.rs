//! Document access for page behaviors.
//!
//! Behaviors only ever talk to a [`Document`]; the in-memory [`Page`] is the
//! implementation used by the terminal preview and the tests.

mod page;
mod selector;

pub use page::{ElementSpec, Page, ScrollRequest};
pub use selector::{Selector, SelectorError, SelectorTarget};

/// Handle to an element owned by a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub(crate) usize);

/// How a programmatic scroll should move the viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBehavior {
    #[default]
    Auto,
    Smooth,
}

/// Element lookup, content, style and layout access.
///
/// Every method is infallible: operations on an unknown element are no-ops
/// and reads return empty values, the way detached DOM nodes behave.
pub trait Document: Send + Sync {
    fn element_by_id(&self, id: &str) -> Option<ElementId>;

    /// All elements under `scope` (or the whole document) matching `selector`, in document order.
    fn select_all_within(&self, scope: Option<ElementId>, selector: &Selector) -> Vec<ElementId>;

    fn matches(&self, element: ElementId, selector: &Selector) -> bool;

    fn text(&self, element: ElementId) -> String;
    fn set_text(&self, element: ElementId, text: &str);

    fn style(&self, element: ElementId, property: &str) -> Option<String>;
    fn set_style(&self, element: ElementId, property: &str, value: &str);
    fn remove_style(&self, element: ElementId, property: &str);

    fn attribute(&self, element: ElementId, name: &str) -> Option<String>;

    fn has_class(&self, element: ElementId, class: &str) -> bool;
    fn add_class(&self, element: ElementId, class: &str);
    fn remove_class(&self, element: ElementId, class: &str);
    /// Returns whether the class is present afterwards.
    fn toggle_class(&self, element: ElementId, class: &str) -> bool;

    /// Rendered height in px
    fn offset_height(&self, element: ElementId) -> f64;
    /// Distance in px from the top of the document
    fn offset_top(&self, element: ElementId) -> f64;

    fn viewport_height(&self) -> f64;
    fn scroll_y(&self) -> f64;
    fn scroll_to(&self, top: f64, behavior: ScrollBehavior);

    /// First match for a selector string; an invalid selector matches nothing.
    fn query_selector(&self, css: &str) -> Option<ElementId> {
        self.query_selector_all(css).into_iter().next()
    }

    fn query_selector_all(&self, css: &str) -> Vec<ElementId> {
        self.query_selector_all_within(None, css)
    }

    fn query_selector_all_within(&self, scope: Option<ElementId>, css: &str) -> Vec<ElementId> {
        match Selector::parse(css) {
            Ok(selector) => self.select_all_within(scope, &selector),
            Err(e) => {
                tracing::warn!(selector = css, error = %e, "ignoring invalid selector");
                Vec::new()
            }
        }
    }

    /// Top edge relative to the viewport, like `getBoundingClientRect().top`
    fn bounding_top(&self, element: ElementId) -> f64 {
        self.offset_top(element) - self.scroll_y()
    }
}
