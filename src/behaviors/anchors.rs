use super::{Behavior, PageEvent};
use crate::config::AnchorSettings;
use crate::dom::{Document, ElementId, ScrollBehavior};
use std::sync::Arc;

/// In-page `#section` links that glide to their target and stop short of
/// the sticky header.
pub struct SmoothScroll {
    doc: Arc<dyn Document>,
    anchors: Vec<ElementId>,
    settings: AnchorSettings,
}

impl SmoothScroll {
    pub fn mount(doc: Arc<dyn Document>, settings: AnchorSettings) -> Option<Self> {
        let anchors = doc.query_selector_all("a[href^=\"#\"]");
        if anchors.is_empty() {
            tracing::debug!("no in-page anchors");
            return None;
        }

        Some(Self {
            doc,
            anchors,
            settings,
        })
    }

    pub fn anchors(&self) -> &[ElementId] {
        &self.anchors
    }

    /// Where clicking `anchor` should scroll to, if anywhere.
    ///
    /// A bare `#` and links to elements that don't exist go nowhere.
    pub fn scroll_target(&self, anchor: ElementId) -> Option<f64> {
        let href = self.doc.attribute(anchor, "href")?;
        if href == "#" {
            return None;
        }
        let Some(target) = self.doc.query_selector(&href) else {
            tracing::debug!(%href, "anchor target not found");
            return None;
        };

        let offset = self.header_height() + self.settings.extra_offset;
        Some(self.doc.bounding_top(target) + self.doc.scroll_y() - offset)
    }

    // Re-measured on every click; a missing nav or banner counts as 0.
    fn header_height(&self) -> f64 {
        [".main-nav", ".specials-banner"]
            .into_iter()
            .filter_map(|css| self.doc.query_selector(css))
            .map(|element| self.doc.offset_height(element))
            .sum()
    }
}

impl Behavior for SmoothScroll {
    fn name(&self) -> &'static str {
        "smooth-scroll"
    }

    fn handle(&mut self, event: &PageEvent) {
        let PageEvent::Click(target) = *event else {
            return;
        };
        if !self.anchors.contains(&target) {
            return;
        }

        if let Some(top) = self.scroll_target(target) {
            tracing::debug!(top, "smooth scrolling to anchor");
            self.doc.scroll_to(top, ScrollBehavior::Smooth);
        }
    }
}
