use super::{Behavior, PageEvent};
use crate::dom::{Document, ElementId};
use std::sync::Arc;

const ACTIVE: &str = "active";

#[derive(Debug, Clone, Copy)]
enum Bar {
    Transform(&'static str),
    Opacity(&'static str),
}

const OPEN_ICON: [Bar; 3] = [
    Bar::Transform("rotate(45deg) translate(5px, 5px)"),
    Bar::Opacity("0"),
    Bar::Transform("rotate(-45deg) translate(5px, -5px)"),
];
const CLOSED_ICON: [Bar; 3] = [Bar::Transform("none"), Bar::Opacity("1"), Bar::Transform("none")];

/// Mobile navigation drawer with a hamburger button that morphs into an X.
pub struct MobileMenu {
    doc: Arc<dyn Document>,
    button: ElementId,
    menu: ElementId,
    bars: Vec<ElementId>,
    links: Vec<ElementId>,
}

impl MobileMenu {
    pub fn mount(doc: Arc<dyn Document>) -> Option<Self> {
        let (Some(button), Some(menu)) = (
            doc.query_selector(".mobile-menu-btn"),
            doc.query_selector(".mobile-menu"),
        ) else {
            tracing::debug!("mobile menu markup missing, menu toggle disabled");
            return None;
        };

        let bars = doc.query_selector_all_within(Some(button), "span");
        let links = doc.query_selector_all(".mobile-nav-links a");

        Some(Self {
            doc,
            button,
            menu,
            bars,
            links,
        })
    }

    pub fn is_open(&self) -> bool {
        self.doc.has_class(self.menu, ACTIVE)
    }

    /// Flips the menu and returns whether it is now open.
    pub fn toggle(&self) -> bool {
        let open = self.doc.toggle_class(self.menu, ACTIVE);
        self.doc.toggle_class(self.button, ACTIVE);
        self.paint_icon(open);
        open
    }

    pub fn close(&self) {
        self.doc.remove_class(self.menu, ACTIVE);
        self.doc.remove_class(self.button, ACTIVE);
        self.paint_icon(false);
    }

    fn paint_icon(&self, open: bool) {
        let icon = if open { &OPEN_ICON } else { &CLOSED_ICON };
        for (&element, bar) in self.bars.iter().zip(icon) {
            match *bar {
                Bar::Transform(value) => self.doc.set_style(element, "transform", value),
                Bar::Opacity(value) => self.doc.set_style(element, "opacity", value),
            }
        }
    }

    fn is_button(&self, target: ElementId) -> bool {
        target == self.button || self.bars.contains(&target)
    }
}

impl Behavior for MobileMenu {
    fn name(&self) -> &'static str {
        "mobile-menu"
    }

    fn handle(&mut self, event: &PageEvent) {
        let PageEvent::Click(target) = *event else {
            return;
        };

        if self.is_button(target) {
            let open = self.toggle();
            tracing::debug!(open, "mobile menu toggled");
        } else if self.links.contains(&target) {
            self.close();
        }
    }
}
