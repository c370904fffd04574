//! Page behaviors that react to visitor events.
//!
//! Each behavior is mounted once against a document and then fed
//! [`PageEvent`]s. Mounting returns `None` when the elements it needs are not
//! on the page, so a partial page simply has fewer behaviors.

mod anchors;
mod counters;
mod menu;
mod nav;
mod open_sign;
mod parallax;
mod pickles;
mod reveal;

pub use anchors::SmoothScroll;
pub use counters::StatCounters;
pub use menu::MobileMenu;
pub use nav::{ScrollDirection, StickyNav};
pub use open_sign::OpenSign;
pub use parallax::Parallax;
pub use pickles::PickleRatings;
pub use reveal::ScrollReveal;

use crate::dom::ElementId;

/// Something the visitor did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    Scroll,
    Resize,
    Click(ElementId),
    MouseEnter(ElementId),
    MouseLeave(ElementId),
}

impl PageEvent {
    /// Scrolls and resizes both move elements relative to the viewport.
    pub fn moves_viewport(&self) -> bool {
        matches!(self, PageEvent::Scroll | PageEvent::Resize)
    }
}

/// A mounted page behavior
pub trait Behavior: Send {
    fn name(&self) -> &'static str;

    fn handle(&mut self, event: &PageEvent);
}
