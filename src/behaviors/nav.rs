use super::{Behavior, PageEvent};
use crate::config::NavSettings;
use crate::dom::{Document, ElementId};
use std::sync::Arc;

/// Which way the last scroll moved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
    Still,
}

/// Sticky top navigation that deepens its shadow once the specials banner
/// has scrolled away.
///
/// The direction of travel is tracked too. Hiding the nav on scroll down is
/// switched off, so it is only exposed for callers that want it.
pub struct StickyNav {
    doc: Arc<dyn Document>,
    nav: ElementId,
    banner_height: f64,
    last_scroll: f64,
    direction: ScrollDirection,
    settings: NavSettings,
}

impl StickyNav {
    pub fn mount(doc: Arc<dyn Document>, settings: NavSettings) -> Option<Self> {
        let Some(nav) = doc.query_selector(".main-nav") else {
            tracing::debug!("no .main-nav element, nav shadow disabled");
            return None;
        };

        // Measured once; later banner resizes are not picked up.
        let banner_height = doc
            .query_selector(".specials-banner")
            .map(|banner| doc.offset_height(banner))
            .unwrap_or(settings.default_banner_height);

        Some(Self {
            doc,
            nav,
            banner_height,
            last_scroll: 0.0,
            direction: ScrollDirection::Still,
            settings,
        })
    }

    pub fn banner_height(&self) -> f64 {
        self.banner_height
    }

    pub fn last_scroll(&self) -> f64 {
        self.last_scroll
    }

    pub fn direction(&self) -> ScrollDirection {
        self.direction
    }

    pub fn is_scrolled(&self) -> bool {
        self.last_scroll > self.banner_height
    }

    fn on_scroll(&mut self) {
        let current = self.doc.scroll_y();
        let shadow = if current > self.banner_height {
            &self.settings.shadow_scrolled
        } else {
            &self.settings.shadow_top
        };
        self.doc.set_style(self.nav, "box-shadow", shadow);

        self.direction = if current > self.last_scroll {
            ScrollDirection::Down
        } else if current < self.last_scroll {
            ScrollDirection::Up
        } else {
            ScrollDirection::Still
        };
        self.last_scroll = current;
    }
}

impl Behavior for StickyNav {
    fn name(&self) -> &'static str {
        "sticky-nav"
    }

    fn handle(&mut self, event: &PageEvent) {
        if *event == PageEvent::Scroll {
            self.on_scroll();
        }
    }
}
