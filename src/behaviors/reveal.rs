use super::{Behavior, PageEvent};
use crate::config::RevealSettings;
use crate::dom::{Document, ElementId};
use crate::visibility::VisibilityObserver;
use std::sync::Arc;

const FADE_IN: &str = "fade-in";
const VISIBLE: &str = "visible";
const STAGGERED: &str = "classic-card";

/// Fades page sections in the first time they scroll into view.
pub struct ScrollReveal {
    doc: Arc<dyn Document>,
    observer: VisibilityObserver,
    revealed: usize,
}

impl ScrollReveal {
    /// Tags every target with `fade-in` (menu cards also get a
    /// `stagger-N` class) and reveals whatever is already on screen.
    pub fn mount(doc: Arc<dyn Document>, settings: &RevealSettings) -> Option<Self> {
        let targets = doc.query_selector_all(&settings.selector);
        if targets.is_empty() {
            tracing::debug!(selector = %settings.selector, "nothing to reveal");
            return None;
        }

        let groups = settings.stagger_groups.max(1);
        let mut observer = VisibilityObserver::new(settings.observer_options());
        for (index, &element) in targets.iter().enumerate() {
            doc.add_class(element, FADE_IN);
            // Index counts across all targets, not only the cards.
            if doc.has_class(element, STAGGERED) {
                doc.add_class(element, &format!("stagger-{}", (index % groups) + 1));
            }
            observer.observe(element);
        }
        tracing::debug!(targets = targets.len(), "scroll reveal mounted");

        let mut reveal = Self {
            doc,
            observer,
            revealed: 0,
        };
        reveal.check();
        Some(reveal)
    }

    /// Elements still waiting to be revealed
    pub fn pending(&self) -> usize {
        self.observer.len()
    }

    pub fn revealed(&self) -> usize {
        self.revealed
    }

    fn check(&mut self) {
        for element in self.observer.take_records(self.doc.as_ref()) {
            self.reveal(element);
        }
    }

    fn reveal(&mut self, element: ElementId) {
        self.doc.add_class(element, VISIBLE);
        self.observer.unobserve(element);
        self.revealed += 1;
    }
}

impl Behavior for ScrollReveal {
    fn name(&self) -> &'static str {
        "scroll-reveal"
    }

    fn handle(&mut self, event: &PageEvent) {
        if event.moves_viewport() && !self.observer.is_empty() {
            self.check();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{ElementSpec, Page};
    use pretty_assertions::assert_eq;

    fn reveal_page() -> Arc<Page> {
        Arc::new(Page::from_elements(
            800.0,
            vec![
                ElementSpec::new("div").class("section-header").layout(100.0, 80.0),
                ElementSpec::new("div").class("classic-card").layout(400.0, 300.0),
                ElementSpec::new("div").class("classic-card").layout(1200.0, 300.0),
                ElementSpec::new("div").class("classic-card").layout(1200.0, 300.0),
                ElementSpec::new("div").class("classic-card").layout(1600.0, 300.0),
                ElementSpec::new("div").class("classic-card").layout(1600.0, 300.0),
                ElementSpec::new("div").class("polaroid").layout(2600.0, 400.0),
                ElementSpec::new("footer").layout(3000.0, 200.0),
            ],
        ))
    }

    fn mount(page: &Arc<Page>) -> ScrollReveal {
        let doc: Arc<dyn Document> = page.clone();
        ScrollReveal::mount(doc, &RevealSettings::default()).unwrap()
    }

    #[test]
    fn test_mount_tags_targets() {
        let page = reveal_page();
        mount(&page);

        let cards = page.query_selector_all(".classic-card");
        let staggers: Vec<String> = cards
            .iter()
            .map(|&card| {
                page.classes(card)
                    .into_iter()
                    .find(|c| c.starts_with("stagger-"))
                    .unwrap()
            })
            .collect();
        // The header is target 0, so the first card is index 1.
        assert_eq!(staggers, ["stagger-2", "stagger-3", "stagger-4", "stagger-1", "stagger-2"]);

        let header = page.query_selector(".section-header").unwrap();
        assert!(page.has_class(header, "fade-in"));
        assert!(!page.classes(header).iter().any(|c| c.starts_with("stagger-")));

        let footer = page.query_selector("footer").unwrap();
        assert!(!page.has_class(footer, "fade-in"));
    }

    #[test]
    fn test_initial_check_reveals_above_the_fold() {
        let page = reveal_page();
        let reveal = mount(&page);

        let header = page.query_selector(".section-header").unwrap();
        let cards = page.query_selector_all(".classic-card");
        assert!(page.has_class(header, "visible"));
        // The bottom 100px of the viewport don't count: 400..700 is inside.
        assert!(page.has_class(cards[0], "visible"));
        assert!(!page.has_class(cards[1], "visible"));
        assert_eq!(reveal.revealed(), 2);
        assert_eq!(reveal.pending(), 5);
    }

    #[test]
    fn test_scroll_reveals_once() {
        let page = reveal_page();
        let mut reveal = mount(&page);
        let cards = page.query_selector_all(".classic-card");

        // Viewport 700..1500, root bottom at 1400: 200 of 300px visible.
        page.set_scroll_y(700.0);
        reveal.handle(&PageEvent::Scroll);
        assert!(page.has_class(cards[1], "visible"));
        assert!(page.has_class(cards[2], "visible"));
        assert!(!page.has_class(cards[3], "visible"));
        assert_eq!(reveal.revealed(), 4);

        // Scrolling back up keeps the class.
        page.set_scroll_y(0.0);
        reveal.handle(&PageEvent::Scroll);
        assert!(page.has_class(cards[1], "visible"));

        page.set_scroll_y(700.0);
        reveal.handle(&PageEvent::Scroll);
        assert_eq!(reveal.revealed(), 4);
    }

    #[test]
    fn test_resize_rechecks() {
        let page = reveal_page();
        let mut reveal = mount(&page);
        let polaroid = page.query_selector(".polaroid").unwrap();

        page.set_viewport_height(2800.0);
        reveal.handle(&PageEvent::Click(polaroid));
        assert!(!page.has_class(polaroid, "visible"));

        reveal.handle(&PageEvent::Resize);
        assert!(page.has_class(polaroid, "visible"));
        assert_eq!(reveal.pending(), 0);
    }

    #[test]
    fn test_no_targets_skips() {
        let doc: Arc<dyn Document> = Arc::new(Page::from_elements(
            800.0,
            vec![ElementSpec::new("div").class("hero")],
        ));
        assert!(ScrollReveal::mount(doc, &RevealSettings::default()).is_none());
    }
}
