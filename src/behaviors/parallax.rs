use super::{Behavior, PageEvent};
use crate::config::ParallaxSettings;
use crate::dom::{Document, ElementId};
use std::sync::Arc;

/// Hero background that drifts slower than the page.
pub struct Parallax {
    doc: Arc<dyn Document>,
    background: ElementId,
    hero: Option<ElementId>,
    factor: f64,
}

impl Parallax {
    pub fn mount(doc: Arc<dyn Document>, settings: ParallaxSettings) -> Option<Self> {
        let Some(background) = doc.query_selector(".hero-bg") else {
            tracing::debug!("no .hero-bg element, parallax disabled");
            return None;
        };
        let hero = doc.query_selector(".hero");

        Some(Self {
            doc,
            background,
            hero,
            factor: settings.factor,
        })
    }

    /// Background offset for a scroll position, or `None` once the hero
    /// is scrolled past and the last offset should stay.
    pub fn offset_for(&self, scroll: f64) -> Option<f64> {
        let hero_height = self.hero.map(|h| self.doc.offset_height(h)).unwrap_or(0.0);
        (scroll < hero_height).then(|| scroll * self.factor)
    }
}

impl Behavior for Parallax {
    fn name(&self) -> &'static str {
        "parallax"
    }

    fn handle(&mut self, event: &PageEvent) {
        if *event != PageEvent::Scroll {
            return;
        }
        if let Some(offset) = self.offset_for(self.doc.scroll_y()) {
            self.doc
                .set_style(self.background, "transform", &format!("translateY({}px)", offset));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{ElementSpec, Page};
    use pretty_assertions::assert_eq;

    fn hero_page() -> Arc<Page> {
        Arc::new(Page::from_elements(
            800.0,
            vec![
                ElementSpec::new("section")
                    .class("hero")
                    .layout(0.0, 700.0)
                    .child(ElementSpec::new("div").class("hero-bg").layout(0.0, 700.0)),
                ElementSpec::new("main").layout(700.0, 3000.0),
            ],
        ))
    }

    #[test]
    fn test_moves_at_thirty_percent() {
        let page = hero_page();
        let doc: Arc<dyn Document> = page.clone();
        let mut parallax = Parallax::mount(doc, ParallaxSettings::default()).unwrap();
        let background = page.query_selector(".hero-bg").unwrap();

        page.set_scroll_y(100.0);
        parallax.handle(&PageEvent::Scroll);
        assert_eq!(page.style(background, "transform").as_deref(), Some("translateY(30px)"));

        page.set_scroll_y(0.0);
        parallax.handle(&PageEvent::Scroll);
        assert_eq!(page.style(background, "transform").as_deref(), Some("translateY(0px)"));
    }

    #[test]
    fn test_freezes_past_the_hero() {
        let page = hero_page();
        let doc: Arc<dyn Document> = page.clone();
        let mut parallax = Parallax::mount(doc, ParallaxSettings::default()).unwrap();
        let background = page.query_selector(".hero-bg").unwrap();

        page.set_scroll_y(690.0);
        parallax.handle(&PageEvent::Scroll);
        page.set_scroll_y(700.0);
        parallax.handle(&PageEvent::Scroll);
        page.set_scroll_y(1500.0);
        parallax.handle(&PageEvent::Scroll);
        assert_eq!(page.style(background, "transform").as_deref(), Some("translateY(207px)"));
        assert_eq!(parallax.offset_for(700.0), None);
    }

    #[test]
    fn test_background_without_hero_never_moves() {
        let page = Arc::new(Page::from_elements(
            800.0,
            vec![ElementSpec::new("div").class("hero-bg").layout(0.0, 2000.0)],
        ));
        let doc: Arc<dyn Document> = page.clone();
        let mut parallax = Parallax::mount(doc, ParallaxSettings::default()).unwrap();

        page.set_scroll_y(300.0);
        parallax.handle(&PageEvent::Scroll);
        assert_eq!(page.style(page.query_selector(".hero-bg").unwrap(), "transform"), None);
    }

    #[test]
    fn test_missing_background_skips() {
        let doc: Arc<dyn Document> = Arc::new(Page::new(800.0));
        assert!(Parallax::mount(doc, ParallaxSettings::default()).is_none());
    }
}
