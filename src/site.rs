//! Page bootstrap: mounts every behavior against one document and routes
//! visitor events to them.

use crate::animation::TicketFlipAnimator;
use crate::behaviors::{
    Behavior, MobileMenu, OpenSign, PageEvent, Parallax, PickleRatings, ScrollReveal, SmoothScroll,
    StatCounters, StickyNav,
};
use crate::config::SiteConfig;
use crate::dom::Document;
use crate::hours::Clock;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Everything running on one page.
///
/// Must be mounted from inside a tokio runtime. The ticket and open sign
/// tasks run until that runtime shuts down.
pub struct Site {
    doc: Arc<dyn Document>,
    behaviors: Vec<Box<dyn Behavior>>,
    ticket: Option<JoinHandle<()>>,
    open_sign: Option<JoinHandle<u64>>,
}

impl Site {
    /// Mounts in page order: menu, nav, ticket, reveal, stats, hours,
    /// anchors, pickles, parallax. Behaviors whose markup is missing are
    /// left out.
    pub fn mount(doc: Arc<dyn Document>, config: &SiteConfig, clock: Arc<dyn Clock>, rng: fastrand::Rng) -> Self {
        let mut behaviors: Vec<Box<dyn Behavior>> = Vec::new();

        if let Some(menu) = MobileMenu::mount(Arc::clone(&doc)) {
            behaviors.push(Box::new(menu));
        }
        if let Some(nav) = StickyNav::mount(Arc::clone(&doc), config.nav.clone()) {
            behaviors.push(Box::new(nav));
        }
        let ticket = TicketFlipAnimator::mount(Arc::clone(&doc), config.ticket.clone(), rng)
            .map(TicketFlipAnimator::spawn);
        if let Some(reveal) = ScrollReveal::mount(Arc::clone(&doc), &config.reveal) {
            behaviors.push(Box::new(reveal));
        }
        if let Some(stats) = StatCounters::mount(Arc::clone(&doc), config.counters.clone()) {
            behaviors.push(Box::new(stats));
        }
        let open_sign = OpenSign::mount(
            Arc::clone(&doc),
            config.hours,
            config.open_sign.clone(),
            clock,
        )
        .map(OpenSign::spawn);
        if let Some(anchors) = SmoothScroll::mount(Arc::clone(&doc), config.anchors.clone()) {
            behaviors.push(Box::new(anchors));
        }
        if let Some(pickles) = PickleRatings::mount(Arc::clone(&doc), config.pickles.clone()) {
            behaviors.push(Box::new(pickles));
        }
        if let Some(parallax) = Parallax::mount(Arc::clone(&doc), config.parallax.clone()) {
            behaviors.push(Box::new(parallax));
        }

        tracing::info!(
            behaviors = behaviors.len(),
            ticket = ticket.is_some(),
            open_sign = open_sign.is_some(),
            "site mounted"
        );

        Self {
            doc,
            behaviors,
            ticket,
            open_sign,
        }
    }

    pub fn document(&self) -> &Arc<dyn Document> {
        &self.doc
    }

    /// Names of the event-driven behaviors, in dispatch order
    pub fn behavior_names(&self) -> Vec<&'static str> {
        self.behaviors.iter().map(|b| b.name()).collect()
    }

    pub fn has_ticket(&self) -> bool {
        self.ticket.is_some()
    }

    pub fn has_open_sign(&self) -> bool {
        self.open_sign.is_some()
    }

    /// Hands `event` to every behavior in mount order.
    pub fn dispatch(&mut self, event: PageEvent) {
        tracing::trace!(?event, "dispatch");
        for behavior in &mut self.behaviors {
            behavior.handle(&event);
        }
    }

    /// Dispatches events until every sender is dropped.
    ///
    /// Returns how many events were handled.
    pub async fn run(&mut self, mut events: mpsc::Receiver<PageEvent>) -> usize {
        let mut handled = 0;
        while let Some(event) = events.recv().await {
            self.dispatch(event);
            handled += 1;
        }
        tracing::debug!(handled, "event stream closed");
        handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{ElementSpec, Page};
    use crate::hours::FixedClock;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn noon() -> Arc<dyn Clock> {
        Arc::new(FixedClock(
            NaiveDate::from_ymd_opt(2026, 10, 14)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_page_mounts_nothing() {
        let doc: Arc<dyn Document> = Arc::new(Page::new(800.0));
        let mut site = Site::mount(doc, &SiteConfig::default(), noon(), fastrand::Rng::with_seed(1));
        assert!(site.behavior_names().is_empty());
        assert!(!site.has_ticket());
        assert!(!site.has_open_sign());
        site.dispatch(PageEvent::Scroll);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispatch_order_follows_mount_order() {
        let page = Arc::new(Page::from_elements(
            800.0,
            vec![
                ElementSpec::new("div").class("hero-bg"),
                ElementSpec::new("nav").class("main-nav"),
                ElementSpec::new("a").attr("href", "#top"),
                ElementSpec::new("button").class("mobile-menu-btn"),
                ElementSpec::new("div").class("mobile-menu"),
            ],
        ));
        let doc: Arc<dyn Document> = page.clone();
        let site = Site::mount(doc, &SiteConfig::default(), noon(), fastrand::Rng::with_seed(1));
        assert_eq!(
            site.behavior_names(),
            vec!["mobile-menu", "sticky-nav", "smooth-scroll", "parallax"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_drains_channel() {
        let page = Arc::new(Page::from_elements(
            800.0,
            vec![
                ElementSpec::new("button").class("mobile-menu-btn"),
                ElementSpec::new("div").class("mobile-menu"),
            ],
        ));
        let button = page.query_selector(".mobile-menu-btn").unwrap();
        let doc: Arc<dyn Document> = page.clone();
        let mut site = Site::mount(doc, &SiteConfig::default(), noon(), fastrand::Rng::with_seed(1));

        let (tx, rx) = mpsc::channel(8);
        for _ in 0..3 {
            tx.send(PageEvent::Click(button)).await.unwrap();
        }
        drop(tx);

        assert_eq!(site.run(rx).await, 3);
        let menu = page.query_selector(".mobile-menu").unwrap();
        assert!(page.has_class(menu, "active"));
    }
}
