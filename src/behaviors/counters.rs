use super::{Behavior, PageEvent};
use crate::animation::{animate_counter, parse_count};
use crate::config::CounterSettings;
use crate::dom::{Document, ElementId};
use crate::visibility::{OnceGuard, VisibilityObserver};
use std::sync::Arc;
use tokio::task::JoinHandle;

struct Counter {
    element: ElementId,
    started: OnceGuard,
}

/// The "since 1963" style numbers that count up when first seen.
///
/// Mounting and every event that moves the viewport must happen inside a
/// tokio runtime, since a counter coming into view spawns its tween.
pub struct StatCounters {
    doc: Arc<dyn Document>,
    observer: VisibilityObserver,
    counters: Vec<Counter>,
    tweens: Vec<JoinHandle<u64>>,
    settings: CounterSettings,
}

impl StatCounters {
    pub fn mount(doc: Arc<dyn Document>, settings: CounterSettings) -> Option<Self> {
        let elements = doc.query_selector_all(".stat-number[data-count]");
        if elements.is_empty() {
            tracing::debug!("no stat counters on page");
            return None;
        }

        let mut observer = VisibilityObserver::new(settings.observer_options());
        let counters = elements
            .into_iter()
            .map(|element| {
                observer.observe(element);
                Counter {
                    element,
                    started: OnceGuard::default(),
                }
            })
            .collect();

        let mut stats = Self {
            doc,
            observer,
            counters,
            tweens: Vec::new(),
            settings,
        };
        stats.check();
        Some(stats)
    }

    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    /// How many counters have started their tween
    pub fn started(&self) -> usize {
        self.counters.iter().filter(|c| c.started.has_fired()).count()
    }

    /// Tweens that are still counting
    pub fn running(&self) -> usize {
        self.tweens.iter().filter(|t| !t.is_finished()).count()
    }

    fn check(&mut self) {
        for element in self.observer.take_records(self.doc.as_ref()) {
            self.start(element);
        }
    }

    fn start(&mut self, element: ElementId) {
        self.observer.unobserve(element);
        let Some(counter) = self.counters.iter_mut().find(|c| c.element == element) else {
            return;
        };
        if !counter.started.try_fire() {
            return;
        }

        // Read at trigger time, not at mount.
        let target = parse_count(self.doc.attribute(element, "data-count").as_deref());
        let tween = animate_counter(Arc::clone(&self.doc), element, target, &self.settings);
        self.tweens.retain(|t| !t.is_finished());
        self.tweens.push(tween);
    }
}

impl Behavior for StatCounters {
    fn name(&self) -> &'static str {
        "stat-counters"
    }

    fn handle(&mut self, event: &PageEvent) {
        if event.moves_viewport() && !self.observer.is_empty() {
            self.check();
        }
    }
}
