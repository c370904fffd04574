use super::{Behavior, PageEvent};
use crate::config::PickleSettings;
use crate::constants::{PICKLE_HOVER_TRANSFORM, PICKLE_REST_TRANSFORM, PICKLE_TRANSITION};
use crate::dom::{Document, ElementId};
use crate::schedule;
use std::sync::Arc;
use std::time::Duration;

struct Rating {
    element: ElementId,
    pickles: Vec<ElementId>,
}

/// Pickle ratings on the menu that wiggle in sequence under the pointer.
pub struct PickleRatings {
    doc: Arc<dyn Document>,
    ratings: Vec<Rating>,
    stagger: Duration,
}

impl PickleRatings {
    pub fn mount(doc: Arc<dyn Document>, settings: PickleSettings) -> Option<Self> {
        // Every pickle gets the transition, rated or not.
        for pickle in doc.query_selector_all(".pickle") {
            doc.set_style(pickle, "transition", PICKLE_TRANSITION);
            doc.set_style(pickle, "display", "inline-block");
        }

        let ratings: Vec<Rating> = doc
            .query_selector_all(".pickle-rating")
            .into_iter()
            .map(|element| Rating {
                element,
                pickles: doc.query_selector_all_within(Some(element), ".pickle"),
            })
            .collect();
        if ratings.is_empty() {
            tracing::debug!("no pickle ratings on page");
            return None;
        }

        Some(Self {
            doc,
            ratings,
            stagger: Duration::from_millis(settings.stagger_ms),
        })
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    fn rating(&self, element: ElementId) -> Option<&Rating> {
        self.ratings.iter().find(|r| r.element == element)
    }

    /// Tips each pickle over one stagger after the previous.
    ///
    /// Pending tips still land if the pointer has already left.
    fn enter(&self, rating: &Rating) {
        for (index, &pickle) in rating.pickles.iter().enumerate() {
            let doc = Arc::clone(&self.doc);
            schedule::after(self.stagger * index as u32, move || {
                doc.set_style(pickle, "transform", PICKLE_HOVER_TRANSFORM);
            });
        }
    }

    fn leave(&self, rating: &Rating) {
        for &pickle in &rating.pickles {
            self.doc.set_style(pickle, "transform", PICKLE_REST_TRANSFORM);
        }
    }
}

impl Behavior for PickleRatings {
    fn name(&self) -> &'static str {
        "pickle-ratings"
    }

    fn handle(&mut self, event: &PageEvent) {
        match *event {
            PageEvent::MouseEnter(target) => {
                if let Some(rating) = self.rating(target) {
                    self.enter(rating);
                }
            }
            PageEvent::MouseLeave(target) => {
                if let Some(rating) = self.rating(target) {
                    self.leave(rating);
                }
            }
            _ => {}
        }
    }
}
