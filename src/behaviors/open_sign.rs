use crate::config::OpenSignSettings;
use crate::dom::{Document, ElementId};
use crate::hours::{Clock, OpenState, WeeklySchedule};
use crate::schedule;
use std::ops::ControlFlow;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// The neon OPEN/CLOSED sign, kept in step with the weekly hours.
pub struct OpenSign {
    doc: Arc<dyn Document>,
    sign: ElementId,
    text: Option<ElementId>,
    hours: WeeklySchedule,
    settings: OpenSignSettings,
    clock: Arc<dyn Clock>,
}

impl OpenSign {
    /// Binds `#openSign` and paints the current state right away.
    pub fn mount(
        doc: Arc<dyn Document>,
        hours: WeeklySchedule,
        settings: OpenSignSettings,
        clock: Arc<dyn Clock>,
    ) -> Option<Self> {
        let Some(sign) = doc.element_by_id("openSign") else {
            tracing::debug!("no #openSign element, open status disabled");
            return None;
        };
        let text = doc.query_selector_all_within(Some(sign), ".open-text").into_iter().next();
        if text.is_none() {
            tracing::warn!("#openSign has no .open-text child, only the color will change");
        }

        let sign = Self {
            doc,
            sign,
            text,
            hours,
            settings,
            clock,
        };
        sign.refresh();
        Some(sign)
    }

    /// Re-reads the clock and repaints the sign.
    pub fn refresh(&self) -> OpenState {
        let now = self.clock.now();
        let state = self.hours.status_at(now);

        if let Some(text) = self.text {
            self.doc.set_text(text, state.label());
        }
        match state {
            OpenState::Open => {
                self.doc.set_style(self.sign, "background", &self.settings.open_color);
                self.doc.remove_style(self.sign, "animation");
            }
            OpenState::Closed => {
                self.doc.set_style(self.sign, "background", &self.settings.closed_color);
                self.doc.set_style(self.sign, "animation", "none");
            }
        }

        tracing::trace!(%now, %state, "open sign refreshed");
        state
    }

    /// Refreshes on the configured interval for as long as the page lives.
    pub fn spawn(self) -> JoinHandle<u64> {
        schedule::every(self.settings.refresh(), move || {
            self.refresh();
            ControlFlow::Continue(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{ElementSpec, Page};
    use crate::hours::{FixedClock, MockClock};
    use chrono::{NaiveDate, NaiveDateTime};
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::time;

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn sign_page() -> Arc<Page> {
        Arc::new(Page::from_elements(
            800.0,
            vec![ElementSpec::new("div")
                .id("openSign")
                .child(ElementSpec::new("span").class("open-text").text("OPEN"))],
        ))
    }

    fn mount_at(page: &Arc<Page>, now: NaiveDateTime) -> OpenSign {
        let doc: Arc<dyn Document> = page.clone();
        OpenSign::mount(
            doc,
            WeeklySchedule::default(),
            OpenSignSettings::default(),
            Arc::new(FixedClock(now)),
        )
        .unwrap()
    }

    #[test]
    fn test_paints_open() {
        let page = sign_page();
        // Sunday 09:00
        let sign = mount_at(&page, at(18, 9, 0));
        let element = page.element_by_id("openSign").unwrap();
        let text = page.query_selector(".open-text").unwrap();

        assert_eq!(page.text(text), "OPEN");
        assert_eq!(page.style(element, "background").as_deref(), Some("#6b8e23"));
        assert_eq!(page.style(element, "animation"), None);
        assert_eq!(sign.refresh(), OpenState::Open);
    }

    #[test]
    fn test_paints_closed() {
        let page = sign_page();
        // Wednesday 06:59
        mount_at(&page, at(14, 6, 59));
        let element = page.element_by_id("openSign").unwrap();
        let text = page.query_selector(".open-text").unwrap();

        assert_eq!(page.text(text), "CLOSED");
        assert_eq!(page.style(element, "background").as_deref(), Some("#c41e3a"));
        assert_eq!(page.style(element, "animation").as_deref(), Some("none"));
    }

    #[test]
    fn test_reopening_clears_animation_override() {
        let page = sign_page();
        let element = page.element_by_id("openSign").unwrap();
        let calls = AtomicUsize::new(0);
        let mut clock = MockClock::new();
        clock.expect_now().returning(move || {
            // Sunday 18:00 first, then Monday 07:00.
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                at(18, 18, 0)
            } else {
                at(19, 7, 0)
            }
        });

        let doc: Arc<dyn Document> = page.clone();
        let sign = OpenSign::mount(
            doc,
            WeeklySchedule::default(),
            OpenSignSettings::default(),
            Arc::new(clock),
        )
        .unwrap();
        assert_eq!(page.style(element, "animation").as_deref(), Some("none"));

        assert_eq!(sign.refresh(), OpenState::Open);
        assert_eq!(page.style(element, "animation"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refreshes_every_minute() {
        let page = sign_page();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut clock = MockClock::new();
        clock.expect_now().returning(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            at(14, 12, 0)
        });

        let doc: Arc<dyn Document> = page.clone();
        let sign = OpenSign::mount(
            doc,
            WeeklySchedule::default(),
            OpenSignSettings::default(),
            Arc::new(clock),
        )
        .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        sign.spawn();

        time::sleep(Duration::from_millis(59_999)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        time::sleep(Duration::from_millis(2)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        time::sleep(Duration::from_secs(180)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_sign_without_text_still_colors() {
        let page = Arc::new(Page::from_elements(800.0, vec![ElementSpec::new("div").id("openSign")]));
        mount_at(&page, at(14, 22, 0));
        let element = page.element_by_id("openSign").unwrap();
        assert_eq!(page.style(element, "background").as_deref(), Some("#c41e3a"));
    }

    #[test]
    fn test_missing_sign_skips() {
        let doc: Arc<dyn Document> = Arc::new(Page::new(800.0));
        let sign = OpenSign::mount(
            doc,
            WeeklySchedule::default(),
            OpenSignSettings::default(),
            Arc::new(FixedClock(at(14, 12, 0))),
        );
        assert!(sign.is_none());
    }
}
