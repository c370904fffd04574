use crate::config::CounterSettings;
use crate::dom::{Document, ElementId};
use crate::schedule;
use std::ops::ControlFlow;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Reads a counter target the way `parseInt` would: surrounding whitespace
/// and a leading `+` are allowed, trailing junk after the digits is ignored.
///
/// Absent, non-numeric and negative values all count from 0 to 0.
pub fn parse_count(raw: Option<&str>) -> u64 {
    let Some(raw) = raw else {
        tracing::warn!("stat counter has no data-count, using 0");
        return 0;
    };

    let trimmed = raw.trim_start();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let digits = &unsigned[..digits_end];

    if digits.is_empty() {
        tracing::warn!(value = raw, "stat counter data-count is not a number, using 0");
        return 0;
    }
    if negative {
        tracing::warn!(value = raw, "stat counter data-count is negative, using 0");
        return 0;
    }

    // Overlong digit strings saturate instead of wrapping.
    digits.parse().unwrap_or(u64::MAX)
}

/// Values displayed while counting from 0 up to `target`.
///
/// Each step adds `target / steps`; the tween ends on the step where the
/// running total reaches the target, or on the last step, and always ends
/// by yielding exactly `target`.
#[derive(Debug, Clone)]
pub struct StatTween {
    target: u64,
    steps: u32,
    increment: f64,
    current: f64,
    step: u32,
    done: bool,
}

impl StatTween {
    pub fn new(target: u64, steps: u32) -> Self {
        let steps = steps.max(1);
        Self {
            target,
            steps,
            increment: target as f64 / steps as f64,
            current: 0.0,
            step: 0,
            done: false,
        }
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    pub fn is_done(&self) -> bool {
        self.done
    }
}

impl Iterator for StatTween {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.done {
            return None;
        }

        self.step += 1;
        self.current += self.increment;
        if self.current >= self.target as f64 || self.step >= self.steps {
            self.done = true;
            return Some(self.target);
        }

        Some((self.current.floor() as u64).min(self.target))
    }
}

/// Counts `element` up to `target`, one tween step per interval.
///
/// Returns the number of steps that ran.
pub fn animate_counter(
    doc: Arc<dyn Document>,
    element: ElementId,
    target: u64,
    settings: &CounterSettings,
) -> JoinHandle<u64> {
    let mut tween = StatTween::new(target, settings.steps);
    tracing::debug!(target, steps = settings.steps, "stat counter started");

    schedule::every(settings.step_interval(), move || match tween.next() {
        Some(value) => {
            doc.set_text(element, &value.to_string());
            if tween.is_done() {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        }
        None => ControlFlow::Break(()),
    })
}
